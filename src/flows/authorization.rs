//! Two-phase authorization code issuance.
//!
//! Phase 1 submits the client's authorization request and receives a ticket; phase 2 trades
//! that ticket for an authorization code on behalf of the authenticated subject. Phase 2 is
//! dispatched only when phase 1 answered `INTERACTION` with HTTP 200, and the ticket never
//! outlives the invocation.

// self
use crate::{
	_prelude::*,
	auth::{AuthorityTicket, AuthorizationCodeEntity, AuthorizationRequest},
	authority::Endpoint,
	flows::{Gateway, common},
	http::AuthorityHttpClient,
	obs::{FlowKind, FlowSpan, FlowState, FlowTracker},
};

impl<C> Gateway<C>
where
	C: ?Sized + AuthorityHttpClient,
{
	/// Issues an authorization code for `request`.
	pub async fn issue_authorization_code(
		&self,
		request: &AuthorizationRequest,
	) -> Result<AuthorizationCodeEntity> {
		const KIND: FlowKind = FlowKind::Authorization;

		let span = FlowSpan::new(KIND, "issue_authorization_code");
		let mut tracker = FlowTracker::start(KIND);
		let result = span
			.instrument(async {
				tracker.advance(FlowState::AwaitingPhase1);

				let response = self
					.authority()
					.request_authorization_ticket(request)
					.await
					.map_err(|e| common::call_failure(Endpoint::AuthorizationTicket, e))?;
				let payload = common::resolve(Endpoint::AuthorizationTicket, &response)?;
				let ticket = AuthorityTicket::from_payload(payload)
					.map_err(|e| {
						common::entity_failure(Endpoint::AuthorizationTicket, &response, e)
					})?;

				tracker.advance(FlowState::AwaitingPhase2);

				let response = self
					.authority()
					.request_authorization_issue(&ticket.ticket, &request.subject)
					.await
					.map_err(|e| common::call_failure(Endpoint::AuthorizationIssue, e))?;
				let payload = common::resolve(Endpoint::AuthorizationIssue, &response)?;

				AuthorizationCodeEntity::from_payload(payload, request)
					.map_err(|e| {
						common::entity_failure(Endpoint::AuthorizationIssue, &response, e)
					})
			})
			.await;

		tracker.finish(&result);

		result
	}
}
