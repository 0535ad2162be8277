//! Authorization code to access token exchange.

// self
use crate::{
	_prelude::*,
	auth::AccessTokenEntity,
	authority::Endpoint,
	flows::{Gateway, common},
	http::AuthorityHttpClient,
	obs::{FlowKind, FlowSpan, FlowState, FlowTracker},
};

impl<C> Gateway<C>
where
	C: ?Sized + AuthorityHttpClient,
{
	/// Exchanges `code` (delivered to `redirect_uri`) for an access token.
	pub async fn issue_access_token(
		&self,
		code: &str,
		redirect_uri: &str,
	) -> Result<AccessTokenEntity> {
		const KIND: FlowKind = FlowKind::Token;

		let span = FlowSpan::new(KIND, "issue_access_token");
		let mut tracker = FlowTracker::start(KIND);
		let result = span
			.instrument(async {
				tracker.advance(FlowState::AwaitingPhase1);

				let response = self
					.authority()
					.request_token_issue(code, redirect_uri)
					.await
					.map_err(|e| common::call_failure(Endpoint::TokenIssue, e))?;
				let issued_at = OffsetDateTime::now_utc();
				let payload = common::resolve(Endpoint::TokenIssue, &response)?;

				AccessTokenEntity::from_payload(payload, issued_at)
					.map_err(|e| {
						common::entity_failure(Endpoint::TokenIssue, &response, e)
					})
			})
			.await;

		tracker.finish(&result);

		result
	}
}
