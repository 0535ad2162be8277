//! Bearer token introspection for resource-protecting adapters.

// self
use crate::{
	_prelude::*,
	auth::IntrospectionEntity,
	authority::Endpoint,
	flows::{Gateway, common},
	http::AuthorityHttpClient,
	obs::{FlowKind, FlowSpan, FlowState, FlowTracker},
};

impl<C> Gateway<C>
where
	C: ?Sized + AuthorityHttpClient,
{
	/// Asks the authority whether `access_token` is usable and returns what it covers.
	pub async fn introspect_access_token(&self, access_token: &str) -> Result<IntrospectionEntity> {
		const KIND: FlowKind = FlowKind::Introspection;

		let span = FlowSpan::new(KIND, "introspect_access_token");
		let mut tracker = FlowTracker::start(KIND);
		let result = span
			.instrument(async {
				tracker.advance(FlowState::AwaitingPhase1);

				let response = self
					.authority()
					.request_introspection(access_token)
					.await
					.map_err(|e| common::call_failure(Endpoint::Introspection, e))?;
				let payload = common::resolve(Endpoint::Introspection, &response)?;

				IntrospectionEntity::from_payload(payload)
					.map_err(|e| {
						common::entity_failure(Endpoint::Introspection, &response, e)
					})
			})
			.await;

		tracker.finish(&result);

		result
	}
}
