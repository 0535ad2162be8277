//! Typed authorization request handed over by the request-entry adapter.

// crates.io
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::{ClientId, OidcScopes, Subject},
};

/// Already-validated authorization request consumed by a single authorization attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationRequest {
	/// Client the code is issued to.
	pub client_id: ClientId,
	/// Opaque state echoed back to the client.
	pub state: String,
	/// Redirect URI registered for the client, forwarded verbatim.
	pub redirect_uri: String,
	/// Requested scopes, `openid` first.
	pub scopes: OidcScopes,
	/// Authenticated end-user the code is issued for.
	pub subject: Subject,
}
impl AuthorizationRequest {
	/// Creates a new request.
	pub fn new(
		client_id: ClientId,
		state: impl Into<String>,
		redirect_uri: impl Into<String>,
		scopes: OidcScopes,
		subject: Subject,
	) -> Self {
		Self { client_id, state: state.into(), redirect_uri: redirect_uri.into(), scopes, subject }
	}

	/// Form-encoded OAuth request parameters the authority parses on the ticket endpoint.
	pub fn encoded_parameters(&self) -> String {
		form_urlencoded::Serializer::new(String::new())
			.append_pair("client_id", &self.client_id)
			.append_pair("response_type", "code")
			.append_pair("state", &self.state)
			.append_pair("scope", &self.scopes.normalized())
			.append_pair("redirect_uri", &self.redirect_uri)
			.finish()
	}
}
