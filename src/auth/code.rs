//! Authorization code entity returned by a successful two-phase handshake.

// self
use crate::{
	_prelude::*,
	auth::{AuthorizationRequest, EntityError, TokenSecret, payload},
};

/// Authorization code the transport layer redirects the user agent with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationCodeEntity {
	/// Issued authorization code.
	pub code: TokenSecret,
	/// Redirect URI the code must be delivered to.
	pub redirect_uri: String,
	/// State value to echo back to the client.
	pub state: String,
	/// Ready-made redirect location, when the authority supplies one.
	pub response_content: Option<String>,
}
impl AuthorizationCodeEntity {
	/// Builds the entity from a `LOCATION` payload.
	///
	/// `redirectUri` and `state` come from the payload when present; the authority usually
	/// only encodes them inside `responseContent`, in which case the request's values are used.
	pub fn from_payload(
		payload: &JsonValue,
		request: &AuthorizationRequest,
	) -> Result<Self, EntityError> {
		let wire: IssuePayload = payload::decode(payload)?;

		Ok(Self {
			code: TokenSecret::new(wire.authorization_code),
			redirect_uri: wire.redirect_uri.unwrap_or_else(|| request.redirect_uri.clone()),
			state: wire.state.unwrap_or_else(|| request.state.clone()),
			response_content: wire.response_content,
		})
	}
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssuePayload {
	authorization_code: String,
	#[serde(default)]
	redirect_uri: Option<String>,
	#[serde(default)]
	state: Option<String>,
	#[serde(default)]
	response_content: Option<String>,
}
