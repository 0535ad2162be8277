//! Immutable access-token entity built from a token endpoint `OK` payload.

// self
use crate::{
	_prelude::*,
	auth::{
		payload::{self, EntityError},
		token::secret::TokenSecret,
	},
};

const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// Access token issued by the authority for an authorization code.
#[derive(Clone)]
pub struct AccessTokenEntity {
	/// Access token secret; callers must avoid logging it.
	pub access_token: TokenSecret,
	/// Token type advertised to the client.
	pub token_type: String,
	/// Expiry instant, when the authority reports one.
	pub expires_at: Option<OffsetDateTime>,
	/// Scopes the token covers.
	pub scopes: BTreeSet<String>,
	/// Untouched authority response body.
	pub raw_response: JsonValue,
}
impl AccessTokenEntity {
	/// Builds the entity from an `OK` payload received at `issued_at`.
	///
	/// Expiry prefers the absolute `accessTokenExpiresAt` (epoch milliseconds) and falls back
	/// to `accessTokenDuration` (seconds) relative to `issued_at`.
	pub fn from_payload(payload: &JsonValue, issued_at: OffsetDateTime) -> Result<Self, EntityError> {
		let wire: TokenPayload = payload::decode(payload)?;
		let expires_at = match (wire.access_token_expires_at, wire.access_token_duration) {
			(Some(millis), _) => Some(payload::instant_from_millis("accessTokenExpiresAt", millis)?),
			(None, Some(secs)) => Some(
				issued_at
					.checked_add(Duration::seconds(secs))
					.ok_or(EntityError::OutOfRange { field: "accessTokenDuration" })?,
			),
			(None, None) => None,
		};

		Ok(Self {
			access_token: TokenSecret::new(wire.access_token),
			token_type: wire.token_type.unwrap_or_else(|| DEFAULT_TOKEN_TYPE.into()),
			expires_at,
			scopes: wire.scopes.unwrap_or_default().into_iter().collect(),
			raw_response: payload.clone(),
		})
	}

	/// Client-facing token response body the authority prepared, if any.
	pub fn response_content(&self) -> Option<&str> {
		self.raw_response.get("responseContent").and_then(JsonValue::as_str)
	}

	/// Returns `true` if the token has expired at the provided instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at.is_some_and(|expires_at| instant >= expires_at)
	}
}
impl Debug for AccessTokenEntity {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AccessTokenEntity")
			.field("access_token", &"<redacted>")
			.field("token_type", &self.token_type)
			.field("expires_at", &self.expires_at)
			.field("scopes", &self.scopes)
			.finish_non_exhaustive()
	}
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenPayload {
	access_token: String,
	#[serde(default)]
	token_type: Option<String>,
	#[serde(default)]
	access_token_expires_at: Option<i64>,
	#[serde(default)]
	access_token_duration: Option<i64>,
	#[serde(default)]
	scopes: Option<Vec<String>>,
}
