//! Introspection result for bearer tokens presented to protected resources.

// self
use crate::{
	_prelude::*,
	auth::payload::{self, EntityError},
};

/// Token facts the authority reports for a usable access token.
#[derive(Clone, Debug, PartialEq)]
pub struct IntrospectionEntity {
	/// Subject the token was issued for; absent for client-credential tokens.
	pub subject: Option<String>,
	/// Client the token was issued to.
	pub client_id: Option<String>,
	/// Scopes the token covers.
	pub scopes: BTreeSet<String>,
	/// Expiry instant, when reported.
	pub expires_at: Option<OffsetDateTime>,
	/// Untouched authority response body.
	pub raw_response: JsonValue,
}
impl IntrospectionEntity {
	/// Builds the entity from an `OK` introspection payload.
	pub fn from_payload(payload: &JsonValue) -> Result<Self, EntityError> {
		let wire: IntrospectionPayload = payload::decode(payload)?;
		let expires_at =
			wire.expires_at.map(|millis| payload::instant_from_millis("expiresAt", millis)).transpose()?;

		Ok(Self {
			subject: wire.subject,
			client_id: wire.client_id,
			scopes: wire.scopes.unwrap_or_default().into_iter().collect(),
			expires_at,
			raw_response: payload.clone(),
		})
	}

	/// Returns `true` if the token covers every scope in `required`.
	pub fn covers<'a>(&self, required: impl IntoIterator<Item = &'a str>) -> bool {
		required.into_iter().all(|scope| self.scopes.contains(scope))
	}
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntrospectionPayload {
	#[serde(default)]
	subject: Option<String>,
	#[serde(default, deserialize_with = "payload::string_or_number")]
	client_id: Option<String>,
	#[serde(default)]
	scopes: Option<Vec<String>>,
	#[serde(default)]
	expires_at: Option<i64>,
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn numeric_client_ids_are_stringified() {
		let entity = IntrospectionEntity::from_payload(&json!({
			"action": "OK",
			"clientId": 57297408867_u64,
			"subject": "subject-0001",
			"scopes": ["openid", "email"],
			"expiresAt": 1490335510238_i64,
		}))
		.expect("OK payload should build an entity.");

		assert_eq!(entity.client_id.as_deref(), Some("57297408867"));
		assert_eq!(entity.subject.as_deref(), Some("subject-0001"));
		assert!(entity.covers(["email"]));
		assert!(!entity.covers(["email", "phone"]));
		assert!(entity.expires_at.is_some());
	}

	#[test]
	fn sparse_payloads_are_accepted() {
		let entity = IntrospectionEntity::from_payload(&json!({ "action": "OK" }))
			.expect("Sparse payload should build an entity.");

		assert!(entity.scopes.is_empty());
		assert_eq!(entity.subject, None);
		assert!(entity.covers(std::iter::empty::<&str>()));
	}
}
