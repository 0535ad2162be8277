//! Persisted user and protected-resource records.

// self
use crate::{
	_prelude::*,
	auth::{IntrospectionEntity, ResourceId, Subject, TokenSecret},
};

/// End-user profile keyed by subject.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
	/// Subject identifier shared with the authority.
	pub subject: Subject,
	/// Login e-mail address.
	pub email: String,
	/// Whether the e-mail address has been verified.
	#[serde(default)]
	pub email_verified: bool,
	/// Password hash; redacted in `Debug`.
	pub password_hash: TokenSecret,
	/// Display name.
	#[serde(default)]
	pub name: Option<String>,
	/// Self-reported gender.
	#[serde(default)]
	pub gender: Option<String>,
	/// Birthdate in `YYYY-MM-DD` form.
	#[serde(default)]
	pub birthdate: Option<String>,
	/// Creation instant.
	#[serde(with = "time::serde::timestamp")]
	pub created_at: OffsetDateTime,
	/// Last modification instant.
	#[serde(with = "time::serde::timestamp")]
	pub updated_at: OffsetDateTime,
}
impl UserRecord {
	/// Creates a record stamped at `now`.
	pub fn new(
		subject: Subject,
		email: impl Into<String>,
		password_hash: impl Into<String>,
		now: OffsetDateTime,
	) -> Self {
		Self {
			subject,
			email: email.into(),
			email_verified: false,
			password_hash: TokenSecret::new(password_hash),
			name: None,
			gender: None,
			birthdate: None,
			created_at: now,
			updated_at: now,
		}
	}

	/// Bumps `updated_at`.
	pub fn touch(&mut self, now: OffsetDateTime) {
		self.updated_at = now;
	}
}

/// Protected API resource and the scopes a bearer token needs to call it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceRecord {
	/// Resource identifier.
	pub id: ResourceId,
	/// HTTP method the resource answers (upper-case).
	pub http_method: String,
	/// Request path the resource answers.
	pub resource_path: String,
	/// Display name.
	pub name: String,
	/// Scopes a token must cover.
	#[serde(default)]
	pub scopes: Vec<String>,
	/// Creation instant.
	#[serde(with = "time::serde::timestamp")]
	pub created_at: OffsetDateTime,
	/// Last modification instant.
	#[serde(with = "time::serde::timestamp")]
	pub updated_at: OffsetDateTime,
}
impl ResourceRecord {
	/// Creates a record stamped at `now`; the method is upper-cased.
	pub fn new(
		id: ResourceId,
		http_method: &str,
		resource_path: impl Into<String>,
		name: impl Into<String>,
		scopes: Vec<String>,
		now: OffsetDateTime,
	) -> Self {
		Self {
			id,
			http_method: http_method.to_ascii_uppercase(),
			resource_path: resource_path.into(),
			name: name.into(),
			scopes,
			created_at: now,
			updated_at: now,
		}
	}

	/// Bumps `updated_at`.
	pub fn touch(&mut self, now: OffsetDateTime) {
		self.updated_at = now;
	}

	/// Returns `true` if the introspected token covers every scope this resource requires.
	pub fn is_accessible_with(&self, token: &IntrospectionEntity) -> bool {
		token.covers(self.scopes.iter().map(String::as_str))
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	use time::macros;
	// self
	use super::*;

	#[test]
	fn user_records_use_epoch_seconds_and_redact_hashes() {
		let subject = Subject::new("subject-0001").expect("Subject fixture should be valid.");
		let user = UserRecord::new(
			subject,
			"user@example.com",
			"$2b$10$abcdefghijklmnopqrstuv",
			macros::datetime!(2024-05-01 00:00 UTC),
		);
		let encoded = serde_json::to_value(&user).expect("User record should serialize.");

		assert_eq!(encoded["createdAt"], 1714521600);
		assert_eq!(encoded["emailVerified"], false);
		assert!(!format!("{user:?}").contains("abcdefghij"));

		let decoded: UserRecord =
			serde_json::from_value(encoded).expect("User record should deserialize.");

		assert_eq!(decoded, user);
	}

	#[test]
	fn resource_access_follows_token_scopes() {
		let resource = ResourceRecord::new(
			ResourceId::new("res-1").expect("Resource fixture should be valid."),
			"get",
			"/v1/profile",
			"Profile",
			vec!["email".into()],
			OffsetDateTime::now_utc(),
		);
		let granted = IntrospectionEntity::from_payload(&json!({ "scopes": ["openid", "email"] }))
			.expect("Introspection fixture should decode.");
		let narrow = IntrospectionEntity::from_payload(&json!({ "scopes": ["openid"] }))
			.expect("Introspection fixture should decode.");

		assert_eq!(resource.http_method, "GET");
		assert!(resource.is_accessible_with(&granted));
		assert!(!resource.is_accessible_with(&narrow));
	}
}
