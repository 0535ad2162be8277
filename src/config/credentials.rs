//! API credential sources used to authenticate against the authority.

// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Supplies the API key/secret pair sent as HTTP basic auth on every authority call.
pub trait CredentialProvider
where
	Self: Send + Sync,
{
	/// Returns the API key or [`ConfigError::MissingCredential`].
	fn api_key(&self) -> Result<String, ConfigError>;

	/// Returns the API secret or [`ConfigError::MissingCredential`].
	fn api_secret(&self) -> Result<String, ConfigError>;
}

/// Credentials fixed at construction time.
#[derive(Clone, Default)]
pub struct StaticCredentials {
	/// API key, if configured.
	pub api_key: Option<String>,
	/// API secret, if configured.
	pub api_secret: Option<TokenSecret>,
}
impl StaticCredentials {
	/// Creates a provider holding both values.
	pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
		Self { api_key: Some(api_key.into()), api_secret: Some(TokenSecret::new(api_secret)) }
	}
}
impl CredentialProvider for StaticCredentials {
	fn api_key(&self) -> Result<String, ConfigError> {
		self.api_key
			.as_deref()
			.filter(|key| !key.is_empty())
			.map(str::to_owned)
			.ok_or(ConfigError::MissingCredential { name: "api_key" })
	}

	fn api_secret(&self) -> Result<String, ConfigError> {
		self.api_secret
			.as_ref()
			.filter(|secret| !secret.is_empty())
			.map(|secret| secret.expose().to_owned())
			.ok_or(ConfigError::MissingCredential { name: "api_secret" })
	}
}
impl Debug for StaticCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("StaticCredentials")
			.field("api_key_set", &self.api_key.is_some())
			.field("api_secret_set", &self.api_secret.is_some())
			.finish()
	}
}
