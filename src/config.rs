//! Explicit configuration values for the authority connection and record persistence.
//!
//! Everything the edge needs at runtime is captured in [`AuthorityConfig`] and
//! [`StoreConfig`], built once (directly or via `from_env`) and passed into the gateway and
//! stores at construction time.

pub mod credentials;

pub use credentials::*;

// std
use std::env;
// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Connection settings for the external authority.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthorityConfig {
	/// Base URL every endpoint path is joined onto.
	pub base_url: Url,
	/// API key used as the basic-auth user name.
	#[serde(default)]
	pub api_key: Option<String>,
	/// API secret used as the basic-auth password.
	#[serde(default)]
	pub api_secret: Option<TokenSecret>,
	/// Upper bound for a single HTTP call, in seconds.
	#[serde(default = "AuthorityConfig::default_timeout_secs")]
	pub timeout_secs: u64,
	/// Permits plain-HTTP base URLs (mock servers only).
	#[serde(default)]
	pub insecure: bool,
}
impl AuthorityConfig {
	/// Public authority deployment used when no base URL is configured.
	pub const DEFAULT_BASE_URL: &'static str = "https://api.authlete.com";
	/// Default timeout applied to each authority call.
	pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

	const ENV_API_KEY: &'static str = "AUTHORITY_API_KEY";
	const ENV_API_SECRET: &'static str = "AUTHORITY_API_SECRET";
	const ENV_BASE_URL: &'static str = "AUTHORITY_BASE_URL";
	const ENV_TIMEOUT_SECS: &'static str = "AUTHORITY_TIMEOUT_SECS";

	/// Creates a configuration without credentials.
	pub fn new(base_url: Url) -> Self {
		Self {
			base_url,
			api_key: None,
			api_secret: None,
			timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
			insecure: false,
		}
	}

	/// Loads the configuration from `AUTHORITY_*` environment variables.
	///
	/// Missing credentials are not an error here; they surface as
	/// [`ConfigError::MissingCredential`] on the first authority call.
	pub fn from_env() -> Result<Self, ConfigError> {
		let base_url = match env::var(Self::ENV_BASE_URL) {
			Ok(raw) => Url::parse(&raw).map_err(|source| ConfigError::InvalidBaseUrl { source })?,
			Err(_) => Url::parse(Self::DEFAULT_BASE_URL)
				.map_err(|source| ConfigError::InvalidBaseUrl { source })?,
		};
		let mut config = Self::new(base_url);

		config.api_key = env::var(Self::ENV_API_KEY).ok();
		config.api_secret = env::var(Self::ENV_API_SECRET).ok().map(TokenSecret::new);

		if let Ok(raw) = env::var(Self::ENV_TIMEOUT_SECS) {
			config.timeout_secs = raw.trim().parse().map_err(|e| ConfigError::InvalidEnv {
				name: Self::ENV_TIMEOUT_SECS,
				reason: format!("{e}"),
			})?;
		}

		Ok(config)
	}

	/// Sets the API key/secret pair.
	pub fn with_credentials(
		mut self,
		api_key: impl Into<String>,
		api_secret: impl Into<String>,
	) -> Self {
		self.api_key = Some(api_key.into());
		self.api_secret = Some(TokenSecret::new(api_secret));

		self
	}

	/// Overrides the per-call timeout.
	pub fn with_timeout_secs(mut self, secs: u64) -> Self {
		self.timeout_secs = secs;

		self
	}

	/// Allows a plain-HTTP base URL.
	pub fn allow_insecure(mut self) -> Self {
		self.insecure = true;

		self
	}

	/// Per-call timeout as a standard duration.
	pub fn timeout(&self) -> std::time::Duration {
		std::time::Duration::from_secs(self.timeout_secs)
	}

	/// Credential provider backed by this configuration's key/secret pair.
	pub fn credentials(&self) -> StaticCredentials {
		StaticCredentials { api_key: self.api_key.clone(), api_secret: self.api_secret.clone() }
	}

	/// Validates invariants for the configuration.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.base_url.scheme() != "https" && !self.insecure {
			return Err(ConfigError::InsecureBaseUrl { url: self.base_url.to_string() });
		}
		if self.base_url.cannot_be_a_base() {
			return Err(ConfigError::InvalidBaseUrl {
				source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
			});
		}

		Ok(())
	}

	fn default_timeout_secs() -> u64 {
		Self::DEFAULT_TIMEOUT_SECS
	}
}

/// Table names for user and resource records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
	/// Table holding user records.
	pub users_table: String,
	/// Table holding protected resource records.
	pub resources_table: String,
}
impl StoreConfig {
	const ENV_RESOURCES_TABLE: &'static str = "RESOURCES_TABLE_NAME";
	const ENV_USERS_TABLE: &'static str = "USERS_TABLE_NAME";

	/// Loads table names from `USERS_TABLE_NAME` and `RESOURCES_TABLE_NAME`, falling back to
	/// the defaults.
	pub fn from_env() -> Self {
		let defaults = Self::default();

		Self {
			users_table: env::var(Self::ENV_USERS_TABLE).unwrap_or(defaults.users_table),
			resources_table: env::var(Self::ENV_RESOURCES_TABLE)
				.unwrap_or(defaults.resources_table),
		}
	}
}
impl Default for StoreConfig {
	fn default() -> Self {
		Self { users_table: "users".into(), resources_table: "resources".into() }
	}
}
