//! High-level orchestrators built on the authority client.

pub mod common;

mod authorization;
mod introspection;
mod token;

// self
use crate::{
	_prelude::*,
	authority::AuthorityClient,
	config::{AuthorityConfig, CredentialProvider},
	http::AuthorityHttpClient,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Gateway specialized for the crate's default reqwest transport stack.
pub type ReqwestGateway = Gateway<ReqwestHttpClient>;

/// Entry point for the authorization, token, and introspection flows.
///
/// The gateway only holds immutable configuration behind an [`Arc`], so clones are cheap and
/// concurrent invocations share nothing mutable. Each flow attempts every authority call at most
/// once; the second authorization phase is dispatched only after the first one succeeded.
pub struct Gateway<C>
where
	C: ?Sized + AuthorityHttpClient,
{
	authority: Arc<AuthorityClient<C>>,
}
impl<C> Gateway<C>
where
	C: ?Sized + AuthorityHttpClient,
{
	/// Creates a gateway that reuses the caller-provided transport.
	pub fn with_http_client(
		config: &AuthorityConfig,
		credentials: Arc<dyn CredentialProvider>,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self> {
		let authority = AuthorityClient::new(config, credentials, http_client)?;

		Ok(Self { authority: Arc::new(authority) })
	}

	/// Underlying authority client.
	pub fn authority(&self) -> &AuthorityClient<C> {
		&self.authority
	}
}
#[cfg(feature = "reqwest")]
impl Gateway<ReqwestHttpClient> {
	/// Creates a gateway with its own reqwest transport bounded by `config`'s timeout and the
	/// credentials stored in `config`.
	pub fn new(config: &AuthorityConfig) -> Result<Self> {
		let http_client = ReqwestHttpClient::with_timeout(config.timeout())?;

		Self::with_http_client(config, Arc::new(config.credentials()), http_client)
	}
}
impl<C> Clone for Gateway<C>
where
	C: ?Sized + AuthorityHttpClient,
{
	fn clone(&self) -> Self {
		Self { authority: Arc::clone(&self.authority) }
	}
}
impl<C> Debug for Gateway<C>
where
	C: ?Sized + AuthorityHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Gateway").field("authority", &self.authority).finish()
	}
}
