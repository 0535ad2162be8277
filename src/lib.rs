//! Identity-provider edge layer that front-ends an external OAuth 2.0/OIDC authority.
//!
//! The crate drives the ticket-based authorization handshake, token issuance, and token
//! introspection, translating the authority's action vocabulary into typed outcomes.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod authority;
pub mod config;
pub mod directory;
pub mod error;
pub mod flows;
pub mod http;
pub mod obs;
pub mod records;
pub mod store;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test` crate
	//! feature.

	pub use crate::_prelude::*;

	// std
	use std::collections::VecDeque;
	// crates.io
	use oauth2::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse, http::StatusCode};
	// self
	use crate::{
		auth::{AuthorizationRequest, ClientId, OidcScopes, Subject},
		config::{AuthorityConfig, StaticCredentials},
		flows::Gateway,
		http::AuthorityHttpClient,
	};

	/// API key every test gateway authenticates with.
	pub const TEST_API_KEY: &str = "test-api-key";
	/// API secret every test gateway authenticates with.
	pub const TEST_API_SECRET: &str = "test-api-secret";

	/// Gateway backed by the scripted transport.
	pub type ScriptedGateway = Gateway<ScriptedHttpClient>;

	/// Canned transport reply consumed by [`ScriptedHttpClient`] in FIFO order.
	#[derive(Clone, Debug)]
	pub enum ScriptedReply {
		/// JSON body with the given HTTP status.
		Json {
			/// HTTP status code.
			status: u16,
			/// Response body.
			body: JsonValue,
		},
		/// Raw bytes with the given HTTP status.
		Raw {
			/// HTTP status code.
			status: u16,
			/// Response body.
			body: Vec<u8>,
		},
		/// Transport failure carrying the provided message.
		Fail(String),
	}
	impl ScriptedReply {
		/// Shorthand for a JSON reply.
		pub fn json(status: u16, body: JsonValue) -> Self {
			Self::Json { status, body }
		}
	}

	/// Request captured by [`ScriptedHttpClient`].
	#[derive(Clone, Debug)]
	pub struct RecordedRequest {
		/// Request path (without the authority base).
		pub path: String,
		/// Lower-cased header pairs.
		pub headers: BTreeMap<String, String>,
		/// Raw request body.
		pub body: Vec<u8>,
	}
	impl RecordedRequest {
		/// Body decoded as UTF-8.
		pub fn body_text(&self) -> String {
			String::from_utf8_lossy(&self.body).into_owned()
		}
	}

	/// Transport error raised by [`ScriptedReply::Fail`].
	#[derive(Debug, ThisError)]
	#[error("{0}")]
	pub struct ScriptedTransportError(pub String);

	/// In-process [`AuthorityHttpClient`] replaying canned replies and recording every request.
	#[derive(Clone, Default)]
	pub struct ScriptedHttpClient {
		replies: Arc<Mutex<VecDeque<ScriptedReply>>>,
		requests: Arc<Mutex<Vec<RecordedRequest>>>,
	}
	impl ScriptedHttpClient {
		/// Creates a client that answers with `replies` in order.
		pub fn new(replies: impl IntoIterator<Item = ScriptedReply>) -> Self {
			Self {
				replies: Arc::new(Mutex::new(replies.into_iter().collect())),
				requests: Default::default(),
			}
		}

		/// Number of requests dispatched so far.
		pub fn calls(&self) -> usize {
			self.requests.lock().len()
		}

		/// Snapshot of the dispatched requests.
		pub fn requests(&self) -> Vec<RecordedRequest> {
			self.requests.lock().clone()
		}
	}
	impl AuthorityHttpClient for ScriptedHttpClient {
		type Handle = ScriptedHandle;
		type TransportError = ScriptedTransportError;

		fn handle(&self) -> Self::Handle {
			ScriptedHandle(self.clone())
		}
	}

	/// Handle returned by [`ScriptedHttpClient`].
	pub struct ScriptedHandle(ScriptedHttpClient);
	impl<'c> AsyncHttpClient<'c> for ScriptedHandle {
		type Error = HttpClientError<ScriptedTransportError>;
		type Future =
			Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c + Send + Sync>>;

		fn call(&'c self, request: HttpRequest) -> Self::Future {
			let headers = request
				.headers()
				.iter()
				.map(|(name, value)| {
					(name.as_str().to_owned(), value.to_str().unwrap_or_default().to_owned())
				})
				.collect();

			self.0.requests.lock().push(RecordedRequest {
				path: request.uri().path().to_owned(),
				headers,
				body: request.body().clone(),
			});

			let reply = self
				.0
				.replies
				.lock()
				.pop_front()
				.unwrap_or_else(|| ScriptedReply::Fail("Reply script exhausted.".into()));

			Box::pin(async move {
				let (status, body) = match reply {
					ScriptedReply::Json { status, body } => (
						status,
						serde_json::to_vec(&body).expect("Scripted JSON body should serialize."),
					),
					ScriptedReply::Raw { status, body } => (status, body),
					ScriptedReply::Fail(message) =>
						return Err(HttpClientError::Reqwest(Box::new(ScriptedTransportError(
							message,
						)))),
				};
				let mut response = HttpResponse::new(body);

				*response.status_mut() =
					StatusCode::from_u16(status).expect("Scripted status should be valid.");

				Ok(response)
			})
		}
	}

	/// Authority configuration pointing at `base_url` with the test credential pair.
	pub fn test_authority_config(base_url: &str) -> AuthorityConfig {
		let base_url = Url::parse(base_url).expect("Failed to parse mock authority base URL.");

		AuthorityConfig::new(base_url)
			.with_credentials(TEST_API_KEY, TEST_API_SECRET)
			.allow_insecure()
	}

	/// Builds a gateway that replays `replies` and returns the transport for inspection.
	pub fn build_scripted_gateway(
		replies: impl IntoIterator<Item = ScriptedReply>,
	) -> (ScriptedGateway, ScriptedHttpClient) {
		let config = test_authority_config("https://authority.test");
		let transport = ScriptedHttpClient::new(replies);
		let gateway = Gateway::with_http_client(
			&config,
			Arc::new(config.credentials()),
			Arc::new(transport.clone()),
		)
		.expect("Scripted gateway should build.");

		(gateway, transport)
	}

	/// Builds a scripted gateway whose credential provider has no API key configured.
	pub fn build_unconfigured_gateway(
		replies: impl IntoIterator<Item = ScriptedReply>,
	) -> (ScriptedGateway, ScriptedHttpClient) {
		let config = test_authority_config("https://authority.test");
		let transport = ScriptedHttpClient::new(replies);
		let gateway = Gateway::with_http_client(
			&config,
			Arc::new(StaticCredentials::default()),
			Arc::new(transport.clone()),
		)
		.expect("Scripted gateway should build.");

		(gateway, transport)
	}

	/// Authorization request fixture used across flow tests.
	pub fn authorization_request_fixture(scopes: &[&str]) -> AuthorizationRequest {
		AuthorizationRequest::new(
			ClientId::new("57297408867").expect("Client identifier fixture should be valid."),
			"state-xyz",
			"https://client.example.com/callback",
			OidcScopes::new(scopes.iter().copied()).expect("Scope fixture should be valid."),
			Subject::new("subject-0001").expect("Subject fixture should be valid."),
		)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, BTreeSet, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value as JsonValue;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
#[cfg(all(test, not(feature = "tracing")))] use tracing_test as _;
