//! Edge-level error types shared across flows, the authority client, and record stores.

// self
use crate::_prelude::*;

/// Edge-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Coarse classification used by transport adapters when rendering responses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorClass {
	/// Caller-correctable failure (4xx-equivalent).
	Client,
	/// Infrastructure fault or authority contract break (5xx-equivalent).
	Server,
}

/// Canonical edge error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// The authority rejected the request as malformed or the client as invalid.
	#[error("Authority rejected the request: {message}.")]
	BadRequest {
		/// Authority-supplied human-readable message.
		message: String,
	},
	/// The authority rejected the caller's credentials during introspection.
	#[error("Authority rejected the credentials: {message}.")]
	Unauthorized {
		/// Authority-supplied human-readable message.
		message: String,
	},
	/// The authority refused access during introspection.
	#[error("Authority refused access: {message}.")]
	Forbidden {
		/// Authority-supplied human-readable message.
		message: String,
	},
	/// Requested record does not exist.
	#[error("{kind} `{id}` was not found.")]
	NotFound {
		/// Record kind (user, resource).
		kind: &'static str,
		/// Identifier that was looked up.
		id: String,
	},

	/// Unexpected authority response or an authority-reported internal failure.
	///
	/// `detail` is kept for logs and callers that need it; it never appears in
	/// [`Error::public_message`].
	#[error("Internal server error.")]
	InternalServer {
		/// Internal description of what went wrong.
		detail: String,
	},
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout, malformed body).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
}
impl Error {
	/// Builds an [`Error::InternalServer`] from any displayable detail.
	pub fn internal(detail: impl Display) -> Self {
		Self::InternalServer { detail: detail.to_string() }
	}

	/// Returns the client/server classification of the error.
	pub fn class(&self) -> ErrorClass {
		match self {
			Self::BadRequest { .. }
			| Self::Unauthorized { .. }
			| Self::Forbidden { .. }
			| Self::NotFound { .. } => ErrorClass::Client,
			Self::InternalServer { .. } | Self::Config(_) | Self::Transport(_) | Self::Storage(_) =>
				ErrorClass::Server,
		}
	}

	/// Returns `true` for caller-correctable failures.
	pub fn is_client_error(&self) -> bool {
		matches!(self.class(), ErrorClass::Client)
	}

	/// Returns `true` for infrastructure faults and authority contract breaks.
	pub fn is_server_error(&self) -> bool {
		matches!(self.class(), ErrorClass::Server)
	}

	/// Stable error name surfaced to callers.
	pub fn name(&self) -> &'static str {
		match self {
			Self::BadRequest { .. } => "BadRequestError",
			Self::Unauthorized { .. } => "UnauthorizedError",
			Self::Forbidden { .. } => "ForbiddenError",
			Self::NotFound { .. } => "NotFoundError",
			_ => "InternalServerError",
		}
	}

	/// HTTP status code a transport adapter should respond with.
	pub fn status_code(&self) -> u16 {
		match self {
			Self::BadRequest { .. } => 400,
			Self::Unauthorized { .. } => 401,
			Self::Forbidden { .. } => 403,
			Self::NotFound { .. } => 404,
			_ => 500,
		}
	}

	/// Caller-visible message; server-class errors never leak internal detail.
	pub fn public_message(&self) -> String {
		match self.class() {
			ErrorClass::Client => self.to_string(),
			ErrorClass::Server => "Internal Server Error".into(),
		}
	}
}

/// Configuration failures raised before any authority call is attempted.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// A credential the authority requires is not configured.
	#[error("Authority credential `{name}` is not configured.")]
	MissingCredential {
		/// Credential name (`api_key`, `api_secret`).
		name: &'static str,
	},
	/// Base URL cannot be parsed or joined with an endpoint path.
	#[error("Authority base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Base URL must use HTTPS.
	#[error("Authority base URL must use HTTPS: {url}.")]
	InsecureBaseUrl {
		/// Offending URL.
		url: String,
	},
	/// An environment variable holds an unusable value.
	#[error("Environment variable `{name}` is invalid: {reason}.")]
	InvalidEnv {
		/// Variable name.
		name: &'static str,
		/// Why the value was rejected.
		reason: String,
	},
	/// Request scopes cannot be normalized.
	#[error("Requested scopes are invalid.")]
	InvalidScope(#[from] crate::auth::ScopeValidationError),
	/// Identifier validation failed.
	#[error("Identifier is invalid.")]
	InvalidIdentifier(#[from] crate::auth::IdentifierError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO, undecodable bodies).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure (including timeouts).
	#[error("Network error occurred while calling the {endpoint} endpoint.")]
	Network {
		/// Endpoint label.
		endpoint: &'static str,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the authority.")]
	Io(#[from] std::io::Error),
	/// HTTP client failed without a structured error.
	#[error("HTTP client error occurred while calling the {endpoint} endpoint: {message}.")]
	Other {
		/// Endpoint label.
		endpoint: &'static str,
		/// Client-supplied message.
		message: String,
	},
	/// Authority responded with a body that is not valid JSON.
	#[error("The {endpoint} endpoint returned malformed JSON (HTTP {status}).")]
	MalformedBody {
		/// Endpoint label.
		endpoint: &'static str,
		/// HTTP status code of the response.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		endpoint: &'static str,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { endpoint, source: Box::new(src) }
	}
}
