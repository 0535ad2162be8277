//! Raw HTTP client for the external authority.
//!
//! [`AuthorityClient`] performs exactly one HTTP call per method and returns the
//! [`RawAuthorityResponse`] untouched. Classifying the reply is the job of
//! [`action::interpret`]; retries do not exist at this layer.

pub mod action;

pub use action::*;

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
use oauth2::{
	AsyncHttpClient, HttpClientError, HttpResponse,
	http::{
		Method, Request,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
	},
};
use url::form_urlencoded::Serializer;
// self
use crate::{
	_prelude::*,
	auth::{AuthorizationRequest, Subject},
	config::{AuthorityConfig, CredentialProvider},
	error::{ConfigError, TransportError},
	http::AuthorityHttpClient,
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const REDACTED: &str = "<redacted>";
const SECRET_FIELDS: [&str; 7] = [
	"accessToken",
	"refreshToken",
	"idToken",
	"ticket",
	"authorizationCode",
	"responseContent",
	"token",
];
const JSON_CONTENT_TYPE: &str = "application/json";

/// Authority endpoints the edge calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
	/// Phase 1 of the authorization handshake; yields a ticket.
	AuthorizationTicket,
	/// Phase 2 of the authorization handshake; trades the ticket for a code.
	AuthorizationIssue,
	/// Authorization code exchange.
	TokenIssue,
	/// Access token introspection.
	Introspection,
}
impl Endpoint {
	/// Path joined onto the configured base URL.
	pub const fn path(self) -> &'static str {
		match self {
			Endpoint::AuthorizationTicket => "/api/auth/authorization",
			Endpoint::AuthorizationIssue => "/api/auth/authorization/issue",
			Endpoint::TokenIssue => "/api/auth/token",
			Endpoint::Introspection => "/api/auth/introspection",
		}
	}

	/// Returns a stable label suitable for span, log, or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Endpoint::AuthorizationTicket => "ticket_issue",
			Endpoint::AuthorizationIssue => "code_issue",
			Endpoint::TokenIssue => "token_issue",
			Endpoint::Introspection => "introspection",
		}
	}
}
impl Display for Endpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// HTTP status and decoded JSON body of an authority reply.
#[derive(Clone, Debug, PartialEq)]
pub struct RawAuthorityResponse {
	/// HTTP status code.
	pub status: u16,
	/// Decoded JSON body.
	pub body: JsonValue,
}
impl RawAuthorityResponse {
	/// Creates a response from its parts.
	pub fn new(status: u16, body: JsonValue) -> Self {
		Self { status, body }
	}

	/// Decodes an HTTP response received from `endpoint`.
	pub fn from_http(endpoint: Endpoint, response: HttpResponse) -> Result<Self, TransportError> {
		let status = response.status().as_u16();
		let mut deserializer = serde_json::Deserializer::from_slice(response.body());
		let body = serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
			TransportError::MalformedBody { endpoint: endpoint.as_str(), status, source }
		})?;

		Ok(Self { status, body })
	}

	/// Action tag carried in the body, if any.
	pub fn action(&self) -> Option<ActionCode> {
		self.body.get("action").and_then(JsonValue::as_str).map(ActionCode::from_wire)
	}

	/// Human-readable result message, if any.
	pub fn result_message(&self) -> Option<&str> {
		self.body.get("resultMessage").and_then(JsonValue::as_str)
	}

	/// Copy of the body with token, ticket, and code fields masked; safe to log.
	pub fn redacted_body(&self) -> JsonValue {
		let mut body = self.body.clone();

		if let Some(fields) = body.as_object_mut() {
			for name in SECRET_FIELDS {
				if let Some(value) = fields.get_mut(name) {
					*value = JsonValue::from(REDACTED);
				}
			}
		}

		body
	}
}

/// Renders the `Authorization` header value for HTTP basic auth.
pub fn basic_authorization(api_key: &str, api_secret: &str) -> String {
	format!("Basic {}", STANDARD.encode(format!("{api_key}:{api_secret}")))
}

/// Authority client bound to one base URL, one credential provider, and one transport.
pub struct AuthorityClient<C>
where
	C: ?Sized + AuthorityHttpClient,
{
	base_url: Url,
	credentials: Arc<dyn CredentialProvider>,
	http_client: Arc<C>,
}
impl<C> AuthorityClient<C>
where
	C: ?Sized + AuthorityHttpClient,
{
	/// Creates a client after validating `config`.
	pub fn new(
		config: &AuthorityConfig,
		credentials: Arc<dyn CredentialProvider>,
		http_client: impl Into<Arc<C>>,
	) -> Result<Self, ConfigError> {
		config.validate()?;

		Ok(Self { base_url: config.base_url.clone(), credentials, http_client: http_client.into() })
	}

	/// Base URL every endpoint path is joined onto.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Phase 1: submits the authorization request parameters and asks for a ticket.
	pub async fn request_authorization_ticket(
		&self,
		request: &AuthorizationRequest,
	) -> Result<RawAuthorityResponse> {
		let body = Serializer::new(String::new())
			.append_pair("parameters", &request.encoded_parameters())
			.finish();

		self.dispatch(Endpoint::AuthorizationTicket, FORM_CONTENT_TYPE, body.into_bytes()).await
	}

	/// Phase 2: trades a ticket for an authorization code on behalf of `subject`.
	pub async fn request_authorization_issue(
		&self,
		ticket: &str,
		subject: &Subject,
	) -> Result<RawAuthorityResponse> {
		let body = serde_json::to_vec(&serde_json::json!({
			"ticket": ticket,
			"subject": subject,
		}))
		.map_err(|e| Error::internal(format!("Failed to encode issue request: {e}.")))?;

		self.dispatch(Endpoint::AuthorizationIssue, JSON_CONTENT_TYPE, body).await
	}

	/// Exchanges an authorization code for an access token.
	pub async fn request_token_issue(
		&self,
		code: &str,
		redirect_uri: &str,
	) -> Result<RawAuthorityResponse> {
		let parameters = Serializer::new(String::new())
			.append_pair("grant_type", "authorization_code")
			.append_pair("code", code)
			.append_pair("redirect_uri", redirect_uri)
			.finish();
		let body = Serializer::new(String::new()).append_pair("parameters", &parameters).finish();

		self.dispatch(Endpoint::TokenIssue, FORM_CONTENT_TYPE, body.into_bytes()).await
	}

	/// Asks the authority to introspect `access_token`.
	pub async fn request_introspection(&self, access_token: &str) -> Result<RawAuthorityResponse> {
		let body = serde_json::to_vec(&serde_json::json!({ "token": access_token }))
			.map_err(|e| Error::internal(format!("Failed to encode introspection request: {e}.")))?;

		self.dispatch(Endpoint::Introspection, JSON_CONTENT_TYPE, body).await
	}

	async fn dispatch(
		&self,
		endpoint: Endpoint,
		content_type: &'static str,
		body: Vec<u8>,
	) -> Result<RawAuthorityResponse> {
		// Credentials resolve before any bytes leave the process.
		let authorization =
			basic_authorization(&self.credentials.api_key()?, &self.credentials.api_secret()?);
		let url = self
			.base_url
			.join(endpoint.path())
			.map_err(|source| ConfigError::InvalidBaseUrl { source })?;
		let request = Request::builder()
			.method(Method::POST)
			.uri(url.as_str())
			.header(CONTENT_TYPE, content_type)
			.header(ACCEPT, JSON_CONTENT_TYPE)
			.header(AUTHORIZATION, authorization)
			.body(body)
			.map_err(ConfigError::from)?;
		let handle = self.http_client.handle();
		let response =
			handle.call(request).await.map_err(|e| map_http_client_error(endpoint, e))?;

		Ok(RawAuthorityResponse::from_http(endpoint, response)?)
	}
}
impl<C> Debug for AuthorityClient<C>
where
	C: ?Sized + AuthorityHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthorityClient").field("base_url", &self.base_url.as_str()).finish()
	}
}

fn map_http_client_error<E>(endpoint: Endpoint, err: HttpClientError<E>) -> Error
where
	E: 'static + Send + Sync + StdError,
{
	match err {
		HttpClientError::Reqwest(inner) => TransportError::network(endpoint.as_str(), *inner).into(),
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) =>
			TransportError::Other { endpoint: endpoint.as_str(), message }.into(),
		_ => TransportError::Other {
			endpoint: endpoint.as_str(),
			message: "Unknown HTTP client failure.".into(),
		}
		.into(),
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::_preludet::*;

	#[test]
	fn redacted_body_masks_secrets_only() {
		let response = RawAuthorityResponse::new(
			503,
			json!({
				"action": "OK",
				"resultMessage": "[A001] issued",
				"accessToken": "live-access-token",
				"refreshToken": "live-refresh-token",
				"ticket": "live-ticket",
			}),
		);
		let redacted = response.redacted_body();

		assert_eq!(redacted["accessToken"], "<redacted>");
		assert_eq!(redacted["refreshToken"], "<redacted>");
		assert_eq!(redacted["ticket"], "<redacted>");
		assert_eq!(redacted["action"], "OK");
		assert_eq!(redacted["resultMessage"], "[A001] issued");
		assert_eq!(response.body["accessToken"], "live-access-token");
	}

	#[test]
	fn basic_authorization_encodes_key_and_secret() {
		assert_eq!(basic_authorization("key", "secret"), "Basic a2V5OnNlY3JldA==");
	}

	#[test]
	fn accessors_read_action_and_message() {
		let response = RawAuthorityResponse::new(
			200,
			json!({ "action": "BAD_REQUEST", "resultMessage": "[A001] bad" }),
		);

		assert_eq!(response.action(), Some(ActionCode::BadRequest));
		assert_eq!(response.result_message(), Some("[A001] bad"));
		assert_eq!(RawAuthorityResponse::new(500, json!({ "message": "x" })).action(), None);
	}

	#[tokio::test]
	async fn ticket_request_is_form_encoded_with_basic_auth() {
		let (gateway, transport) = build_scripted_gateway([ScriptedReply::json(
			200,
			json!({ "action": "INTERACTION", "ticket": "t-1" }),
		)]);
		let request = authorization_request_fixture(&["email", "openid", "email"]);
		let response = gateway
			.authority()
			.request_authorization_ticket(&request)
			.await
			.expect("Scripted ticket call should succeed.");
		let recorded = &transport.requests()[0];
		let decoded = url::form_urlencoded::parse(recorded.body_text().as_bytes())
			.into_owned()
			.collect::<HashMap<_, _>>();
		let parameters = url::form_urlencoded::parse(decoded["parameters"].as_bytes())
			.into_owned()
			.collect::<HashMap<_, _>>();

		assert_eq!(response.status, 200);
		assert_eq!(recorded.path, "/api/auth/authorization");
		assert_eq!(recorded.headers["content-type"], FORM_CONTENT_TYPE);
		assert_eq!(
			recorded.headers["authorization"],
			basic_authorization(TEST_API_KEY, TEST_API_SECRET)
		);
		assert_eq!(parameters["scope"], "openid email");
		assert_eq!(parameters["response_type"], "code");
		assert_eq!(parameters["client_id"], "57297408867");
	}

	#[tokio::test]
	async fn issue_and_introspection_requests_are_json() {
		let (gateway, transport) = build_scripted_gateway([
			ScriptedReply::json(200, json!({ "action": "LOCATION" })),
			ScriptedReply::json(200, json!({ "action": "OK" })),
		]);
		let subject = Subject::new("subject-0001").expect("Subject fixture should be valid.");

		gateway
			.authority()
			.request_authorization_issue("t-1", &subject)
			.await
			.expect("Scripted issue call should succeed.");
		gateway
			.authority()
			.request_introspection("at-1")
			.await
			.expect("Scripted introspection call should succeed.");

		let requests = transport.requests();
		let issue: JsonValue =
			serde_json::from_slice(&requests[0].body).expect("Issue body should be JSON.");
		let introspection: JsonValue =
			serde_json::from_slice(&requests[1].body).expect("Introspection body should be JSON.");

		assert_eq!(requests[0].path, "/api/auth/authorization/issue");
		assert_eq!(requests[0].headers["content-type"], JSON_CONTENT_TYPE);
		assert_eq!(issue, json!({ "ticket": "t-1", "subject": "subject-0001" }));
		assert_eq!(requests[1].path, "/api/auth/introspection");
		assert_eq!(introspection, json!({ "token": "at-1" }));
	}

	#[tokio::test]
	async fn token_request_nests_grant_parameters() {
		let (gateway, transport) =
			build_scripted_gateway([ScriptedReply::json(200, json!({ "action": "OK" }))]);

		gateway
			.authority()
			.request_token_issue("code 1", "https://client.example.com/callback")
			.await
			.expect("Scripted token call should succeed.");

		let recorded = &transport.requests()[0];
		let decoded = url::form_urlencoded::parse(recorded.body_text().as_bytes())
			.into_owned()
			.collect::<HashMap<_, _>>();

		assert_eq!(recorded.path, "/api/auth/token");
		assert_eq!(
			decoded["parameters"],
			"grant_type=authorization_code&code=code+1&redirect_uri=https%3A%2F%2Fclient.example.com%2Fcallback"
		);
	}

	#[tokio::test]
	async fn non_json_bodies_are_transport_errors() {
		let (gateway, _) = build_scripted_gateway([ScriptedReply::Raw {
			status: 502,
			body: b"<html>Bad Gateway</html>".to_vec(),
		}]);
		let err = gateway
			.authority()
			.request_introspection("at-1")
			.await
			.expect_err("HTML body should not decode.");

		assert!(matches!(
			err,
			Error::Transport(TransportError::MalformedBody { status: 502, endpoint: "introspection", .. })
		));
	}

	#[tokio::test]
	async fn transport_failures_keep_their_message() {
		let (gateway, _) = build_scripted_gateway([ScriptedReply::Fail("connection reset".into())]);
		let err = gateway
			.authority()
			.request_token_issue("code", "https://client.example.com/callback")
			.await
			.expect_err("Scripted failure should surface.");

		match err {
			Error::Transport(TransportError::Network { endpoint, source }) => {
				assert_eq!(endpoint, "token_issue");
				assert_eq!(source.to_string(), "connection reset");
			},
			other => panic!("Unexpected error: {other:?}"),
		}
	}

	#[tokio::test]
	async fn missing_credentials_skip_the_network() {
		let (gateway, transport) =
			build_unconfigured_gateway([ScriptedReply::json(200, json!({ "action": "OK" }))]);
		let err = gateway
			.authority()
			.request_introspection("at-1")
			.await
			.expect_err("Missing credentials should fail.");

		assert!(matches!(err, Error::Config(ConfigError::MissingCredential { name: "api_key" })));
		assert_eq!(transport.calls(), 0);
	}
}
