//! Helpers shared by the integration tests.

#![allow(dead_code)]

// crates.io
use httpmock::prelude::*;
use serde_json::Value;
// self
use idp_edge::{
	auth::{AuthorizationRequest, ClientId, OidcScopes, Subject},
	authority,
	config::AuthorityConfig,
	flows::ReqwestGateway,
	url::Url,
};

pub const API_KEY: &str = "5593494639";
pub const API_SECRET: &str = "AB8xEvJ8kWzjmSW4NG9ihNxGsyWfFr2ghvS6UDd1Gv0";
pub const REDIRECT_URI: &str = "https://client.example.com/callback";

/// Gateway pointed at `server` over plain HTTP.
pub fn gateway(server: &MockServer) -> ReqwestGateway {
	let base_url = Url::parse(&server.base_url()).expect("Mock server URL should parse.");
	let config = AuthorityConfig::new(base_url)
		.with_credentials(API_KEY, API_SECRET)
		.with_timeout_secs(5)
		.allow_insecure();

	ReqwestGateway::new(&config).expect("Gateway should build for the mock authority.")
}

/// `Authorization` header the mock expects on every call.
pub fn basic_auth() -> String {
	authority::basic_authorization(API_KEY, API_SECRET)
}

/// Authorization request with the given extra scopes.
pub fn authorization_request(scopes: &[&str]) -> AuthorizationRequest {
	AuthorizationRequest::new(
		ClientId::new("57297408867").expect("Client identifier fixture should be valid."),
		"state-xyz",
		REDIRECT_URI,
		OidcScopes::new(scopes.iter().copied()).expect("Scope fixture should be valid."),
		Subject::new("subject-0001").expect("Subject fixture should be valid."),
	)
}

/// Registers a POST mock on `path` that answers `status` with `body`.
pub async fn mock_reply<'a>(
	server: &'a MockServer,
	path: &str,
	status: u16,
	body: Value,
) -> httpmock::Mock<'a> {
	let authorization = basic_auth();

	server
		.mock_async(|when, then| {
			when.method(POST).path(path).header("authorization", authorization);
			then.status(status).header("content-type", "application/json").body(body.to_string());
		})
		.await
}
