//! Walks the full authorization-code round trip (ticket, code issue, token exchange, and
//! introspection) against a mock authority using the default reqwest transport.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use idp_edge::{
	auth::{AuthorizationRequest, ClientId, OidcScopes, Subject},
	authority,
	config::AuthorityConfig,
	flows::ReqwestGateway,
	url::Url,
};

const API_KEY: &str = "demo-key";
const API_SECRET: &str = "demo-secret";

async fn reply<'a>(
	server: &'a MockServer,
	path: &str,
	body: serde_json::Value,
) -> httpmock::Mock<'a> {
	let authorization = authority::basic_authorization(API_KEY, API_SECRET);

	server
		.mock_async(|when, then| {
			when.method(POST).path(path).header("authorization", authorization);
			then.status(200).header("content-type", "application/json").body(body.to_string());
		})
		.await
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let ticket_mock = reply(
		&server,
		"/api/auth/authorization",
		json!({ "action": "INTERACTION", "ticket": "demo-ticket" }),
	)
	.await;
	let issue_mock = reply(
		&server,
		"/api/auth/authorization/issue",
		json!({ "action": "LOCATION", "authorizationCode": "demo-code" }),
	)
	.await;
	let token_mock = reply(
		&server,
		"/api/auth/token",
		json!({ "action": "OK", "accessToken": "demo-access", "accessTokenDuration": 3600 }),
	)
	.await;
	let introspection_mock = reply(
		&server,
		"/api/auth/introspection",
		json!({ "action": "OK", "subject": "demo-user", "scopes": ["openid", "email"] }),
	)
	.await;
	let config = AuthorityConfig::new(Url::parse(&server.base_url())?)
		.with_credentials(API_KEY, API_SECRET)
		.allow_insecure();
	let gateway = ReqwestGateway::new(&config)?;
	let request = AuthorizationRequest::new(
		ClientId::new("demo-client")?,
		"demo-state",
		"https://client.example.com/callback",
		OidcScopes::new(["email"])?,
		Subject::new("demo-user")?,
	);
	let code = gateway.issue_authorization_code(&request).await?;
	let token = gateway.issue_access_token(code.code.expose(), &code.redirect_uri).await?;
	let facts = gateway.introspect_access_token(token.access_token.expose()).await?;

	println!("Issued token expires at {:?}.", token.expires_at);
	println!("Token covers email: {}.", facts.covers(["email"]));

	ticket_mock.assert_async().await;
	issue_mock.assert_async().await;
	token_mock.assert_async().await;
	introspection_mock.assert_async().await;

	Ok(())
}
