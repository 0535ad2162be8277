//! The authority's action vocabulary and the per-endpoint decision table.
//!
//! [`interpret`] is pure: the same endpoint and response always yield the same [`Outcome`].
//! Every endpoint matches a closed set of tags; anything else, including a missing tag, is a
//! server error so contract drift never slips through as success.

// self
use crate::{
	_prelude::*,
	authority::{Endpoint, RawAuthorityResponse},
};

/// Action tags the authority returns in the `action` field.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ActionCode {
	/// Redirect the user agent.
	Location,
	/// User interaction is required (ticket issued).
	Interaction,
	/// Authorization can proceed without interaction.
	NoInteraction,
	/// Respond with an auto-submitting form.
	Form,
	/// The request was malformed.
	BadRequest,
	/// Client authentication failed.
	InvalidClient,
	/// Caller credentials were rejected.
	Unauthorized,
	/// Caller lacks permission.
	Forbidden,
	/// The authority failed internally.
	InternalServerError,
	/// The operation succeeded.
	Ok,
	/// Resource-owner password flow required.
	Password,
	/// Tag outside the known vocabulary.
	Unrecognized(String),
}
impl ActionCode {
	/// Parses a wire tag; unknown tags are preserved verbatim.
	pub fn from_wire(raw: &str) -> Self {
		match raw {
			"LOCATION" => Self::Location,
			"INTERACTION" => Self::Interaction,
			"NO_INTERACTION" => Self::NoInteraction,
			"FORM" => Self::Form,
			"BAD_REQUEST" => Self::BadRequest,
			"INVALID_CLIENT" => Self::InvalidClient,
			"UNAUTHORIZED" => Self::Unauthorized,
			"FORBIDDEN" => Self::Forbidden,
			"INTERNAL_SERVER_ERROR" => Self::InternalServerError,
			"OK" => Self::Ok,
			"PASSWORD" => Self::Password,
			other => Self::Unrecognized(other.to_owned()),
		}
	}

	/// Wire representation of the tag.
	pub fn as_str(&self) -> &str {
		match self {
			Self::Location => "LOCATION",
			Self::Interaction => "INTERACTION",
			Self::NoInteraction => "NO_INTERACTION",
			Self::Form => "FORM",
			Self::BadRequest => "BAD_REQUEST",
			Self::InvalidClient => "INVALID_CLIENT",
			Self::Unauthorized => "UNAUTHORIZED",
			Self::Forbidden => "FORBIDDEN",
			Self::InternalServerError => "INTERNAL_SERVER_ERROR",
			Self::Ok => "OK",
			Self::Password => "PASSWORD",
			Self::Unrecognized(raw) => raw,
		}
	}
}
impl Display for ActionCode {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Caller-correctable failure classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClientErrorKind {
	/// Malformed request or invalid client.
	BadRequest,
	/// Rejected credentials.
	Unauthorized,
	/// Refused access.
	Forbidden,
}
impl ClientErrorKind {
	/// Message used when the authority omits `resultMessage`.
	pub const fn fallback_message(self) -> &'static str {
		match self {
			Self::BadRequest => "Bad Request",
			Self::Unauthorized => "Unauthorized",
			Self::Forbidden => "Forbidden",
		}
	}
}

/// Classification of one authority response.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome<'a> {
	/// The endpoint's success tag with HTTP 200; carries the body.
	Success(&'a JsonValue),
	/// A tag the caller can act on.
	ClientError {
		/// Failure class.
		kind: ClientErrorKind,
		/// Authority-supplied message, or the kind's fallback.
		message: String,
	},
	/// Anything else; always alert-worthy.
	ServerError {
		/// Internal description including the offending tag and status.
		message: String,
	},
}
impl Outcome<'_> {
	/// Returns `true` for [`Outcome::Success`].
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success(_))
	}
}

enum Verdict {
	Success,
	Client(ClientErrorKind),
	Server,
}

/// Classifies `response` according to the decision table for `endpoint`.
pub fn interpret(endpoint: Endpoint, response: &RawAuthorityResponse) -> Outcome<'_> {
	let Some(action) = response.action() else {
		return Outcome::ServerError {
			message: format!(
				"The {endpoint} endpoint answered HTTP {} without an action.",
				response.status
			),
		};
	};

	match verdict(endpoint, &action) {
		Verdict::Success if response.status == 200 => Outcome::Success(&response.body),
		Verdict::Success => Outcome::ServerError {
			message: format!(
				"The {endpoint} endpoint answered {action} with HTTP {}.",
				response.status
			),
		},
		Verdict::Client(kind) => Outcome::ClientError {
			kind,
			message: response.result_message().unwrap_or(kind.fallback_message()).to_owned(),
		},
		Verdict::Server => Outcome::ServerError {
			message: format!(
				"The {endpoint} endpoint answered {action} with HTTP {}.",
				response.status
			),
		},
	}
}

fn verdict(endpoint: Endpoint, action: &ActionCode) -> Verdict {
	match (endpoint, action) {
		(Endpoint::AuthorizationTicket, ActionCode::Interaction) => Verdict::Success,
		(Endpoint::AuthorizationTicket, ActionCode::BadRequest) =>
			Verdict::Client(ClientErrorKind::BadRequest),
		(Endpoint::AuthorizationIssue, ActionCode::Location) => Verdict::Success,
		(Endpoint::AuthorizationIssue, ActionCode::BadRequest) =>
			Verdict::Client(ClientErrorKind::BadRequest),
		(Endpoint::TokenIssue, ActionCode::Ok) => Verdict::Success,
		(Endpoint::TokenIssue, ActionCode::BadRequest | ActionCode::InvalidClient) =>
			Verdict::Client(ClientErrorKind::BadRequest),
		(Endpoint::Introspection, ActionCode::Ok) => Verdict::Success,
		(Endpoint::Introspection, ActionCode::BadRequest) =>
			Verdict::Client(ClientErrorKind::BadRequest),
		(Endpoint::Introspection, ActionCode::Unauthorized) =>
			Verdict::Client(ClientErrorKind::Unauthorized),
		(Endpoint::Introspection, ActionCode::Forbidden) =>
			Verdict::Client(ClientErrorKind::Forbidden),
		_ => Verdict::Server,
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	const ENDPOINTS: [Endpoint; 4] = [
		Endpoint::AuthorizationTicket,
		Endpoint::AuthorizationIssue,
		Endpoint::TokenIssue,
		Endpoint::Introspection,
	];
	const ACTIONS: [&str; 12] = [
		"LOCATION",
		"INTERACTION",
		"NO_INTERACTION",
		"FORM",
		"BAD_REQUEST",
		"INVALID_CLIENT",
		"UNAUTHORIZED",
		"FORBIDDEN",
		"INTERNAL_SERVER_ERROR",
		"OK",
		"PASSWORD",
		"SOMETHING_NEW",
	];

	fn reply(status: u16, action: &str) -> RawAuthorityResponse {
		RawAuthorityResponse::new(status, json!({ "action": action, "resultMessage": "detail" }))
	}

	fn success_tag(endpoint: Endpoint) -> &'static str {
		match endpoint {
			Endpoint::AuthorizationTicket => "INTERACTION",
			Endpoint::AuthorizationIssue => "LOCATION",
			Endpoint::TokenIssue | Endpoint::Introspection => "OK",
		}
	}

	fn client_kind(endpoint: Endpoint, action: &str) -> Option<ClientErrorKind> {
		match (endpoint, action) {
			(_, "BAD_REQUEST") => Some(ClientErrorKind::BadRequest),
			(Endpoint::TokenIssue, "INVALID_CLIENT") => Some(ClientErrorKind::BadRequest),
			(Endpoint::Introspection, "UNAUTHORIZED") => Some(ClientErrorKind::Unauthorized),
			(Endpoint::Introspection, "FORBIDDEN") => Some(ClientErrorKind::Forbidden),
			_ => None,
		}
	}

	#[test]
	fn wire_tags_round_trip() {
		for raw in ACTIONS {
			assert_eq!(ActionCode::from_wire(raw).as_str(), raw);
		}

		assert_eq!(
			ActionCode::from_wire("SOMETHING_NEW"),
			ActionCode::Unrecognized("SOMETHING_NEW".into())
		);
	}

	#[test]
	fn decision_table_is_closed_per_endpoint() {
		for endpoint in ENDPOINTS {
			for action in ACTIONS {
				for status in [200, 400, 500] {
					let response = reply(status, action);
					let outcome = interpret(endpoint, &response);

					match client_kind(endpoint, action) {
						Some(kind) => assert_eq!(
							outcome,
							Outcome::ClientError { kind, message: "detail".into() },
							"{endpoint} {action} {status}"
						),
						None if action == success_tag(endpoint) && status == 200 =>
							assert!(outcome.is_success(), "{endpoint} {action} {status}"),
						None => assert!(
							matches!(outcome, Outcome::ServerError { .. }),
							"{endpoint} {action} {status}"
						),
					}
				}
			}
		}
	}

	#[test]
	fn success_tags_with_other_statuses_fail_fast() {
		let response = reply(201, "INTERACTION");

		match interpret(Endpoint::AuthorizationTicket, &response) {
			Outcome::ServerError { message } => {
				assert!(message.contains("INTERACTION"));
				assert!(message.contains("201"));
			},
			other => panic!("Unexpected outcome: {other:?}"),
		}
	}

	#[test]
	fn missing_action_is_a_server_error() {
		let response = RawAuthorityResponse::new(500, json!({ "message": "InternalServerError" }));

		assert!(matches!(
			interpret(Endpoint::TokenIssue, &response),
			Outcome::ServerError { .. }
		));
	}

	#[test]
	fn client_errors_fall_back_to_fixed_messages() {
		let response = RawAuthorityResponse::new(401, json!({ "action": "UNAUTHORIZED" }));

		assert_eq!(
			interpret(Endpoint::Introspection, &response),
			Outcome::ClientError {
				kind: ClientErrorKind::Unauthorized,
				message: "Unauthorized".into()
			}
		);
	}

	#[test]
	fn interpretation_is_idempotent() {
		for endpoint in ENDPOINTS {
			for action in ACTIONS {
				let response = reply(200, action);

				assert_eq!(interpret(endpoint, &response), interpret(endpoint, &response));
			}
		}
	}
}
