//! Shared helpers for flow implementations (outcome resolution and critical alerting).

// self
use crate::{
	_prelude::*,
	auth::EntityError,
	authority::{ClientErrorKind, Endpoint, Outcome, RawAuthorityResponse, interpret},
	obs,
};

/// Interprets `response` for `endpoint` and returns the success payload.
///
/// Server-class outcomes raise a critical alert carrying the status and the redacted body
/// before they propagate.
pub fn resolve(endpoint: Endpoint, response: &RawAuthorityResponse) -> Result<&JsonValue> {
	match interpret(endpoint, response) {
		Outcome::Success(payload) => Ok(payload),
		Outcome::ClientError { kind, message } => Err(client_error(kind, message)),
		Outcome::ServerError { message } => {
			alert_response(endpoint, &message, response);

			Err(Error::InternalServer { detail: message })
		},
	}
}

/// Maps a client-class outcome onto the edge error taxonomy.
pub fn client_error(kind: ClientErrorKind, message: String) -> Error {
	match kind {
		ClientErrorKind::BadRequest => Error::BadRequest { message },
		ClientErrorKind::Unauthorized => Error::Unauthorized { message },
		ClientErrorKind::Forbidden => Error::Forbidden { message },
	}
}

/// Alerts on a failed authority call (transport or configuration) and passes the error on.
pub(crate) fn call_failure(endpoint: Endpoint, err: Error) -> Error {
	obs::alert_critical(endpoint.as_str(), "Authority call failed.", &ErrorChain(&err));

	err
}

/// Alerts on a success payload that cannot become an entity.
pub(crate) fn entity_failure(
	endpoint: Endpoint,
	response: &RawAuthorityResponse,
	err: EntityError,
) -> Error {
	let detail = format!("The {endpoint} success payload is unusable.");

	alert_response(endpoint, &format!("{detail} {}", ErrorChain(&err)), response);

	Error::InternalServer { detail }
}

fn alert_response(endpoint: Endpoint, message: &str, response: &RawAuthorityResponse) {
	obs::alert_critical(
		endpoint.as_str(),
		message,
		&format_args!("status={} body={}", response.status, response.redacted_body()),
	);
}

/// Renders an error followed by its `source` chain.
pub(crate) struct ErrorChain<'a>(pub &'a dyn StdError);
impl Display for ErrorChain<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}", self.0)?;

		let mut source = self.0.source();

		while let Some(inner) = source {
			write!(f, ": {inner}")?;

			source = inner.source();
		}

		Ok(())
	}
}
