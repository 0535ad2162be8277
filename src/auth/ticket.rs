//! Short-lived ticket linking the two phases of the authorization handshake.

// self
use crate::{
	_prelude::*,
	auth::payload::{self, EntityError},
};

/// Ticket issued by phase 1. Lives for one handshake and is never stored.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthorityTicket {
	/// Opaque ticket value.
	pub ticket: String,
	/// Action tag that accompanied the ticket.
	pub action: String,
}
impl AuthorityTicket {
	/// Extracts the ticket from an `INTERACTION` payload.
	pub fn from_payload(payload: &JsonValue) -> Result<Self, EntityError> {
		let wire: TicketPayload = payload::decode(payload)?;

		if wire.ticket.is_empty() {
			return Err(EntityError::Empty { field: "ticket" });
		}

		Ok(Self { ticket: wire.ticket, action: wire.action })
	}
}
impl Debug for AuthorityTicket {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthorityTicket")
			.field("ticket", &"<redacted>")
			.field("action", &self.action)
			.finish()
	}
}

#[derive(Deserialize)]
struct TicketPayload {
	ticket: String,
	action: String,
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn ticket_is_required_and_redacted() {
		let ticket = AuthorityTicket::from_payload(&json!({
			"action": "INTERACTION",
			"ticket": "ZyV1p0Nly8SBAcKk9uRT0R3XpSGeJbBmLEAw1lpz5E8",
		}))
		.expect("INTERACTION payload should carry a ticket.");

		assert_eq!(ticket.ticket, "ZyV1p0Nly8SBAcKk9uRT0R3XpSGeJbBmLEAw1lpz5E8");
		assert!(!format!("{ticket:?}").contains("ZyV1p0"));
		assert!(AuthorityTicket::from_payload(&json!({ "action": "INTERACTION" })).is_err());
		assert!(
			AuthorityTicket::from_payload(&json!({ "action": "INTERACTION", "ticket": "" }))
				.is_err()
		);
	}
}
