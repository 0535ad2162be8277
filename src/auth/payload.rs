//! Decoding helpers shared by the entities built from successful authority payloads.

// crates.io
use serde::{Deserializer, de::DeserializeOwned};
// self
use crate::_prelude::*;

/// Errors raised while turning a success payload into an entity.
#[derive(Debug, ThisError)]
pub enum EntityError {
	/// Payload is missing a field or carries a value of the wrong shape.
	#[error("Authority payload could not be decoded.")]
	Decode(#[from] serde_path_to_error::Error<serde_json::Error>),
	/// Required string field is present but empty.
	#[error("The {field} value is empty.")]
	Empty {
		/// Offending field.
		field: &'static str,
	},
	/// Numeric field cannot be represented as an instant.
	#[error("The {field} value is out of range.")]
	OutOfRange {
		/// Offending field.
		field: &'static str,
	},
}

/// Decodes `payload` into `T`, reporting the JSON path of the first mismatch.
pub(crate) fn decode<T>(payload: &JsonValue) -> Result<T, EntityError>
where
	T: DeserializeOwned,
{
	Ok(serde_path_to_error::deserialize(payload.clone())?)
}

/// Converts an epoch-milliseconds field into an instant.
pub(crate) fn instant_from_millis(
	field: &'static str,
	millis: i64,
) -> Result<OffsetDateTime, EntityError> {
	OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
		.map_err(|_| EntityError::OutOfRange { field })
}

/// Accepts identifiers the authority emits either as JSON strings or as numbers.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum Wire {
		Text(String),
		Number(serde_json::Number),
	}

	Ok(Option::<Wire>::deserialize(deserializer)?.map(|wire| match wire {
		Wire::Text(text) => text,
		Wire::Number(number) => number.to_string(),
	}))
}
