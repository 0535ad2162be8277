//! Validated keys shared with the authority and the record store.
//!
//! Client identifiers and subjects are forwarded to the authority verbatim; resource
//! identifiers key the directory. Every kind rejects blanks, whitespace, and control characters
//! and is capped at [`IDENTIFIER_MAX_LEN`] characters.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

/// Longest accepted identifier, counted in characters.
pub const IDENTIFIER_MAX_LEN: usize = 128;

macro_rules! identifier {
	($(#[$meta:meta])* $name:ident => $kind:ident) => {
		$(#[$meta])*
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Validates and wraps `value`.
			pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
				let value = value.into();

				IdentifierKind::$kind.check(&value)?;

				Ok(Self(value))
			}

			/// Borrowed view of the identifier.
			pub fn as_str(&self) -> &str {
				&self.0
			}

			/// Unwraps the identifier.
			pub fn into_inner(self) -> String {
				self.0
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &str {
				self.as_str()
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				self.as_str()
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				self.as_str()
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				Self::new(value)
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.into_inner()
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, "{}({})", IdentifierKind::$kind, self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
	};
}

identifier! {
	/// OAuth client identifier registered with the authority.
	ClientId => Client
}
identifier! {
	/// End-user subject the authority issues codes and tokens for.
	Subject => Subject
}
identifier! {
	/// Key of a protected resource record.
	ResourceId => Resource
}

/// Which identifier failed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum IdentifierKind {
	/// [`ClientId`].
	Client,
	/// [`Subject`].
	Subject,
	/// [`ResourceId`].
	Resource,
}
impl IdentifierKind {
	fn check(self, value: &str) -> Result<(), IdentifierError> {
		if value.is_empty() {
			return Err(IdentifierError::Empty { kind: self });
		}
		if let Some(found) = value.chars().find(|c| c.is_whitespace() || c.is_control()) {
			return Err(IdentifierError::InvalidCharacter { kind: self, found });
		}
		if value.chars().count() > IDENTIFIER_MAX_LEN {
			return Err(IdentifierError::TooLong { kind: self, max: IDENTIFIER_MAX_LEN });
		}

		Ok(())
	}
}
impl Display for IdentifierKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(match self {
			Self::Client => "Client",
			Self::Subject => "Subject",
			Self::Resource => "Resource",
		})
	}
}

/// Identifier validation failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// Nothing was supplied.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Offending identifier kind.
		kind: IdentifierKind,
	},
	/// Whitespace or a control character was found.
	#[error("{kind} identifier contains the invalid character {found:?}.")]
	InvalidCharacter {
		/// Offending identifier kind.
		kind: IdentifierKind,
		/// First rejected character.
		found: char,
	},
	/// Longer than [`IDENTIFIER_MAX_LEN`].
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Offending identifier kind.
		kind: IdentifierKind,
		/// Maximum permitted character count.
		max: usize,
	},
}
