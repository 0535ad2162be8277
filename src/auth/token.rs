//! Access-token entities and the redacting secret wrapper they share.

pub mod access;
pub mod introspection;
pub mod secret;
