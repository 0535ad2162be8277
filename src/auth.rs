//! Auth-domain identifiers, scope sets, requests, and the entities built from authority replies.

pub mod code;
pub mod id;
pub mod payload;
pub mod request;
pub mod scope;
pub mod ticket;
pub mod token;

pub use code::*;
pub use id::*;
pub use payload::EntityError;
pub use request::*;
pub use scope::*;
pub use ticket::*;
pub use token::{access::*, introspection::*, secret::*};
