//! Storage contracts and built-in store implementations for user and resource records.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	auth::{ResourceId, Subject},
	records::{ResourceRecord, UserRecord},
};

/// Boxed future returned by [`RecordStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Key-value persistence for user and resource records.
pub trait RecordStore
where
	Self: Send + Sync,
{
	/// Fetches the user keyed by `subject`, if present.
	fn fetch_user<'a>(&'a self, subject: &'a Subject) -> StoreFuture<'a, Option<UserRecord>>;

	/// Persists or replaces a user record.
	fn save_user(&self, user: UserRecord) -> StoreFuture<'_, ()>;

	/// Fetches the resource keyed by `id`, if present.
	fn fetch_resource<'a>(&'a self, id: &'a ResourceId)
	-> StoreFuture<'a, Option<ResourceRecord>>;

	/// Persists or replaces a resource record.
	fn save_resource(&self, resource: ResourceRecord) -> StoreFuture<'_, ()>;

	/// Removes the resource keyed by `id`, returning the removed record.
	fn delete_resource<'a>(
		&'a self,
		id: &'a ResourceId,
	) -> StoreFuture<'a, Option<ResourceRecord>>;
}

/// Error type produced by [`RecordStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
