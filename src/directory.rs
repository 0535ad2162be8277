//! CRUD service over [`RecordStore`] with edge error semantics.
//!
//! Missing records surface as [`Error::NotFound`]; every store failure is alerted at critical
//! severity and surfaces as [`Error::Storage`].

// self
use crate::{
	_prelude::*,
	auth::{ResourceId, Subject},
	flows::common::ErrorChain,
	obs,
	records::{ResourceRecord, UserRecord},
	store::{RecordStore, StoreError},
};

const USERS: &str = "users";
const RESOURCES: &str = "resources";

/// User and resource lookups backed by a shared store.
#[derive(Clone)]
pub struct Directory {
	store: Arc<dyn RecordStore>,
}
impl Directory {
	/// Wraps `store`.
	pub fn new(store: Arc<dyn RecordStore>) -> Self {
		Self { store }
	}

	/// Returns the user keyed by `subject`.
	pub async fn find_user(&self, subject: &Subject) -> Result<UserRecord> {
		self.store
			.fetch_user(subject)
			.await
			.map_err(|e| store_failure(USERS, e))?
			.ok_or_else(|| Error::NotFound { kind: "User", id: subject.to_string() })
	}

	/// Creates or replaces `user`.
	pub async fn save_user(&self, user: UserRecord) -> Result<()> {
		self.store.save_user(user).await.map_err(|e| store_failure(USERS, e))
	}

	/// Returns the resource keyed by `id`.
	pub async fn find_resource(&self, id: &ResourceId) -> Result<ResourceRecord> {
		self.store
			.fetch_resource(id)
			.await
			.map_err(|e| store_failure(RESOURCES, e))?
			.ok_or_else(|| Error::NotFound { kind: "Resource", id: id.to_string() })
	}

	/// Creates or replaces `resource`.
	pub async fn save_resource(&self, resource: ResourceRecord) -> Result<()> {
		self.store.save_resource(resource).await.map_err(|e| store_failure(RESOURCES, e))
	}

	/// Deletes the resource keyed by `id` and returns it.
	pub async fn destroy_resource(&self, id: &ResourceId) -> Result<ResourceRecord> {
		self.store
			.delete_resource(id)
			.await
			.map_err(|e| store_failure(RESOURCES, e))?
			.ok_or_else(|| Error::NotFound { kind: "Resource", id: id.to_string() })
	}
}
impl Debug for Directory {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("Directory(..)")
	}
}

fn store_failure(table: &'static str, err: StoreError) -> Error {
	obs::alert_critical(table, "Record store failed.", &ErrorChain(&err));

	Error::Storage(err)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::store::{MemoryStore, StoreFuture};

	struct BrokenStore;
	impl RecordStore for BrokenStore {
		fn fetch_user<'a>(&'a self, _: &'a Subject) -> StoreFuture<'a, Option<UserRecord>> {
			Box::pin(async { Err(StoreError::Backend { message: "users offline".into() }) })
		}

		fn save_user(&self, _: UserRecord) -> StoreFuture<'_, ()> {
			Box::pin(async { Err(StoreError::Backend { message: "users offline".into() }) })
		}

		fn fetch_resource<'a>(
			&'a self,
			_: &'a ResourceId,
		) -> StoreFuture<'a, Option<ResourceRecord>> {
			Box::pin(async { Err(StoreError::Backend { message: "resources offline".into() }) })
		}

		fn save_resource(&self, _: ResourceRecord) -> StoreFuture<'_, ()> {
			Box::pin(async { Err(StoreError::Backend { message: "resources offline".into() }) })
		}

		fn delete_resource<'a>(
			&'a self,
			_: &'a ResourceId,
		) -> StoreFuture<'a, Option<ResourceRecord>> {
			Box::pin(async { Err(StoreError::Backend { message: "resources offline".into() }) })
		}
	}

	fn subject() -> Subject {
		Subject::new("subject-0001").expect("Subject fixture should be valid.")
	}

	#[tokio::test]
	async fn missing_records_are_not_found() {
		let directory = Directory::new(Arc::new(MemoryStore::default()));
		let id = ResourceId::new("res-404").expect("Resource fixture should be valid.");
		let user_err = directory.find_user(&subject()).await.expect_err("User should be missing.");
		let destroy_err =
			directory.destroy_resource(&id).await.expect_err("Resource should be missing.");

		assert_eq!(user_err.status_code(), 404);
		assert_eq!(user_err.to_string(), "User `subject-0001` was not found.");
		assert!(matches!(destroy_err, Error::NotFound { kind: "Resource", .. }));
	}

	#[tokio::test]
	async fn saved_users_are_found() {
		let directory = Directory::new(Arc::new(MemoryStore::default()));
		let user =
			UserRecord::new(subject(), "user@example.com", "hash", OffsetDateTime::now_utc());

		directory.save_user(user.clone()).await.expect("Save should succeed.");

		assert_eq!(directory.find_user(&subject()).await.expect("User should exist."), user);
	}

	#[tokio::test]
	async fn store_failures_are_server_errors() {
		let directory = Directory::new(Arc::new(BrokenStore));
		let err = directory.find_user(&subject()).await.expect_err("Store should fail.");

		assert!(err.is_server_error());
		assert_eq!(err.public_message(), "Internal Server Error");
		assert!(matches!(err, Error::Storage(StoreError::Backend { .. })));
	}
}
