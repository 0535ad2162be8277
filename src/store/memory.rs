//! Thread-safe in-memory [`RecordStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::{ResourceId, Subject},
	records::{ResourceRecord, UserRecord},
	store::{RecordStore, StoreFuture},
};

type Table<K, V> = Arc<RwLock<HashMap<K, V>>>;

/// Thread-safe storage backend that keeps records in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
	users: Table<Subject, UserRecord>,
	resources: Table<ResourceId, ResourceRecord>,
}
impl MemoryStore {
	/// Number of stored users.
	pub fn user_count(&self) -> usize {
		self.users.read().len()
	}

	/// Number of stored resources.
	pub fn resource_count(&self) -> usize {
		self.resources.read().len()
	}
}
impl RecordStore for MemoryStore {
	fn fetch_user<'a>(&'a self, subject: &'a Subject) -> StoreFuture<'a, Option<UserRecord>> {
		let users = self.users.clone();

		Box::pin(async move { Ok(users.read().get(subject).cloned()) })
	}

	fn save_user(&self, user: UserRecord) -> StoreFuture<'_, ()> {
		let users = self.users.clone();

		Box::pin(async move {
			users.write().insert(user.subject.clone(), user);

			Ok(())
		})
	}

	fn fetch_resource<'a>(
		&'a self,
		id: &'a ResourceId,
	) -> StoreFuture<'a, Option<ResourceRecord>> {
		let resources = self.resources.clone();

		Box::pin(async move { Ok(resources.read().get(id).cloned()) })
	}

	fn save_resource(&self, resource: ResourceRecord) -> StoreFuture<'_, ()> {
		let resources = self.resources.clone();

		Box::pin(async move {
			resources.write().insert(resource.id.clone(), resource);

			Ok(())
		})
	}

	fn delete_resource<'a>(
		&'a self,
		id: &'a ResourceId,
	) -> StoreFuture<'a, Option<ResourceRecord>> {
		let resources = self.resources.clone();

		Box::pin(async move { Ok(resources.write().remove(id)) })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn resource(id: &str) -> ResourceRecord {
		ResourceRecord::new(
			ResourceId::new(id).expect("Resource fixture should be valid."),
			"GET",
			"/v1/items",
			"Items",
			vec!["items.read".into()],
			OffsetDateTime::now_utc(),
		)
	}

	#[tokio::test]
	async fn resources_can_be_replaced_and_deleted() {
		let store = MemoryStore::default();
		let mut record = resource("res-1");

		store.save_resource(record.clone()).await.expect("Save should succeed.");

		record.name = "Items v2".into();

		store.save_resource(record.clone()).await.expect("Replace should succeed.");

		assert_eq!(store.resource_count(), 1);
		assert_eq!(
			store.fetch_resource(&record.id).await.expect("Fetch should succeed."),
			Some(record.clone())
		);
		assert_eq!(
			store.delete_resource(&record.id).await.expect("Delete should succeed."),
			Some(record.clone())
		);
		assert_eq!(store.delete_resource(&record.id).await.expect("Delete should succeed."), None);
	}

	#[tokio::test]
	async fn users_are_keyed_by_subject() {
		let store = MemoryStore::default();
		let subject = Subject::new("subject-0001").expect("Subject fixture should be valid.");
		let user =
			UserRecord::new(subject.clone(), "user@example.com", "hash", OffsetDateTime::now_utc());

		store.save_user(user.clone()).await.expect("Save should succeed.");

		assert_eq!(store.fetch_user(&subject).await.expect("Fetch should succeed."), Some(user));
		assert_eq!(store.user_count(), 1);
	}
}
