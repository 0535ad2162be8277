//! Simple file-backed [`RecordStore`] for lightweight deployments.
//!
//! Each table lives in `<dir>/<table>.json` and is rewritten through a temp file plus rename
//! after every mutation.

// std
use std::{
	fs::{self, File},
	hash::Hash,
	io::Write,
	path::{Path, PathBuf},
};
// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::{ResourceId, Subject},
	config::StoreConfig,
	records::{ResourceRecord, UserRecord},
	store::{RecordStore, StoreError, StoreFuture},
};

/// Persists user and resource tables as JSON snapshots.
#[derive(Clone, Debug)]
pub struct FileStore {
	users: FileTable<Subject, UserRecord>,
	resources: FileTable<ResourceId, ResourceRecord>,
}
impl FileStore {
	/// Opens (or creates) both tables under `dir`, eagerly loading existing data.
	pub fn open(dir: impl AsRef<Path>, config: &StoreConfig) -> Result<Self, StoreError> {
		let dir = dir.as_ref();

		Ok(Self {
			users: FileTable::open(dir.join(format!("{}.json", config.users_table)))?,
			resources: FileTable::open(dir.join(format!("{}.json", config.resources_table)))?,
		})
	}
}
impl RecordStore for FileStore {
	fn fetch_user<'a>(&'a self, subject: &'a Subject) -> StoreFuture<'a, Option<UserRecord>> {
		Box::pin(async move { Ok(self.users.get(subject)) })
	}

	fn save_user(&self, user: UserRecord) -> StoreFuture<'_, ()> {
		Box::pin(async move { self.users.insert(user.subject.clone(), user) })
	}

	fn fetch_resource<'a>(
		&'a self,
		id: &'a ResourceId,
	) -> StoreFuture<'a, Option<ResourceRecord>> {
		Box::pin(async move { Ok(self.resources.get(id)) })
	}

	fn save_resource(&self, resource: ResourceRecord) -> StoreFuture<'_, ()> {
		Box::pin(async move { self.resources.insert(resource.id.clone(), resource) })
	}

	fn delete_resource<'a>(
		&'a self,
		id: &'a ResourceId,
	) -> StoreFuture<'a, Option<ResourceRecord>> {
		Box::pin(async move { self.resources.remove(id) })
	}
}

#[derive(Clone, Debug)]
struct FileTable<K, V> {
	path: PathBuf,
	inner: Arc<RwLock<HashMap<K, V>>>,
}
impl<K, V> FileTable<K, V>
where
	K: Clone + Eq + Hash + Serialize + DeserializeOwned,
	V: Clone + Serialize + DeserializeOwned,
{
	fn open(path: PathBuf) -> Result<Self, StoreError> {
		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	fn get(&self, key: &K) -> Option<V> {
		self.inner.read().get(key).cloned()
	}

	fn insert(&self, key: K, value: V) -> Result<(), StoreError> {
		let mut guard = self.inner.write();
		let mut next = guard.clone();

		next.insert(key, value);
		self.persist_locked(&next)?;

		*guard = next;

		Ok(())
	}

	fn remove(&self, key: &K) -> Result<Option<V>, StoreError> {
		let mut guard = self.inner.write();

		if !guard.contains_key(key) {
			return Ok(None);
		}

		let mut next = guard.clone();
		let removed = next.remove(key);

		self.persist_locked(&next)?;

		*guard = next;

		Ok(removed)
	}

	fn load_snapshot(path: &Path) -> Result<HashMap<K, V>, StoreError> {
		if !path.exists() {
			return Ok(HashMap::new());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		if bytes.is_empty() {
			return Ok(HashMap::new());
		}

		let entries: Vec<(K, V)> =
			serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
				message: format!("Failed to parse {}: {e}", path.display()),
			})?;

		Ok(entries.into_iter().collect())
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist_locked(&self, contents: &HashMap<K, V>) -> Result<(), StoreError> {
		let snapshot: Vec<_> = contents.iter().collect();
		let serialized =
			serde_json::to_vec_pretty(&snapshot).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize {}: {e}", self.path.display()),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// self
	use super::*;

	fn temp_dir(label: &str) -> PathBuf {
		env::temp_dir().join(format!(
			"idp_edge_file_store_{label}_{}_{}",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		))
	}

	fn resource() -> ResourceRecord {
		ResourceRecord::new(
			ResourceId::new("res-1").expect("Resource fixture should be valid."),
			"POST",
			"/v1/orders",
			"Orders",
			vec!["orders.write".into()],
			OffsetDateTime::from_unix_timestamp(1_700_000_000)
				.expect("Fixture timestamp should be valid."),
		)
	}

	#[tokio::test]
	async fn save_and_reload_round_trip() {
		let dir = temp_dir("reload");
		let config = StoreConfig::default();
		let store = FileStore::open(&dir, &config).expect("Failed to open file store.");
		let subject = Subject::new("subject-0001").expect("Subject fixture should be valid.");
		let user = UserRecord::new(
			subject.clone(),
			"user@example.com",
			"hash",
			OffsetDateTime::from_unix_timestamp(1_700_000_000)
				.expect("Fixture timestamp should be valid."),
		);

		store.save_user(user.clone()).await.expect("Failed to save user.");
		store.save_resource(resource()).await.expect("Failed to save resource.");
		drop(store);

		let reopened = FileStore::open(&dir, &config).expect("Failed to reopen file store.");

		assert!(dir.join("users.json").exists());
		assert_eq!(reopened.fetch_user(&subject).await.expect("Fetch should succeed."), Some(user));
		assert_eq!(
			reopened.fetch_resource(&resource().id).await.expect("Fetch should succeed."),
			Some(resource())
		);

		fs::remove_dir_all(&dir).unwrap_or_else(|e| {
			panic!("Failed to remove temporary store directory {}: {e}", dir.display())
		});
	}

	#[tokio::test]
	async fn deletes_are_persisted() {
		let dir = temp_dir("delete");
		let config = StoreConfig::default();
		let store = FileStore::open(&dir, &config).expect("Failed to open file store.");
		let record = resource();

		store.save_resource(record.clone()).await.expect("Failed to save resource.");
		store.delete_resource(&record.id).await.expect("Failed to delete resource.");

		let reopened = FileStore::open(&dir, &config).expect("Failed to reopen file store.");

		assert_eq!(reopened.fetch_resource(&record.id).await.expect("Fetch should succeed."), None);

		fs::remove_dir_all(&dir).unwrap_or_else(|e| {
			panic!("Failed to remove temporary store directory {}: {e}", dir.display())
		});
	}

	#[tokio::test]
	async fn failed_writes_leave_memory_and_disk_untouched() {
		let dir = temp_dir("failed_write");
		let config = StoreConfig::default();
		let store = FileStore::open(&dir, &config).expect("Failed to open file store.");
		let record = resource();

		store.save_resource(record.clone()).await.expect("Failed to save resource.");
		// A directory at the temp path makes every later snapshot write fail.
		fs::create_dir_all(dir.join("resources.tmp")).expect("Failed to block the temp path.");

		let mut renamed = record.clone();

		renamed.name = "Orders v2".into();

		let err = store.save_resource(renamed).await.expect_err("Blocked write should fail.");

		assert!(matches!(err, StoreError::Backend { .. }));
		assert!(store.delete_resource(&record.id).await.is_err());
		assert_eq!(
			store.fetch_resource(&record.id).await.expect("Fetch should succeed."),
			Some(record.clone())
		);

		let reopened = FileStore::open(&dir, &config).expect("Failed to reopen file store.");

		assert_eq!(
			reopened.fetch_resource(&record.id).await.expect("Fetch should succeed."),
			Some(record)
		);

		fs::remove_dir_all(&dir).unwrap_or_else(|e| {
			panic!("Failed to remove temporary store directory {}: {e}", dir.display())
		});
	}

	#[test]
	fn corrupt_snapshots_are_serialization_errors() {
		let dir = temp_dir("corrupt");

		fs::create_dir_all(&dir).expect("Failed to create temporary directory.");
		fs::write(dir.join("users.json"), b"not json").expect("Failed to write corrupt snapshot.");

		let err = FileStore::open(&dir, &StoreConfig::default())
			.expect_err("Corrupt snapshot should be rejected.");

		assert!(matches!(err, StoreError::Serialization { .. }));

		fs::remove_dir_all(&dir).unwrap_or_else(|e| {
			panic!("Failed to remove temporary store directory {}: {e}", dir.display())
		});
	}
}
