//! One pretty-printed JSON array per collection under the data directory.
//!
//! Each write rewrites the whole file through `<name>.json.tmp` + rename. The
//! per-store mutex serializes writers within the process only.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use super::{Record, Repository, StoreError};

pub struct JsonFileStore<T> {
    path: PathBuf,
    lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Record> JsonFileStore<T> {
    /// Opens `<dir>/<collection>.json`, creating `dir` if needed. The file
    /// itself is created on first write.
    pub async fn open(dir: &Path) -> Result<Self, StoreError> {
        tokio::fs::create_dir_all(dir).await.map_err(io_error::<T>)?;
        Ok(Self {
            path: dir.join(format!("{}.json", T::COLLECTION)),
            lock: Mutex::new(()),
            _marker: PhantomData,
        })
    }

    async fn read(&self) -> Result<Vec<T>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error::<T>(e)),
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
            collection: T::COLLECTION,
            source,
        })
    }

    async fn write(&self, records: &[T]) -> Result<(), StoreError> {
        let body = serde_json::to_vec_pretty(records).map_err(|source| StoreError::Corrupt {
            collection: T::COLLECTION,
            source,
        })?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body).await.map_err(io_error::<T>)?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(io_error::<T>)?;
        debug!("Wrote {} records to {}", records.len(), self.path.display());
        Ok(())
    }

    /// Read-modify-write under the store lock.
    async fn modify<R: Send>(
        &self,
        f: impl FnOnce(&mut Vec<T>) -> R + Send,
    ) -> Result<R, StoreError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read().await?;
        let result = f(&mut records);
        self.write(&records).await?;
        Ok(result)
    }
}

fn io_error<T: Record>(source: std::io::Error) -> StoreError {
    StoreError::Io {
        collection: T::COLLECTION,
        source,
    }
}

#[async_trait]
impl<T: Record> Repository<T> for JsonFileStore<T> {
    async fn append(&self, record: &T) -> Result<(), StoreError> {
        let record = record.clone();
        self.modify(move |records| records.push(record)).await
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<T>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut records = self.read().await?;
        records.retain(|r| r.owner_id() == owner_id);
        Ok(records)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.read().await?.into_iter().find(|r| r.id() == id))
    }

    async fn list_all(&self) -> Result<Vec<T>, StoreError> {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    async fn replace_all(&self, records: Vec<T>) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        self.write(&records).await
    }

    async fn update(&self, record: &T) -> Result<bool, StoreError> {
        let record = record.clone();
        self.modify(move |records| match records.iter_mut().find(|r| r.id() == record.id()) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        })
        .await
    }

    async fn remove(&self, id: Uuid) -> Result<bool, StoreError> {
        self.modify(move |records| {
            let before = records.len();
            records.retain(|r| r.id() != id);
            records.len() != before
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: Uuid,
        owner: Uuid,
        body: String,
    }

    impl Record for Note {
        const COLLECTION: &'static str = "notes";

        fn id(&self) -> Uuid {
            self.id
        }

        fn owner_id(&self) -> Uuid {
            self.owner
        }
    }

    fn note(owner: Uuid, body: &str) -> Note {
        Note {
            id: Uuid::new_v4(),
            owner,
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::<Note>::open(dir.path()).await.unwrap();
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_preserves_order_and_filters_by_owner() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::<Note>::open(dir.path()).await.unwrap();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        store.append(&note(alice, "first")).await.unwrap();
        store.append(&note(bob, "other")).await.unwrap();
        store.append(&note(alice, "second")).await.unwrap();

        let mine = store.list_by_owner(alice).await.unwrap();
        let bodies: Vec<_> = mine.iter().map(|n| n.body.as_str()).collect();
        assert_eq!(bodies, vec!["first", "second"]);
        assert_eq!(store.count_by_owner(bob).await.unwrap(), 1);
        assert!(dir.path().join("notes.json").exists());
    }

    #[tokio::test]
    async fn test_update_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::<Note>::open(dir.path()).await.unwrap();
        let mut n = note(Uuid::new_v4(), "draft");
        store.append(&n).await.unwrap();

        n.body = "final".to_string();
        assert!(store.update(&n).await.unwrap());
        assert_eq!(store.find_by_id(n.id).await.unwrap().unwrap().body, "final");

        assert!(store.remove(n.id).await.unwrap());
        assert!(!store.remove(n.id).await.unwrap());
        assert!(store.find_by_id(n.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_false() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::<Note>::open(dir.path()).await.unwrap();
        assert!(!store.update(&note(Uuid::new_v4(), "x")).await.unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error_not_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.json"), "{not json").unwrap();
        let store = JsonFileStore::<Note>::open(dir.path()).await.unwrap();
        let err = store.list_all().await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { collection: "notes", .. }));
    }

    #[tokio::test]
    async fn test_replace_all_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::<Note>::open(dir.path()).await.unwrap();
        let owner = Uuid::new_v4();
        store.append(&note(owner, "a")).await.unwrap();
        store.replace_all(vec![note(owner, "b")]).await.unwrap();

        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].body, "b");
        assert!(!dir.path().join("notes.json.tmp").exists());
    }
}
