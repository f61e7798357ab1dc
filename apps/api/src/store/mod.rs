//! Persistent collections.
//!
//! Every entity lives in a named collection of records keyed by id and owner.
//! Handlers only see `Repository<T>`; the backend (JSON files or Postgres) is
//! chosen at startup.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub mod json_file;
pub mod postgres;

pub use json_file::JsonFileStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {collection}: {source}")]
    Io {
        collection: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("collection {collection} holds invalid JSON: {source}")]
    Corrupt {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A storable entity. `COLLECTION` doubles as the file stem and table name.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + 'static {
    const COLLECTION: &'static str;

    fn id(&self) -> Uuid;

    fn owner_id(&self) -> Uuid;
}

/// Insertion-ordered collection of `T`.
#[async_trait]
pub trait Repository<T: Record>: Send + Sync {
    async fn append(&self, record: &T) -> Result<(), StoreError>;

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<T>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, StoreError>;

    async fn list_all(&self) -> Result<Vec<T>, StoreError>;

    async fn replace_all(&self, records: Vec<T>) -> Result<(), StoreError>;

    /// Replaces the record with the same id. Returns false if none existed.
    async fn update(&self, record: &T) -> Result<bool, StoreError> {
        let mut records = self.list_all().await?;
        let Some(slot) = records.iter_mut().find(|r| r.id() == record.id()) else {
            return Ok(false);
        };
        *slot = record.clone();
        self.replace_all(records).await?;
        Ok(true)
    }

    /// Removes the record with `id`. Returns false if none existed.
    async fn remove(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut records = self.list_all().await?;
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Ok(false);
        }
        self.replace_all(records).await?;
        Ok(true)
    }

    async fn count_by_owner(&self, owner_id: Uuid) -> Result<usize, StoreError> {
        Ok(self.list_by_owner(owner_id).await?.len())
    }
}

/// Finds `id` only if it belongs to `owner_id`.
pub async fn find_owned<T: Record>(
    repo: &dyn Repository<T>,
    id: Uuid,
    owner_id: Uuid,
) -> Result<Option<T>, StoreError> {
    Ok(repo
        .find_by_id(id)
        .await?
        .filter(|record| record.owner_id() == owner_id))
}
