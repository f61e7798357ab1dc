//! Postgres backend: one table per collection, each row a JSONB document.
//!
//! Tables are created by `db::ensure_schema`. `seq` keeps insertion order.

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Record, Repository, StoreError};

pub struct PgStore<T> {
    pool: PgPool,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Record> PgStore<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }
}

/// DDL for one collection table.
pub fn table_ddl(collection: &str) -> String {
    format!(
        r#"
        CREATE TABLE IF NOT EXISTS {collection} (
            seq      BIGSERIAL,
            id       UUID PRIMARY KEY,
            owner_id UUID NOT NULL,
            data     JSONB NOT NULL
        );
        CREATE INDEX IF NOT EXISTS {collection}_owner_idx ON {collection} (owner_id);
        "#
    )
}

#[async_trait]
impl<T: Record> Repository<T> for PgStore<T> {
    async fn append(&self, record: &T) -> Result<(), StoreError> {
        sqlx::query(&format!(
            "INSERT INTO {} (id, owner_id, data) VALUES ($1, $2, $3)",
            T::COLLECTION
        ))
        .bind(record.id())
        .bind(record.owner_id())
        .bind(Json(record))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<T>, StoreError> {
        let rows: Vec<Json<T>> = sqlx::query_scalar(&format!(
            "SELECT data FROM {} WHERE owner_id = $1 ORDER BY seq ASC",
            T::COLLECTION
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|Json(record)| record).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, StoreError> {
        let row: Option<Json<T>> = sqlx::query_scalar(&format!(
            "SELECT data FROM {} WHERE id = $1",
            T::COLLECTION
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|Json(record)| record))
    }

    async fn list_all(&self) -> Result<Vec<T>, StoreError> {
        let rows: Vec<Json<T>> = sqlx::query_scalar(&format!(
            "SELECT data FROM {} ORDER BY seq ASC",
            T::COLLECTION
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|Json(record)| record).collect())
    }

    async fn replace_all(&self, records: Vec<T>) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(&format!("DELETE FROM {}", T::COLLECTION))
            .execute(&mut *tx)
            .await?;
        for record in &records {
            sqlx::query(&format!(
                "INSERT INTO {} (id, owner_id, data) VALUES ($1, $2, $3)",
                T::COLLECTION
            ))
            .bind(record.id())
            .bind(record.owner_id())
            .bind(Json(record))
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn update(&self, record: &T) -> Result<bool, StoreError> {
        let result = sqlx::query(&format!(
            "UPDATE {} SET owner_id = $2, data = $3 WHERE id = $1",
            T::COLLECTION
        ))
        .bind(record.id())
        .bind(record.owner_id())
        .bind(Json(record))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn remove(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", T::COLLECTION))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_by_owner(&self, owner_id: Uuid) -> Result<usize, StoreError> {
        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM {} WHERE owner_id = $1",
            T::COLLECTION
        ))
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_ddl_names_collection() {
        let ddl = table_ddl("cvs");
        assert!(ddl.contains("CREATE TABLE IF NOT EXISTS cvs"));
        assert!(ddl.contains("cvs_owner_idx"));
        assert!(ddl.contains("JSONB"));
    }
}
