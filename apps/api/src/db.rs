use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use tracing::info;

use crate::models::{account::Account, cv::Cv, document::Document};
use crate::store::postgres::table_ddl;
use crate::store::Record;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the collection tables if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for collection in [Account::COLLECTION, Document::COLLECTION, Cv::COLLECTION] {
        // Plain &str goes over the simple protocol, which allows several statements.
        pool.execute(table_ddl(collection).as_str()).await?;
    }
    info!("Collection tables ready");
    Ok(())
}
