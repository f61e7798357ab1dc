use std::path::PathBuf;

use anyhow::{bail, Context, Result};

/// Where the account, document and CV collections live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// `<DATA_DIR>/{users,documents,cvs}.json`
    Json,
    Postgres { database_url: String },
}

/// Where uploaded file bytes live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobBackend {
    /// `<DATA_DIR>/uploads`
    Local,
    S3 {
        bucket: String,
        endpoint: String,
        access_key_id: String,
        secret_access_key: String,
    },
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub jwt_secret: String,
    pub port: u16,
    pub rust_log: String,
    pub data_dir: PathBuf,
    pub store: StoreBackend,
    pub blob: BlobBackend,
    pub renderer_url: String,
    pub renderer_token: Option<String>,
    /// Enables `GET /api/admin/users` when set.
    pub admin_token: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let store = match optional_env("STORE_BACKEND").as_deref().unwrap_or("json") {
            "json" => StoreBackend::Json,
            "postgres" => StoreBackend::Postgres {
                database_url: require_env("DATABASE_URL")?,
            },
            other => bail!("STORE_BACKEND must be 'json' or 'postgres', got '{other}'"),
        };

        let blob = match optional_env("BLOB_BACKEND").as_deref().unwrap_or("local") {
            "local" => BlobBackend::Local,
            "s3" => BlobBackend::S3 {
                bucket: require_env("S3_BUCKET")?,
                endpoint: require_env("S3_ENDPOINT")?,
                access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
                secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            },
            other => bail!("BLOB_BACKEND must be 'local' or 's3', got '{other}'"),
        };

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            jwt_secret: require_env("JWT_SECRET")?,
            port: optional_env("PORT")
                .unwrap_or_else(|| "5050".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            data_dir: PathBuf::from(optional_env("DATA_DIR").unwrap_or_else(|| "data".to_string())),
            store,
            blob,
            renderer_url: optional_env("RENDERER_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            renderer_token: optional_env("RENDERER_TOKEN"),
            admin_token: optional_env("ADMIN_TOKEN"),
        })
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }
}

fn require_env(key: &str) -> Result<String> {
    optional_env(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unset and empty are treated alike.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
