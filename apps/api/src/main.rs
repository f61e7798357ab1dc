mod auth;
mod config;
mod cvs;
mod db;
mod documents;
mod errors;
mod extraction;
mod jobs;
mod llm_client;
mod models;
mod quota;
mod render;
mod routes;
mod state;
mod store;
mod tailoring;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::{BlobBackend, Config, StoreBackend};
use crate::db::{create_pool, ensure_schema};
use crate::documents::blob::{BlobStore, LocalBlobStore, S3BlobStore};
use crate::jobs::fetch::HttpPageFetcher;
use crate::llm_client::LlmClient;
use crate::models::{account::Account, cv::Cv, document::Document};
use crate::quota::CreationLocks;
use crate::render::renderer::BrowserlessRenderer;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{JsonFileStore, PgStore, Repository};

type Collections = (
    Arc<dyn Repository<Account>>,
    Arc<dyn Repository<Document>>,
    Arc<dyn Repository<Cv>>,
);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cvforge API v{}", env!("CARGO_PKG_VERSION"));

    let (accounts, documents, cvs) = open_collections(&config).await?;
    let blobs = open_blob_store(&config).await?;

    // Initialize LLM client
    let llm = LlmClient::new(config.openai_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let fetcher = HttpPageFetcher::new()?;

    let renderer = BrowserlessRenderer::new(&config.renderer_url, config.renderer_token.clone())?;
    info!("Document renderer at {}", config.renderer_url);

    // Build app state
    let state = AppState {
        accounts,
        documents,
        cvs,
        blobs,
        llm: Arc::new(llm),
        fetcher: Arc::new(fetcher),
        renderer: Arc::new(renderer),
        creation_locks: Arc::new(CreationLocks::default()),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn open_collections(config: &Config) -> Result<Collections> {
    let accounts: Arc<dyn Repository<Account>>;
    let documents: Arc<dyn Repository<Document>>;
    let cvs: Arc<dyn Repository<Cv>>;

    match &config.store {
        StoreBackend::Json => {
            let dir = config.data_dir.as_path();
            info!("Using JSON collections in {}", dir.display());
            accounts = Arc::new(JsonFileStore::<Account>::open(dir).await?);
            documents = Arc::new(JsonFileStore::<Document>::open(dir).await?);
            cvs = Arc::new(JsonFileStore::<Cv>::open(dir).await?);
        }
        StoreBackend::Postgres { database_url } => {
            let pool = create_pool(database_url).await?;
            ensure_schema(&pool).await?;
            accounts = Arc::new(PgStore::<Account>::new(pool.clone()));
            documents = Arc::new(PgStore::<Document>::new(pool.clone()));
            cvs = Arc::new(PgStore::<Cv>::new(pool));
        }
    }

    Ok((accounts, documents, cvs))
}

async fn open_blob_store(config: &Config) -> Result<Arc<dyn BlobStore>> {
    match &config.blob {
        BlobBackend::Local => {
            let root = config.uploads_dir();
            tokio::fs::create_dir_all(&root).await?;
            info!("Storing uploads in {}", root.display());
            let store: Arc<dyn BlobStore> = Arc::new(LocalBlobStore::new(root));
            Ok(store)
        }
        BlobBackend::S3 {
            bucket,
            endpoint,
            access_key_id,
            secret_access_key,
        } => {
            let client = build_s3_client(endpoint, access_key_id, secret_access_key).await;
            info!("S3 client initialized (bucket: {bucket})");
            let store: Arc<dyn BlobStore> = Arc::new(S3BlobStore::new(client, bucket.clone()));
            Ok(store)
        }
    }
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(
    endpoint: &str,
    access_key_id: &str,
    secret_access_key: &str,
) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        access_key_id,
        secret_access_key,
        None,
        None,
        "cvforge-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
