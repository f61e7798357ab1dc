use std::sync::Arc;

use crate::config::Config;
use crate::documents::blob::BlobStore;
use crate::jobs::fetch::PageFetcher;
use crate::llm_client::ChatModel;
use crate::models::{account::Account, cv::Cv, document::Document};
use crate::quota::CreationLocks;
use crate::render::renderer::DocumentRenderer;
use crate::store::Repository;

/// Shared application state injected into all route handlers via Axum extractors.
/// Every external dependency sits behind a trait object so tests can swap it.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn Repository<Account>>,
    pub documents: Arc<dyn Repository<Document>>,
    pub cvs: Arc<dyn Repository<Cv>>,
    pub blobs: Arc<dyn BlobStore>,
    pub llm: Arc<dyn ChatModel>,
    pub fetcher: Arc<dyn PageFetcher>,
    pub renderer: Arc<dyn DocumentRenderer>,
    /// Serializes quota check and insert per account.
    pub creation_locks: Arc<CreationLocks>,
    pub config: Config,
}
