use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Record;

/// Stored in `extracted_text` when the upload could not be read as text.
pub const EXTRACTION_FAILED: &str = "Text extraction failed";

/// Uploaded source document. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub document_id: Uuid,
    pub user_id: Uuid,
    /// Unique stored name: `<millis>-<random>-<original>`.
    pub file_name: String,
    pub original_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub extracted_text: String,
    /// Blob store key; internal only.
    pub storage_key: String,
    pub uploaded_at: DateTime<Utc>,
}

impl Document {
    pub fn has_usable_text(&self) -> bool {
        let text = self.extracted_text.trim();
        !text.is_empty() && text != EXTRACTION_FAILED
    }
}

impl Record for Document {
    const COLLECTION: &'static str = "documents";

    fn id(&self) -> Uuid {
        self.document_id
    }

    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// Document as returned to clients (no storage key).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentView {
    pub document_id: Uuid,
    pub file_name: String,
    pub original_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub extracted_text: String,
    pub uploaded_at: DateTime<Utc>,
}

impl From<&Document> for DocumentView {
    fn from(document: &Document) -> Self {
        DocumentView {
            document_id: document.document_id,
            file_name: document.file_name.clone(),
            original_name: document.original_name.clone(),
            file_type: document.file_type.clone(),
            file_size: document.file_size,
            extracted_text: document.extracted_text.clone(),
            uploaded_at: document.uploaded_at,
        }
    }
}
