//! Axum route handlers for the Documents API.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::documents::text::{extract_text, DocumentKind};
use crate::errors::AppError;
use crate::models::document::{Document, DocumentView};
use crate::routes::extract::PathParam;
use crate::routes::{success, Envelope, MessageResponse};
use crate::state::AppState;
use crate::store::find_owned;

/// Largest accepted upload.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const UPLOAD_FIELD: &str = "document";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub document: DocumentView,
}

#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub document: DocumentView,
}

#[derive(Debug, Serialize)]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentView>,
}

struct Upload {
    original_name: String,
    content_type: String,
    data: Bytes,
}

/// `<millis>-<random>-<original>`, with the original reduced to safe characters.
pub fn stored_file_name(original_name: &str) -> String {
    let safe: String = original_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "{}-{}-{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().as_u128() % 1_000_000_000,
        safe
    )
}

async fn read_upload(multipart: &mut Multipart) -> Result<Option<Upload>, AppError> {
    let invalid = |e: axum::extract::multipart::MultipartError| {
        AppError::Validation(format!("Invalid upload: {e}"))
    };

    while let Some(field) = multipart.next_field().await.map_err(invalid)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let original_name = field.file_name().unwrap_or("document").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field.bytes().await.map_err(invalid)?;
        return Ok(Some(Upload {
            original_name,
            content_type,
            data,
        }));
    }
    Ok(None)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/documents/upload
///
/// Stores the bytes, extracts text (sentinel on failure), then appends the record.
pub async fn handle_upload(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Envelope<UploadResponse>>), AppError> {
    let mut multipart = multipart
        .map_err(|e| AppError::Validation(format!("Invalid upload: {}", e.body_text())))?;
    let upload = read_upload(&mut multipart)
        .await?
        .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    if upload.data.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::Validation(
            "File too large. Maximum size is 10MB.".to_string(),
        ));
    }
    let kind = DocumentKind::from_mime(&upload.content_type).ok_or_else(|| {
        AppError::Validation(
            "Invalid file type. Only PDF, DOCX, and TXT files are allowed.".to_string(),
        )
    })?;

    let file_name = stored_file_name(&upload.original_name);
    let storage_key = format!("{}/{}", user.id(), file_name);
    state
        .blobs
        .put(&storage_key, upload.data.clone(), kind.mime())
        .await?;

    let extracted_text = extract_text(upload.data.clone(), kind).await;

    let document = Document {
        document_id: Uuid::new_v4(),
        user_id: user.id(),
        file_name,
        original_name: upload.original_name,
        file_type: kind.mime().to_string(),
        file_size: upload.data.len() as u64,
        extracted_text,
        storage_key,
        uploaded_at: Utc::now(),
    };

    if let Err(e) = state.documents.append(&document).await {
        if let Err(cleanup) = state.blobs.delete(&document.storage_key).await {
            warn!("Orphaned blob {}: {cleanup}", document.storage_key);
        }
        return Err(e.into());
    }

    info!(
        "Stored document {} ({} bytes, usable text: {}) for {}",
        document.document_id,
        document.file_size,
        document.has_usable_text(),
        document.user_id
    );

    Ok((
        StatusCode::CREATED,
        success(UploadResponse {
            message: "Document uploaded successfully",
            document: DocumentView::from(&document),
        }),
    ))
}

/// GET /api/documents
pub async fn handle_list_documents(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Envelope<DocumentListResponse>>, AppError> {
    let documents = state.documents.list_by_owner(user.id()).await?;
    Ok(success(DocumentListResponse {
        documents: documents.iter().map(DocumentView::from).collect(),
    }))
}

/// GET /api/documents/:documentId
pub async fn handle_get_document(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(document_id): PathParam<Uuid>,
) -> Result<Json<Envelope<DocumentResponse>>, AppError> {
    let document = find_owned(state.documents.as_ref(), document_id, user.id())
        .await?
        .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;
    Ok(success(DocumentResponse {
        document: DocumentView::from(&document),
    }))
}

/// GET /api/documents/:documentId/file
///
/// The stored upload as sent, under its stored (sanitized) file name.
pub async fn handle_download_document(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(document_id): PathParam<Uuid>,
) -> Result<Response, AppError> {
    let document = find_owned(state.documents.as_ref(), document_id, user.id())
        .await?
        .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

    let data = state.blobs.get(&document.storage_key).await?;

    let disposition = format!("attachment; filename=\"{}\"", document.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, document.file_type.clone()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        data,
    )
        .into_response())
}

/// DELETE /api/documents/:documentId
///
/// A blob that cannot be removed is logged and left behind.
pub async fn handle_delete_document(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(document_id): PathParam<Uuid>,
) -> Result<Json<Envelope<MessageResponse>>, AppError> {
    let document = find_owned(state.documents.as_ref(), document_id, user.id())
        .await?
        .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

    state.documents.remove(document.document_id).await?;

    if let Err(e) = state.blobs.delete(&document.storage_key).await {
        warn!("Failed to delete blob {}: {e}", document.storage_key);
    }

    Ok(success(MessageResponse {
        message: "Document deleted successfully",
    }))
}
