pub mod extract;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::auth::handlers as auth;
use crate::cvs::handlers as cvs;
use crate::documents::handlers::{self as documents, MAX_UPLOAD_BYTES};
use crate::errors::AppError;
use crate::extraction::handlers as extraction;
use crate::state::AppState;
use crate::tailoring::handlers as tailoring;

/// Success body: `{"success": true, ...payload}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(flatten)]
    pub body: T,
}

pub fn success<T: Serialize>(body: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        body,
    })
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        // Accounts
        .route("/api/auth/register", post(auth::handle_register))
        .route("/api/auth/login", post(auth::handle_login))
        .route("/api/auth/profile", get(auth::handle_profile))
        .route("/api/auth/plan-info", get(auth::handle_plan_info))
        .route("/api/admin/users", get(auth::handle_admin_users))
        // Documents
        .route(
            "/api/documents/upload",
            post(documents::handle_upload)
                // multipart framing overhead on top of the file itself
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024)),
        )
        .route("/api/documents", get(documents::handle_list_documents))
        .route(
            "/api/documents/:documentId",
            get(documents::handle_get_document).delete(documents::handle_delete_document),
        )
        .route(
            "/api/documents/:documentId/file",
            get(documents::handle_download_document),
        )
        // Templates
        .route("/api/templates", get(cvs::handle_list_templates))
        // Extraction and tailoring
        .route(
            "/api/cv/extract-from-documents",
            post(extraction::handle_extract_from_documents),
        )
        .route("/api/cv/analyze-url", post(tailoring::handle_analyze_url))
        .route(
            "/api/cv/generate-from-url",
            post(tailoring::handle_generate_from_url),
        )
        // CVs
        .route("/api/cv/create", post(cvs::handle_create_cv))
        .route("/api/cv", get(cvs::handle_list_cvs))
        .route(
            "/api/cv/:cvId",
            get(cvs::handle_get_cv)
                .put(cvs::handle_update_cv)
                .delete(cvs::handle_delete_cv),
        )
        .route("/api/cv/:cvId/download", get(cvs::handle_download_pdf))
        .route("/api/cv/:cvId/download-jpg", get(cvs::handle_download_jpg))
        .route(
            "/api/cv/:cvId/cover-letter",
            post(tailoring::handle_cover_letter),
        )
        .fallback(route_not_found)
        .with_state(state)
}
