//! Axum route handlers for CV management and downloads.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::cv::{Cv, CvSummary};
use crate::models::cv_data::CvData;
use crate::quota::check_create_allowed;
use crate::render::html::{render_cv_html, template_by_id, CvTemplate, TEMPLATES};
use crate::routes::extract::{JsonBody, PathParam};
use crate::routes::{success, Envelope, MessageResponse};
use crate::state::AppState;
use crate::store::find_owned;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCvRequest {
    pub cv_data: Option<CvData>,
    #[serde(default)]
    pub template_id: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCvRequest {
    pub cv_data: Option<CvData>,
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub templates: &'static [CvTemplate],
}

#[derive(Debug, Serialize)]
pub struct CvSavedResponse {
    pub message: &'static str,
    pub cv: CvSummary,
}

#[derive(Debug, Serialize)]
pub struct CvListResponse {
    pub cvs: Vec<CvSummary>,
}

#[derive(Debug, Serialize)]
pub struct CvResponse {
    pub cv: Cv,
}

#[derive(Debug, Clone, Copy)]
enum DownloadFormat {
    Pdf,
    Jpeg,
}

impl DownloadFormat {
    fn content_type(self) -> &'static str {
        match self {
            DownloadFormat::Pdf => "application/pdf",
            DownloadFormat::Jpeg => "image/jpeg",
        }
    }

    fn extension(self) -> &'static str {
        match self {
            DownloadFormat::Pdf => "pdf",
            DownloadFormat::Jpeg => "jpg",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            DownloadFormat::Pdf => "Failed to generate PDF",
            DownloadFormat::Jpeg => "Failed to generate JPG",
        }
    }
}

fn cv_not_found() -> AppError {
    AppError::NotFound("CV not found".to_string())
}

async fn load_owned_cv(state: &AppState, user: &AuthUser, cv_id: Uuid) -> Result<Cv, AppError> {
    find_owned(state.cvs.as_ref(), cv_id, user.id())
        .await?
        .ok_or_else(cv_not_found)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/templates
pub async fn handle_list_templates() -> Json<Envelope<TemplateListResponse>> {
    success(TemplateListResponse {
        templates: &TEMPLATES,
    })
}

/// POST /api/cv/create
///
/// Quota check and insert run under the account's creation lock.
pub async fn handle_create_cv(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(request): JsonBody<CreateCvRequest>,
) -> Result<(StatusCode, Json<Envelope<CvSavedResponse>>), AppError> {
    let title = request.title.trim();
    let template_id = request.template_id.trim();
    let cv_data = match request.cv_data {
        Some(cv_data) if !title.is_empty() && !template_id.is_empty() => cv_data,
        _ => {
            return Err(AppError::Validation(
                "CV data, template ID, and title are required".to_string(),
            ))
        }
    };

    let _guard = state.creation_locks.acquire(user.id()).await;
    check_create_allowed(state.accounts.as_ref(), state.cvs.as_ref(), user.id()).await?;

    let cv = Cv::new_custom(
        user.id(),
        title.to_string(),
        template_id.to_string(),
        cv_data,
    );
    state.cvs.append(&cv).await?;
    info!("Created custom CV {} for {}", cv.cv_id, cv.user_id);

    Ok((
        StatusCode::CREATED,
        success(CvSavedResponse {
            message: "CV created successfully",
            cv: CvSummary::from(&cv),
        }),
    ))
}

/// GET /api/cv
pub async fn handle_list_cvs(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Envelope<CvListResponse>>, AppError> {
    let cvs = state.cvs.list_by_owner(user.id()).await?;
    Ok(success(CvListResponse {
        cvs: cvs.iter().map(CvSummary::from).collect(),
    }))
}

/// GET /api/cv/:cvId
pub async fn handle_get_cv(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(cv_id): PathParam<Uuid>,
) -> Result<Json<Envelope<CvResponse>>, AppError> {
    let cv = load_owned_cv(&state, &user, cv_id).await?;
    Ok(success(CvResponse { cv }))
}

/// PUT /api/cv/:cvId
///
/// Absent or blank fields keep their stored values; `updatedAt` always moves.
pub async fn handle_update_cv(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(cv_id): PathParam<Uuid>,
    JsonBody(request): JsonBody<UpdateCvRequest>,
) -> Result<Json<Envelope<CvSavedResponse>>, AppError> {
    let mut cv = load_owned_cv(&state, &user, cv_id).await?;

    if let Some(cv_data) = request.cv_data {
        cv.cv_data = cv_data;
    }
    if let Some(title) = request.title.filter(|t| !t.trim().is_empty()) {
        cv.title = title.trim().to_string();
    }
    cv.updated_at = Utc::now();

    if !state.cvs.update(&cv).await? {
        return Err(cv_not_found());
    }

    Ok(success(CvSavedResponse {
        message: "CV updated successfully",
        cv: CvSummary::from(&cv),
    }))
}

/// DELETE /api/cv/:cvId
pub async fn handle_delete_cv(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(cv_id): PathParam<Uuid>,
) -> Result<Json<Envelope<MessageResponse>>, AppError> {
    let cv = load_owned_cv(&state, &user, cv_id).await?;
    if !state.cvs.remove(cv.cv_id).await? {
        return Err(cv_not_found());
    }
    info!("Deleted CV {} for {}", cv.cv_id, cv.user_id);

    Ok(success(MessageResponse {
        message: "CV deleted successfully",
    }))
}

/// GET /api/cv/:cvId/download
pub async fn handle_download_pdf(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(cv_id): PathParam<Uuid>,
) -> Result<Response, AppError> {
    render_download(&state, &user, cv_id, DownloadFormat::Pdf).await
}

/// GET /api/cv/:cvId/download-jpg
pub async fn handle_download_jpg(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(cv_id): PathParam<Uuid>,
) -> Result<Response, AppError> {
    render_download(&state, &user, cv_id, DownloadFormat::Jpeg).await
}

async fn render_download(
    state: &AppState,
    user: &AuthUser,
    cv_id: Uuid,
    format: DownloadFormat,
) -> Result<Response, AppError> {
    let cv = load_owned_cv(state, user, cv_id).await?;
    let html = render_cv_html(&cv.cv_data, template_by_id(&cv.template_id));

    let rendered = match format {
        DownloadFormat::Pdf => state.renderer.render_pdf(&html).await,
        DownloadFormat::Jpeg => state.renderer.render_jpeg(&html).await,
    }
    .map_err(|e| AppError::upstream(format.failure_message(), e))?;

    info!(
        "Rendered CV {} as {} ({} bytes)",
        cv.cv_id,
        format.extension(),
        rendered.len()
    );

    let disposition = format!(
        "attachment; filename=\"{}.{}\"",
        cv.download_stem(),
        format.extension()
    );
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        rendered,
    )
        .into_response())
}
