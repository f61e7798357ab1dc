//! Axum route handlers for job-posting analysis, tailored CV generation and
//! cover letters.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::jobs::analyze_job_posting;
use crate::models::account::Account;
use crate::models::cv::{Cv, CvType};
use crate::models::cv_data::JobData;
use crate::models::document::Document;
use crate::quota::check_create_allowed;
use crate::routes::extract::{JsonBody, PathParam};
use crate::routes::{success, Envelope};
use crate::state::AppState;
use crate::store::find_owned;
use crate::tailoring::candidate_text;
use crate::tailoring::compatibility::{score_compatibility, CompatibilityResult};
use crate::tailoring::cover_letter::generate_cover_letter;
use crate::tailoring::synthesizer::synthesize_tailored_cv;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeUrlRequest {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateFromUrlRequest {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub template_id: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeUrlResponse {
    pub job_data: JobData,
    pub compatibility: CompatibilityResult,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct GeneratedCvResponse {
    pub message: &'static str,
    pub cv: Cv,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterResponse {
    pub cover_letter: String,
}

async fn require_documents(state: &AppState, user: &AuthUser) -> Result<Vec<Document>, AppError> {
    let documents = state.documents.list_by_owner(user.id()).await?;
    if documents.is_empty() {
        return Err(AppError::Validation(
            "No documents uploaded. Please upload documents first.".to_string(),
        ));
    }
    Ok(documents)
}

async fn load_account(state: &AppState, user: &AuthUser) -> Result<Account, AppError> {
    state
        .accounts
        .find_by_id(user.id())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/cv/analyze-url
///
/// Fetches and analyzes the posting, then scores the uploaded documents
/// against it. Nothing is stored.
pub async fn handle_analyze_url(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(request): JsonBody<AnalyzeUrlRequest>,
) -> Result<Json<Envelope<AnalyzeUrlResponse>>, AppError> {
    let url = request.url.trim();
    if url.is_empty() {
        return Err(AppError::Validation("URL is required".to_string()));
    }
    let documents = require_documents(&state, &user).await?;

    let (url, job_data) =
        analyze_job_posting(state.fetcher.as_ref(), state.llm.as_ref(), url).await?;
    let compatibility =
        score_compatibility(state.llm.as_ref(), &candidate_text(&documents), &job_data).await?;

    info!(
        "Analyzed {url} for {}: {}% overall match",
        user.id(),
        compatibility.overall_match
    );

    Ok(success(AnalyzeUrlResponse {
        job_data,
        compatibility,
        url: url.to_string(),
    }))
}

/// POST /api/cv/generate-from-url
///
/// Quota is checked before any model call. The creation lock is held until
/// the new CV is stored.
pub async fn handle_generate_from_url(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(request): JsonBody<GenerateFromUrlRequest>,
) -> Result<(StatusCode, Json<Envelope<GeneratedCvResponse>>), AppError> {
    let url = request.url.trim();
    let template_id = request.template_id.trim();
    let title = request.title.trim();
    if url.is_empty() || template_id.is_empty() || title.is_empty() {
        return Err(AppError::Validation(
            "URL, template ID, and title are required".to_string(),
        ));
    }
    let documents = require_documents(&state, &user).await?;
    let account = load_account(&state, &user).await?;

    let _guard = state.creation_locks.acquire(user.id()).await;
    check_create_allowed(state.accounts.as_ref(), state.cvs.as_ref(), user.id()).await?;

    let (url, job_data) =
        analyze_job_posting(state.fetcher.as_ref(), state.llm.as_ref(), url).await?;
    let cv_data = synthesize_tailored_cv(
        state.llm.as_ref(),
        &candidate_text(&documents),
        &job_data,
        &account.profile(),
    )
    .await?;

    let cv = Cv::new_job_related(
        user.id(),
        title.to_string(),
        template_id.to_string(),
        cv_data,
        job_data,
        url.to_string(),
    );
    state.cvs.append(&cv).await?;
    info!("Created job-related CV {} for {} from {url}", cv.cv_id, cv.user_id);

    Ok((
        StatusCode::CREATED,
        success(GeneratedCvResponse {
            message: "CV generated successfully",
            cv,
        }),
    ))
}

/// POST /api/cv/:cvId/cover-letter
///
/// Custom CVs get a letter against a generic posting built from their skills.
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(cv_id): PathParam<Uuid>,
) -> Result<Json<Envelope<CoverLetterResponse>>, AppError> {
    let cv = find_owned(state.cvs.as_ref(), cv_id, user.id())
        .await?
        .ok_or_else(|| AppError::NotFound("CV not found".to_string()))?;
    let account = load_account(&state, &user).await?;

    let job = match (&cv.cv_type, &cv.job_data) {
        (CvType::JobRelated, Some(job)) => job.clone(),
        _ => JobData::generic(&cv.cv_data.skills),
    };

    let cover_letter =
        generate_cover_letter(state.llm.as_ref(), &cv.cv_data, &job, &account.profile()).await;

    Ok(success(CoverLetterResponse { cover_letter }))
}
