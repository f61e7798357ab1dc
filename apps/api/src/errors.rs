use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::documents::blob::BlobError;
use crate::extraction::ExtractionError;
use crate::jobs::JobAnalysisError;
use crate::llm_client::LlmError;
use crate::models::account::PlanTier;
use crate::render::renderer::RenderError;
use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("CV limit reached ({current}/{limit} on {plan})")]
    QuotaExceeded {
        current: usize,
        limit: u32,
        plan: PlanTier,
    },

    /// The model answered with something unusable. `raw` is logged, never returned.
    #[error("Upstream parse error: {message}")]
    UpstreamParse { message: String, raw: String },

    /// A dependency (model, job site, renderer) failed. `detail` is logged only.
    #[error("Upstream error: {message} ({detail})")]
    Upstream { message: String, detail: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Blob store error: {0}")]
    Blob(#[from] BlobError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn upstream(message: &str, detail: impl std::fmt::Display) -> Self {
        AppError::Upstream {
            message: message.to_string(),
            detail: detail.to_string(),
        }
    }

    pub fn quota_message(current: usize, limit: u32, plan: PlanTier) -> String {
        format!(
            "CV limit reached. You have used {current}/{limit} CVs on your {plan} plan. \
             Please upgrade to create more CVs."
        )
    }
}

impl From<LlmError> for AppError {
    fn from(e: LlmError) -> Self {
        AppError::upstream("An AI processing error occurred", e)
    }
}

impl From<ExtractionError> for AppError {
    fn from(e: ExtractionError) -> Self {
        match e {
            ExtractionError::Parse(parse) => AppError::UpstreamParse {
                message: "Failed to parse extracted data".to_string(),
                raw: parse.raw,
            },
            ExtractionError::Model(model) => {
                AppError::upstream("Failed to extract CV data from documents", model)
            }
        }
    }
}

impl From<JobAnalysisError> for AppError {
    fn from(e: JobAnalysisError) -> Self {
        match e {
            JobAnalysisError::InvalidUrl(reason) => {
                AppError::Validation(format!("A valid http(s) job URL is required: {reason}"))
            }
            JobAnalysisError::Fetch(fetch) => {
                AppError::upstream("Failed to extract content from URL", fetch)
            }
            JobAnalysisError::Parse(parse) => AppError::UpstreamParse {
                message: "Failed to analyze job posting".to_string(),
                raw: parse.raw,
            },
            JobAnalysisError::Model(model) => {
                AppError::upstream("Failed to analyze job posting", model)
            }
        }
    }
}

impl From<RenderError> for AppError {
    fn from(e: RenderError) -> Self {
        AppError::upstream("Failed to render CV", e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("Rejected path parameter: {}", rejection.body_text());
        AppError::NotFound("Resource not found".to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            AppError::QuotaExceeded {
                current,
                limit,
                plan,
            } => (
                StatusCode::FORBIDDEN,
                "QUOTA_EXCEEDED",
                AppError::quota_message(*current, *limit, *plan),
            ),
            AppError::UpstreamParse { message, raw } => {
                tracing::error!("{message}. Raw model output: {raw}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_PARSE_ERROR",
                    message.clone(),
                )
            }
            AppError::Upstream { message, detail } => {
                tracing::error!("{message}: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_ERROR",
                    message.clone(),
                )
            }
            AppError::Store(e) => {
                tracing::error!("Store error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Blob(e) => {
                tracing::error!("Blob store error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A file storage error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "message": message,
            "code": code
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::ParseError;

    async fn body_of(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_quota_error_envelope() {
        let (status, body) = body_of(AppError::QuotaExceeded {
            current: 15,
            limit: 15,
            plan: PlanTier::Basic,
        })
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "QUOTA_EXCEEDED");
        assert_eq!(
            body["message"],
            "CV limit reached. You have used 15/15 CVs on your Basic plan. Please upgrade to create more CVs."
        );
    }

    #[tokio::test]
    async fn test_parse_error_hides_raw_output() {
        let error = AppError::from(ExtractionError::Parse(ParseError {
            reason: "expected value".to_string(),
            raw: "secret model rambling".to_string(),
        }));
        let (status, body) = body_of(error).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Failed to parse extracted data");
        assert!(!body.to_string().contains("rambling"));
    }

    #[tokio::test]
    async fn test_invalid_job_url_is_validation_error() {
        let (status, body) = body_of(AppError::from(JobAnalysisError::InvalidUrl(
            "relative URL without a base".to_string(),
        )))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }
}
