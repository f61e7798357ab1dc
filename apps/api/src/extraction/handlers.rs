//! Axum route handler for structured extraction from uploaded documents.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extraction::extract_structured_data;
use crate::models::cv_data::CvData;
use crate::routes::{success, Envelope};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResponse {
    pub message: &'static str,
    pub cv_data: CvData,
}

/// POST /api/cv/extract-from-documents
///
/// Nothing is stored; the client reviews the result before creating a CV.
pub async fn handle_extract_from_documents(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Envelope<ExtractionResponse>>, AppError> {
    let documents = state.documents.list_by_owner(user.id()).await?;
    if documents.is_empty() {
        return Err(AppError::Validation(
            "No documents found. Please upload some documents first.".to_string(),
        ));
    }

    let texts: Vec<String> = documents.into_iter().map(|d| d.extracted_text).collect();
    let cv_data = extract_structured_data(state.llm.as_ref(), &texts).await?;

    Ok(success(ExtractionResponse {
        message: "CV data extracted successfully",
        cv_data,
    }))
}
