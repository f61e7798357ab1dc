//! Extraction pipeline: uploaded document text to sanitized CV-Data.
//!
//! Hard-fail: an unparseable model answer is an error, never a fabricated CV.

pub mod handlers;
pub mod prompts;
pub mod sanitize;

use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::prompts::{fill_template, truncate_chars};
use crate::llm_client::{parse_json_object, ChatModel, ChatRequest, LlmError, ParseError};
use crate::models::cv_data::CvData;
use crate::models::document::EXTRACTION_FAILED;

use self::prompts::{EXTRACTION_PROMPT_TEMPLATE, EXTRACTION_SYSTEM};
pub use self::sanitize::sanitize_cv_data;

/// Characters of combined document text sent to the model.
pub const EXTRACTION_CHAR_BUDGET: usize = 12_000;
const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 2000;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("extraction output could not be parsed: {0}")]
    Parse(#[from] ParseError),

    #[error("extraction model call failed: {0}")]
    Model(#[from] LlmError),
}

/// Joins document texts in upload order, skipping failed extractions, and
/// truncates to the extraction budget.
pub fn combine_document_texts<S: AsRef<str>>(texts: &[S]) -> String {
    let joined = texts
        .iter()
        .map(|text| text.as_ref())
        .filter(|text| {
            let text = text.trim();
            !text.is_empty() && text != EXTRACTION_FAILED
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    truncate_chars(&joined, EXTRACTION_CHAR_BUDGET).to_string()
}

pub fn build_extraction_request(texts: &[String]) -> ChatRequest {
    let documents = combine_document_texts(texts);
    let prompt = fill_template(EXTRACTION_PROMPT_TEMPLATE, &[("documents", documents.as_str())]);
    ChatRequest::new(EXTRACTION_SYSTEM, prompt, TEMPERATURE, MAX_TOKENS)
}

pub async fn extract_structured_data(
    model: &dyn ChatModel,
    texts: &[String],
) -> Result<CvData, ExtractionError> {
    info!("Extracting CV data from {} document(s)", texts.len());

    let raw = model.complete(&build_extraction_request(texts)).await?;

    let parsed: CvData = parse_json_object(&raw).map_err(|e| {
        warn!("Extraction output rejected: {}", e.reason);
        e
    })?;

    Ok(sanitize_cv_data(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{transport_error, ScriptedModel};

    #[test]
    fn test_combine_skips_sentinel_and_joins_with_blank_line() {
        let texts = vec![
            "First doc".to_string(),
            EXTRACTION_FAILED.to_string(),
            "Second doc".to_string(),
        ];
        assert_eq!(combine_document_texts(&texts), "First doc\n\nSecond doc");
    }

    #[test]
    fn test_combine_truncates_to_budget() {
        let texts = vec!["a".repeat(EXTRACTION_CHAR_BUDGET + 500)];
        assert_eq!(
            combine_document_texts(&texts).chars().count(),
            EXTRACTION_CHAR_BUDGET
        );
    }

    #[test]
    fn test_request_settings() {
        let request = build_extraction_request(&["Resume body".to_string()]);
        assert_eq!(request.temperature, 0.3);
        assert_eq!(request.max_tokens, 2000);
        let prompt = request.prompt().unwrap();
        assert!(prompt.contains("Resume body"));
        assert!(!prompt.contains("{documents}"));
    }

    #[tokio::test]
    async fn test_extract_sanitizes_model_output() {
        let model = ScriptedModel::new().reply(
            r#"```json
            {"personalInfo": {"firstName": "Ada", "phone": "N/A"},
             "workExperience": [{"company": "", "position": "Engineer"},
                                {"company": "Acme", "position": "Engineer"}],
             "skills": ["Rust", "unknown"]}
            ```"#,
        );
        let cv = extract_structured_data(&model, &["text".to_string()])
            .await
            .unwrap();
        assert_eq!(cv.personal_info.first_name, "Ada");
        assert_eq!(cv.personal_info.phone, "");
        assert_eq!(cv.work_experience.len(), 1);
        assert_eq!(cv.skills, vec!["Rust"]);
    }

    #[tokio::test]
    async fn test_extract_parse_failure_is_error() {
        let model = ScriptedModel::new().reply("I could not find a CV here.");
        let err = extract_structured_data(&model, &["text".to_string()])
            .await
            .unwrap_err();
        match err {
            ExtractionError::Parse(e) => assert_eq!(e.raw, "I could not find a CV here."),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_extract_model_failure_is_distinct() {
        let model = ScriptedModel::new().fail(transport_error());
        let err = extract_structured_data(&model, &["text".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Model(_)));
    }
}
