//! Compatibility Scoring: candidate text vs Job-Data via the model.
//!
//! Soft-fail: an unparseable answer yields the neutral result, only transport
//! errors propagate.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm_client::prompts::{fill_template, truncate_chars};
use crate::llm_client::{parse_json_object, ChatModel, ChatRequest, LlmError};
use crate::models::cv_data::JobData;
use crate::models::lenient;
use crate::tailoring::prompts::{COMPATIBILITY_PROMPT_TEMPLATE, JSON_ONLY_SYSTEM};
use crate::tailoring::CANDIDATE_CHAR_BUDGET;

const TEMPERATURE: f32 = 0.1;
const MAX_TOKENS: u32 = 800;
const NEUTRAL_SCORE: u8 = 50;
pub const PARSE_FAILURE_RECOMMENDATION: &str =
    "Unable to analyze compatibility due to parsing error";

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// Per-dimension match percentages, each 0–100.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScores {
    #[serde(default, deserialize_with = "lenient::percentage")]
    pub skills: u8,
    #[serde(default, deserialize_with = "lenient::percentage")]
    pub experience: u8,
    #[serde(default, deserialize_with = "lenient::percentage")]
    pub education: u8,
    #[serde(default, deserialize_with = "lenient::percentage")]
    pub responsibilities: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityResult {
    #[serde(default, deserialize_with = "lenient::percentage")]
    pub overall_match: u8,
    #[serde(default, deserialize_with = "lenient::record")]
    pub categories: CategoryScores,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub matched_skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub missing_skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub recommendations: Vec<String>,
}

impl CompatibilityResult {
    /// Deterministic result used when the model answer cannot be parsed.
    pub fn neutral() -> Self {
        CompatibilityResult {
            overall_match: NEUTRAL_SCORE,
            categories: CategoryScores {
                skills: NEUTRAL_SCORE,
                experience: NEUTRAL_SCORE,
                education: NEUTRAL_SCORE,
                responsibilities: NEUTRAL_SCORE,
            },
            matched_skills: vec![],
            missing_skills: vec![],
            recommendations: vec![PARSE_FAILURE_RECOMMENDATION.to_string()],
        }
    }

    /// Trims and de-duplicates skill lists ignoring case (first spelling wins)
    /// and removes matched skills from the missing list.
    pub fn normalize(mut self) -> Self {
        self.matched_skills = dedupe_case_insensitive(&self.matched_skills);
        let matched: HashSet<String> = self
            .matched_skills
            .iter()
            .map(|s| s.to_lowercase())
            .collect();
        self.missing_skills = dedupe_case_insensitive(&self.missing_skills)
            .into_iter()
            .filter(|s| !matched.contains(&s.to_lowercase()))
            .collect();
        self
    }
}

fn dedupe_case_insensitive(items: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(s.to_lowercase()))
        .map(str::to_string)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

pub fn build_compatibility_request(candidate_text: &str, job: &JobData) -> ChatRequest {
    let job_json = serde_json::to_string_pretty(job).unwrap_or_default();
    let prompt = fill_template(
        COMPATIBILITY_PROMPT_TEMPLATE,
        &[
            ("candidate", truncate_chars(candidate_text, CANDIDATE_CHAR_BUDGET)),
            ("job", job_json.as_str()),
        ],
    );
    ChatRequest::new(JSON_ONLY_SYSTEM, prompt, TEMPERATURE, MAX_TOKENS)
}

pub async fn score_compatibility(
    model: &dyn ChatModel,
    candidate_text: &str,
    job: &JobData,
) -> Result<CompatibilityResult, LlmError> {
    let raw = model
        .complete(&build_compatibility_request(candidate_text, job))
        .await?;

    match parse_json_object::<CompatibilityResult>(&raw) {
        Ok(result) => Ok(result.normalize()),
        Err(e) => {
            warn!(
                "Compatibility output unparseable ({}), using neutral result. Raw: {}",
                e.reason, e.raw
            );
            Ok(CompatibilityResult::neutral())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{transport_error, ScriptedModel};

    fn job() -> JobData {
        JobData {
            job_title: "Backend Engineer".to_string(),
            skills: vec!["Rust".to_string(), "SQL".to_string()],
            ..JobData::default()
        }
    }

    #[tokio::test]
    async fn test_parses_and_clamps_scores() {
        let model = ScriptedModel::new().reply(
            r#"{"overallMatch": 82.4, "categories": {"skills": 120, "experience": "70%",
                "education": -3, "responsibilities": 64},
                "matchedSkills": ["Rust"], "missingSkills": ["SQL"],
                "recommendations": ["Highlight SQL work"]}"#,
        );
        let result = score_compatibility(&model, "Rust developer", &job())
            .await
            .unwrap();
        assert_eq!(result.overall_match, 82);
        assert_eq!(result.categories.skills, 100);
        assert_eq!(result.categories.experience, 70);
        assert_eq!(result.categories.education, 0);
        assert_eq!(result.matched_skills, vec!["Rust"]);
        assert_eq!(result.missing_skills, vec!["SQL"]);
    }

    #[tokio::test]
    async fn test_malformed_output_yields_neutral_result() {
        for garbage in ["not json", "[1,2]", "{\"overallMatch\": ", ""] {
            let model = ScriptedModel::new().reply(garbage);
            let result = score_compatibility(&model, "text", &job()).await.unwrap();
            assert_eq!(result, CompatibilityResult::neutral());
        }
    }

    #[test]
    fn test_neutral_result_values() {
        let neutral = CompatibilityResult::neutral();
        assert_eq!(neutral.overall_match, 50);
        assert_eq!(neutral.categories.skills, 50);
        assert_eq!(neutral.categories.responsibilities, 50);
        assert!(neutral.matched_skills.is_empty());
        assert!(neutral.missing_skills.is_empty());
        assert_eq!(
            neutral.recommendations,
            vec!["Unable to analyze compatibility due to parsing error"]
        );
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let model = ScriptedModel::new().fail(transport_error());
        assert!(score_compatibility(&model, "text", &job()).await.is_err());
    }

    #[test]
    fn test_normalize_dedupes_and_removes_matched_from_missing() {
        let result = CompatibilityResult {
            matched_skills: vec!["Rust".into(), " rust ".into(), "Docker".into()],
            missing_skills: vec!["RUST".into(), "Kubernetes".into(), "kubernetes".into()],
            ..CompatibilityResult::default()
        }
        .normalize();
        assert_eq!(result.matched_skills, vec!["Rust", "Docker"]);
        assert_eq!(result.missing_skills, vec!["Kubernetes"]);
    }

    #[test]
    fn test_request_truncates_candidate_text() {
        let long = "y".repeat(CANDIDATE_CHAR_BUDGET + 100);
        let request = build_compatibility_request(&long, &job());
        let prompt = request.prompt().unwrap();
        assert!(prompt.contains(&"y".repeat(CANDIDATE_CHAR_BUDGET)));
        assert!(!prompt.contains(&"y".repeat(CANDIDATE_CHAR_BUDGET + 1)));
        assert!(prompt.contains("\"jobTitle\": \"Backend Engineer\""));
        assert_eq!(request.temperature, 0.1);
        assert_eq!(request.max_tokens, 800);
    }

    #[test]
    fn test_placeholder_text_in_documents_stays_literal() {
        let request = build_compatibility_request("Built a parser for {job} strings", &job());
        let prompt = request.prompt().unwrap();
        assert!(prompt.contains("Built a parser for {job} strings"));
        assert_eq!(prompt.matches("\"jobTitle\": \"Backend Engineer\"").count(), 1);
    }
}
