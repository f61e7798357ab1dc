//! Job-posting analyzer: URL to structured Job-Data.
//!
//! Hard-fail: fetch failures and unparseable model output are distinct errors.

pub mod fetch;
pub mod prompts;

use reqwest::Url;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::prompts::{fill_template, truncate_chars};
use crate::llm_client::{parse_json_object, ChatModel, ChatRequest, LlmError, ParseError};
use crate::models::cv_data::JobData;

use self::fetch::{parse_job_url, strip_html, FetchError, PageFetcher};
use self::prompts::{JOB_ANALYSIS_PROMPT_TEMPLATE, JOB_ANALYSIS_SYSTEM};

/// Characters of page text sent to the model.
pub const POSTING_CHAR_BUDGET: usize = 4000;
const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 1000;

#[derive(Debug, Error)]
pub enum JobAnalysisError {
    #[error("invalid job URL: {0}")]
    InvalidUrl(String),

    #[error("job page fetch failed: {0}")]
    Fetch(FetchError),

    #[error("job analysis output could not be parsed: {0}")]
    Parse(#[from] ParseError),

    #[error("job analysis model call failed: {0}")]
    Model(#[from] LlmError),
}

impl From<FetchError> for JobAnalysisError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::InvalidUrl(reason) => JobAnalysisError::InvalidUrl(reason),
            other => JobAnalysisError::Fetch(other),
        }
    }
}

pub fn build_job_analysis_request(page_text: &str) -> ChatRequest {
    let prompt = fill_template(
        JOB_ANALYSIS_PROMPT_TEMPLATE,
        &[("posting", truncate_chars(page_text, POSTING_CHAR_BUDGET))],
    );
    ChatRequest::new(JOB_ANALYSIS_SYSTEM, prompt, TEMPERATURE, MAX_TOKENS)
}

/// Validates `url`, fetches it and asks the model for structured Job-Data.
pub async fn analyze_job_posting(
    fetcher: &dyn PageFetcher,
    model: &dyn ChatModel,
    url: &str,
) -> Result<(Url, JobData), JobAnalysisError> {
    let url = parse_job_url(url)?;
    info!("Analyzing job posting at {url}");

    let html = fetcher.fetch(&url).await.map_err(|e| {
        warn!("Job page fetch failed for {url}: {e}");
        e
    })?;
    let page_text = strip_html(&html);

    let raw = model.complete(&build_job_analysis_request(&page_text)).await?;
    let job: JobData = parse_json_object(&raw).map_err(|e| {
        warn!("Job analysis output rejected: {}", e.reason);
        e
    })?;

    Ok((url, job))
}
