//! Tailored-CV synthesis. Soft-fail: an unparseable answer yields a fully
//! populated placeholder CV carrying the account's own name and email.

use tracing::warn;

use crate::llm_client::prompts::{fill_template, truncate_chars};
use crate::llm_client::{parse_json_object, ChatModel, ChatRequest, LlmError};
use crate::models::account::CandidateProfile;
use crate::models::cv_data::{CvData, Education, JobData, PersonalInfo, WorkExperience};
use crate::tailoring::prompts::{JSON_ONLY_SYSTEM, TAILORED_CV_PROMPT_TEMPLATE};
use crate::tailoring::CANDIDATE_CHAR_BUDGET;

const TEMPERATURE: f32 = 0.1;
const MAX_TOKENS: u32 = 1500;

fn or_default(value: &str, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

/// Placeholder CV returned when the model answer is not usable.
pub fn fallback_cv(profile: &CandidateProfile) -> CvData {
    CvData {
        personal_info: PersonalInfo {
            first_name: or_default(&profile.first_name, "John"),
            last_name: or_default(&profile.last_name, "Doe"),
            email: or_default(&profile.email, "user@example.com"),
            phone: "+1234567890".to_string(),
            address: "City, Country".to_string(),
            linkedin: "linkedin.com/in/user".to_string(),
            ..PersonalInfo::default()
        },
        summary: "Experienced professional with relevant skills and qualifications.".to_string(),
        work_experience: vec![WorkExperience {
            company: "Company Name".to_string(),
            position: "Professional Role".to_string(),
            period: "2020 - Present".to_string(),
            description: "Professional experience and achievements.".to_string(),
            ..WorkExperience::default()
        }],
        education: vec![Education {
            institution: "University Name".to_string(),
            degree: "Bachelor's Degree".to_string(),
            period: "2016 - 2020".to_string(),
            description: "Relevant field of study.".to_string(),
            ..Education::default()
        }],
        skills: vec![
            "Skill 1".to_string(),
            "Skill 2".to_string(),
            "Skill 3".to_string(),
        ],
        languages: vec!["English".to_string()],
        certifications: vec!["Relevant Certification".to_string()],
    }
}

pub fn build_tailored_cv_request(
    candidate_text: &str,
    job: &JobData,
    profile: &CandidateProfile,
) -> ChatRequest {
    let job_json = serde_json::to_string_pretty(job).unwrap_or_default();
    let profile_json = serde_json::to_string_pretty(profile).unwrap_or_default();
    let prompt = fill_template(
        TAILORED_CV_PROMPT_TEMPLATE,
        &[
            ("job", job_json.as_str()),
            ("profile", profile_json.as_str()),
            ("candidate", truncate_chars(candidate_text, CANDIDATE_CHAR_BUDGET)),
        ],
    );
    ChatRequest::new(JSON_ONLY_SYSTEM, prompt, TEMPERATURE, MAX_TOKENS)
}

/// Model output is returned as parsed; the extraction sanitizer is not applied.
pub async fn synthesize_tailored_cv(
    model: &dyn ChatModel,
    candidate_text: &str,
    job: &JobData,
    profile: &CandidateProfile,
) -> Result<CvData, LlmError> {
    let raw = model
        .complete(&build_tailored_cv_request(candidate_text, job, profile))
        .await?;

    match parse_json_object::<CvData>(&raw) {
        Ok(cv) => Ok(cv),
        Err(e) => {
            warn!(
                "Tailored CV output unparseable ({}), using placeholder CV. Raw: {}",
                e.reason, e.raw
            );
            Ok(fallback_cv(profile))
        }
    }
}
