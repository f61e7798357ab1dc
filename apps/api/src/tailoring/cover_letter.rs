//! Cover-letter generation. Never fails: any error becomes the apology text.

use tracing::warn;

use crate::llm_client::prompts::fill_template;
use crate::llm_client::{ChatModel, ChatRequest};
use crate::models::account::CandidateProfile;
use crate::models::cv_data::{CvData, JobData};
use crate::tailoring::prompts::{COVER_LETTER_PROMPT_TEMPLATE, COVER_LETTER_SYSTEM};

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 800;
pub const COVER_LETTER_APOLOGY: &str = "Unable to generate cover letter at this time.";

fn first_non_empty<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

fn join_or(items: &[String], fallback: &str) -> String {
    if items.is_empty() {
        fallback.to_string()
    } else {
        items.join(", ")
    }
}

pub fn build_cover_letter_request(
    cv: &CvData,
    job: &JobData,
    profile: &CandidateProfile,
) -> ChatRequest {
    let info = &cv.personal_info;
    let name = format!(
        "{} {}",
        first_non_empty(&info.first_name, &profile.first_name),
        first_non_empty(&info.last_name, &profile.last_name)
    );
    let experience: Vec<String> = cv
        .work_experience
        .iter()
        .map(|w| format!("{} at {}", w.position, w.company))
        .collect();

    let skills = join_or(&cv.skills, "Various skills");
    let experience = join_or(&experience, "Relevant experience");
    let job_skills = join_or(&job.skills, "Various skills");
    let responsibilities = join_or(&job.responsibilities, "Job responsibilities");

    let prompt = fill_template(
        COVER_LETTER_PROMPT_TEMPLATE,
        &[
            ("name", name.trim()),
            ("email", first_non_empty(&info.email, &profile.email)),
            ("summary", first_non_empty(&cv.summary, "Experienced professional")),
            ("skills", skills.as_str()),
            ("experience", experience.as_str()),
            ("job_title", first_non_empty(&job.job_title, "Position")),
            ("company", first_non_empty(&job.company, "Company")),
            ("job_skills", job_skills.as_str()),
            ("responsibilities", responsibilities.as_str()),
        ],
    );
    ChatRequest::new(COVER_LETTER_SYSTEM, prompt, TEMPERATURE, MAX_TOKENS)
}

pub async fn generate_cover_letter(
    model: &dyn ChatModel,
    cv: &CvData,
    job: &JobData,
    profile: &CandidateProfile,
) -> String {
    match model
        .complete(&build_cover_letter_request(cv, job, profile))
        .await
    {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            warn!("Cover letter generation returned empty text");
            COVER_LETTER_APOLOGY.to_string()
        }
        Err(e) => {
            warn!("Cover letter generation failed: {e}");
            COVER_LETTER_APOLOGY.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{transport_error, ScriptedModel};
    use crate::models::cv_data::WorkExperience;

    fn cv() -> CvData {
        CvData {
            summary: "Compiler engineer".to_string(),
            skills: vec!["COBOL".to_string(), "Leadership".to_string()],
            work_experience: vec![WorkExperience {
                company: "Navy".to_string(),
                position: "Rear Admiral".to_string(),
                ..WorkExperience::default()
            }],
            ..CvData::default()
        }
    }

    fn profile() -> CandidateProfile {
        CandidateProfile {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace@example.com".to_string(),
        }
    }

    #[tokio::test]
    async fn test_returns_trimmed_letter() {
        let model = ScriptedModel::new().reply("\n  Dear Hiring Manager,\n...\n ");
        let letter = generate_cover_letter(&model, &cv(), &JobData::default(), &profile()).await;
        assert_eq!(letter, "Dear Hiring Manager,\n...");
    }

    #[tokio::test]
    async fn test_failure_yields_apology() {
        let model = ScriptedModel::new().fail(transport_error());
        let letter = generate_cover_letter(&model, &cv(), &JobData::default(), &profile()).await;
        assert_eq!(letter, "Unable to generate cover letter at this time.");

        let model = ScriptedModel::new().reply("   ");
        let letter = generate_cover_letter(&model, &cv(), &JobData::default(), &profile()).await;
        assert_eq!(letter, COVER_LETTER_APOLOGY);
    }

    #[test]
    fn test_prompt_falls_back_to_account_and_generic_job() {
        let job = JobData::generic(&cv().skills);
        let request = build_cover_letter_request(&cv(), &job, &profile());
        let prompt = request.prompt().unwrap();
        assert!(prompt.contains("Name: Grace Hopper"));
        assert!(prompt.contains("Rear Admiral at Navy"));
        assert!(prompt.contains("Job Title: Position"));
        assert!(prompt.contains("Company: Company"));
        assert!(prompt.contains("Required Skills: COBOL, Leadership"));
        assert!(prompt.contains("Professional opportunity"));
        assert_eq!(request.temperature, 0.7);
        assert_eq!(request.max_tokens, 800);
    }

    #[test]
    fn test_placeholder_text_in_cv_fields_stays_literal() {
        let cv = CvData {
            summary: "Fluent in {skills} and {company} syntax".to_string(),
            ..cv()
        };
        let request = build_cover_letter_request(&cv, &JobData::default(), &profile());
        let prompt = request.prompt().unwrap();
        assert!(prompt.contains("Professional Summary: Fluent in {skills} and {company} syntax"));
        assert_eq!(prompt.matches("COBOL, Leadership").count(), 1);
    }
}
