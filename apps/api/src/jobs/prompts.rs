// Prompts for job-posting analysis.

pub const JOB_ANALYSIS_SYSTEM: &str = "You are a job posting analyzer. \
    Extract structured information from job postings and return valid JSON only.";

/// Placeholders: {posting}
pub const JOB_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze the following job posting content and extract structured information.
Return a JSON object with this structure:
{
  "jobTitle": "string",
  "company": "string",
  "location": "string",
  "salary": "string",
  "requirements": ["array of requirement strings"],
  "responsibilities": ["array of responsibility strings"],
  "skills": ["array of required skills"],
  "experience": "string",
  "education": "string"
}

Job posting content:
{posting}

Extract only the information that is explicitly mentioned in the job posting.
If a field is not found, use an empty string or empty array."#;
