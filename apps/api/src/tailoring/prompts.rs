// Prompts for job tailoring: compatibility, tailored CV and cover letter.

pub use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

/// Placeholders: {candidate}, {job}
pub const COMPATIBILITY_PROMPT_TEMPLATE: &str = r#"You are a CV-job compatibility analyzer. Analyze the compatibility between a candidate's profile and a job posting.

IMPORTANT: Respond with ONLY a valid JSON object. No explanations, text, or markdown formatting.

Candidate's profile (from uploaded documents):
{candidate}

Job requirements:
{job}

Return ONLY a JSON object with this exact structure:
{
  "overallMatch": 85,
  "categories": {
    "skills": 90,
    "experience": 75,
    "education": 80,
    "responsibilities": 85
  },
  "matchedSkills": ["skill1", "skill2"],
  "missingSkills": ["skill3", "skill4"],
  "recommendations": ["recommendation1", "recommendation2"]
}

All scores are integers from 0 to 100 based on the actual content. Match skills case-insensitively."#;

/// Placeholders: {job}, {candidate}, {profile}
pub const TAILORED_CV_PROMPT_TEMPLATE: &str = r#"You are a CV generation assistant. Create tailored CV data from a candidate's documents for the job below.

IMPORTANT: Respond with ONLY a valid JSON object. No explanations, text, or markdown formatting.

Job posting data:
{job}

Candidate's documents:
{candidate}

Account holder:
{profile}

Return ONLY a JSON object with this exact structure:
{
  "personalInfo": {
    "firstName": "string",
    "lastName": "string",
    "email": "string",
    "phone": "string",
    "address": "string",
    "linkedin": "string"
  },
  "summary": "string",
  "workExperience": [
    {"company": "string", "position": "string", "period": "string", "description": "string"}
  ],
  "education": [
    {"institution": "string", "degree": "string", "period": "string", "description": "string"}
  ],
  "skills": ["array of skills"],
  "languages": ["array of languages"],
  "certifications": ["array of certifications"]
}

Use the candidate's documents and emphasize what matches the job requirements."#;

pub const COVER_LETTER_SYSTEM: &str = "You are a professional career advisor and cover letter writer. \
    Write compelling, personalized cover letters that match the candidate's qualifications \
    with the job requirements. Respond with the letter text only.";

/// Placeholders: {name}, {email}, {summary}, {skills}, {experience},
/// {job_title}, {company}, {job_skills}, {responsibilities}
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Write a professional cover letter for a job application based on the following information.

Candidate:
- Name: {name}
- Email: {email}
- Professional Summary: {summary}
- Key Skills: {skills}
- Work Experience: {experience}

Job:
- Job Title: {job_title}
- Company: {company}
- Required Skills: {job_skills}
- Responsibilities: {responsibilities}

The letter must:
1. Address the hiring manager professionally
2. Explain why the candidate is interested in the position
3. Highlight relevant skills and experience from the CV
4. Show enthusiasm for the company and role
5. End with a call to action for an interview

Keep it professional and concise (around 300-400 words)."#;
