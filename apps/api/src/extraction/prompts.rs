// Prompts for document-to-CV extraction.

pub const EXTRACTION_SYSTEM: &str = "You are a professional CV/resume parser. \
    Your job is to extract ONLY information that is explicitly present in the provided documents. \
    Do not make assumptions or add placeholder data. If information is not found, leave fields empty. \
    Respond with a single valid JSON object and nothing else.";

/// Placeholders: {documents}
pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"Analyze the following document content and extract CV/resume information.
Return the data as a JSON object with exactly this structure:

{
  "personalInfo": {
    "firstName": "",
    "lastName": "",
    "email": "",
    "phone": "",
    "address": "",
    "linkedin": "",
    "website": ""
  },
  "summary": "",
  "workExperience": [
    {
      "company": "",
      "position": "",
      "startDate": "",
      "endDate": "",
      "current": false,
      "description": ""
    }
  ],
  "education": [
    {
      "institution": "",
      "degree": "",
      "field": "",
      "startDate": "",
      "endDate": "",
      "current": false,
      "gpa": ""
    }
  ],
  "skills": [],
  "languages": [],
  "certifications": []
}

Document content:
{documents}

RULES:
1. Extract ONLY information that is explicitly present in the documents.
2. If a field is not found, leave it as an empty string ("") or empty array [].
3. Do NOT make up or infer information that is not directly stated.
4. Do NOT use placeholder text or default values such as "N/A" or "Unknown".
5. For arrays, only include items that are clearly mentioned.
6. Be conservative: an empty field is better than an incorrect one.
7. Respond with the JSON object only. No markdown, no commentary."#;
