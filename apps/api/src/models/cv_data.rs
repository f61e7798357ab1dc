//! CV-Data and Job-Data value objects.
//!
//! Both are produced by the model and by clients, so every field is optional on
//! the wire and coerced through `models::lenient`. Serialization is camelCase to
//! match the frontend contract.

use serde::{Deserialize, Serialize};

use crate::models::lenient;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(default, deserialize_with = "lenient::string")]
    pub first_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub last_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub address: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub linkedin: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub website: String,
    /// Professional headline shown under the name.
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    #[serde(default, deserialize_with = "lenient::string")]
    pub company: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub position: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub start_date: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub end_date: String,
    /// Free-text date range ("2020 - Present"), used when start/end are absent.
    #[serde(default, deserialize_with = "lenient::string")]
    pub period: String,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub current: bool,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(default, deserialize_with = "lenient::string")]
    pub institution: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub degree: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub field: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub start_date: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub end_date: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub period: String,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub current: bool,
    #[serde(default, deserialize_with = "lenient::string")]
    pub gpa: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
}

/// Structured résumé content. Ordered lists keep the order the source gave them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvData {
    #[serde(default, deserialize_with = "lenient::record")]
    pub personal_info: PersonalInfo,
    #[serde(default, deserialize_with = "lenient::string")]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient::records")]
    pub work_experience: Vec<WorkExperience>,
    #[serde(default, deserialize_with = "lenient::records")]
    pub education: Vec<Education>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub languages: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub certifications: Vec<String>,
}

impl CvData {
    pub fn full_name(&self) -> String {
        format!(
            "{} {}",
            self.personal_info.first_name, self.personal_info.last_name
        )
        .trim()
        .to_string()
    }
}

/// Structured requirements extracted from a job posting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobData {
    #[serde(default, deserialize_with = "lenient::string")]
    pub job_title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub company: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub location: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub salary: String,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub requirements: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub responsibilities: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub skills: Vec<String>,
    /// Experience expectations as stated in the posting.
    #[serde(default, deserialize_with = "lenient::string")]
    pub experience: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub education: String,
}

impl JobData {
    /// Stand-in posting used when a cover letter is requested for a custom CV.
    pub fn generic(skills: &[String]) -> Self {
        JobData {
            job_title: "Position".to_string(),
            company: "Company".to_string(),
            skills: skills.to_vec(),
            responsibilities: vec!["Professional opportunity".to_string()],
            ..JobData::default()
        }
    }
}
