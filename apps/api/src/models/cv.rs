use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::cv_data::{CvData, JobData};
use crate::store::Record;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CvType {
    #[default]
    Custom,
    JobRelated,
}

/// A CV owned by one account, either hand-built or tailored to a job posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cv {
    pub cv_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub template_id: String,
    pub cv_data: CvData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_data: Option<JobData>,
    #[serde(default)]
    pub cv_type: CvType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cv {
    pub fn new_custom(user_id: Uuid, title: String, template_id: String, cv_data: CvData) -> Self {
        let now = Utc::now();
        Cv {
            cv_id: Uuid::new_v4(),
            user_id,
            title,
            template_id,
            cv_data,
            job_data: None,
            cv_type: CvType::Custom,
            url: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn new_job_related(
        user_id: Uuid,
        title: String,
        template_id: String,
        cv_data: CvData,
        job_data: JobData,
        url: String,
    ) -> Self {
        Cv {
            job_data: Some(job_data),
            cv_type: CvType::JobRelated,
            url: Some(url),
            ..Cv::new_custom(user_id, title, template_id, cv_data)
        }
    }

    /// Title reduced to `[A-Za-z0-9_]` for use as a download file name.
    pub fn download_stem(&self) -> String {
        self.title
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    }
}

impl Record for Cv {
    const COLLECTION: &'static str = "cvs";

    fn id(&self) -> Uuid {
        self.cv_id
    }

    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

/// List-view projection without the CV body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CvSummary {
    pub cv_id: Uuid,
    pub title: String,
    pub template_id: String,
    pub cv_type: CvType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Cv> for CvSummary {
    fn from(cv: &Cv) -> Self {
        CvSummary {
            cv_id: cv.cv_id,
            title: cv.title.clone(),
            template_id: cv.template_id.clone(),
            cv_type: cv.cv_type,
            created_at: cv.created_at,
            updated_at: cv.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cv_type_wire_names() {
        assert_eq!(serde_json::to_string(&CvType::Custom).unwrap(), r#""custom""#);
        assert_eq!(
            serde_json::to_string(&CvType::JobRelated).unwrap(),
            r#""job-related""#
        );
    }

    #[test]
    fn test_missing_cv_type_reads_as_custom() {
        let json = serde_json::json!({
            "cvId": Uuid::new_v4(),
            "userId": Uuid::new_v4(),
            "title": "Legacy",
            "templateId": "modern",
            "cvData": {},
            "createdAt": Utc::now(),
            "updatedAt": Utc::now()
        });
        let cv: Cv = serde_json::from_value(json).unwrap();
        assert_eq!(cv.cv_type, CvType::Custom);
        assert!(cv.job_data.is_none());
    }

    #[test]
    fn test_download_stem_replaces_non_alphanumerics() {
        let cv = Cv::new_custom(
            Uuid::new_v4(),
            "Senior Dev @ Acme (2024)".to_string(),
            "modern".to_string(),
            CvData::default(),
        );
        assert_eq!(cv.download_stem(), "Senior_Dev___Acme__2024_");
    }

    #[test]
    fn test_job_related_constructor_sets_tag_and_url() {
        let cv = Cv::new_job_related(
            Uuid::new_v4(),
            "Tailored".to_string(),
            "creative".to_string(),
            CvData::default(),
            JobData::default(),
            "https://jobs.example.com/1".to_string(),
        );
        assert_eq!(cv.cv_type, CvType::JobRelated);
        assert_eq!(cv.url.as_deref(), Some("https://jobs.example.com/1"));
        assert!(cv.job_data.is_some());
    }
}
