//! Sanitization pass over extracted CV-Data.
//!
//! Pure and idempotent: trims every string, blanks placeholder values, drops
//! empty list items and records missing their identifying fields.

use crate::models::cv_data::{CvData, Education, PersonalInfo, WorkExperience};

/// Values the model uses when it has nothing to say. Matched case-insensitively
/// against the whole trimmed string.
pub const PLACEHOLDERS: &[&str] = &[
    "n/a",
    "not available",
    "not specified",
    "unknown",
    "none",
    "tbd",
    "to be determined",
];

pub fn clean_string(value: &str) -> String {
    let trimmed = value.trim();
    if PLACEHOLDERS.iter().any(|p| trimmed.eq_ignore_ascii_case(p)) {
        String::new()
    } else {
        trimmed.to_string()
    }
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .iter()
        .map(|item| clean_string(item))
        .filter(|item| !item.is_empty())
        .collect()
}

fn clean_personal_info(info: PersonalInfo) -> PersonalInfo {
    PersonalInfo {
        first_name: clean_string(&info.first_name),
        last_name: clean_string(&info.last_name),
        email: clean_string(&info.email),
        phone: clean_string(&info.phone),
        address: clean_string(&info.address),
        linkedin: clean_string(&info.linkedin),
        website: clean_string(&info.website),
        title: clean_string(&info.title),
    }
}

fn clean_work(entry: WorkExperience) -> Option<WorkExperience> {
    let company = clean_string(&entry.company);
    let position = clean_string(&entry.position);
    if company.is_empty() || position.is_empty() {
        return None;
    }
    Some(WorkExperience {
        company,
        position,
        start_date: clean_string(&entry.start_date),
        end_date: clean_string(&entry.end_date),
        period: clean_string(&entry.period),
        current: entry.current,
        description: clean_string(&entry.description),
    })
}

fn clean_education(entry: Education) -> Option<Education> {
    let institution = clean_string(&entry.institution);
    let degree = clean_string(&entry.degree);
    if institution.is_empty() || degree.is_empty() {
        return None;
    }
    Some(Education {
        institution,
        degree,
        field: clean_string(&entry.field),
        start_date: clean_string(&entry.start_date),
        end_date: clean_string(&entry.end_date),
        period: clean_string(&entry.period),
        current: entry.current,
        gpa: clean_string(&entry.gpa),
        description: clean_string(&entry.description),
    })
}

pub fn sanitize_cv_data(cv: CvData) -> CvData {
    CvData {
        personal_info: clean_personal_info(cv.personal_info),
        summary: clean_string(&cv.summary),
        work_experience: cv.work_experience.into_iter().filter_map(clean_work).collect(),
        education: cv.education.into_iter().filter_map(clean_education).collect(),
        skills: clean_list(cv.skills),
        languages: clean_list(cv.languages),
        certifications: clean_list(cv.certifications),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn work(company: &str, position: &str) -> WorkExperience {
        WorkExperience {
            company: company.to_string(),
            position: position.to_string(),
            ..WorkExperience::default()
        }
    }

    fn messy() -> CvData {
        CvData {
            personal_info: PersonalInfo {
                first_name: "  Ada ".to_string(),
                phone: "N/A".to_string(),
                website: "Not Specified".to_string(),
                title: "Senior Engineer".to_string(),
                ..PersonalInfo::default()
            },
            summary: " TBD ".to_string(),
            work_experience: vec![
                work("", "Engineer"),
                work("Acme", "Engineer"),
                work("unknown", "Lead"),
            ],
            education: vec![
                Education {
                    institution: "MIT".to_string(),
                    degree: "none".to_string(),
                    ..Education::default()
                },
                Education {
                    institution: "MIT".to_string(),
                    degree: "BSc".to_string(),
                    gpa: "n/a".to_string(),
                    ..Education::default()
                },
            ],
            skills: vec!["Rust".to_string(), " ".to_string(), "None".to_string()],
            languages: vec!["English ".to_string()],
            certifications: vec!["to be determined".to_string()],
        }
    }

    #[test]
    fn test_clean_string_blanks_placeholders() {
        assert_eq!(clean_string("N/A"), "");
        assert_eq!(clean_string("Not Specified"), "");
        assert_eq!(clean_string("  unknown  "), "");
        assert_eq!(clean_string("Senior Engineer"), "Senior Engineer");
        assert_eq!(clean_string(" None of the above "), "None of the above");
    }

    #[test]
    fn test_sanitize_filters_records_and_lists() {
        let cv = sanitize_cv_data(messy());
        assert_eq!(cv.personal_info.first_name, "Ada");
        assert_eq!(cv.personal_info.phone, "");
        assert_eq!(cv.personal_info.website, "");
        assert_eq!(cv.personal_info.title, "Senior Engineer");
        assert_eq!(cv.summary, "");
        assert_eq!(cv.work_experience, vec![work("Acme", "Engineer")]);
        assert_eq!(cv.education.len(), 1);
        assert_eq!(cv.education[0].degree, "BSc");
        assert_eq!(cv.education[0].gpa, "");
        assert_eq!(cv.skills, vec!["Rust"]);
        assert_eq!(cv.languages, vec!["English"]);
        assert!(cv.certifications.is_empty());
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let once = sanitize_cv_data(messy());
        let twice = sanitize_cv_data(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_sanitize_keeps_current_flag() {
        let mut entry = work("Acme", "Engineer");
        entry.current = true;
        let cv = sanitize_cv_data(CvData {
            work_experience: vec![entry],
            ..CvData::default()
        });
        assert!(cv.work_experience[0].current);
    }
}
