//! CV-Data to a self-contained HTML page.
//!
//! No external assets: fonts are system fonts and all CSS is inline, so the
//! renderer needs no network access. Every user-supplied string is escaped.

use serde::Serialize;

use crate::models::cv_data::{CvData, Education, WorkExperience};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CvTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub color: &'static str,
    pub description: &'static str,
    #[serde(skip)]
    accent: &'static str,
    #[serde(skip)]
    accent_dark: &'static str,
}

pub static TEMPLATES: [CvTemplate; 4] = [
    CvTemplate {
        id: "modern",
        name: "Modern",
        color: "primary",
        description: "Clean and professional design",
        accent: "#0d6efd",
        accent_dark: "#0b5ed7",
    },
    CvTemplate {
        id: "creative",
        name: "Creative",
        color: "success",
        description: "Colorful and creative layout",
        accent: "#198754",
        accent_dark: "#146c43",
    },
    CvTemplate {
        id: "minimal",
        name: "Minimal",
        color: "secondary",
        description: "Simple and minimal design",
        accent: "#6c757d",
        accent_dark: "#565e64",
    },
    CvTemplate {
        id: "executive",
        name: "Executive",
        color: "dark",
        description: "Professional executive style",
        accent: "#212529",
        accent_dark: "#000000",
    },
];

/// Looks up a template; unknown ids get `modern`.
pub fn template_by_id(id: &str) -> &'static CvTemplate {
    TEMPLATES
        .iter()
        .find(|t| t.id == id)
        .unwrap_or(&TEMPLATES[0])
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// `start - end`, with `Present` for current roles; `period` when no dates.
fn date_range(start: &str, end: &str, current: bool, period: &str) -> String {
    let end = if current { "Present" } else { end.trim() };
    let start = start.trim();
    match (start.is_empty(), end.is_empty()) {
        (true, true) => period.trim().to_string(),
        (false, true) => start.to_string(),
        (true, false) => end.to_string(),
        (false, false) => format!("{start} - {end}"),
    }
}

fn section(title: &str, body: &str) -> String {
    format!(
        r#"<div class="cv-section"><h4 class="cv-section-title">{title}</h4>{body}</div>"#
    )
}

fn optional_line(class: &str, value: &str) -> String {
    if value.trim().is_empty() {
        String::new()
    } else {
        format!(r#"<p class="{class}">{}</p>"#, escape_html(value))
    }
}

fn work_entry(entry: &WorkExperience) -> String {
    let dates = date_range(&entry.start_date, &entry.end_date, entry.current, &entry.period);
    format!(
        r#"<div class="cv-entry"><div class="cv-entry-head"><h5 class="cv-org">{}</h5><span class="cv-period">{}</span></div><h6 class="cv-role">{}</h6>{}</div>"#,
        escape_html(&entry.company),
        escape_html(&dates),
        escape_html(&entry.position),
        optional_line("cv-description", &entry.description),
    )
}

fn education_entry(entry: &Education) -> String {
    let dates = date_range(&entry.start_date, &entry.end_date, entry.current, &entry.period);
    let gpa = if entry.gpa.trim().is_empty() {
        String::new()
    } else {
        format!("GPA: {}", entry.gpa)
    };
    format!(
        r#"<div class="cv-entry"><div class="cv-entry-head"><h5 class="cv-org">{}</h5><span class="cv-period">{}</span></div><h6 class="cv-role">{}</h6>{}{}{}</div>"#,
        escape_html(&entry.institution),
        escape_html(&dates),
        escape_html(&entry.degree),
        optional_line("cv-muted", &entry.field),
        optional_line("cv-muted", &gpa),
        optional_line("cv-description", &entry.description),
    )
}

fn badges(items: &[String]) -> String {
    let inner: String = items
        .iter()
        .map(|item| format!(r#"<span class="cv-badge">{}</span>"#, escape_html(item)))
        .collect();
    format!(r#"<div class="cv-badges">{inner}</div>"#)
}

fn styles(template: &CvTemplate) -> String {
    let accent = template.accent;
    let accent_dark = template.accent_dark;
    format!(
        r#"* {{ margin: 0; padding: 0; box-sizing: border-box; }}
body {{ font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; line-height: 1.6; color: #333; }}
.cv-container {{ max-width: 210mm; margin: 0 auto; background: #fff; }}
.cv-header {{ background: linear-gradient(135deg, {accent}, {accent_dark}); color: #fff; padding: 2rem; display: flex; gap: 2rem; }}
.cv-header-main {{ flex: 2; }}
.cv-contact {{ flex: 1; font-size: 0.95rem; }}
.cv-contact p {{ margin-bottom: 0.5rem; }}
.cv-name {{ font-size: 2.5rem; font-weight: 700; margin-bottom: 0.5rem; }}
.cv-title {{ font-size: 1.5rem; font-weight: 500; opacity: 0.9; margin-bottom: 1rem; }}
.cv-summary {{ font-size: 1.1rem; opacity: 0.95; }}
.cv-content {{ padding: 2rem; display: flex; gap: 2rem; }}
.cv-main {{ flex: 2; }}
.cv-side {{ flex: 1; }}
.cv-section {{ margin-bottom: 2rem; }}
.cv-section-title {{ font-size: 1.3rem; font-weight: 600; text-transform: uppercase; letter-spacing: 0.5px; color: {accent}; border-bottom: 2px solid {accent}; padding-bottom: 0.5rem; margin-bottom: 1rem; }}
.cv-entry {{ margin-bottom: 1.5rem; }}
.cv-entry-head {{ display: flex; justify-content: space-between; align-items: flex-start; }}
.cv-org {{ font-weight: 600; color: #2c3e50; font-size: 1.1rem; }}
.cv-role {{ font-weight: 500; color: #6c757d; font-size: 1rem; }}
.cv-period, .cv-muted {{ font-size: 0.9rem; color: #6c757d; }}
.cv-description {{ color: #495057; margin-top: 0.5rem; }}
.cv-badges {{ display: flex; flex-wrap: wrap; gap: 0.5rem; }}
.cv-badge {{ background: {accent}; color: #fff; padding: 0.5rem 1rem; border-radius: 20px; font-size: 0.9rem; font-weight: 500; }}
.cv-list {{ list-style: none; }}
.cv-list li {{ margin-bottom: 0.5rem; padding-left: 1rem; border-left: 3px solid {accent}; }}"#
    )
}

pub fn render_cv_html(cv: &CvData, template: &CvTemplate) -> String {
    let info = &cv.personal_info;
    let name = escape_html(&cv.full_name());

    let contact: String = [
        &info.email,
        &info.phone,
        &info.address,
        &info.linkedin,
        &info.website,
    ]
    .iter()
    .map(|value| optional_line("cv-contact-item", value))
    .collect();

    let mut main = String::new();
    if !cv.work_experience.is_empty() {
        let entries: String = cv.work_experience.iter().map(work_entry).collect();
        main.push_str(&section("Professional Experience", &entries));
    }
    if !cv.education.is_empty() {
        let entries: String = cv.education.iter().map(education_entry).collect();
        main.push_str(&section("Education", &entries));
    }

    let mut side = String::new();
    if !cv.skills.is_empty() {
        side.push_str(&section("Skills", &badges(&cv.skills)));
    }
    if !cv.languages.is_empty() {
        side.push_str(&section("Languages", &badges(&cv.languages)));
    }
    if !cv.certifications.is_empty() {
        let items: String = cv
            .certifications
            .iter()
            .map(|c| format!("<li>{}</li>", escape_html(c)))
            .collect();
        side.push_str(&section(
            "Certifications",
            &format!(r#"<ul class="cv-list">{items}</ul>"#),
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>CV - {name}</title>
<style>
{styles}
</style>
</head>
<body class="template-{template_id}">
<div class="cv-container">
<div class="cv-header">
<div class="cv-header-main"><h1 class="cv-name">{name}</h1>{title}{summary}</div>
<div class="cv-contact">{contact}</div>
</div>
<div class="cv-content">
<div class="cv-main">{main}</div>
<div class="cv-side">{side}</div>
</div>
</div>
</body>
</html>
"#,
        styles = styles(template),
        template_id = template.id,
        title = optional_line("cv-title", &info.title),
        summary = optional_line("cv-summary", &cv.summary),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cv_data::PersonalInfo;

    fn sample() -> CvData {
        CvData {
            personal_info: PersonalInfo {
                first_name: "Ada".to_string(),
                last_name: "<script>alert(1)</script>".to_string(),
                email: "ada@example.com".to_string(),
                ..PersonalInfo::default()
            },
            work_experience: vec![WorkExperience {
                company: "Babbage & Co".to_string(),
                position: "Analyst".to_string(),
                start_date: "1842".to_string(),
                current: true,
                ..WorkExperience::default()
            }],
            skills: vec!["Mathematics".to_string()],
            ..CvData::default()
        }
    }

    #[test]
    fn test_user_text_is_escaped() {
        let html = render_cv_html(&sample(), template_by_id("modern"));
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("Babbage &amp; Co"));
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let html = render_cv_html(&sample(), template_by_id("modern"));
        assert!(html.contains("Professional Experience"));
        assert!(html.contains("Skills"));
        assert!(!html.contains(">Education<"));
        assert!(!html.contains("Languages"));
        assert!(!html.contains("Certifications"));
    }

    #[test]
    fn test_current_role_shows_present() {
        let html = render_cv_html(&sample(), template_by_id("modern"));
        assert!(html.contains("1842 - Present"));
    }

    #[test]
    fn test_date_range_falls_back_to_period() {
        assert_eq!(date_range("", "", false, "2016 - 2020"), "2016 - 2020");
        assert_eq!(date_range("2019", "2021", false, "ignored"), "2019 - 2021");
        assert_eq!(date_range("", "", true, ""), "Present");
    }

    #[test]
    fn test_unknown_template_falls_back_to_modern() {
        assert_eq!(template_by_id("nope").id, "modern");
        assert_eq!(template_by_id("creative").accent, "#198754");
        let html = render_cv_html(&CvData::default(), template_by_id("nope"));
        assert!(html.contains("#0d6efd"));
    }

    #[test]
    fn test_no_external_assets() {
        let html = render_cv_html(&sample(), template_by_id("executive"));
        assert!(!html.contains("http://"));
        assert!(!html.contains("https://"));
        assert!(!html.contains("<link"));
    }
}
