// Shared prompt constants.
// Each pipeline that calls the model defines its own prompts.rs alongside it.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a JSON-only response bot. \
    You must respond with ONLY valid JSON objects. \
    Never include explanations, text, or markdown formatting in your responses.";

/// Truncates `text` to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Fills `{name}` placeholders in one left-to-right pass.
///
/// Substituted values are never rescanned, so a value containing `{job}` stays
/// literal. Braces that do not name a known placeholder are kept as-is.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let candidate = &rest[start + 1..];
        let matched = values.iter().find_map(|(name, value)| {
            candidate
                .strip_prefix(*name)
                .and_then(|tail| tail.strip_prefix('}'))
                .map(|tail| (*value, tail))
        });
        match matched {
            Some((value, tail)) => {
                out.push_str(value);
                rest = tail;
            }
            None => {
                out.push('{');
                rest = candidate;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template_does_not_rescan_values() {
        let filled = fill_template(
            "Candidate: {candidate}\nJob: {job}",
            &[("candidate", "I wrote {job} here"), ("job", "Engineer")],
        );
        assert_eq!(filled, "Candidate: I wrote {job} here\nJob: Engineer");
    }

    #[test]
    fn test_fill_template_keeps_json_braces_and_unknown_names() {
        let filled = fill_template(
            r#"{"skills": []} {job_title} {unknown} {"#,
            &[("job", "x"), ("job_title", "Engineer")],
        );
        assert_eq!(filled, r#"{"skills": []} Engineer {unknown} {"#);
    }

    #[test]
    fn test_truncate_chars_respects_multibyte() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
    }
}
