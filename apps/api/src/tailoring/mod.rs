// Job tailoring: compatibility scoring, tailored CV synthesis, cover letters.
// All three degrade gracefully on unparseable model output.

pub mod compatibility;
pub mod cover_letter;
pub mod handlers;
pub mod prompts;
pub mod synthesizer;

use crate::llm_client::prompts::truncate_chars;
use crate::models::document::Document;

/// Characters of candidate text sent with tailoring prompts.
pub const CANDIDATE_CHAR_BUDGET: usize = 3000;

/// Usable document texts joined by a space, limited to the candidate budget.
pub fn candidate_text(documents: &[Document]) -> String {
    let joined = documents
        .iter()
        .filter(|d| d.has_usable_text())
        .map(|d| d.extracted_text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    truncate_chars(&joined, CANDIDATE_CHAR_BUDGET).to_string()
}
