//! crates/noteswise_core/src/flashcards.rs
//!
//! Turns the text payload returned by the flashcard provider into domain items.
//! Providers frequently wrap the JSON array in a Markdown code fence, so that
//! wrapping is removed before parsing.

use serde::Deserialize;

use crate::domain::FlashcardItem;
use crate::ports::{PortError, PortResult};

/// The shape each array element must have. Both fields are required and non-null.
#[derive(Deserialize)]
struct FlashcardRecord {
    question: String,
    answer: String,
}

impl FlashcardRecord {
    fn to_domain(self) -> FlashcardItem {
        FlashcardItem {
            question: self.question,
            answer: self.answer,
        }
    }
}

/// Removes a leading ```` ``` ```` / ```` ```json ```` marker and a trailing ```` ``` ````.
///
/// The `json` tag is matched case-insensitively.
pub fn strip_code_fence(text: &str) -> &str {
    let mut cleaned = text.trim();
    if let Some(rest) = cleaned.strip_prefix("```") {
        cleaned = match rest.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
            _ => rest,
        };
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest;
    }
    cleaned.trim()
}

/// Parses the provider's text as a JSON array of `{question, answer}` objects.
///
/// Any failure is reported as `MalformedContent` so callers can tell it apart
/// from a failed provider call.
pub fn parse_flashcards(provider: &'static str, text: &str) -> PortResult<Vec<FlashcardItem>> {
    let records: Vec<FlashcardRecord> =
        serde_json::from_str(strip_code_fence(text)).map_err(|e| PortError::MalformedContent {
            provider,
            message: e.to_string(),
        })?;
    Ok(records.into_iter().map(FlashcardRecord::to_domain).collect())
}
