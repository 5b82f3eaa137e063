//! crates/noteswise_core/src/domain.rs
//!
//! Defines the pure, core data structures for the gateway.
//! These structs are independent of any provider wire schema or HTTP framework.

use std::str::FromStr;

/// A single question/answer study pair produced by the flashcard provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashcardItem {
    pub question: String,
    pub answer: String,
}

/// A flashcard owned by the client application, identified for traceability.
#[derive(Debug, Clone)]
pub struct Flashcard {
    pub id: String,
    pub question: String,
    pub answer: String,
}

/// Which side(s) of a flashcard should be voiced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AudioTarget {
    Question,
    Answer,
    #[default]
    Both,
}

impl AudioTarget {
    pub fn includes_question(self) -> bool {
        matches!(self, Self::Question | Self::Both)
    }

    pub fn includes_answer(self) -> bool {
        matches!(self, Self::Answer | Self::Both)
    }
}

impl FromStr for AudioTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "question" => Ok(Self::Question),
            "answer" => Ok(Self::Answer),
            "both" => Ok(Self::Both),
            other => Err(format!(
                "'{other}' is not a valid audio type (expected question, answer or both)"
            )),
        }
    }
}

/// Base64 audio for one or both sides of a flashcard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlashcardAudio {
    pub question_audio: Option<String>,
    pub answer_audio: Option<String>,
}

/// Model parameters forwarded to the speech-synthesis provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceSettings {
    pub stability: f64,
    pub similarity_boost: f64,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.75,
        }
    }
}
