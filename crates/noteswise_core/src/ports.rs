//! crates/noteswise_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the gateway's provider calls.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete HTTP clients that talk to each AI provider.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::{FlashcardItem, VoiceSettings};

/// Upstream bodies are cut to this many characters when carried in an error.
const BODY_SNIPPET_LEN: usize = 512;

//=========================================================================================
// Port Error and Result Types
//=========================================================================================

/// The error taxonomy shared by every gateway operation.
///
/// Each variant carries enough context (provider, status, snippet) for the caller
/// to log it and map it to a boundary-level response.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// Required input is missing or blank.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The outbound call did not complete (network, timeout, connection reset).
    #[error("{provider} request failed: {message}")]
    Transport {
        provider: &'static str,
        message: String,
    },

    /// The provider answered with a failure status or an undecodable response.
    #[error("{provider} returned an unusable response (status {status}): {detail}")]
    Upstream {
        provider: &'static str,
        status: u16,
        detail: String,
    },

    /// The provider answered successfully but the embedded payload is not valid structured data.
    #[error("{provider} returned malformed content: {message}")]
    MalformedContent {
        provider: &'static str,
        message: String,
    },

    #[error("Unknown voice: {0}")]
    UnknownVoice(String),

    /// A flashcard audio sub-call failed; the whole operation is aborted.
    #[error("Audio generation failed for flashcard {flashcard_id}: {source}")]
    FlashcardAudio {
        flashcard_id: String,
        #[source]
        source: Box<PortError>,
    },
}

impl PortError {
    /// Builds an `Upstream` error, truncating the provider body to a loggable snippet.
    pub fn upstream(provider: &'static str, status: u16, body: &str) -> Self {
        let detail = if body.chars().count() > BODY_SNIPPET_LEN {
            let snippet: String = body.chars().take(BODY_SNIPPET_LEN).collect();
            format!("{snippet}…")
        } else {
            body.to_string()
        };
        Self::Upstream {
            provider,
            status,
            detail,
        }
    }

    /// The innermost error, looking through flashcard wrapping.
    pub fn root_cause(&self) -> &PortError {
        match self {
            Self::FlashcardAudio { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait SummaryGenerationService: Send + Sync {
    /// Produces a concise summary of the given content.
    async fn generate_summary(&self, content: &str) -> PortResult<String>;
}

#[async_trait]
pub trait FlashcardGenerationService: Send + Sync {
    /// Derives question/answer pairs from the given content.
    async fn generate_flashcards(&self, content: &str) -> PortResult<Vec<FlashcardItem>>;
}

#[async_trait]
pub trait SpeechSynthesisService: Send + Sync {
    /// Synthesizes `text` with an already-resolved provider voice ID and returns raw audio.
    async fn synthesize(
        &self,
        text: &str,
        voice_id: &str,
        settings: &VoiceSettings,
    ) -> PortResult<Bytes>;
}
