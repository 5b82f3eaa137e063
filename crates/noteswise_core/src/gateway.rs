//! crates/noteswise_core/src/gateway.rs
//!
//! The gateway service: the four operations the routing layer exposes, built on
//! top of the provider ports. It holds no mutable state, so one instance can be
//! shared across every request.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::domain::{AudioTarget, Flashcard, FlashcardAudio, FlashcardItem, VoiceSettings};
use crate::ports::{
    FlashcardGenerationService, PortError, PortResult, SpeechSynthesisService,
    SummaryGenerationService,
};
use crate::voices::VoiceRegistry;

/// Routes each operation to its provider port and shapes the result.
#[derive(Clone)]
pub struct AiGateway {
    summaries: Arc<dyn SummaryGenerationService>,
    flashcards: Arc<dyn FlashcardGenerationService>,
    speech: Arc<dyn SpeechSynthesisService>,
    voices: VoiceRegistry,
    voice_settings: VoiceSettings,
}

impl AiGateway {
    /// Creates a new `AiGateway`.
    pub fn new(
        summaries: Arc<dyn SummaryGenerationService>,
        flashcards: Arc<dyn FlashcardGenerationService>,
        speech: Arc<dyn SpeechSynthesisService>,
        voices: VoiceRegistry,
        voice_settings: VoiceSettings,
    ) -> Self {
        Self {
            summaries,
            flashcards,
            speech,
            voices,
            voice_settings,
        }
    }

    /// The voice names this gateway will accept.
    pub fn voices(&self) -> &VoiceRegistry {
        &self.voices
    }

    /// Summarizes `content`. The caller guarantees it is non-blank.
    pub async fn generate_summary(&self, content: &str) -> PortResult<String> {
        self.summaries.generate_summary(content).await
    }

    /// Derives flashcards from `content`. The caller guarantees it is non-blank.
    pub async fn generate_flashcards(&self, content: &str) -> PortResult<Vec<FlashcardItem>> {
        self.flashcards.generate_flashcards(content).await
    }

    /// Synthesizes `text` with the named voice and returns the audio as base64.
    ///
    /// The voice is resolved before any network call is made.
    pub async fn generate_audio(&self, text: &str, voice: &str) -> PortResult<String> {
        let voice_id = self.voices.resolve(voice)?;
        let audio = self
            .speech
            .synthesize(text, voice_id, &self.voice_settings)
            .await?;
        Ok(STANDARD.encode(&audio))
    }

    /// Voices the requested side(s) of a flashcard, question first.
    ///
    /// Either sub-call failing aborts the whole operation; the error is tagged
    /// with the flashcard ID and no partial result is returned.
    pub async fn generate_flashcard_audio(
        &self,
        flashcard: &Flashcard,
        voice: &str,
        target: AudioTarget,
    ) -> PortResult<FlashcardAudio> {
        let question_audio = if target.includes_question() {
            Some(
                self.generate_audio(&flashcard.question, voice)
                    .await
                    .map_err(|e| flashcard_error(flashcard, e))?,
            )
        } else {
            None
        };

        let answer_audio = if target.includes_answer() {
            Some(
                self.generate_audio(&flashcard.answer, voice)
                    .await
                    .map_err(|e| flashcard_error(flashcard, e))?,
            )
        } else {
            None
        };

        Ok(FlashcardAudio {
            question_audio,
            answer_audio,
        })
    }
}

fn flashcard_error(flashcard: &Flashcard, source: PortError) -> PortError {
    PortError::FlashcardAudio {
        flashcard_id: flashcard.id.clone(),
        source: Box::new(source),
    }
}
