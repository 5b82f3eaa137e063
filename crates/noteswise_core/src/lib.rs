pub mod domain;
pub mod flashcards;
pub mod gateway;
pub mod ports;
pub mod voices;

pub use domain::{AudioTarget, Flashcard, FlashcardAudio, FlashcardItem, VoiceSettings};
pub use gateway::AiGateway;
pub use ports::{
    FlashcardGenerationService, PortError, PortResult, SpeechSynthesisService,
    SummaryGenerationService,
};
pub use voices::{VoiceRegistry, DEFAULT_AUDIO_VOICE, DEFAULT_FLASHCARD_VOICE};
