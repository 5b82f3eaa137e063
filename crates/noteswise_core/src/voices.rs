//! crates/noteswise_core/src/voices.rs
//!
//! Maps the logical voice names the client knows about onto provider voice IDs.

use std::collections::HashMap;

use crate::ports::{PortError, PortResult};

/// Voice used by plain audio generation when the client names none.
pub const DEFAULT_AUDIO_VOICE: &str = "alloy";

/// Voice used by flashcard audio generation when the client names none.
pub const DEFAULT_FLASHCARD_VOICE: &str = "burt";

/// Built-in entries; configuration may override or extend them.
const BUILTIN_VOICES: &[(&str, &str)] = &[
    ("alloy", "21m00Tcm4TlvDq8ikWAM"),
    ("burt", "pNInz6obpgDQGcFmaJgB"),
];

/// A fixed mapping from logical voice name to provider voice ID.
///
/// Names are matched case-insensitively after trimming. There is no fallback:
/// resolving an unregistered name is an error.
#[derive(Debug, Clone, Default)]
pub struct VoiceRegistry {
    voices: HashMap<String, String>,
}

impl VoiceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry pre-populated with the built-in voices.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for (name, id) in BUILTIN_VOICES {
            registry.insert(name, id);
        }
        registry
    }

    /// Registers (or replaces) a voice.
    pub fn insert(&mut self, name: &str, voice_id: &str) {
        self.voices
            .insert(normalize(name), voice_id.trim().to_string());
    }

    /// Looks up the provider voice ID for `name`.
    pub fn resolve(&self, name: &str) -> PortResult<&str> {
        self.voices
            .get(&normalize(name))
            .map(String::as_str)
            .ok_or_else(|| PortError::UnknownVoice(name.to_string()))
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.voices.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }
}

impl<'a> Extend<(&'a str, &'a str)> for VoiceRegistry {
    fn extend<T: IntoIterator<Item = (&'a str, &'a str)>>(&mut self, iter: T) {
        for (name, id) in iter {
            self.insert(name, id);
        }
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
