//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::time::Duration;

use noteswise_core::{VoiceRegistry, VoiceSettings};
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Connection settings for one upstream provider.
#[derive(Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub cors_origin: String,
    pub http_timeout: Duration,
    pub gemini: ProviderConfig,
    pub openai: ProviderConfig,
    pub elevenlabs: ProviderConfig,
    pub voice_settings: VoiceSettings,
    pub voices: VoiceRegistry,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingVar(key.to_string()))
        };

        // --- Server Settings ---
        let bind_address_str = or_default("BIND_ADDRESS", "0.0.0.0:3000");
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = or_default("RUST_LOG", "INFO");
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin = or_default("CORS_ORIGIN", "http://localhost:3000");

        let timeout_str = or_default("HTTP_TIMEOUT_SECS", "60");
        let http_timeout = timeout_str
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .ok_or_else(|| {
                ConfigError::InvalidValue(
                    "HTTP_TIMEOUT_SECS".to_string(),
                    format!("'{}' is not a positive number of seconds", timeout_str),
                )
            })?;

        // --- Provider Settings ---
        let gemini = ProviderConfig {
            base_url: or_default(
                "GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com/v1beta",
            ),
            api_key: required("GEMINI_API_KEY")?,
            model: or_default("GEMINI_MODEL", "gemini-2.5-flash"),
        };
        let openai = ProviderConfig {
            base_url: or_default("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            api_key: required("OPENAI_API_KEY")?,
            model: or_default("FLASHCARDS_MODEL", "gpt-4o-mini"),
        };
        let elevenlabs = ProviderConfig {
            base_url: or_default("ELEVENLABS_BASE_URL", "https://api.elevenlabs.io/v1"),
            api_key: required("ELEVENLABS_API_KEY")?,
            model: or_default("ELEVENLABS_MODEL_ID", "eleven_monolingual_v1"),
        };

        // --- Speech Settings ---
        let defaults = VoiceSettings::default();
        let voice_settings = VoiceSettings {
            stability: parse_unit_interval(
                "TTS_STABILITY",
                lookup("TTS_STABILITY"),
                defaults.stability,
            )?,
            similarity_boost: parse_unit_interval(
                "TTS_SIMILARITY_BOOST",
                lookup("TTS_SIMILARITY_BOOST"),
                defaults.similarity_boost,
            )?,
        };

        let mut voices = VoiceRegistry::with_defaults();
        if let Some(entries) = lookup("VOICE_REGISTRY") {
            voices.extend(parse_voice_entries(&entries)?);
        }

        Ok(Self {
            bind_address,
            log_level,
            cors_origin,
            http_timeout,
            gemini,
            openai,
            elevenlabs,
            voice_settings,
            voices,
        })
    }
}

fn parse_unit_interval(key: &str, raw: Option<String>, default: f64) -> Result<f64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| (0.0..=1.0).contains(v))
        .ok_or_else(|| {
            ConfigError::InvalidValue(
                key.to_string(),
                format!("'{}' must be a number between 0.0 and 1.0", raw),
            )
        })
}

/// Parses `name=id,name=id` into pairs. Blank entries are skipped.
fn parse_voice_entries(raw: &str) -> Result<Vec<(&str, &str)>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            entry
                .split_once('=')
                .map(|(name, id)| (name.trim(), id.trim()))
                .filter(|(name, id)| !name.is_empty() && !id.is_empty())
                .ok_or_else(|| {
                    ConfigError::InvalidValue(
                        "VOICE_REGISTRY".to_string(),
                        format!("'{}' is not a name=voice_id pair", entry),
                    )
                })
        })
        .collect()
}
