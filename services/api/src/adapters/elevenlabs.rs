//! services/api/src/adapters/elevenlabs.rs
//!
//! This module contains the adapter for the ElevenLabs Text-to-Speech service.
//! It implements the `SpeechSynthesisService` port from the `core` crate.

use async_trait::async_trait;
use bytes::Bytes;
use noteswise_core::{
    domain::VoiceSettings,
    ports::{PortResult, SpeechSynthesisService},
};
use reqwest::{header::ACCEPT, Client};
use serde::Serialize;
use tracing::{debug, instrument};

use super::{endpoint, transport_error, upstream_failure};

pub const PROVIDER: &str = "ElevenLabs";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `SpeechSynthesisService` port using the ElevenLabs API.
#[derive(Clone)]
pub struct ElevenLabsTtsAdapter {
    client: Client,
    base_url: String,
    api_key: String,
    model_id: String,
}

impl ElevenLabsTtsAdapter {
    /// Creates a new `ElevenLabsTtsAdapter`.
    pub fn new(client: Client, base_url: String, api_key: String, model_id: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
            model_id,
        }
    }
}

//=========================================================================================
// Wire Schema
//=========================================================================================

#[derive(Serialize)]
struct TextToSpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettingsBody,
}

#[derive(Serialize)]
struct VoiceSettingsBody {
    stability: f64,
    similarity_boost: f64,
}

impl From<&VoiceSettings> for VoiceSettingsBody {
    fn from(settings: &VoiceSettings) -> Self {
        Self {
            stability: settings.stability,
            similarity_boost: settings.similarity_boost,
        }
    }
}

//=========================================================================================
// `SpeechSynthesisService` Trait Implementation
//=========================================================================================

#[async_trait]
impl SpeechSynthesisService for ElevenLabsTtsAdapter {
    #[instrument(skip(self, text, settings), fields(provider = PROVIDER, text_len = text.len()))]
    async fn synthesize(
        &self,
        text: &str,
        voice_id: &str,
        settings: &VoiceSettings,
    ) -> PortResult<Bytes> {
        let request = TextToSpeechRequest {
            text,
            model_id: &self.model_id,
            voice_settings: settings.into(),
        };

        debug!("Requesting speech synthesis");
        let response = self
            .client
            .post(endpoint(
                &self.base_url,
                &format!("text-to-speech/{voice_id}"),
            ))
            .header("xi-api-key", &self.api_key)
            .header(ACCEPT, "audio/mpeg")
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;

        if !response.status().is_success() {
            return Err(upstream_failure(PROVIDER, response).await);
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;
        debug!(audio_bytes = audio.len(), "Received synthesized audio");
        Ok(audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::build_http_client;
    use noteswise_core::PortError;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_adapter(mock_server: &MockServer) -> ElevenLabsTtsAdapter {
        ElevenLabsTtsAdapter::new(
            build_http_client(Duration::from_secs(5)).unwrap(),
            mock_server.uri(),
            "test-eleven-key".to_string(),
            "eleven_monolingual_v1".to_string(),
        )
    }

    #[tokio::test]
    async fn posts_snake_case_body_to_voice_path() {
        let mock_server = MockServer::start().await;
        let audio: Vec<u8> = vec![0xFF, 0xFB, 0x90, 0x00, 0x01];

        Mock::given(method("POST"))
            .and(path("/text-to-speech/voice-123"))
            .and(header("xi-api-key", "test-eleven-key"))
            .and(body_json(serde_json::json!({
                "text": "Hello there",
                "model_id": "eleven_monolingual_v1",
                "voice_settings": { "stability": 0.5, "similarity_boost": 0.75 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(audio.clone()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let adapter = create_test_adapter(&mock_server);
        let result = adapter
            .synthesize("Hello there", "voice-123", &VoiceSettings::default())
            .await
            .unwrap();

        assert_eq!(result.to_vec(), audio);
    }

    #[tokio::test]
    async fn failure_status_is_an_upstream_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/text-to-speech/voice-123"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(serde_json::json!({
                    "detail": { "status": "invalid_api_key" }
                })),
            )
            .mount(&mock_server)
            .await;

        let adapter = create_test_adapter(&mock_server);
        let err = adapter
            .synthesize("Hello", "voice-123", &VoiceSettings::default())
            .await
            .unwrap_err();

        match err {
            PortError::Upstream {
                provider,
                status,
                detail,
            } => {
                assert_eq!(provider, "ElevenLabs");
                assert_eq!(status, 401);
                assert!(detail.contains("invalid_api_key"));
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }
}
