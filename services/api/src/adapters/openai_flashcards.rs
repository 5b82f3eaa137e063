//! services/api/src/adapters/openai_flashcards.rs
//!
//! This module contains the adapter for the flashcard-generating LLM, called through
//! the OpenAI Responses API. It implements the `FlashcardGenerationService` port.

const SYSTEM_INSTRUCTIONS: &str = r#"You are a study assistant that turns notes into flashcards.

From the content the user provides, create between 5 and 10 flashcards that cover its most important ideas.

Respond ONLY with a JSON array in exactly this shape, with no explanation before or after it:
[{"question": "...", "answer": "..."}]

Keep each question specific and each answer short and self-contained."#;

use async_trait::async_trait;
use noteswise_core::{
    domain::FlashcardItem,
    flashcards::parse_flashcards,
    ports::{FlashcardGenerationService, PortError, PortResult},
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{endpoint, read_json, transport_error};

pub const PROVIDER: &str = "OpenAI";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `FlashcardGenerationService` using the OpenAI Responses API.
#[derive(Clone)]
pub struct OpenAiFlashcardsAdapter {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiFlashcardsAdapter {
    /// Creates a new `OpenAiFlashcardsAdapter`.
    pub fn new(client: Client, base_url: String, api_key: String, model: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
            model,
        }
    }
}

//=========================================================================================
// Wire Schema
//=========================================================================================

#[derive(Serialize)]
struct CreateResponseRequest<'a> {
    model: &'a str,
    input: Vec<InputMessage<'a>>,
}

#[derive(Serialize)]
struct InputMessage<'a> {
    role: &'static str,
    content: Vec<InputContent<'a>>,
}

#[derive(Serialize)]
struct InputContent<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

impl<'a> InputMessage<'a> {
    fn text(role: &'static str, text: &'a str) -> Self {
        Self {
            role,
            content: vec![InputContent {
                kind: "input_text",
                text,
            }],
        }
    }
}

#[derive(Deserialize)]
struct CreateResponseResponse {
    #[serde(default)]
    output: Vec<OutputItem>,
}

#[derive(Deserialize)]
struct OutputItem {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Vec<OutputContent>,
}

#[derive(Deserialize)]
struct OutputContent {
    text: Option<String>,
}

impl CreateResponseResponse {
    /// Text of the first content part of the first `message` output element.
    fn message_text(self) -> Option<String> {
        self.output
            .into_iter()
            .find(|item| item.kind == "message")?
            .content
            .into_iter()
            .next()?
            .text
    }
}

//=========================================================================================
// `FlashcardGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl FlashcardGenerationService for OpenAiFlashcardsAdapter {
    #[instrument(skip(self, content), fields(provider = PROVIDER, model = %self.model, content_len = content.len()))]
    async fn generate_flashcards(&self, content: &str) -> PortResult<Vec<FlashcardItem>> {
        let request = CreateResponseRequest {
            model: &self.model,
            input: vec![
                InputMessage::text("system", SYSTEM_INSTRUCTIONS),
                InputMessage::text("user", content),
            ],
        };

        debug!("Requesting flashcards");
        let response = self
            .client
            .post(endpoint(&self.base_url, "responses"))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;
        let status = response.status().as_u16();

        let parsed: CreateResponseResponse = read_json(PROVIDER, response).await?;
        let text = parsed.message_text().ok_or_else(|| {
            PortError::upstream(PROVIDER, status, "response contained no message output")
        })?;

        let flashcards = parse_flashcards(PROVIDER, &text)?;
        debug!(count = flashcards.len(), "Parsed flashcards");
        Ok(flashcards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::build_http_client;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_adapter(mock_server: &MockServer) -> OpenAiFlashcardsAdapter {
        OpenAiFlashcardsAdapter::new(
            build_http_client(Duration::from_secs(5)).unwrap(),
            mock_server.uri(),
            "test-openai-key".to_string(),
            "gpt-4o-mini".to_string(),
        )
    }

    fn message_output(text: &str) -> serde_json::Value {
        serde_json::json!({
            "output": [
                { "type": "reasoning", "summary": [] },
                {
                    "type": "message",
                    "role": "assistant",
                    "content": [{ "type": "output_text", "text": text }]
                }
            ]
        })
    }

    #[tokio::test]
    async fn parses_fenced_message_text() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/responses"))
            .and(header("authorization", "Bearer test-openai-key"))
            .and(body_partial_json(serde_json::json!({ "model": "gpt-4o-mini" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(message_output(
                "```json\n[{\"question\":\"Q1\",\"answer\":\"A1\"}]\n```",
            )))
            .expect(1)
            .mount(&mock_server)
            .await;

        let adapter = create_test_adapter(&mock_server);
        let flashcards = adapter.generate_flashcards("Some notes").await.unwrap();

        assert_eq!(
            flashcards,
            vec![FlashcardItem {
                question: "Q1".to_string(),
                answer: "A1".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn sends_system_and_user_messages() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/responses"))
            .and(body_partial_json(serde_json::json!({
                "input": [
                    {
                        "role": "system",
                        "content": [{ "type": "input_text", "text": SYSTEM_INSTRUCTIONS }]
                    },
                    {
                        "role": "user",
                        "content": [{ "type": "input_text", "text": "Photosynthesis notes" }]
                    }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(message_output("[]")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let adapter = create_test_adapter(&mock_server);
        let flashcards = adapter
            .generate_flashcards("Photosynthesis notes")
            .await
            .unwrap();

        assert!(flashcards.is_empty());
    }

    #[tokio::test]
    async fn failure_status_is_an_upstream_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/responses"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": { "message": "Rate limit exceeded", "code": "rate_limit_exceeded" }
            })))
            .mount(&mock_server)
            .await;

        let adapter = create_test_adapter(&mock_server);
        let err = adapter.generate_flashcards("notes").await.unwrap_err();

        match err {
            PortError::Upstream {
                provider,
                status,
                detail,
            } => {
                assert_eq!(provider, "OpenAI");
                assert_eq!(status, 429);
                assert!(detail.contains("Rate limit exceeded"));
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_json_text_is_malformed_content() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/responses"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(message_output("Here are some flashcards: Q1 -> A1")),
            )
            .mount(&mock_server)
            .await;

        let adapter = create_test_adapter(&mock_server);
        let err = adapter.generate_flashcards("notes").await.unwrap_err();

        assert!(matches!(err, PortError::MalformedContent { provider: "OpenAI", .. }));
    }

    #[tokio::test]
    async fn missing_message_output_is_an_upstream_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/responses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "output": [{ "type": "reasoning" }]
            })))
            .mount(&mock_server)
            .await;

        let adapter = create_test_adapter(&mock_server);
        let err = adapter.generate_flashcards("notes").await.unwrap_err();

        assert!(matches!(err, PortError::Upstream { status: 200, .. }));
    }
}
