//! services/api/src/adapters/gemini.rs
//!
//! This module contains the adapter for the Gemini text-generation API.
//! It implements the `SummaryGenerationService` port from the `core` crate.

use async_trait::async_trait;
use noteswise_core::ports::{PortError, PortResult, SummaryGenerationService};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{endpoint, read_json, transport_error};

pub const PROVIDER: &str = "Gemini";

const SUMMARY_INSTRUCTION: &str = "Summarize this text concisely: ";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `SummaryGenerationService` using Gemini `generateContent`.
#[derive(Clone)]
pub struct GeminiSummaryAdapter {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiSummaryAdapter {
    /// Creates a new `GeminiSummaryAdapter`.
    pub fn new(client: Client, base_url: String, api_key: String, model: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
            model,
        }
    }

    fn generate_url(&self) -> String {
        endpoint(
            &self.base_url,
            &format!("models/{}:generateContent", self.model),
        )
    }
}

//=========================================================================================
// Wire Schema
//=========================================================================================

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
}

#[derive(Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// The first candidate's first part, if the provider produced one.
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

//=========================================================================================
// `SummaryGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl SummaryGenerationService for GeminiSummaryAdapter {
    #[instrument(skip(self, content), fields(provider = PROVIDER, model = %self.model, content_len = content.len()))]
    async fn generate_summary(&self, content: &str) -> PortResult<String> {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: format!("{SUMMARY_INSTRUCTION}{content}"),
                }],
            }],
        };

        debug!("Requesting summary");
        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, e))?;
        let status = response.status().as_u16();

        let parsed: GenerateContentResponse = read_json(PROVIDER, response).await?;
        parsed.first_text().ok_or_else(|| {
            PortError::upstream(PROVIDER, status, "response contained no candidate text")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::build_http_client;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE_PATH: &str = "/models/gemini-2.5-flash:generateContent";

    fn create_test_adapter(mock_server: &MockServer) -> GeminiSummaryAdapter {
        GeminiSummaryAdapter::new(
            build_http_client(Duration::from_secs(5)).unwrap(),
            mock_server.uri(),
            "test-gemini-key".to_string(),
            "gemini-2.5-flash".to_string(),
        )
    }

    #[tokio::test]
    async fn returns_first_candidate_text_verbatim() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(header("x-goog-api-key", "test-gemini-key"))
            .and(body_partial_json(serde_json::json!({
                "contents": [{
                    "parts": [{ "text": "Summarize this text concisely: The sky is blue." }]
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{ "content": { "parts": [{ "text": "Sky is blue." }] } }]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let adapter = create_test_adapter(&mock_server);
        let summary = adapter.generate_summary("The sky is blue.").await.unwrap();

        assert_eq!(summary, "Sky is blue.");
    }

    #[tokio::test]
    async fn empty_candidates_is_an_upstream_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "candidates": [] })),
            )
            .mount(&mock_server)
            .await;

        let adapter = create_test_adapter(&mock_server);
        let err = adapter.generate_summary("text").await.unwrap_err();

        assert!(matches!(err, PortError::Upstream { provider: "Gemini", status: 200, .. }));
    }

    #[tokio::test]
    async fn candidate_without_parts_is_an_upstream_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{ "finishReason": "SAFETY" }]
            })))
            .mount(&mock_server)
            .await;

        let adapter = create_test_adapter(&mock_server);
        let err = adapter.generate_summary("text").await.unwrap_err();

        assert!(matches!(err, PortError::Upstream { .. }));
    }

    #[tokio::test]
    async fn non_json_body_is_an_upstream_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let adapter = create_test_adapter(&mock_server);
        let err = adapter.generate_summary("text").await.unwrap_err();

        assert!(matches!(err, PortError::Upstream { .. }));
    }

    #[tokio::test]
    async fn failure_status_carries_status_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .mount(&mock_server)
            .await;

        let adapter = create_test_adapter(&mock_server);
        let err = adapter.generate_summary("text").await.unwrap_err();

        match err {
            PortError::Upstream { status, detail, .. } => {
                assert_eq!(status, 403);
                assert_eq!(detail, "API key not valid");
            }
            other => panic!("expected Upstream, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn slow_provider_is_a_transport_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&mock_server)
            .await;

        let adapter = GeminiSummaryAdapter::new(
            build_http_client(Duration::from_millis(200)).unwrap(),
            mock_server.uri(),
            "k".to_string(),
            "gemini-2.5-flash".to_string(),
        );
        let err = adapter.generate_summary("text").await.unwrap_err();

        assert!(matches!(err, PortError::Transport { provider: "Gemini", .. }));
    }
}
