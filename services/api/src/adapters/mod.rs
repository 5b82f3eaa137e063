//! services/api/src/adapters/mod.rs
//!
//! Concrete implementations of the core ports, one per upstream AI provider,
//! plus the HTTP plumbing they share.

pub mod elevenlabs;
pub mod gemini;
pub mod openai_flashcards;

pub use elevenlabs::ElevenLabsTtsAdapter;
pub use gemini::GeminiSummaryAdapter;
pub use openai_flashcards::OpenAiFlashcardsAdapter;

use std::time::Duration;

use noteswise_core::{PortError, PortResult};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::warn;

/// Builds the single outbound client shared by every adapter.
pub fn build_http_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder().timeout(timeout).build()
}

/// Joins a configured base URL and an endpoint path without doubling slashes.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Maps a request that never completed onto `PortError::Transport`.
pub(crate) fn transport_error(provider: &'static str, err: reqwest::Error) -> PortError {
    let message = if err.is_timeout() {
        format!("timed out: {err}")
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    };
    PortError::Transport { provider, message }
}

/// Reads the body of a failed response into `PortError::Upstream`.
pub(crate) async fn upstream_failure(provider: &'static str, response: Response) -> PortError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    warn!(provider, status = status.as_u16(), "Provider returned a failure status");
    PortError::upstream(provider, status.as_u16(), &body)
}

/// Checks the status and decodes a JSON body into the provider's response schema.
///
/// A failure status or an undecodable body are both `Upstream` errors.
pub(crate) async fn read_json<T: DeserializeOwned>(
    provider: &'static str,
    response: Response,
) -> PortResult<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(upstream_failure(provider, response).await);
    }
    let body = response
        .text()
        .await
        .map_err(|e| transport_error(provider, e))?;
    serde_json::from_str(&body).map_err(|e| {
        PortError::upstream(
            provider,
            status.as_u16(),
            &format!("could not decode response ({e}): {body}"),
        )
    })
}
