//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the AI endpoints and the master definition for
//! the OpenAPI specification. Handlers validate input presence, call the gateway,
//! and translate the core error taxonomy into HTTP statuses.

use crate::web::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use noteswise_core::{
    AiGateway, AudioTarget, Flashcard, FlashcardItem, PortError, PortResult,
    DEFAULT_AUDIO_VOICE, DEFAULT_FLASHCARD_VOICE,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        generate_summary_handler,
        generate_flashcards_handler,
        generate_audio_handler,
        generate_flashcard_audio_handler,
        health_handler,
    ),
    components(
        schemas(
            GenerateSummaryRequest,
            GenerateSummaryResponse,
            GenerateFlashcardsRequest,
            GenerateFlashcardsResponse,
            FlashcardDto,
            GenerateAudioRequest,
            GenerateAudioResponse,
            GenerateFlashcardAudioRequest,
            FlashcardPayload,
            GenerateFlashcardAudioResponse,
            ProblemDetails,
            HealthResponse,
        )
    ),
    tags(
        (name = "AI", description = "Summaries, flashcards and speech generated by upstream AI providers.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Request and Response Structs
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct GenerateSummaryRequest {
    pub content: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct GenerateSummaryResponse {
    pub summary: String,
}

#[derive(Deserialize, ToSchema)]
pub struct GenerateFlashcardsRequest {
    pub content: Option<String>,
}

/// A generated question/answer pair.
#[derive(Serialize, ToSchema)]
pub struct FlashcardDto {
    pub question: String,
    pub answer: String,
}

impl From<FlashcardItem> for FlashcardDto {
    fn from(item: FlashcardItem) -> Self {
        Self {
            question: item.question,
            answer: item.answer,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct GenerateFlashcardsResponse {
    pub flashcards: Vec<FlashcardDto>,
}

#[derive(Deserialize, ToSchema)]
pub struct GenerateAudioRequest {
    pub text: Option<String>,
    /// Logical voice name; defaults to "alloy".
    pub voice: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAudioResponse {
    /// Base64-encoded audio.
    pub audio_content: String,
}

/// The flashcard to voice, as stored by the client.
#[derive(Deserialize, ToSchema)]
pub struct FlashcardPayload {
    pub id: Option<String>,
    pub question: Option<String>,
    pub answer: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct GenerateFlashcardAudioRequest {
    pub flashcard: Option<FlashcardPayload>,
    /// Logical voice name; defaults to "burt".
    pub voice: Option<String>,
    /// One of "question", "answer" or "both" (the default).
    #[serde(rename = "type")]
    pub audio_type: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateFlashcardAudioResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_audio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_audio: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

//=========================================================================================
// Error Responses
//=========================================================================================

/// The body of every failed AI request.
#[derive(Serialize, ToSchema)]
pub struct ProblemDetails {
    pub title: String,
    pub detail: String,
    pub status: u16,
}

/// A failed request, ready to be turned into an HTTP response.
#[derive(Debug)]
pub struct ApiProblem {
    pub status: StatusCode,
    pub title: &'static str,
    pub detail: String,
}

impl IntoResponse for ApiProblem {
    fn into_response(self) -> Response {
        let body = ProblemDetails {
            title: self.title.to_string(),
            detail: self.detail,
            status: self.status.as_u16(),
        };
        (self.status, Json(body)).into_response()
    }
}

/// Maps the core taxonomy onto boundary status codes.
pub fn status_for(err: &PortError) -> StatusCode {
    match err.root_cause() {
        PortError::Validation(_) | PortError::UnknownVoice(_) => StatusCode::BAD_REQUEST,
        PortError::Transport { .. }
        | PortError::Upstream { .. }
        | PortError::MalformedContent { .. } => StatusCode::BAD_GATEWAY,
        PortError::FlashcardAudio { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Logs a failed operation and converts it into an `ApiProblem`.
fn reject(title: &'static str, err: PortError) -> ApiProblem {
    let status = status_for(&err);
    if status.is_client_error() {
        warn!(error = %err, "{title}");
    } else {
        error!(error = %err, "{title}");
    }
    ApiProblem {
        status,
        title,
        detail: err.to_string(),
    }
}

/// A body that is not valid JSON for the request type is a validation failure.
fn invalid_body(rejection: JsonRejection) -> PortError {
    PortError::Validation(rejection.body_text())
}

/// Absent, `null` and blank values are all rejected the same way.
fn require_text<'a>(value: Option<&'a str>, message: &str) -> PortResult<&'a str> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(PortError::Validation(message.to_string())),
    }
}

/// The requested voice, or `default` when none (or a blank one) was sent.
fn voice_or<'a>(voice: &'a Option<String>, default: &'a str) -> &'a str {
    voice
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(default)
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Summarize a block of text.
#[utoipa::path(
    post,
    path = "/api/ai/generate-summary",
    tag = "AI",
    request_body = GenerateSummaryRequest,
    responses(
        (status = 200, description = "Summary generated", body = GenerateSummaryResponse),
        (status = 400, description = "The body is not valid JSON, or content is missing or blank", body = ProblemDetails),
        (status = 502, description = "The text-generation provider failed", body = ProblemDetails)
    )
)]
pub async fn generate_summary_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<GenerateSummaryRequest>, JsonRejection>,
) -> Result<Json<GenerateSummaryResponse>, ApiProblem> {
    let result = async {
        let Json(request) = payload.map_err(invalid_body)?;
        let content = require_text(request.content.as_deref(), "Content is required")?;
        app_state.gateway.generate_summary(content).await
    }
    .await;

    result
        .map(|summary| Json(GenerateSummaryResponse { summary }))
        .map_err(|e| reject("Failed to generate summary", e))
}

/// Generate 5–10 study flashcards from a block of text.
#[utoipa::path(
    post,
    path = "/api/ai/generate-flashcards",
    tag = "AI",
    request_body = GenerateFlashcardsRequest,
    responses(
        (status = 200, description = "Flashcards generated", body = GenerateFlashcardsResponse),
        (status = 400, description = "The body is not valid JSON, or content is missing or blank", body = ProblemDetails),
        (status = 502, description = "The provider failed or returned malformed content", body = ProblemDetails)
    )
)]
pub async fn generate_flashcards_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<GenerateFlashcardsRequest>, JsonRejection>,
) -> Result<Json<GenerateFlashcardsResponse>, ApiProblem> {
    let result = async {
        let Json(request) = payload.map_err(invalid_body)?;
        let content = require_text(request.content.as_deref(), "Content is required")?;
        app_state.gateway.generate_flashcards(content).await
    }
    .await;

    result
        .map(|items| {
            Json(GenerateFlashcardsResponse {
                flashcards: items.into_iter().map(FlashcardDto::from).collect(),
            })
        })
        .map_err(|e| reject("Failed to generate flashcards", e))
}

/// Synthesize speech for a block of text.
#[utoipa::path(
    post,
    path = "/api/ai/generate-audio",
    tag = "AI",
    request_body = GenerateAudioRequest,
    responses(
        (status = 200, description = "Audio generated", body = GenerateAudioResponse),
        (status = 400, description = "The body is not valid JSON, text is blank or the voice is unknown", body = ProblemDetails),
        (status = 502, description = "The speech provider failed", body = ProblemDetails)
    )
)]
pub async fn generate_audio_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<GenerateAudioRequest>, JsonRejection>,
) -> Result<Json<GenerateAudioResponse>, ApiProblem> {
    let result = async {
        let Json(request) = payload.map_err(invalid_body)?;
        let text = require_text(request.text.as_deref(), "Text is required")?;
        let voice = voice_or(&request.voice, DEFAULT_AUDIO_VOICE);
        app_state.gateway.generate_audio(text, voice).await
    }
    .await;

    result
        .map(|audio_content| Json(GenerateAudioResponse { audio_content }))
        .map_err(|e| reject("Failed to generate audio", e))
}

/// Synthesize speech for the question and/or answer of a flashcard.
#[utoipa::path(
    post,
    path = "/api/ai/generate-flashcard-audio",
    tag = "AI",
    request_body = GenerateFlashcardAudioRequest,
    responses(
        (status = 200, description = "Audio generated for the requested side(s)", body = GenerateFlashcardAudioResponse),
        (status = 400, description = "Flashcard is incomplete, the type is invalid or the voice is unknown", body = ProblemDetails),
        (status = 502, description = "The speech provider failed", body = ProblemDetails)
    )
)]
pub async fn generate_flashcard_audio_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<GenerateFlashcardAudioRequest>, JsonRejection>,
) -> Result<Json<GenerateFlashcardAudioResponse>, ApiProblem> {
    let result = match payload {
        Ok(Json(request)) => flashcard_audio(&app_state.gateway, request).await,
        Err(rejection) => Err(invalid_body(rejection)),
    };

    result
        .map(Json)
        .map_err(|e| reject("Failed to generate flashcard audio", e))
}

async fn flashcard_audio(
    gateway: &AiGateway,
    request: GenerateFlashcardAudioRequest,
) -> PortResult<GenerateFlashcardAudioResponse> {
    let payload = request
        .flashcard
        .ok_or_else(|| PortError::Validation("Flashcard is required".to_string()))?;
    let target = match request.audio_type.as_deref() {
        Some(raw) => raw.parse::<AudioTarget>().map_err(PortError::Validation)?,
        None => AudioTarget::default(),
    };

    require_text(payload.id.as_deref(), "Flashcard id is required")?;
    if target.includes_question() {
        require_text(payload.question.as_deref(), "Flashcard question is required")?;
    }
    if target.includes_answer() {
        require_text(payload.answer.as_deref(), "Flashcard answer is required")?;
    }

    let voice = voice_or(&request.voice, DEFAULT_FLASHCARD_VOICE);
    let flashcard = Flashcard {
        id: payload.id.unwrap_or_default(),
        question: payload.question.unwrap_or_default(),
        answer: payload.answer.unwrap_or_default(),
    };
    let audio = gateway
        .generate_flashcard_audio(&flashcard, voice, target)
        .await?;

    Ok(GenerateFlashcardAudioResponse {
        question_audio: audio.question_audio,
        answer_audio: audio.answer_audio,
    })
}

/// Liveness check.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is running", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
