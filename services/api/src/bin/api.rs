//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{
        build_http_client, ElevenLabsTtsAdapter, GeminiSummaryAdapter, OpenAiFlashcardsAdapter,
    },
    config::{Config, ConfigError},
    error::ApiError,
    web::{router, state::AppState},
};
use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use noteswise_core::AiGateway;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize Provider Adapters ---
    let http_client = build_http_client(config.http_timeout)?;

    let summary_adapter = Arc::new(GeminiSummaryAdapter::new(
        http_client.clone(),
        config.gemini.base_url.clone(),
        config.gemini.api_key.clone(),
        config.gemini.model.clone(),
    ));
    let flashcards_adapter = Arc::new(OpenAiFlashcardsAdapter::new(
        http_client.clone(),
        config.openai.base_url.clone(),
        config.openai.api_key.clone(),
        config.openai.model.clone(),
    ));
    let tts_adapter = Arc::new(ElevenLabsTtsAdapter::new(
        http_client,
        config.elevenlabs.base_url.clone(),
        config.elevenlabs.api_key.clone(),
        config.elevenlabs.model.clone(),
    ));
    info!("Provider adapters initialized");

    // --- 3. Build the Shared AppState ---
    let gateway = AiGateway::new(
        summary_adapter,
        flashcards_adapter,
        tts_adapter,
        config.voices.clone(),
        config.voice_settings,
    );
    info!(voices = ?gateway.voices().names(), "Voice registry loaded");
    let app_state = Arc::new(AppState {
        gateway: Arc::new(gateway),
    });

    // --- 4. Create the Web Router ---
    let cors_origin = config.cors_origin.parse::<HeaderValue>().map_err(|e| {
        ConfigError::InvalidValue("CORS_ORIGIN".to_string(), e.to_string())
    })?;
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    let app = router(app_state).layer(cors);

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
