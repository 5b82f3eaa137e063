pub mod rest;
pub mod state;

pub use rest::{
    generate_audio_handler, generate_flashcard_audio_handler, generate_flashcards_handler,
    generate_summary_handler, health_handler,
};

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use rest::ApiDoc;
use state::AppState;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Builds the complete application router: the AI endpoints, a health check and Swagger UI.
///
/// CORS is left to the binary so tests can drive the router directly.
pub fn router(app_state: Arc<AppState>) -> Router {
    let ai_routes = Router::new()
        .route("/generate-summary", post(generate_summary_handler))
        .route("/generate-flashcards", post(generate_flashcards_handler))
        .route("/generate-audio", post(generate_audio_handler))
        .route(
            "/generate-flashcard-audio",
            post(generate_flashcard_audio_handler),
        );

    let api_router = Router::new()
        .nest("/api/ai", ai_routes)
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
