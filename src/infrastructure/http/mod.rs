//! HTTP JSON API routes
//!
//! Errors are answered as `{"error": "..."}` with a matching status code.

mod ai_routes;
mod auth;
mod custom_story_routes;
mod game_routes;
mod saved_game_routes;
mod scenario_routes;

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;

use crate::application::ports::outbound::PersistenceError;
use crate::application::services::{CustomStoryError, StoryChatError};
use crate::domain::errors::GameError;
use crate::infrastructure::state::AppState;

pub use auth::CurrentUser;

/// Create all API routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        // Narration endpoint used by the original client
        .route("/api/ai", post(ai_routes::narrate))
        // Scenario catalog
        .route("/api/scenarios", get(scenario_routes::list_scenarios))
        .route("/api/scenarios/{id}", get(scenario_routes::get_scenario))
        .route(
            "/api/scenarios/{id}/introduction",
            post(scenario_routes::generate_introduction),
        )
        // Server-held game sessions
        .route("/api/games", post(game_routes::start_game))
        .route("/api/games/load", post(game_routes::load_game))
        .route("/api/games/{id}", get(game_routes::get_game))
        .route("/api/games/{id}", delete(game_routes::discard_game))
        .route("/api/games/{id}/turns", post(game_routes::take_turn))
        .route("/api/games/{id}/end", post(game_routes::end_game))
        .route("/api/games/{id}/save", post(game_routes::save_game))
        // Saved games and profile
        .route("/api/saved-games", get(saved_game_routes::list_saved_games))
        .route(
            "/api/saved-games/{id}",
            delete(saved_game_routes::delete_saved_game),
        )
        .route("/api/profile", get(saved_game_routes::get_profile))
        // Custom stories
        .route("/api/stories", get(custom_story_routes::list_my_stories))
        .route("/api/stories", post(custom_story_routes::create_story))
        .route(
            "/api/stories/public",
            get(custom_story_routes::list_public_stories),
        )
        .route("/api/stories/{id}", get(custom_story_routes::get_story))
        .route("/api/stories/{id}", put(custom_story_routes::update_story))
        .route("/api/stories/{id}", delete(custom_story_routes::delete_story))
}

async fn health_check() -> &'static str {
    "OK"
}

/// Error response carrying a status and a user-facing message
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, "{}", self.message);
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<GameError> for ApiError {
    fn from(e: GameError) -> Self {
        let status = match &e {
            GameError::InvalidScenario(_) | GameError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            GameError::InvalidState(_) | GameError::TurnInProgress(_) => StatusCode::CONFLICT,
            GameError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            GameError::NotOwner(_) => StatusCode::FORBIDDEN,
        };
        Self::new(status, e.to_string())
    }
}

impl From<CustomStoryError> for ApiError {
    fn from(e: CustomStoryError) -> Self {
        let status = match &e {
            CustomStoryError::Validation(_) => StatusCode::BAD_REQUEST,
            CustomStoryError::NotFound(_) => StatusCode::NOT_FOUND,
            CustomStoryError::NotAuthorized(_) => StatusCode::FORBIDDEN,
            CustomStoryError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, e.to_string())
    }
}

impl From<StoryChatError> for ApiError {
    fn from(e: StoryChatError) -> Self {
        match e {
            StoryChatError::UnknownScenario(_) => Self::bad_request("Invalid scenario ID"),
            StoryChatError::MissingMessage => Self::bad_request("Message is required"),
            StoryChatError::Generation(e) => {
                tracing::warn!("Story generation failed: {}", e);
                Self::internal("Failed to generate AI response")
            }
            StoryChatError::Persistence(e) => Self::internal(e.to_string()),
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(e: PersistenceError) -> Self {
        Self::internal(e.to_string())
    }
}

/// Parse a path id, answering 400 for malformed values
fn parse_id<T: FromStr>(raw: &str) -> Result<T, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid id '{}'", raw)))
}
