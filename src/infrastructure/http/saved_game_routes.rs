//! Saved game and player profile API routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use super::{game_routes::SaveResponse, parse_id, ApiError, CurrentUser};
use crate::application::ports::outbound::PlayerProfile;
use crate::domain::entities::GameState;
use crate::domain::value_objects::GameId;
use crate::infrastructure::state::AppState;

/// The caller's saved games, most recently updated first
pub async fn list_saved_games(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Json<Vec<GameState>> {
    Json(state.saved_game_service.load_all(user.id()).await)
}

/// Delete one of the caller's saved games
pub async fn delete_saved_game(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<SaveResponse>, ApiError> {
    let id: GameId = parse_id(&id)?;
    let success = state.saved_game_service.delete(user.id(), id).await;
    Ok(Json(SaveResponse { success }))
}

pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Result<Json<PlayerProfile>, ApiError> {
    Ok(Json(state.saved_game_service.profile(user.id()).await?))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::json;

    use crate::application::services::test_support::ScriptedLlm;
    use crate::infrastructure::http::test_support::{app, send};

    #[tokio::test]
    async fn test_requires_identity() {
        let app = app(Arc::new(ScriptedLlm::replying("unused"))).await;

        for (method, uri) in [
            ("GET", "/api/saved-games".to_string()),
            ("GET", "/api/profile".to_string()),
            ("DELETE", format!("/api/saved-games/{}", uuid::Uuid::new_v4())),
        ] {
            let (status, value) = send(&app, method, &uri, None, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
            assert_eq!(value["error"], "User not authenticated");
        }
    }

    #[tokio::test]
    async fn test_delete_is_owner_scoped() {
        let app = app(Arc::new(ScriptedLlm::replying("Narration."))).await;
        let body = json!({ "scenarioId": "asian-parent", "username": "Alice" });
        let (_, game) = send(&app, "POST", "/api/games", Some("owner"), Some(body)).await;
        let id = game["id"].as_str().unwrap();
        send(&app, "POST", &format!("/api/games/{}/save", id), Some("owner"), None).await;

        let delete_uri = format!("/api/saved-games/{}", id);
        let (status, _) = send(&app, "DELETE", &delete_uri, Some("someone-else"), None).await;
        assert_eq!(status, StatusCode::OK);
        let (_, saved) = send(&app, "GET", "/api/saved-games", Some("owner"), None).await;
        assert_eq!(saved.as_array().unwrap().len(), 1);

        let (status, value) = send(&app, "DELETE", &delete_uri, Some("owner"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value, json!({ "success": true }));
        let (_, saved) = send(&app, "GET", "/api/saved-games", Some("owner"), None).await;
        assert!(saved.as_array().unwrap().is_empty());

        let (status, _) = send(&app, "DELETE", "/api/saved-games/bogus", Some("owner"), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_profile_reports_stats() {
        let app = app(Arc::new(ScriptedLlm::replying("Narration."))).await;
        let body = json!({ "scenarioId": "asian-parent", "username": "Alice" });
        let (_, game) = send(&app, "POST", "/api/games", Some("player"), Some(body)).await;
        let id = game["id"].as_str().unwrap();
        send(
            &app,
            "POST",
            &format!("/api/games/{}/turns", id),
            None,
            Some(json!({ "action": "Check homework" })),
        )
        .await;
        send(&app, "POST", &format!("/api/games/{}/end", id), None, None).await;

        let (status, profile) = send(&app, "GET", "/api/profile", Some("player"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(profile["gamesPlayed"], 1);
        assert_eq!(profile["stats"][0]["scenarioName"], "asian-parent");
        assert_eq!(profile["stats"][0]["completed"], true);
    }
}
