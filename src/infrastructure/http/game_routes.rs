//! Game session API routes

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::{parse_id, ApiError, CurrentUser};
use crate::application::services::TurnOutcome;
use crate::domain::entities::GameState;
use crate::domain::value_objects::GameId;
use crate::infrastructure::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartGameRequest {
    pub scenario_id: String,
    pub username: String,
    /// Chosen option per customization category
    #[serde(default)]
    pub customizations: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct TurnRequest {
    pub action: String,
}

/// Identifies the saved game to resume; a full saved game object also fits
#[derive(Debug, Deserialize)]
pub struct LoadGameRequest {
    pub id: GameId,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub success: bool,
}

/// Start a new game; signed-in callers own the session
pub async fn start_game(
    State(state): State<Arc<AppState>>,
    user: Option<CurrentUser>,
    payload: Result<Json<StartGameRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<GameState>), ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let game = state
        .game_service
        .start(
            &req.scenario_id,
            &req.username,
            req.customizations,
            user.map(|u| u.0),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(game)))
}

pub async fn get_game(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<GameState>, ApiError> {
    let id: GameId = parse_id(&id)?;
    Ok(Json(state.game_service.get(id).await?))
}

/// Drop the active session without saving it
pub async fn discard_game(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: GameId = parse_id(&id)?;
    state.game_service.discard(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Submit a player action and receive the narration
pub async fn take_turn(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<TurnRequest>, JsonRejection>,
) -> Result<Json<TurnOutcome>, ApiError> {
    let id: GameId = parse_id(&id)?;
    let Json(req) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    Ok(Json(state.game_service.take_turn(id, &req.action).await?))
}

pub async fn end_game(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<GameState>, ApiError> {
    let id: GameId = parse_id(&id)?;
    Ok(Json(state.game_service.end(id).await?))
}

pub async fn save_game(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<SaveResponse>, ApiError> {
    let id: GameId = parse_id(&id)?;
    let success = state.game_service.save(id, user.id()).await?;
    Ok(Json(SaveResponse { success }))
}

/// Resume one of the caller's saved games as an active session
pub async fn load_game(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    payload: Result<Json<LoadGameRequest>, JsonRejection>,
) -> Result<Json<GameState>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    Ok(Json(state.game_service.load(user.id(), req.id).await?))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::application::services::test_support::ScriptedLlm;
    use crate::infrastructure::http::test_support::{app, send};

    async fn start(app: &axum::Router, user: Option<&str>) -> Value {
        let body = json!({
            "scenarioId": "asian-parent",
            "username": "Alice",
            "customizations": { "background": "Tiger Parent" }
        });
        let (status, value) = send(app, "POST", "/api/games", user, Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        value
    }

    #[tokio::test]
    async fn test_start_game_builds_character() {
        let app = app(Arc::new(ScriptedLlm::replying("unused"))).await;
        let game = start(&app, None).await;

        assert_eq!(game["scenarioName"], "asian-parent");
        assert_eq!(game["currentTurn"], 1);
        assert_eq!(game["isEnded"], false);
        assert_eq!(game["player"]["attributes"]["Academic Performance"], 8);
        assert_eq!(game["player"]["skills"]["Math"], 8);
        assert_eq!(
            game["history"][0]["content"],
            "Welcome to Raising Your Asian Child. The game is starting..."
        );

        let uri = format!("/api/games/{}", game["id"].as_str().unwrap());
        let (status, fetched) = send(&app, "GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, game);
    }

    #[tokio::test]
    async fn test_start_game_rejects_bad_input() {
        let app = app(Arc::new(ScriptedLlm::replying("unused"))).await;

        let unknown = json!({ "scenarioId": "moon-base", "username": "Alice" });
        let (status, _) = send(&app, "POST", "/api/games", None, Some(unknown)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let blank = json!({ "scenarioId": "asian-parent", "username": "  " });
        let (status, _) = send(&app, "POST", "/api/games", None, Some(blank)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_turn_then_end() {
        let app = app(Arc::new(ScriptedLlm::replying("Your child aces the quiz."))).await;
        let game = start(&app, None).await;
        let id = game["id"].as_str().unwrap();

        let turn_uri = format!("/api/games/{}/turns", id);
        let (status, outcome) = send(
            &app,
            "POST",
            &turn_uri,
            None,
            Some(json!({ "action": "Hire a math tutor" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outcome["narration"], "Your child aces the quiz.");
        assert_eq!(outcome["generated"], true);
        let roll = outcome["roll"].as_u64().unwrap();
        assert!((1..=20).contains(&roll));
        assert_eq!(outcome["state"]["currentTurn"], 2);
        assert_eq!(outcome["state"]["history"].as_array().unwrap().len(), 3);

        let (status, ended) =
            send(&app, "POST", &format!("/api/games/{}/end", id), None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ended["isEnded"], true);

        let (status, _) = send(
            &app,
            "POST",
            &turn_uri,
            None,
            Some(json!({ "action": "Try again" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_discard_game() {
        let app = app(Arc::new(ScriptedLlm::replying("unused"))).await;
        let game = start(&app, None).await;
        let uri = format!("/api/games/{}", game["id"].as_str().unwrap());

        let (status, _) = send(&app, "DELETE", &uri, None, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, "DELETE", &uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_ids() {
        let app = app(Arc::new(ScriptedLlm::replying("unused"))).await;

        let (status, _) = send(&app, "GET", "/api/games/not-a-uuid", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let missing = format!("/api/games/{}", uuid::Uuid::new_v4());
        let (status, value) = send(&app, "GET", &missing, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(value["error"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_save_and_load_require_identity() {
        let app = app(Arc::new(ScriptedLlm::replying("unused"))).await;
        let game = start(&app, None).await;
        let save_uri = format!("/api/games/{}/save", game["id"].as_str().unwrap());

        let (status, _) = send(&app, "POST", &save_uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, value) = send(&app, "POST", &save_uri, Some("user-1"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value, json!({ "success": true }));

        let (status, saved) = send(&app, "GET", "/api/saved-games", Some("user-1"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(saved.as_array().unwrap().len(), 1);

        let (status, loaded) =
            send(&app, "POST", "/api/games/load", Some("user-1"), Some(saved[0].clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(loaded["id"], game["id"]);

        let (status, _) =
            send(&app, "POST", "/api/games/load", None, Some(saved[0].clone())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_games_stay_with_their_owner() {
        let app = app(Arc::new(ScriptedLlm::replying("The recital goes well."))).await;
        let game = start(&app, Some("owner")).await;
        let id = game["id"].as_str().unwrap();
        let save_uri = format!("/api/games/{}/save", id);

        let (status, _) = send(&app, "POST", &save_uri, Some("owner"), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, value) = send(&app, "POST", &save_uri, Some("intruder"), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(value["error"].as_str().unwrap().contains("another user"));

        // a client-supplied game cannot replace the live session
        let mut forged = game.clone();
        forged["player"]["attributes"]["Academic Performance"] = json!(20);
        let (status, _) =
            send(&app, "POST", "/api/games/load", Some("intruder"), Some(forged.clone())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) =
            send(&app, "POST", "/api/games/load", Some("owner"), Some(forged)).await;
        assert_eq!(status, StatusCode::OK);

        let (_, live) = send(&app, "GET", &format!("/api/games/{}", id), None, None).await;
        assert_eq!(live["player"]["attributes"]["Academic Performance"], 8);

        let (status, _) = send(
            &app,
            "POST",
            "/api/games/load",
            Some("owner"),
            Some(json!({ "id": "not-a-uuid" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_owned_game_is_saved_when_ended() {
        let app = app(Arc::new(ScriptedLlm::replying("unused"))).await;
        let game = start(&app, Some("user-2")).await;
        let end_uri = format!("/api/games/{}/end", game["id"].as_str().unwrap());

        let (status, _) = send(&app, "POST", &end_uri, Some("user-2"), None).await;
        assert_eq!(status, StatusCode::OK);

        let (_, profile) = send(&app, "GET", "/api/profile", Some("user-2"), None).await;
        assert_eq!(profile["gamesPlayed"], 1);
    }
}
