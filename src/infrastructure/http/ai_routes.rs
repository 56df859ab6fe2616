//! Narration endpoint
//!
//! Accepts either a client-held game turn (`gameState` + `playerAction`) or a
//! story-chat action (`action` of `start` or `chat`).

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{ApiError, CurrentUser};
use crate::application::services::StoryHistoryEntry;
use crate::domain::entities::GameState;
use crate::infrastructure::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum NarrateRequest {
    #[serde(rename_all = "camelCase")]
    Turn {
        game_state: GameState,
        player_action: String,
    },
    #[serde(rename_all = "camelCase")]
    Story {
        action: String,
        scenario_id: String,
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        message_history: Vec<StoryHistoryEntry>,
    },
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum NarrateResponse {
    Turn { response: String },
    Story { message: String },
}

pub async fn narrate(
    State(state): State<Arc<AppState>>,
    user: Option<CurrentUser>,
    payload: Result<Json<NarrateRequest>, JsonRejection>,
) -> Result<Json<NarrateResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let viewer = user.as_ref().map(CurrentUser::id);

    match request {
        NarrateRequest::Turn {
            game_state,
            player_action,
        } => {
            let response = state
                .game_service
                .resolve_client_turn(&game_state, &player_action)
                .await?;
            Ok(Json(NarrateResponse::Turn { response }))
        }
        NarrateRequest::Story {
            action,
            scenario_id,
            message,
            message_history,
        } => {
            let chat = &state.story_chat_service;
            let message = match action.as_str() {
                "start" => chat.start(&scenario_id, viewer).await?,
                "chat" => {
                    chat.chat(&scenario_id, message.as_deref(), &message_history, viewer)
                        .await?
                }
                _ => return Err(ApiError::bad_request("Invalid action")),
            };
            Ok(Json(NarrateResponse::Story { message }))
        }
    }
}
