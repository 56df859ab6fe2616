//! Custom story API routes

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use super::{parse_id, ApiError, CurrentUser};
use crate::domain::entities::{CustomStory, CustomStoryDraft};
use crate::domain::value_objects::StoryId;
use crate::infrastructure::state::AppState;

/// The caller's own stories, newest first
pub async fn list_my_stories(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
) -> Result<Json<Vec<CustomStory>>, ApiError> {
    Ok(Json(state.custom_story_service.list_mine(user.id()).await?))
}

/// Stories other authors have published
pub async fn list_public_stories(
    State(state): State<Arc<AppState>>,
    user: Option<CurrentUser>,
) -> Result<Json<Vec<CustomStory>>, ApiError> {
    let viewer = user.as_ref().map(CurrentUser::id);
    Ok(Json(state.custom_story_service.list_public(viewer).await?))
}

pub async fn get_story(
    State(state): State<Arc<AppState>>,
    user: Option<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<CustomStory>, ApiError> {
    let id: StoryId = parse_id(&id)?;
    let viewer = user.as_ref().map(CurrentUser::id);
    Ok(Json(state.custom_story_service.get(id, viewer).await?))
}

pub async fn create_story(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    payload: Result<Json<CustomStoryDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<CustomStory>), ApiError> {
    let Json(draft) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let story = state.custom_story_service.create(user.id(), draft).await?;
    Ok((StatusCode::CREATED, Json(story)))
}

pub async fn update_story(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<String>,
    payload: Result<Json<CustomStoryDraft>, JsonRejection>,
) -> Result<Json<CustomStory>, ApiError> {
    let id: StoryId = parse_id(&id)?;
    let Json(draft) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    Ok(Json(
        state
            .custom_story_service
            .update(user.id(), id, draft)
            .await?,
    ))
}

pub async fn delete_story(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id: StoryId = parse_id(&id)?;
    state.custom_story_service.delete(user.id(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
