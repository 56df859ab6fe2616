//! Scenario catalog API routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use super::ApiError;
use crate::domain::entities::{AttributeDefinition, Scenario};
use crate::domain::services::describe_customizations;
use crate::infrastructure::state::AppState;

/// Catalog listing entry; enough to render a scenario picker
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSummary {
    pub id: String,
    pub name: String,
    pub starting_point: String,
    pub introduction: String,
    pub attributes: Vec<AttributeDefinition>,
    pub customization_guide: String,
}

impl From<&Scenario> for ScenarioSummary {
    fn from(scenario: &Scenario) -> Self {
        Self {
            id: scenario.id.clone(),
            name: scenario.name.clone(),
            starting_point: scenario.starting_point.clone(),
            introduction: scenario.introduction.clone(),
            attributes: scenario.attributes.clone(),
            customization_guide: describe_customizations(scenario),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IntroductionResponse {
    pub introduction: String,
}

/// List all scenarios
pub async fn list_scenarios(State(state): State<Arc<AppState>>) -> Json<Vec<ScenarioSummary>> {
    Json(state.catalog.iter().map(ScenarioSummary::from).collect())
}

/// Get a scenario definition by catalog key
pub async fn get_scenario(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Scenario>, ApiError> {
    state
        .catalog
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| scenario_not_found(&id))
}

/// Narrate an opening for the scenario
pub async fn generate_introduction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<IntroductionResponse>, ApiError> {
    if state.catalog.get(&id).is_none() {
        return Err(scenario_not_found(&id));
    }
    let introduction = state.game_service.generate_introduction(&id).await?;
    Ok(Json(IntroductionResponse { introduction }))
}

fn scenario_not_found(id: &str) -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, format!("Scenario '{}' not found", id))
}
