//! Game setup - resolve the scenario and create a fresh game

use std::collections::BTreeMap;

use crate::domain::aggregates::ScenarioCatalog;
use crate::domain::entities::GameState;
use crate::domain::errors::GameError;

/// Start a new game for `username` in the scenario keyed by `scenario_id`
///
/// Unknown scenarios are rejected before anything is created.
pub fn start_new_game(
    catalog: &ScenarioCatalog,
    scenario_id: &str,
    username: &str,
    customizations: BTreeMap<String, String>,
) -> Result<GameState, GameError> {
    let scenario = catalog.require(scenario_id)?;
    GameState::start(scenario, username, customizations)
}
