//! Game service - drives active sessions through their lifecycle
//!
//! Start, take turns, end, save and resume. Turns are single-flight per
//! game: a second submission while one is resolving is rejected.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::application::services::saved_game_service::SavedGameService;
use crate::application::services::turn_resolution_service::TurnResolutionService;
use crate::domain::aggregates::ScenarioCatalog;
use crate::domain::entities::GameState;
use crate::domain::errors::GameError;
use crate::domain::services::start_new_game;
use crate::domain::value_objects::{D20Roll, GameId};
use crate::infrastructure::session::{GameSessionStore, TurnSlots};

/// Result of a turn taken against a server-held session
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnOutcome {
    pub narration: String,
    pub roll: D20Roll,
    pub generated: bool,
    pub state: GameState,
}

pub struct GameService {
    catalog: Arc<ScenarioCatalog>,
    resolver: Arc<TurnResolutionService>,
    saved_games: Arc<SavedGameService>,
    sessions: GameSessionStore,
    turn_slots: TurnSlots,
}

impl GameService {
    pub fn new(
        catalog: Arc<ScenarioCatalog>,
        resolver: Arc<TurnResolutionService>,
        saved_games: Arc<SavedGameService>,
    ) -> Self {
        Self {
            catalog,
            resolver,
            saved_games,
            sessions: GameSessionStore::new(),
            turn_slots: TurnSlots::new(),
        }
    }

    #[instrument(skip(self, customizations))]
    pub async fn start(
        &self,
        scenario_id: &str,
        username: &str,
        customizations: BTreeMap<String, String>,
        owner: Option<String>,
    ) -> Result<GameState, GameError> {
        let state = start_new_game(&self.catalog, scenario_id, username, customizations)?;
        self.sessions.insert(state.clone(), owner).await;
        let active_sessions = self.sessions.len().await;
        info!(game_id = %state.id, active_sessions, "Started new game");
        Ok(state)
    }

    pub async fn get(&self, id: GameId) -> Result<GameState, GameError> {
        self.sessions
            .get(id)
            .await
            .map(|game| game.state)
            .ok_or(GameError::SessionNotFound(id))
    }

    /// Resolve `action` and fold the player message and narration into the session
    #[instrument(skip(self, action), fields(game_id = %id))]
    pub async fn take_turn(&self, id: GameId, action: &str) -> Result<TurnOutcome, GameError> {
        let _slot = self.turn_slots.try_acquire(id)?;

        let state = self.get(id).await?;
        let scenario = self.catalog.require(&state.scenario_name)?;
        let resolution = self
            .resolver
            .resolve_turn_detailed(&state, action, scenario)
            .await?;

        let action = action.trim();
        let (_, game) = self
            .sessions
            .update(id, |state| {
                state.append_player_message(action)?;
                state.append_narrator_message(resolution.narration.clone());
                Ok(())
            })
            .await?;

        Ok(TurnOutcome {
            narration: resolution.narration,
            roll: resolution.roll,
            generated: resolution.generated,
            state: game.state,
        })
    }

    /// Resolve a turn for a game whose state is held by the client
    ///
    /// Nothing is stored; the caller appends the narration itself.
    #[instrument(skip(self, state, action), fields(game_id = %state.id))]
    pub async fn resolve_client_turn(
        &self,
        state: &GameState,
        action: &str,
    ) -> Result<String, GameError> {
        let _slot = self.turn_slots.try_acquire(state.id)?;
        let scenario = self.catalog.require(&state.scenario_name)?;
        self.resolver.resolve_turn(state, action, scenario).await
    }

    /// End the game; owned games are saved on the way out
    #[instrument(skip(self))]
    pub async fn end(&self, id: GameId) -> Result<GameState, GameError> {
        let (_, game) = self
            .sessions
            .update(id, |state| {
                state.end();
                Ok(())
            })
            .await?;

        info!(status = ?game.state.status(), turn = game.state.current_turn, "Game ended");
        if let Some(owner) = &game.owner {
            if !self.saved_games.save(owner, &game.state).await {
                warn!("Ended game could not be saved; session kept in memory");
            }
        }

        Ok(game.state)
    }

    /// Save the session under `user_id`, claiming ownership of anonymous games
    ///
    /// Games owned by someone else are refused.
    #[instrument(skip(self))]
    pub async fn save(&self, id: GameId, user_id: &str) -> Result<bool, GameError> {
        let state = self.sessions.claim_owner(id, user_id).await?;
        Ok(self.saved_games.save(user_id, &state).await)
    }

    /// Resume one of the user's saved games as an active session
    ///
    /// Only the stored copy is trusted. A session that is already running
    /// stays untouched: its owner gets the live state back, anyone else is
    /// refused.
    #[instrument(skip(self))]
    pub async fn load(&self, user_id: &str, id: GameId) -> Result<GameState, GameError> {
        if self.turn_slots.is_busy(id) {
            return Err(GameError::TurnInProgress(id));
        }
        let state = self
            .saved_games
            .find(user_id, id)
            .await
            .ok_or(GameError::SessionNotFound(id))?;
        self.catalog.require(&state.scenario_name)?;

        let resumed = self.sessions.resume(state, user_id).await?;
        info!(turn = resumed.current_turn, "Resumed saved game");
        Ok(resumed)
    }

    /// Drop an active session; a game with a turn in flight is kept
    pub async fn discard(&self, id: GameId) -> Result<(), GameError> {
        if self.turn_slots.is_busy(id) {
            return Err(GameError::TurnInProgress(id));
        }
        self.sessions
            .remove(id)
            .await
            .map(|_| ())
            .ok_or(GameError::SessionNotFound(id))
    }

    pub async fn generate_introduction(&self, scenario_id: &str) -> Result<String, GameError> {
        let scenario = self.catalog.require(scenario_id)?;
        Ok(self.resolver.generate_introduction(scenario).await)
    }
}
