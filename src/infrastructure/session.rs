//! Session management for active games
//!
//! Each game is addressed by its id. The store keeps the authoritative
//! in-progress state and, when known, the user that owns it. Turn slots
//! enforce that at most one turn per game is being resolved at a time.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use tokio::sync::RwLock;

use crate::domain::entities::GameState;
use crate::domain::errors::GameError;
use crate::domain::value_objects::GameId;

/// A running game and who it belongs to
#[derive(Debug, Clone)]
pub struct ActiveGame {
    pub state: GameState,
    /// User the game is saved under; anonymous games have none
    pub owner: Option<String>,
}

#[derive(Default)]
pub struct GameSessionStore {
    games: RwLock<HashMap<GameId, ActiveGame>>,
}

impl GameSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a game, replacing any session with the same id
    pub async fn insert(&self, state: GameState, owner: Option<String>) {
        self.games
            .write()
            .await
            .insert(state.id, ActiveGame { state, owner });
    }

    /// Resume a stored game for `owner`
    ///
    /// A session already running for the same owner is kept as is and its
    /// state returned; one held by anyone else is left alone.
    pub async fn resume(&self, state: GameState, owner: &str) -> Result<GameState, GameError> {
        let mut games = self.games.write().await;
        if let Some(game) = games.get(&state.id) {
            return match game.owner.as_deref() {
                Some(current) if current == owner => Ok(game.state.clone()),
                _ => Err(GameError::NotOwner(state.id)),
            };
        }
        games.insert(
            state.id,
            ActiveGame {
                state: state.clone(),
                owner: Some(owner.to_string()),
            },
        );
        Ok(state)
    }

    /// Make `user` the owner of an anonymous game and return its current state
    pub async fn claim_owner(&self, id: GameId, user: &str) -> Result<GameState, GameError> {
        let mut games = self.games.write().await;
        let game = games.get_mut(&id).ok_or(GameError::SessionNotFound(id))?;
        let owner = game.owner.get_or_insert_with(|| user.to_string());
        if owner.as_str() != user {
            return Err(GameError::NotOwner(id));
        }
        Ok(game.state.clone())
    }

    pub async fn get(&self, id: GameId) -> Option<ActiveGame> {
        self.games.read().await.get(&id).cloned()
    }

    /// Apply `f` to the stored state under the write lock
    ///
    /// The state is only written back when `f` succeeds.
    pub async fn update<T>(
        &self,
        id: GameId,
        f: impl FnOnce(&mut GameState) -> Result<T, GameError>,
    ) -> Result<(T, ActiveGame), GameError> {
        let mut games = self.games.write().await;
        let game = games.get_mut(&id).ok_or(GameError::SessionNotFound(id))?;

        let mut state = game.state.clone();
        let value = f(&mut state)?;
        game.state = state;
        Ok((value, game.clone()))
    }

    pub async fn remove(&self, id: GameId) -> Option<ActiveGame> {
        self.games.write().await.remove(&id)
    }

    pub async fn len(&self) -> usize {
        self.games.read().await.len()
    }
}

/// Registry of games with a turn currently being resolved
#[derive(Default)]
pub struct TurnSlots {
    busy: Mutex<HashSet<GameId>>,
}

impl TurnSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the turn slot for `id`, or fail if a turn is already pending
    pub fn try_acquire(&self, id: GameId) -> Result<TurnSlot<'_>, GameError> {
        let mut busy = self.busy.lock().unwrap_or_else(|e| e.into_inner());
        if !busy.insert(id) {
            return Err(GameError::TurnInProgress(id));
        }
        Ok(TurnSlot { slots: self, id })
    }

    pub fn is_busy(&self, id: GameId) -> bool {
        self.busy
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&id)
    }
}

/// Held for the duration of one turn; releases the slot when dropped
pub struct TurnSlot<'a> {
    slots: &'a TurnSlots,
    id: GameId,
}

impl Drop for TurnSlot<'_> {
    fn drop(&mut self) {
        self.slots
            .busy
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.id);
    }
}
