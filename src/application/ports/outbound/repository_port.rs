//! Repository ports - Interfaces for data persistence
//!
//! These traits define the contracts that infrastructure repositories must implement.
//! Application services depend on these traits, not concrete implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{CustomStory, GameState};
use crate::domain::value_objects::{GameId, StoryId};

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Per-scenario play record for a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioStats {
    pub scenario_name: String,
    pub turns_played: u32,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub user_id: String,
    pub games_played: u32,
    pub stats: Vec<ScenarioStats>,
}

// =============================================================================
// Saved Game Repository Port
// =============================================================================

#[async_trait]
pub trait GameRepositoryPort: Send + Sync {
    /// Insert or update the saved copy of a game, keyed by user and game id
    async fn save(&self, user_id: &str, state: &GameState) -> Result<(), PersistenceError>;

    /// All saved games of a user, most recently updated first
    async fn load_all(&self, user_id: &str) -> Result<Vec<GameState>, PersistenceError>;

    /// One saved game of the user, if it exists
    async fn load(
        &self,
        user_id: &str,
        game_id: GameId,
    ) -> Result<Option<GameState>, PersistenceError>;

    /// Delete a saved game owned by the user
    async fn delete(&self, user_id: &str, game_id: GameId) -> Result<(), PersistenceError>;

    async fn profile(&self, user_id: &str) -> Result<PlayerProfile, PersistenceError>;
}

// =============================================================================
// Custom Story Repository Port
// =============================================================================

#[async_trait]
pub trait CustomStoryRepositoryPort: Send + Sync {
    async fn create(&self, story: &CustomStory) -> Result<(), PersistenceError>;

    async fn get(&self, id: StoryId) -> Result<Option<CustomStory>, PersistenceError>;

    /// Stories authored by the user, most recently updated first
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<CustomStory>, PersistenceError>;

    async fn list_public(&self) -> Result<Vec<CustomStory>, PersistenceError>;

    async fn update(&self, story: &CustomStory) -> Result<(), PersistenceError>;

    /// Delete a story owned by the user; returns whether a row was removed
    async fn delete(&self, user_id: &str, id: StoryId) -> Result<bool, PersistenceError>;
}
