//! Saved games - persistence of play sessions on behalf of a user
//!
//! Store failures are logged and reported as `false`/empty results. The
//! in-memory session is never affected by a failed save.

use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::application::ports::outbound::{GameRepositoryPort, PersistenceError, PlayerProfile};
use crate::domain::entities::GameState;
use crate::domain::value_objects::GameId;

pub struct SavedGameService {
    repository: Arc<dyn GameRepositoryPort>,
}

impl SavedGameService {
    pub fn new(repository: Arc<dyn GameRepositoryPort>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self, state), fields(game_id = %state.id))]
    pub async fn save(&self, user_id: &str, state: &GameState) -> bool {
        match self.repository.save(user_id, state).await {
            Ok(()) => {
                info!("Saved game at turn {}", state.current_turn);
                true
            }
            Err(e) => {
                error!("Failed to save game: {}", e);
                false
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn load_all(&self, user_id: &str) -> Vec<GameState> {
        self.repository.load_all(user_id).await.unwrap_or_else(|e| {
            error!("Failed to load saved games: {}", e);
            Vec::new()
        })
    }

    /// The user's saved copy of one game; store failures read as absent
    #[instrument(skip(self))]
    pub async fn find(&self, user_id: &str, game_id: GameId) -> Option<GameState> {
        self.repository
            .load(user_id, game_id)
            .await
            .unwrap_or_else(|e| {
                error!("Failed to load saved game: {}", e);
                None
            })
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: &str, game_id: GameId) -> bool {
        match self.repository.delete(user_id, game_id).await {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to delete saved game: {}", e);
                false
            }
        }
    }

    pub async fn profile(&self, user_id: &str) -> Result<PlayerProfile, PersistenceError> {
        self.repository.profile(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::entities::scenario::fixtures::parenting_scenario;

    /// Keeps saves in a map keyed by (user, game)
    #[derive(Default)]
    struct InMemoryRepository {
        games: Mutex<HashMap<(String, GameId), GameState>>,
    }

    #[async_trait]
    impl GameRepositoryPort for InMemoryRepository {
        async fn save(&self, user_id: &str, state: &GameState) -> Result<(), PersistenceError> {
            self.games
                .lock()
                .unwrap()
                .insert((user_id.to_string(), state.id), state.clone());
            Ok(())
        }

        async fn load_all(&self, user_id: &str) -> Result<Vec<GameState>, PersistenceError> {
            Ok(self
                .games
                .lock()
                .unwrap()
                .iter()
                .filter(|((owner, _), _)| owner == user_id)
                .map(|(_, state)| state.clone())
                .collect())
        }

        async fn load(
            &self,
            user_id: &str,
            game_id: GameId,
        ) -> Result<Option<GameState>, PersistenceError> {
            Ok(self
                .games
                .lock()
                .unwrap()
                .get(&(user_id.to_string(), game_id))
                .cloned())
        }

        async fn delete(&self, user_id: &str, game_id: GameId) -> Result<(), PersistenceError> {
            self.games
                .lock()
                .unwrap()
                .remove(&(user_id.to_string(), game_id));
            Ok(())
        }

        async fn profile(&self, user_id: &str) -> Result<PlayerProfile, PersistenceError> {
            Ok(PlayerProfile {
                user_id: user_id.to_string(),
                games_played: 0,
                stats: Vec::new(),
            })
        }
    }

    struct BrokenRepository;

    #[async_trait]
    impl GameRepositoryPort for BrokenRepository {
        async fn save(&self, _: &str, _: &GameState) -> Result<(), PersistenceError> {
            Err(PersistenceError::Database("disk full".to_string()))
        }

        async fn load_all(&self, _: &str) -> Result<Vec<GameState>, PersistenceError> {
            Err(PersistenceError::Database("connection reset".to_string()))
        }

        async fn load(&self, _: &str, _: GameId) -> Result<Option<GameState>, PersistenceError> {
            Err(PersistenceError::Database("connection reset".to_string()))
        }

        async fn delete(&self, _: &str, _: GameId) -> Result<(), PersistenceError> {
            Err(PersistenceError::Database("connection reset".to_string()))
        }

        async fn profile(&self, _: &str) -> Result<PlayerProfile, PersistenceError> {
            Err(PersistenceError::Database("connection reset".to_string()))
        }
    }

    fn new_game() -> GameState {
        GameState::start(&parenting_scenario(), "Alice", BTreeMap::new()).unwrap()
    }

    #[tokio::test]
    async fn test_save_load_delete_roundtrip() {
        let service = SavedGameService::new(Arc::new(InMemoryRepository::default()));
        let state = new_game();

        assert!(service.save("user-1", &state).await);
        assert_eq!(service.load_all("user-1").await, vec![state.clone()]);
        assert!(service.load_all("user-2").await.is_empty());
        assert_eq!(service.find("user-1", state.id).await, Some(state.clone()));
        assert_eq!(service.find("user-2", state.id).await, None);

        assert!(service.delete("user-1", state.id).await);
        assert!(service.load_all("user-1").await.is_empty());
    }

    #[tokio::test]
    async fn test_store_failures_become_false_or_empty() {
        let service = SavedGameService::new(Arc::new(BrokenRepository));
        let state = new_game();

        assert!(!service.save("user-1", &state).await);
        assert!(service.load_all("user-1").await.is_empty());
        assert_eq!(service.find("user-1", state.id).await, None);
        assert!(!service.delete("user-1", state.id).await);
        assert!(service.profile("user-1").await.is_err());
    }
}
