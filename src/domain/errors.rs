//! Game rule violations

use crate::domain::value_objects::GameId;

/// Errors raised by game state transitions and game setup
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("Invalid game state: {0}")]
    InvalidState(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("A turn is already being resolved for game {0}")]
    TurnInProgress(GameId),

    #[error("Game session not found: {0}")]
    SessionNotFound(GameId),

    #[error("Game {0} belongs to another user")]
    NotOwner(GameId),
}
