//! Game state - one play session
//!
//! History is append-only and chronological. Only player messages advance
//! the turn counter. Once a game is ended it stays ended.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Player, Scenario};
use crate::domain::errors::GameError;
use crate::domain::value_objects::{GameId, MessageId};

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    Player,
    #[serde(alias = "ai")]
    Narrator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMessage {
    pub id: MessageId,
    pub role: MessageRole,
    pub content: String,
    /// Milliseconds since the Unix epoch on the wire
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl GameMessage {
    fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Lifecycle position of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// Started, no player action yet
    Created,
    Active,
    Ended,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub id: GameId,
    /// Catalog key of the scenario being played
    pub scenario_name: String,
    pub player: Player,
    pub history: Vec<GameMessage>,
    pub current_turn: u32,
    pub is_ended: bool,
}

impl GameState {
    /// Start a game: build the character and seed the welcome message
    pub fn start(
        scenario: &Scenario,
        username: &str,
        customizations: BTreeMap<String, String>,
    ) -> Result<Self, GameError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(GameError::InvalidInput("Username cannot be empty".to_string()));
        }

        let player = Player::create(scenario, username, customizations);
        let welcome = GameMessage::new(
            MessageRole::Narrator,
            format!("Welcome to {}. The game is starting...", scenario.name),
        );

        Ok(Self {
            id: GameId::new(),
            scenario_name: scenario.id.clone(),
            player,
            history: vec![welcome],
            current_turn: 1,
            is_ended: false,
        })
    }

    /// Record a player action and advance the turn counter
    ///
    /// Fails without touching the state when the game has ended.
    pub fn append_player_message(&mut self, text: impl Into<String>) -> Result<&GameMessage, GameError> {
        if self.is_ended {
            return Err(GameError::InvalidState(format!(
                "Game {} has ended and accepts no further actions",
                self.id
            )));
        }

        self.history.push(GameMessage::new(MessageRole::Player, text));
        self.current_turn += 1;
        Ok(self.last_message())
    }

    pub fn append_narrator_message(&mut self, text: impl Into<String>) -> &GameMessage {
        self.history.push(GameMessage::new(MessageRole::Narrator, text));
        self.last_message()
    }

    /// Mark the game as ended. Ending twice is a no-op.
    pub fn end(&mut self) {
        self.is_ended = true;
    }

    /// The last `window` messages, oldest first
    pub fn recent_history(&self, window: usize) -> &[GameMessage] {
        let start = self.history.len().saturating_sub(window);
        &self.history[start..]
    }

    pub fn status(&self) -> GameStatus {
        if self.is_ended {
            GameStatus::Ended
        } else if self.history.iter().any(|m| m.role == MessageRole::Player) {
            GameStatus::Active
        } else {
            GameStatus::Created
        }
    }

    fn last_message(&self) -> &GameMessage {
        // history always holds at least the message that was just pushed
        &self.history[self.history.len() - 1]
    }
}
