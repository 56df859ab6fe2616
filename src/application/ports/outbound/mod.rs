//! Outbound ports - Interfaces that the application requires from external systems

mod dice_port;
mod llm_port;
mod repository_port;

#[cfg(test)]
pub use dice_port::MockDiceRollerPort;
pub use dice_port::{DiceRollerPort, ThreadRngDice};
pub use llm_port::{ChatMessage, LlmError, LlmPort, LlmRequest, LlmResponse, MessageRole};
pub use repository_port::{
    CustomStoryRepositoryPort, GameRepositoryPort, PersistenceError, PlayerProfile,
    ScenarioStats,
};
