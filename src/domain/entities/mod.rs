//! Domain entities

pub(crate) mod custom_story;
mod game_state;
mod player;
pub(crate) mod scenario;

pub use custom_story::{CustomStory, CustomStoryDraft};
pub use game_state::{GameMessage, GameState, MessageRole};
pub use player::Player;
pub use scenario::{AttributeDefinition, Scenario, ScenarioValidationError, BASE_ATTRIBUTE_VALUE};
