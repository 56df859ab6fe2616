//! Application services - Use case implementations
//!
//! Each service takes its collaborators as `Arc<dyn Port>` and returns
//! domain entities or small result types for the HTTP layer.

pub mod custom_story_service;
pub mod game_service;
pub mod llm;
pub mod saved_game_service;
pub mod story_chat_service;
pub mod turn_resolution_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use custom_story_service::{CustomStoryError, CustomStoryService};
pub use game_service::{GameService, TurnOutcome};
pub use saved_game_service::SavedGameService;
pub use story_chat_service::{StoryChatError, StoryChatService, StoryChatSettings, StoryHistoryEntry};
pub use turn_resolution_service::{NarrationSettings, TurnResolutionService};
