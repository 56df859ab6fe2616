//! Story chat - free-form narration driven by a scenario's story prompt
//!
//! Unlike game sessions there is no character sheet and no roll; the client
//! keeps the transcript and sends it back with each message.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::application::ports::outbound::{
    ChatMessage, CustomStoryRepositoryPort, LlmError, LlmPort, LlmRequest, PersistenceError,
};
use crate::application::services::llm::complete_with_timeout;
use crate::application::services::llm::prompt_builder::STORY_START_MESSAGE;
use crate::domain::aggregates::ScenarioCatalog;
use crate::domain::value_objects::StoryId;

#[derive(Debug, thiserror::Error)]
pub enum StoryChatError {
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    #[error("Message is required")]
    MissingMessage,

    #[error("Failed to generate AI response: {0}")]
    Generation(#[from] LlmError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// One transcript entry as the client sends it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryHistoryEntry {
    pub role: String,
    pub content: String,
}

impl StoryHistoryEntry {
    fn to_chat_message(&self) -> ChatMessage {
        if self.role == "assistant" {
            ChatMessage::assistant(self.content.clone())
        } else {
            ChatMessage::user(self.content.clone())
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoryChatSettings {
    pub history_window: usize,
    pub max_output_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for StoryChatSettings {
    fn default() -> Self {
        Self {
            history_window: 10,
            max_output_tokens: 500,
            temperature: 0.7,
            timeout: Duration::from_secs(60),
        }
    }
}

/// What the narrator needs to know about a story
struct StoryContext {
    system_prompt: String,
    introduction: String,
}

pub struct StoryChatService {
    llm: Arc<dyn LlmPort>,
    catalog: Arc<ScenarioCatalog>,
    stories: Arc<dyn CustomStoryRepositoryPort>,
    settings: StoryChatSettings,
}

impl StoryChatService {
    pub fn new(
        llm: Arc<dyn LlmPort>,
        catalog: Arc<ScenarioCatalog>,
        stories: Arc<dyn CustomStoryRepositoryPort>,
        settings: StoryChatSettings,
    ) -> Self {
        Self {
            llm,
            catalog,
            stories,
            settings,
        }
    }

    /// Introduction followed by the narrator's first situation
    #[instrument(skip(self))]
    pub async fn start(
        &self,
        scenario_id: &str,
        viewer: Option<&str>,
    ) -> Result<String, StoryChatError> {
        let story = self.resolve_story(scenario_id, viewer).await?;

        let request = LlmRequest::new(vec![ChatMessage::user(STORY_START_MESSAGE)])
            .with_system_prompt(story.system_prompt);
        let opening = self.complete(request).await?;

        Ok(format!("{}\n\n{}", story.introduction, opening))
    }

    #[instrument(skip(self, message, history), fields(history_len = history.len()))]
    pub async fn chat(
        &self,
        scenario_id: &str,
        message: Option<&str>,
        history: &[StoryHistoryEntry],
        viewer: Option<&str>,
    ) -> Result<String, StoryChatError> {
        let message = message
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .ok_or(StoryChatError::MissingMessage)?;
        let story = self.resolve_story(scenario_id, viewer).await?;

        let start = history.len().saturating_sub(self.settings.history_window);
        let mut messages: Vec<ChatMessage> = history[start..]
            .iter()
            .map(StoryHistoryEntry::to_chat_message)
            .collect();
        messages.push(ChatMessage::user(message));

        let request = LlmRequest::new(messages).with_system_prompt(story.system_prompt);
        self.complete(request).await
    }

    async fn complete(&self, request: LlmRequest) -> Result<String, StoryChatError> {
        let request = request
            .with_temperature(self.settings.temperature)
            .with_max_tokens(self.settings.max_output_tokens);

        complete_with_timeout(self.llm.as_ref(), request, self.settings.timeout)
            .await
            .map_err(|e| {
                warn!("Story narration failed: {}", e);
                StoryChatError::Generation(e)
            })
    }

    /// Built-in scenarios first, then custom stories visible to the viewer
    async fn resolve_story(
        &self,
        scenario_id: &str,
        viewer: Option<&str>,
    ) -> Result<StoryContext, StoryChatError> {
        if let Some(scenario) = self.catalog.get(scenario_id) {
            return Ok(StoryContext {
                system_prompt: scenario.story_prompt.clone(),
                introduction: scenario.introduction.clone(),
            });
        }

        let unknown = || StoryChatError::UnknownScenario(scenario_id.to_string());
        let id: StoryId = scenario_id.parse().map_err(|_| unknown())?;
        let story = self
            .stories
            .get(id)
            .await?
            .filter(|story| story.is_visible_to(viewer))
            .ok_or_else(unknown)?;

        Ok(StoryContext {
            system_prompt: story.narrator_prompt(),
            introduction: story.draft.introduction.clone(),
        })
    }
}
