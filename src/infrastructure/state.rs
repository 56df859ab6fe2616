//! Shared application state

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::application::ports::outbound::{
    CustomStoryRepositoryPort, DiceRollerPort, GameRepositoryPort, LlmPort, ThreadRngDice,
};
use crate::application::services::{
    CustomStoryService, GameService, SavedGameService, StoryChatService, TurnResolutionService,
};
use crate::domain::aggregates::ScenarioCatalog;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::openai::OpenAiClient;
use crate::infrastructure::persistence::{self, SqliteCustomStoryRepository, SqliteGameRepository};
use crate::infrastructure::scenario_catalog::load_catalog;

pub struct AppState {
    pub config: AppConfig,
    pub catalog: Arc<ScenarioCatalog>,
    pub game_service: GameService,
    pub saved_game_service: Arc<SavedGameService>,
    pub custom_story_service: CustomStoryService,
    pub story_chat_service: StoryChatService,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let catalog = Arc::new(load_catalog(config.scenario_catalog_path.as_deref())?);
        tracing::info!("Scenario catalog ready with {} scenarios", catalog.len());

        let pool = persistence::connect(&config.database_url).await?;
        let games = SqliteGameRepository::new(pool.clone())
            .await
            .context("Failed to prepare saved game tables")?;
        let stories = SqliteCustomStoryRepository::new(pool)
            .await
            .context("Failed to prepare custom story table")?;

        let llm = OpenAiClient::new(
            &config.llm_base_url,
            &config.llm_model,
            config.llm_api_key.clone(),
            config.llm_timeout(),
        );
        tracing::info!("Narration model: {}", llm.model());
        if config.llm_api_key.is_none() {
            tracing::warn!("No LLM API key configured; requests are sent unauthenticated");
        }

        Ok(Self::from_parts(
            config,
            catalog,
            Arc::new(llm),
            Arc::new(ThreadRngDice),
            Arc::new(games),
            Arc::new(stories),
        ))
    }

    /// Wire the services over already-built adapters
    pub fn from_parts(
        config: AppConfig,
        catalog: Arc<ScenarioCatalog>,
        llm: Arc<dyn LlmPort>,
        dice: Arc<dyn DiceRollerPort>,
        games: Arc<dyn GameRepositoryPort>,
        stories: Arc<dyn CustomStoryRepositoryPort>,
    ) -> Self {
        let resolver = Arc::new(TurnResolutionService::new(
            llm.clone(),
            dice,
            config.narration_settings(),
        ));
        let saved_game_service = Arc::new(SavedGameService::new(games));
        let game_service = GameService::new(catalog.clone(), resolver, saved_game_service.clone());
        let custom_story_service = CustomStoryService::new(stories.clone());
        let story_chat_service = StoryChatService::new(
            llm,
            catalog.clone(),
            stories,
            config.story_chat_settings(),
        );

        Self {
            config,
            catalog,
            game_service,
            saved_game_service,
            custom_story_service,
            story_chat_service,
        }
    }
}
