//! Custom story service - ownership-checked CRUD for user-authored stories

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::application::ports::outbound::{CustomStoryRepositoryPort, PersistenceError};
use crate::domain::entities::{CustomStory, CustomStoryDraft};
use crate::domain::value_objects::StoryId;

#[derive(Debug, thiserror::Error)]
pub enum CustomStoryError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Story not found: {0}")]
    NotFound(StoryId),

    #[error("Only the author may modify story {0}")]
    NotAuthorized(StoryId),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

pub struct CustomStoryService {
    repository: Arc<dyn CustomStoryRepositoryPort>,
}

impl CustomStoryService {
    pub fn new(repository: Arc<dyn CustomStoryRepositoryPort>) -> Self {
        Self { repository }
    }

    pub async fn list_mine(&self, user_id: &str) -> Result<Vec<CustomStory>, CustomStoryError> {
        Ok(self.repository.list_by_user(user_id).await?)
    }

    /// Public stories, leaving out the viewer's own
    pub async fn list_public(
        &self,
        viewer: Option<&str>,
    ) -> Result<Vec<CustomStory>, CustomStoryError> {
        let stories = self.repository.list_public().await?;
        Ok(stories
            .into_iter()
            .filter(|story| viewer != Some(story.user_id.as_str()))
            .collect())
    }

    /// A story the viewer may see; private stories of others read as missing
    pub async fn get(
        &self,
        id: StoryId,
        viewer: Option<&str>,
    ) -> Result<CustomStory, CustomStoryError> {
        self.repository
            .get(id)
            .await?
            .filter(|story| story.is_visible_to(viewer))
            .ok_or(CustomStoryError::NotFound(id))
    }

    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn create(
        &self,
        user_id: &str,
        draft: CustomStoryDraft,
    ) -> Result<CustomStory, CustomStoryError> {
        draft.validate().map_err(CustomStoryError::Validation)?;

        let story = CustomStory::new(user_id, draft);
        self.repository.create(&story).await?;
        info!(story_id = %story.id, "Created custom story");
        Ok(story)
    }

    #[instrument(skip(self, draft), fields(story_id = %id))]
    pub async fn update(
        &self,
        user_id: &str,
        id: StoryId,
        draft: CustomStoryDraft,
    ) -> Result<CustomStory, CustomStoryError> {
        draft.validate().map_err(CustomStoryError::Validation)?;

        let mut story = self.owned(user_id, id).await?;
        story.draft = draft;
        story.updated_at = Utc::now();
        self.repository.update(&story).await?;
        debug!("Updated custom story");
        Ok(story)
    }

    #[instrument(skip(self), fields(story_id = %id))]
    pub async fn delete(&self, user_id: &str, id: StoryId) -> Result<(), CustomStoryError> {
        self.owned(user_id, id).await?;
        if !self.repository.delete(user_id, id).await? {
            return Err(CustomStoryError::NotFound(id));
        }
        info!("Deleted custom story");
        Ok(())
    }

    async fn owned(&self, user_id: &str, id: StoryId) -> Result<CustomStory, CustomStoryError> {
        let story = self
            .repository
            .get(id)
            .await?
            .ok_or(CustomStoryError::NotFound(id))?;
        if story.user_id != user_id {
            return Err(CustomStoryError::NotAuthorized(id));
        }
        Ok(story)
    }
}
