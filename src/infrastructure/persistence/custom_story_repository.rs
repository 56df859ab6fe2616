use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{parse_timestamp, timestamp};
use crate::application::ports::outbound::{CustomStoryRepositoryPort, PersistenceError};
use crate::domain::entities::{CustomStory, CustomStoryDraft};
use crate::domain::value_objects::StoryId;

const SELECT_COLUMNS: &str = "SELECT id, user_id, title, description, background_image_url, system_prompt, introduction, character_traits, is_public, created_at, updated_at FROM custom_stories";

pub struct SqliteCustomStoryRepository {
    pool: SqlitePool,
}

impl SqliteCustomStoryRepository {
    pub async fn new(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS custom_stories (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                background_image_url TEXT,
                system_prompt TEXT NOT NULL,
                introduction TEXT NOT NULL,
                character_traits TEXT NOT NULL DEFAULT '{}',
                is_public INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
        "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    async fn fetch(&self, sql: &str, bind: Option<&str>) -> Result<Vec<CustomStory>, PersistenceError> {
        let mut query = sqlx::query_as::<_, StoryRow>(sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }
        query
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(StoryRow::into_story)
            .collect()
    }
}

#[derive(sqlx::FromRow)]
struct StoryRow {
    id: String,
    user_id: String,
    title: String,
    description: String,
    background_image_url: Option<String>,
    system_prompt: String,
    introduction: String,
    character_traits: String,
    is_public: bool,
    created_at: String,
    updated_at: String,
}

impl StoryRow {
    fn into_story(self) -> Result<CustomStory, PersistenceError> {
        let id: StoryId = self
            .id
            .parse()
            .map_err(|e| PersistenceError::Serialization(format!("bad story id '{}': {}", self.id, e)))?;

        Ok(CustomStory {
            id,
            user_id: self.user_id,
            draft: CustomStoryDraft {
                title: self.title,
                description: self.description,
                background_image_url: self.background_image_url,
                system_prompt: self.system_prompt,
                introduction: self.introduction,
                character_traits: serde_json::from_str(&self.character_traits)?,
                is_public: self.is_public,
            },
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

#[async_trait]
impl CustomStoryRepositoryPort for SqliteCustomStoryRepository {
    async fn create(&self, story: &CustomStory) -> Result<(), PersistenceError> {
        let traits = serde_json::to_string(&story.draft.character_traits)?;

        sqlx::query(
            r#"
            INSERT INTO custom_stories
                (id, user_id, title, description, background_image_url, system_prompt,
                 introduction, character_traits, is_public, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
        )
        .bind(story.id.to_string())
        .bind(&story.user_id)
        .bind(&story.draft.title)
        .bind(&story.draft.description)
        .bind(&story.draft.background_image_url)
        .bind(&story.draft.system_prompt)
        .bind(&story.draft.introduction)
        .bind(traits)
        .bind(story.draft.is_public)
        .bind(timestamp(story.created_at))
        .bind(timestamp(story.updated_at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: StoryId) -> Result<Option<CustomStory>, PersistenceError> {
        let sql = format!("{} WHERE id = ?", SELECT_COLUMNS);
        let id = id.to_string();
        Ok(self.fetch(&sql, Some(&id)).await?.into_iter().next())
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<CustomStory>, PersistenceError> {
        let sql = format!("{} WHERE user_id = ? ORDER BY updated_at DESC", SELECT_COLUMNS);
        self.fetch(&sql, Some(user_id)).await
    }

    async fn list_public(&self) -> Result<Vec<CustomStory>, PersistenceError> {
        let sql = format!("{} WHERE is_public = 1 ORDER BY updated_at DESC", SELECT_COLUMNS);
        self.fetch(&sql, None).await
    }

    async fn update(&self, story: &CustomStory) -> Result<(), PersistenceError> {
        let traits = serde_json::to_string(&story.draft.character_traits)?;

        sqlx::query(
            r#"
            UPDATE custom_stories
            SET title = ?, description = ?, background_image_url = ?, system_prompt = ?,
                introduction = ?, character_traits = ?, is_public = ?, updated_at = ?
            WHERE id = ? AND user_id = ?
        "#,
        )
        .bind(&story.draft.title)
        .bind(&story.draft.description)
        .bind(&story.draft.background_image_url)
        .bind(&story.draft.system_prompt)
        .bind(&story.draft.introduction)
        .bind(traits)
        .bind(story.draft.is_public)
        .bind(timestamp(story.updated_at))
        .bind(story.id.to_string())
        .bind(&story.user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, user_id: &str, id: StoryId) -> Result<bool, PersistenceError> {
        let result = sqlx::query("DELETE FROM custom_stories WHERE id = ? AND user_id = ?")
            .bind(id.to_string())
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
