use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::warn;

use super::timestamp;
use crate::application::ports::outbound::{
    GameRepositoryPort, PersistenceError, PlayerProfile, ScenarioStats,
};
use crate::domain::entities::GameState;
use crate::domain::value_objects::GameId;

/// Saved games, per-scenario stats and the games-played counter
pub struct SqliteGameRepository {
    pool: SqlitePool,
}

impl SqliteGameRepository {
    pub async fn new(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS saved_games (
                id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                game_state TEXT NOT NULL,
                is_ended INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (user_id, id)
            )
        "#,
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS game_stats (
                user_id TEXT NOT NULL,
                scenario_name TEXT NOT NULL,
                turns_played INTEGER NOT NULL,
                completed INTEGER NOT NULL,
                PRIMARY KEY (user_id, scenario_name)
            )
        "#,
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS profiles (
                user_id TEXT PRIMARY KEY,
                games_played INTEGER NOT NULL DEFAULT 0
            )
        "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl GameRepositoryPort for SqliteGameRepository {
    async fn save(&self, user_id: &str, state: &GameState) -> Result<(), PersistenceError> {
        let game_json = serde_json::to_string(state)?;
        let game_id = state.id.to_string();
        let now = timestamp(Utc::now());

        let mut tx = self.pool.begin().await?;

        let previous: Option<(bool,)> =
            sqlx::query_as("SELECT is_ended FROM saved_games WHERE user_id = ? AND id = ?")
                .bind(user_id)
                .bind(&game_id)
                .fetch_optional(&mut *tx)
                .await?;

        match previous {
            Some(_) => {
                sqlx::query(
                    "UPDATE saved_games SET game_state = ?, is_ended = ?, updated_at = ? WHERE user_id = ? AND id = ?",
                )
                .bind(&game_json)
                .bind(state.is_ended)
                .bind(&now)
                .bind(user_id)
                .bind(&game_id)
                .execute(&mut *tx)
                .await?;
            }
            None => {
                sqlx::query(
                    "INSERT INTO saved_games (id, user_id, game_state, is_ended, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
                )
                .bind(&game_id)
                .bind(user_id)
                .bind(&game_json)
                .bind(state.is_ended)
                .bind(&now)
                .bind(&now)
                .execute(&mut *tx)
                .await?;

                sqlx::query(
                    r#"
                    INSERT INTO game_stats (user_id, scenario_name, turns_played, completed)
                    VALUES (?, ?, ?, ?)
                    ON CONFLICT (user_id, scenario_name)
                    DO UPDATE SET turns_played = excluded.turns_played, completed = excluded.completed
                "#,
                )
                .bind(user_id)
                .bind(&state.scenario_name)
                .bind(i64::from(state.current_turn))
                .bind(state.is_ended)
                .execute(&mut *tx)
                .await?;
            }
        }

        let was_ended = previous.map(|(ended,)| ended).unwrap_or(false);
        if state.is_ended && !was_ended {
            sqlx::query(
                r#"
                INSERT INTO profiles (user_id, games_played) VALUES (?, 1)
                ON CONFLICT (user_id) DO UPDATE SET games_played = games_played + 1
            "#,
            )
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn load_all(&self, user_id: &str) -> Result<Vec<GameState>, PersistenceError> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT id, game_state FROM saved_games WHERE user_id = ? ORDER BY updated_at DESC, rowid DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        // one unreadable save must not hide the rest
        Ok(rows
            .into_iter()
            .filter_map(|(id, json)| match serde_json::from_str(&json) {
                Ok(state) => Some(state),
                Err(e) => {
                    warn!(game_id = %id, user_id, "Skipping unreadable saved game: {}", e);
                    None
                }
            })
            .collect())
    }

    async fn load(
        &self,
        user_id: &str,
        game_id: GameId,
    ) -> Result<Option<GameState>, PersistenceError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT game_state FROM saved_games WHERE user_id = ? AND id = ?")
                .bind(user_id)
                .bind(game_id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(|(json,)| serde_json::from_str(&json).map_err(PersistenceError::from))
            .transpose()
    }

    async fn delete(&self, user_id: &str, game_id: GameId) -> Result<(), PersistenceError> {
        sqlx::query("DELETE FROM saved_games WHERE user_id = ? AND id = ?")
            .bind(user_id)
            .bind(game_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn profile(&self, user_id: &str) -> Result<PlayerProfile, PersistenceError> {
        let games_played: Option<(i64,)> =
            sqlx::query_as("SELECT games_played FROM profiles WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        let stats: Vec<(String, i64, bool)> = sqlx::query_as(
            "SELECT scenario_name, turns_played, completed FROM game_stats WHERE user_id = ? ORDER BY scenario_name",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(PlayerProfile {
            user_id: user_id.to_string(),
            games_played: games_played.map(|(n,)| n.max(0) as u32).unwrap_or(0),
            stats: stats
                .into_iter()
                .map(|(scenario_name, turns_played, completed)| ScenarioStats {
                    scenario_name,
                    turns_played: turns_played.max(0) as u32,
                    completed,
                })
                .collect(),
        })
    }
}
