//! `PostgreSQL` progress store over the `player_progress` table.
//!
//! Completed levels and badges are `TEXT[]` columns holding catalog keys.
//! Updates are a single conditional statement:
//!
//! ```sql
//! UPDATE player_progress SET ..., version = version + 1
//! WHERE owner_id = $1 AND version = $2
//! ```
//!
//! so two writers racing on the same snapshot cannot both succeed.

use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

use quizquest_types::{BadgeId, LevelId, PlayerId, PlayerProgress, ProgressId};

use crate::error::DbError;
use crate::store::ProgressStore;

/// Columns selected for a full record, in [`ProgressRow`] order.
const PROGRESS_COLUMNS: &str = "id, owner_id, avatar_id, username, xp, player_level, \
                                completed_levels, badges, last_played, version";

/// Operations on the `player_progress` table.
#[derive(Debug, Clone, Copy)]
pub struct PgProgressStore<'a> {
    pool: &'a PgPool,
}

impl<'a> PgProgressStore<'a> {
    /// Create a new progress store bound to a connection pool.
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    async fn current_version(&self, owner: PlayerId) -> Result<Option<i64>, DbError> {
        let version: Option<(i64,)> =
            sqlx::query_as("SELECT version FROM player_progress WHERE owner_id = $1")
                .bind(owner.into_inner())
                .fetch_optional(self.pool)
                .await?;
        Ok(version.map(|(v,)| v))
    }
}

impl ProgressStore for PgProgressStore<'_> {
    async fn get(&self, owner: PlayerId) -> Result<PlayerProgress, DbError> {
        let sql = format!("SELECT {PROGRESS_COLUMNS} FROM player_progress WHERE owner_id = $1");
        let row = sqlx::query_as::<_, ProgressRow>(&sql)
            .bind(owner.into_inner())
            .fetch_optional(self.pool)
            .await?;
        row.ok_or(DbError::ProgressNotFound(owner))?.try_into()
    }

    async fn create(&self, initial: PlayerProgress) -> Result<PlayerProgress, DbError> {
        let row = ProgressRow::try_from(&initial)?;
        let sql = format!(
            "INSERT INTO player_progress ({PROGRESS_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 0) \
             ON CONFLICT (owner_id) DO NOTHING \
             RETURNING {PROGRESS_COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, ProgressRow>(&sql)
            .bind(row.id)
            .bind(row.owner_id)
            .bind(row.avatar_id)
            .bind(&row.username)
            .bind(row.xp)
            .bind(row.player_level)
            .bind(&row.completed_levels)
            .bind(&row.badges)
            .bind(row.last_played)
            .fetch_optional(self.pool)
            .await?;

        let stored: PlayerProgress = inserted
            .ok_or(DbError::AlreadyExists(initial.owner))?
            .try_into()?;
        debug!(owner = %stored.owner, "progress record stored");
        Ok(stored)
    }

    async fn update(
        &self,
        expected_version: u64,
        progress: PlayerProgress,
    ) -> Result<PlayerProgress, DbError> {
        let owner = progress.owner;
        let row = ProgressRow::try_from(&progress)?;
        let expected = to_i64("version", expected_version)?;
        let sql = format!(
            "UPDATE player_progress SET \
               avatar_id = $3, username = $4, xp = $5, player_level = $6, \
               completed_levels = $7, badges = $8, last_played = $9, \
               version = version + 1, updated_at = now() \
             WHERE owner_id = $1 AND version = $2 \
             RETURNING {PROGRESS_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, ProgressRow>(&sql)
            .bind(row.owner_id)
            .bind(expected)
            .bind(row.avatar_id)
            .bind(&row.username)
            .bind(row.xp)
            .bind(row.player_level)
            .bind(&row.completed_levels)
            .bind(&row.badges)
            .bind(row.last_played)
            .fetch_optional(self.pool)
            .await?;

        if let Some(updated) = updated {
            let stored: PlayerProgress = updated.try_into()?;
            debug!(owner = %owner, version = stored.version, "progress record updated");
            return Ok(stored);
        }

        match self.current_version(owner).await? {
            None => Err(DbError::ProgressNotFound(owner)),
            Some(actual) => {
                let actual = to_u64("version", actual)?;
                warn!(
                    owner = %owner,
                    expected = expected_version,
                    actual,
                    "progress update conflict"
                );
                Err(DbError::ConcurrencyConflict {
                    owner,
                    expected: expected_version,
                    actual,
                })
            }
        }
    }
}

// =============================================================================
// Row mapping
// =============================================================================

/// A row from the `player_progress` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProgressRow {
    /// Record identifier.
    pub id: Uuid,
    /// Owning player.
    pub owner_id: Uuid,
    /// Chosen avatar.
    pub avatar_id: i32,
    /// Display name.
    pub username: String,
    /// Accumulated XP.
    pub xp: i64,
    /// Derived player level.
    pub player_level: i64,
    /// Completed level keys.
    pub completed_levels: Vec<String>,
    /// Owned badge keys.
    pub badges: Vec<String>,
    /// Date of the most recent completion.
    pub last_played: Option<NaiveDate>,
    /// Optimistic concurrency version.
    pub version: i64,
}

impl TryFrom<&PlayerProgress> for ProgressRow {
    type Error = DbError;

    fn try_from(progress: &PlayerProgress) -> Result<Self, Self::Error> {
        Ok(Self {
            id: progress.id.into_inner(),
            owner_id: progress.owner.into_inner(),
            avatar_id: i32::try_from(progress.avatar_id)
                .map_err(|e| DbError::OutOfRange(format!("avatar_id: {e}")))?,
            username: progress.username.clone(),
            xp: to_i64("xp", progress.xp)?,
            player_level: to_i64("player_level", progress.player_level)?,
            completed_levels: progress
                .completed_levels
                .iter()
                .map(|id| id.as_str().to_owned())
                .collect(),
            badges: progress
                .badges
                .iter()
                .map(|id| id.as_str().to_owned())
                .collect(),
            last_played: progress.last_played,
            version: to_i64("version", progress.version)?,
        })
    }
}

impl TryFrom<ProgressRow> for PlayerProgress {
    type Error = DbError;

    fn try_from(row: ProgressRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ProgressId::from(row.id),
            owner: PlayerId::from(row.owner_id),
            avatar_id: u32::try_from(row.avatar_id)
                .map_err(|e| DbError::OutOfRange(format!("avatar_id: {e}")))?,
            username: row.username,
            xp: to_u64("xp", row.xp)?,
            player_level: to_u64("player_level", row.player_level)?,
            completed_levels: row.completed_levels.into_iter().map(LevelId::new).collect(),
            badges: row.badges.into_iter().map(BadgeId::new).collect(),
            last_played: row.last_played,
            version: to_u64("version", row.version)?,
        })
    }
}

fn to_i64(field: &str, value: u64) -> Result<i64, DbError> {
    i64::try_from(value).map_err(|e| DbError::OutOfRange(format!("{field}: {e}")))
}

fn to_u64(field: &str, value: i64) -> Result<u64, DbError> {
    u64::try_from(value).map_err(|e| DbError::OutOfRange(format!("{field}: {e}")))
}
