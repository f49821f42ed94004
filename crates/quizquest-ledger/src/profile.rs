//! Profile operations: record creation, avatar and username edits, and the
//! read models the profile and map screens render.

use std::collections::BTreeSet;

use tracing::info;

use quizquest_core::{CoreError, UnlockPolicy};
use quizquest_types::{Badge, MapView, PlayerId, PlayerProgress, ProfileSummary, ProgressId};

use crate::invariants::verify_record;
use crate::{LedgerError, ProgressionLedger};

/// Username used when the player leaves the field blank.
pub const DEFAULT_USERNAME: &str = "Player";

/// Longest accepted username, in characters.
pub const MAX_USERNAME_CHARS: usize = 32;

/// Trim a username and apply the blank fallback.
///
/// # Errors
///
/// Returns [`CoreError::InvalidProfile`] if the trimmed name is longer than
/// [`MAX_USERNAME_CHARS`].
pub fn normalize_username(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(DEFAULT_USERNAME.to_owned());
    }
    let chars = trimmed.chars().count();
    if chars > MAX_USERNAME_CHARS {
        return Err(CoreError::InvalidProfile {
            reason: format!("username is {chars} characters, at most {MAX_USERNAME_CHARS} allowed"),
        });
    }
    Ok(trimmed.to_owned())
}

impl ProgressionLedger {
    /// Create the record for a player who just picked an avatar.
    ///
    /// XP starts at zero with empty completion and badge sets.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Content`] for an unknown avatar and
    /// [`LedgerError::Core`] for an over-long username.
    pub fn create_progress(
        &self,
        owner: PlayerId,
        avatar_id: u32,
        username: &str,
    ) -> Result<PlayerProgress, LedgerError> {
        self.catalog().avatar(avatar_id)?;
        let username = normalize_username(username)?;

        let progress = PlayerProgress {
            id: ProgressId::new(),
            owner,
            avatar_id,
            username,
            xp: 0,
            player_level: self.curve().player_level(0),
            completed_levels: BTreeSet::new(),
            badges: BTreeSet::new(),
            last_played: None,
            version: 0,
        };

        info!(
            owner = %owner,
            avatar_id,
            username = %progress.username,
            "progress record created"
        );
        Ok(progress)
    }

    /// Change the avatar and/or username. XP, levels and badges are left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Content`] for an unknown avatar and
    /// [`LedgerError::Core`] for an over-long username.
    pub fn edit_profile(
        &self,
        progress: &PlayerProgress,
        avatar_id: Option<u32>,
        username: Option<&str>,
    ) -> Result<PlayerProgress, LedgerError> {
        let mut updated = progress.clone();
        if let Some(avatar_id) = avatar_id {
            self.catalog().avatar(avatar_id)?;
            updated.avatar_id = avatar_id;
        }
        if let Some(username) = username {
            updated.username = normalize_username(username)?;
        }
        Ok(updated)
    }

    /// Profile page data for a record.
    ///
    /// Badges are listed in catalog order, split into earned and locked.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Content`] if the record's avatar is unknown
    /// and [`LedgerError::InvariantViolated`] if the record references
    /// unknown content or its stored level is stale.
    pub fn profile_summary(&self, progress: &PlayerProgress) -> Result<ProfileSummary, LedgerError> {
        let violations = verify_record(progress, self.catalog(), self.curve());
        if !violations.is_empty() {
            return Err(LedgerError::InvariantViolated { violations });
        }

        let avatar = self.catalog().avatar(progress.avatar_id)?.clone();
        let (earned_badges, locked_badges): (Vec<Badge>, Vec<Badge>) = self
            .catalog()
            .badges()
            .iter()
            .cloned()
            .partition(|badge| progress.owns_badge(&badge.id));

        Ok(ProfileSummary {
            username: progress.username.clone(),
            avatar,
            player_level: progress.player_level,
            xp: progress.xp,
            xp_for_next_level: self.curve().xp_for_next_level(progress.xp),
            level_progress: self.curve().level_progress(progress.xp),
            completed_levels: u32::try_from(progress.completed_levels.len()).unwrap_or(u32::MAX),
            total_levels: u32::try_from(self.catalog().total_levels()).unwrap_or(u32::MAX),
            earned_badges,
            locked_badges,
        })
    }

    /// The adventure map for a record.
    pub fn map_view(&self, progress: &PlayerProgress) -> MapView {
        UnlockPolicy::new(self.catalog()).map_view(&progress.completed_levels)
    }
}
