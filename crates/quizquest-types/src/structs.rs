//! Core entity structs: the static content catalog entries, the mutable
//! player progress record, and the read models handed to the presentation
//! layer (completion score, map view, profile summary).

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::LevelState;
use crate::ids::{BadgeId, LevelId, PlayerId, ProgressId, WorldId};

// ---------------------------------------------------------------------------
// Catalog entries
// ---------------------------------------------------------------------------

/// A multiple-choice question. Immutable catalog content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Question {
    /// Prompt shown to the player.
    pub prompt: String,
    /// Answer options in display order.
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    pub correct_index: u32,
    /// Optional hint revealed on request.
    pub hint: Option<String>,
}

impl Question {
    /// Whether `choice` is the correct option for this question.
    pub fn is_correct(&self, choice: u32) -> bool {
        choice == self.correct_index
    }

    /// The text of the correct option, if the index is in range.
    pub fn correct_option(&self) -> Option<&str> {
        usize::try_from(self.correct_index)
            .ok()
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
    }
}

/// A playable level: an ordered list of questions worth an XP reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Level {
    /// Catalog key.
    pub id: LevelId,
    /// Owning world.
    pub world_id: WorldId,
    /// Display name.
    pub name: String,
    /// XP granted for a perfect run. Partial runs earn a rounded share.
    pub xp_reward: u64,
    /// Questions in play order.
    pub questions: Vec<Question>,
}

impl Level {
    /// Number of questions in the level.
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

/// A world: an ordered group of levels, unlocked as a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct World {
    /// Catalog key.
    pub id: WorldId,
    /// Display name.
    pub name: String,
    /// Emoji shown on the world card.
    pub emoji: String,
    /// Short blurb shown under the name.
    pub description: String,
    /// Level keys in play order. Position defines "previous level".
    pub levels: Vec<LevelId>,
}

/// A badge display record. Award conditions live in the rule engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Badge {
    /// Catalog key.
    pub id: BadgeId,
    /// Display name.
    pub name: String,
    /// Short description of how the badge is earned.
    pub description: String,
    /// Emoji shown on the badge.
    pub emoji: String,
}

/// A selectable player avatar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Avatar {
    /// Avatar index, stored on the progress record.
    pub id: u32,
    /// Emoji rendered as the avatar.
    pub emoji: String,
    /// Display name.
    pub name: String,
}

// ---------------------------------------------------------------------------
// Player progress
// ---------------------------------------------------------------------------

/// The mutable progression aggregate of one player.
///
/// This is the shape the progress store must round-trip losslessly. Only
/// the progression ledger produces new values of this type:
///
/// - `xp` never decreases.
/// - `completed_levels` and `badges` never shrink; sets forbid duplicates.
/// - `player_level` always equals the level curve applied to `xp`.
/// - `version` is owned by the store and bumps on every successful update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlayerProgress {
    /// Record identifier.
    pub id: ProgressId,
    /// The player who owns this record.
    pub owner: PlayerId,
    /// Chosen avatar.
    pub avatar_id: u32,
    /// Display name.
    pub username: String,
    /// Accumulated experience points.
    pub xp: u64,
    /// Player level derived from `xp`.
    pub player_level: u64,
    /// Levels completed at least once.
    pub completed_levels: BTreeSet<LevelId>,
    /// Badges earned.
    pub badges: BTreeSet<BadgeId>,
    /// Calendar date (UTC) of the most recent completion.
    pub last_played: Option<NaiveDate>,
    /// Optimistic concurrency version.
    pub version: u64,
}

impl PlayerProgress {
    /// Whether the player has completed `level` at least once.
    pub fn has_completed(&self, level: &LevelId) -> bool {
        self.completed_levels.contains(level)
    }

    /// Whether the player owns `badge`.
    pub fn owns_badge(&self, badge: &BadgeId) -> bool {
        self.badges.contains(badge)
    }
}

// ---------------------------------------------------------------------------
// Presentation read models
// ---------------------------------------------------------------------------

/// Result of scoring one level attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LevelScore {
    /// Number of correct answers.
    pub correct_count: u32,
    /// Number of questions answered.
    pub total_count: u32,
    /// `correct_count / total_count`, or zero for an empty level.
    #[ts(as = "String")]
    pub percentage: Decimal,
    /// `round(xp_reward * percentage)`, half away from zero.
    pub xp_earned: u64,
    /// Whether every answer was correct (and there was at least one).
    pub perfect: bool,
    /// Star rating, 0 to 3.
    pub stars: u8,
}

/// One level on the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LevelView {
    /// Level key.
    pub level_id: LevelId,
    /// Display name.
    pub name: String,
    /// Whether the level is locked, playable or completed.
    pub state: LevelState,
}

/// One world card on the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WorldView {
    /// World key.
    pub world_id: WorldId,
    /// Display name.
    pub name: String,
    /// Whether the world is open.
    pub unlocked: bool,
    /// Levels of this world the player has completed.
    pub completed_count: u32,
    /// Levels in this world.
    pub total_count: u32,
    /// Whether every level of the world is completed.
    pub all_done: bool,
    /// Per-level playability in play order.
    pub levels: Vec<LevelView>,
}

/// The whole adventure map for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MapView {
    /// Worlds in catalog order.
    pub worlds: Vec<WorldView>,
}

/// Profile page data derived from a progress record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ProfileSummary {
    /// Display name.
    pub username: String,
    /// Chosen avatar.
    pub avatar: Avatar,
    /// Current player level.
    pub player_level: u64,
    /// Accumulated XP.
    pub xp: u64,
    /// XP threshold of the next player level.
    pub xp_for_next_level: u64,
    /// `xp / xp_for_next_level`, capped at one.
    #[ts(as = "String")]
    pub level_progress: Decimal,
    /// Levels completed.
    pub completed_levels: u32,
    /// Levels in the catalog.
    pub total_levels: u32,
    /// Owned badges in catalog order.
    pub earned_badges: Vec<Badge>,
    /// Badges not yet owned, in catalog order.
    pub locked_badges: Vec<Badge>,
}
