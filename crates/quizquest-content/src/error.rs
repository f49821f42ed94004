//! Error types for the `quizquest-content` crate.
//!
//! All fallible catalog operations return [`ContentError`].

use quizquest_types::{BadgeId, ErrorKind, LevelId, WorldId};

/// Errors raised by catalog lookups and catalog construction.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// No level with this key exists.
    #[error("level not found: {0}")]
    LevelNotFound(LevelId),

    /// No world with this key exists.
    #[error("world not found: {0}")]
    WorldNotFound(WorldId),

    /// No world exists at this catalog position.
    #[error("world index {index} out of range ({count} worlds)")]
    WorldIndexOutOfRange {
        /// Requested position.
        index: usize,
        /// Number of worlds in the catalog.
        count: usize,
    },

    /// No level exists at this position within a world.
    #[error("level index {index} out of range for world {world} ({count} levels)")]
    LevelIndexOutOfRange {
        /// The world that was searched.
        world: WorldId,
        /// Requested position.
        index: usize,
        /// Number of levels in the world.
        count: usize,
    },

    /// No badge with this key exists.
    #[error("badge not found: {0}")]
    BadgeNotFound(BadgeId),

    /// No avatar with this index exists.
    #[error("avatar not found: {0}")]
    AvatarNotFound(u32),

    /// Two worlds share a key.
    #[error("duplicate world id: {0}")]
    DuplicateWorld(WorldId),

    /// Two levels share a key, or a level is listed by two worlds.
    #[error("duplicate level id: {0}")]
    DuplicateLevel(LevelId),

    /// Two badges share a key.
    #[error("duplicate badge id: {0}")]
    DuplicateBadge(BadgeId),

    /// Two avatars share an index.
    #[error("duplicate avatar id: {0}")]
    DuplicateAvatar(u32),

    /// A world lists a level whose `world_id` names a different world.
    #[error("level {level} is listed by world {listed_by} but belongs to {declared}")]
    LevelWorldMismatch {
        /// The level.
        level: LevelId,
        /// World whose level list contains it.
        listed_by: WorldId,
        /// World named by the level itself.
        declared: WorldId,
    },

    /// A level is defined but no world lists it.
    #[error("level {0} is not listed by any world")]
    OrphanLevel(LevelId),

    /// A question's correct index does not point at one of its options.
    #[error(
        "question {question} of level {level} has correct index {correct_index} but {option_count} options"
    )]
    InvalidQuestion {
        /// The level holding the question.
        level: LevelId,
        /// Position of the question within the level.
        question: usize,
        /// The declared correct index.
        correct_index: u32,
        /// Number of options.
        option_count: usize,
    },
}

impl ContentError {
    /// Coarse classification of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::LevelNotFound(_)
            | Self::WorldNotFound(_)
            | Self::WorldIndexOutOfRange { .. }
            | Self::LevelIndexOutOfRange { .. }
            | Self::BadgeNotFound(_)
            | Self::AvatarNotFound(_) => ErrorKind::NotFound,
            Self::DuplicateWorld(_)
            | Self::DuplicateLevel(_)
            | Self::DuplicateBadge(_)
            | Self::DuplicateAvatar(_)
            | Self::LevelWorldMismatch { .. }
            | Self::OrphanLevel(_)
            | Self::InvalidQuestion { .. } => ErrorKind::InvalidInput,
        }
    }
}
