//! Error types for the rule components.

use quizquest_types::{ErrorKind, LevelId};

/// Errors raised by the pure rule components.
///
/// Rule components fail only on malformed input. Unresolvable catalog
/// references surface as `ContentError` from the catalog itself.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The answer sequence does not have one entry per question.
    #[error("level {level} has {expected} questions but {actual} answers were submitted")]
    AnswerCountMismatch {
        /// The level being scored.
        level: LevelId,
        /// Number of questions in the level.
        expected: usize,
        /// Number of answers submitted.
        actual: usize,
    },

    /// A profile field (username, avatar) is unacceptable.
    #[error("invalid profile: {reason}")]
    InvalidProfile {
        /// Why the profile was rejected.
        reason: String,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Which value is wrong and why.
        reason: String,
    },
}

impl CoreError {
    /// Coarse classification of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AnswerCountMismatch { .. }
            | Self::InvalidProfile { .. }
            | Self::InvalidConfig { .. } => ErrorKind::InvalidInput,
        }
    }
}
