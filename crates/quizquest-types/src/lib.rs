//! Shared type definitions for the QuizQuest progression engine.
//!
//! This crate is the single source of truth for the data model used across
//! the workspace. Types consumed by the web front end derive `ts-rs` and
//! export `TypeScript` bindings.
//!
//! # Modules
//!
//! - [`ids`] -- Typed identifiers: UUID wrappers for player records, string
//!   keys for catalog entries
//! - [`enums`] -- Badge rules, level map state, error classification
//! - [`structs`] -- Catalog entries, the progress record, and read models

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{BadgeRule, ErrorKind, LevelState};
pub use ids::{BadgeId, LevelId, PlayerId, ProgressId, WorldId};
pub use structs::{
    Avatar, Badge, Level, LevelScore, LevelView, MapView, PlayerProgress, ProfileSummary,
    Question, World, WorldView,
};
