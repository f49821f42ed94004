//! Pure rule components of the QuizQuest progression engine.
//!
//! Everything in this crate is synchronous, allocation-light and free of
//! shared mutable state, so it can be called from any number of concurrent
//! contexts. The content catalog is always passed in explicitly.
//!
//! # Modules
//!
//! - [`config`] -- Typed configuration loaded from `quizquest-config.yaml`
//! - [`evaluator`] -- Scores a level attempt into XP, percentage and stars
//! - [`curve`] -- Maps accumulated XP to a player level
//! - [`unlock`] -- World and level gating, map view
//! - [`badges`] -- Ordered badge award rules
//! - [`error`] -- Error type for the rule components

pub mod badges;
pub mod config;
pub mod curve;
pub mod error;
pub mod evaluator;
pub mod unlock;

pub use badges::{BadgeContext, BadgeRuleSet, NamedRule, resolve_badges, world_done_badge};
pub use config::{
    ConfigError, CurveConfig, LogFormat, LoggingConfig, PlaythroughConfig, ProgressionConfig,
    ReplayPolicy, RewardConfig, StoreBackend, StoreConfig,
};
pub use curve::LevelCurve;
pub use error::CoreError;
pub use evaluator::{credited_xp, evaluate, percent_display, score_level};
pub use unlock::{UnlockPolicy, world_complete};
