//! Read-only content catalog for QuizQuest.
//!
//! The catalog holds the static content every rule component consumes:
//! worlds in display order, their ordered levels and questions, badge
//! display records, and selectable avatars. It is an injected, immutable
//! value; nothing in this workspace reaches for a global catalog.
//!
//! # Modules
//!
//! - [`catalog`] -- [`ContentCatalog`]: validated lookups by key and by
//!   position, plus JSON loading.
//! - [`error`] -- [`ContentError`] for unresolvable or inconsistent content.
//! - [`starting_catalog`] -- The built-in four-world catalog.

pub mod catalog;
pub mod error;
pub mod starting_catalog;

// Re-export primary types at crate root.
pub use catalog::{CatalogLoadError, CatalogParts, ContentCatalog, LevelLocation};
pub use error::ContentError;
pub use starting_catalog::{create_starting_catalog, starting_parts};
