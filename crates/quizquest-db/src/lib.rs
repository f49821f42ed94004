//! Progress persistence for QuizQuest.
//!
//! The progression ledger is a pure transform; this crate supplies the
//! durable side of the read-modify-write cycle and makes it safe under
//! concurrent writers with optimistic versioning.
//!
//! # Architecture
//!
//! ```text
//! CompletionService
//!     |
//!     +-- get(owner) ------------> ProgressStore
//!     +-- apply_level_completion -> ProgressionLedger (pure)
//!     +-- update(version, record) -> ProgressStore
//!             |-- MemoryProgressStore  (tokio RwLock map)
//!             +-- PgProgressStore      (conditional UPDATE)
//! ```
//!
//! # Modules
//!
//! - [`store`] -- The [`ProgressStore`] trait
//! - [`memory`] -- In-process store for tests and demos
//! - [`postgres`] -- `PostgreSQL` connection pool and configuration
//! - [`progress_store`] -- `PostgreSQL` progress store
//! - [`service`] -- Retrying store-backed operations
//! - [`error`] -- Shared error types

pub mod error;
pub mod memory;
pub mod postgres;
pub mod progress_store;
pub mod service;
pub mod store;

// Re-export primary types for convenience.
pub use error::DbError;
pub use memory::MemoryProgressStore;
pub use postgres::{PostgresConfig, PostgresPool};
pub use progress_store::{PgProgressStore, ProgressRow};
pub use service::CompletionService;
pub use store::ProgressStore;
