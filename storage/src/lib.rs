//! Storage crate: trigger registry and per-user presence state.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – Trigger, TriggerKind, PresenceState, Claim
//! - [`trigger_repo`] – TriggerRepository (SQLite)
//! - [`presence_repo`] – PresenceRepository (SQLite)
//! - [`sqlite_pool`] – SqlitePoolManager

mod error;
mod models;
mod presence_repo;
mod sqlite_pool;
mod trigger_repo;

pub use error::StorageError;
pub use models::{
    contains_keyword, Claim, NewTrigger, PresenceState, QuarantineRecord, Trigger, TriggerKind,
};
pub use presence_repo::PresenceRepository;
pub use sqlite_pool::SqlitePoolManager;
pub use trigger_repo::TriggerRepository;
