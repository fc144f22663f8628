//! Storage crate: trigger and edit persistence and the store abstractions handlers depend on.
//!
//! ## Modules
//!
//! - `error` – Storage error types
//! - `models` – TriggerRecord, EditRecord
//! - `repository` – TriggerStore and EditStore traits
//! - `trigger_repo` – TriggerRepository (SQLite)
//! - `edit_repo` – EditRepository (SQLite)
//! - `bot_store` – BotStore, both repositories over one pool
//! - `sqlite_pool` – SqlitePoolManager

mod bot_store;
mod edit_repo;
mod error;
mod models;
mod repository;
mod sqlite_pool;
mod trigger_repo;


pub use bot_store::BotStore;
pub use edit_repo::EditRepository;
pub use error::StorageError;
pub use models::{EditRecord, EditScope, TriggerAction, TriggerRecord};
pub use repository::{EditStore, TriggerStore};
pub use sqlite_pool::SqlitePoolManager;
pub use trigger_repo::TriggerRepository;
