//! AEGIS Storage Layer
//!
//! SQLite-based persistence for extension state. The extension-scoped
//! local storage area is a single key-value table with atomic multi-key
//! writes and removals.

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
