//! Storage layer - SQLite connection management and migrations
//!
//! - `database`: connection pool setup and the default database location
//! - `migrations`: schema versioning, applied automatically on connect
//!
//! ```ignore
//! use ktree_core::storage::Database;
//!
//! let db = Database::in_memory().await?;
//! let repo = SqliteConceptRepository::new(db.pool().clone());
//! ```

pub mod database;
pub mod migrations;

pub use database::{Database, DatabaseConfig, default_database_path};
pub use migrations::{CURRENT_VERSION, MigrationStatus, migration_status, run_migrations};
