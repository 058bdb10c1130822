//! SQLite storage implementation for the 1K A Day System.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `onekaday-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for users, income entries and goals
//! - Database-specific model types (with Diesel derives)
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//!
//! ```text
//!      core (domain)
//!            │
//!            ▼
//!  storage-sqlite (this crate)
//!            │
//!            ▼
//!        SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
mod utils;

// Repository implementations
pub mod goals;
pub mod income;
pub mod users;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from onekaday-core for convenience
pub use onekaday_core::errors::{DatabaseError, Error, Result};
