//! OneKaDay Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic for the income tracker: users,
//! the income ledger, goals and the reports built on top of them.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod goals;
pub mod income;
pub mod reports;
pub mod users;
pub mod utils;

#[cfg(test)]
mod test_support;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
