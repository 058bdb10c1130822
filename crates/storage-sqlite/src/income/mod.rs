//! SQLite storage implementation for the income ledger.

mod model;
mod repository;

pub use model::IncomeEntryDB;
pub use repository::IncomeRepository;
