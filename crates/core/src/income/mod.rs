//! Income ledger module - domain models, services, and traits.

mod income_model;
mod income_service;
mod income_traits;

pub use income_model::{
    IncomeEntry, IncomeEntryInput, IncomeEntryUpdate, IncomeFilter, NewIncomeEntry,
};
pub use income_service::IncomeService;
pub use income_traits::{IncomeRepositoryTrait, IncomeServiceTrait};
