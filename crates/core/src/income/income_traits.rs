use crate::errors::Result;
use crate::income::income_model::{IncomeEntry, IncomeEntryUpdate, IncomeFilter, NewIncomeEntry};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Trait for income ledger repository operations.
///
/// Mutations receive the acting user and must perform the ownership check
/// inside the same write transaction as the change.
#[async_trait]
pub trait IncomeRepositoryTrait: Send + Sync {
    fn get_entry(&self, entry_id: &str) -> Result<IncomeEntry>;
    /// Entries for a user, newest date first (ties: newest `created_at` first).
    fn list_entries(&self, user_id: &str, filter: &IncomeFilter) -> Result<Vec<IncomeEntry>>;
    async fn insert_entry(&self, user_id: String, new_entry: NewIncomeEntry)
        -> Result<IncomeEntry>;
    async fn update_entry(
        &self,
        user_id: String,
        entry_id: String,
        update: IncomeEntryUpdate,
    ) -> Result<IncomeEntry>;
    async fn delete_entry(&self, user_id: String, entry_id: String) -> Result<()>;
}

/// Trait for income ledger service operations
#[async_trait]
pub trait IncomeServiceTrait: Send + Sync {
    async fn add_entry(&self, user_id: &str, new_entry: NewIncomeEntry) -> Result<IncomeEntry>;
    fn get_entry(&self, user_id: &str, entry_id: &str) -> Result<IncomeEntry>;
    async fn edit_entry(
        &self,
        user_id: &str,
        entry_id: &str,
        update: IncomeEntryUpdate,
    ) -> Result<IncomeEntry>;
    async fn delete_entry(&self, user_id: &str, entry_id: &str) -> Result<()>;
    fn list_entries(&self, user_id: &str, filter: &IncomeFilter) -> Result<Vec<IncomeEntry>>;
    /// Exact sum of a user's entries on one calendar date.
    fn get_total(&self, user_id: &str, date: NaiveDate) -> Result<Decimal>;
}
