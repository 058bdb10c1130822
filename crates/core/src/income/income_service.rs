use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info};
use rust_decimal::Decimal;

use super::income_model::{IncomeEntry, IncomeEntryUpdate, IncomeFilter, NewIncomeEntry};
use super::income_traits::{IncomeRepositoryTrait, IncomeServiceTrait};
use crate::constants::SOURCE_MAX_LENGTH;
use crate::errors::{Result, ValidationError};
use crate::reports::aggregation::total_amount;
use crate::utils::input::{to_money, validate_amount};

pub struct IncomeService {
    repository: Arc<dyn IncomeRepositoryTrait>,
}

impl IncomeService {
    pub fn new(repository: Arc<dyn IncomeRepositoryTrait>) -> Self {
        IncomeService { repository }
    }

    fn validate_source(source: Option<&str>) -> Result<()> {
        if source.is_some_and(|s| s.chars().count() > SOURCE_MAX_LENGTH) {
            return Err(ValidationError::invalid(
                "source",
                format!("must be at most {SOURCE_MAX_LENGTH} characters"),
            )
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl IncomeServiceTrait for IncomeService {
    async fn add_entry(&self, user_id: &str, mut new_entry: NewIncomeEntry) -> Result<IncomeEntry> {
        validate_amount(new_entry.amount, "amount")?;
        Self::validate_source(new_entry.source.as_deref())?;
        new_entry.amount = to_money(new_entry.amount);

        let entry = self
            .repository
            .insert_entry(user_id.to_string(), new_entry)
            .await?;
        debug!("Added income entry {} for user {}", entry.id, user_id);
        Ok(entry)
    }

    fn get_entry(&self, user_id: &str, entry_id: &str) -> Result<IncomeEntry> {
        let entry = self.repository.get_entry(entry_id)?;
        entry.ensure_owned_by(user_id)?;
        Ok(entry)
    }

    async fn edit_entry(
        &self,
        user_id: &str,
        entry_id: &str,
        mut update: IncomeEntryUpdate,
    ) -> Result<IncomeEntry> {
        if update.is_empty() {
            return Err(ValidationError::invalid("update", "must change at least one field").into());
        }
        if let Some(amount) = update.amount {
            validate_amount(amount, "amount")?;
            update.amount = Some(to_money(amount));
        }
        if let Some(source) = &update.source {
            Self::validate_source(source.as_deref())?;
        }

        let entry = self
            .repository
            .update_entry(user_id.to_string(), entry_id.to_string(), update)
            .await?;
        debug!("Updated income entry {} for user {}", entry.id, user_id);
        Ok(entry)
    }

    async fn delete_entry(&self, user_id: &str, entry_id: &str) -> Result<()> {
        self.repository
            .delete_entry(user_id.to_string(), entry_id.to_string())
            .await?;
        info!("Deleted income entry {} for user {}", entry_id, user_id);
        Ok(())
    }

    fn list_entries(&self, user_id: &str, filter: &IncomeFilter) -> Result<Vec<IncomeEntry>> {
        filter.validate()?;
        self.repository.list_entries(user_id, filter)
    }

    fn get_total(&self, user_id: &str, date: NaiveDate) -> Result<Decimal> {
        let entries = self
            .repository
            .list_entries(user_id, &IncomeFilter::between(Some(date), Some(date)))?;
        Ok(total_amount(&entries))
    }
}
