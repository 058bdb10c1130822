//! Database models for income entries.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use onekaday_core::income::IncomeEntry;
use onekaday_core::Result;

use crate::utils::{decimal_to_text, parse_stored_decimal};

/// Database model for income entries. `amount` is stored as decimal text.
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::income_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct IncomeEntryDB {
    pub id: String,
    pub user_id: String,
    pub amount: String,
    pub source: Option<String>,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl IncomeEntryDB {
    pub fn into_domain(self) -> Result<IncomeEntry> {
        Ok(IncomeEntry {
            amount: parse_stored_decimal(&self.amount, "income_entries.amount")?,
            id: self.id,
            user_id: self.user_id,
            source: self.source,
            description: self.description,
            date: self.date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl From<&IncomeEntry> for IncomeEntryDB {
    fn from(entry: &IncomeEntry) -> Self {
        Self {
            id: entry.id.clone(),
            user_id: entry.user_id.clone(),
            amount: decimal_to_text(entry.amount),
            source: entry.source.clone(),
            description: entry.description.clone(),
            date: entry.date,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}
