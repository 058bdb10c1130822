//! Income ledger domain models.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::SOURCE_MAX_LENGTH;
use crate::errors::{Error, Result, ValidationError};
use crate::utils::input::{
    normalize_text, parse_amount, parse_optional_date, parse_raw_amount, RawAmount,
};

/// One income record owned by a single user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IncomeEntry {
    pub id: String,
    pub user_id: String,
    pub amount: Decimal,
    pub source: Option<String>,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl IncomeEntry {
    pub fn ensure_owned_by(&self, user_id: &str) -> Result<()> {
        if self.user_id == user_id {
            Ok(())
        } else {
            Err(Error::Forbidden("Income entry".to_string()))
        }
    }

    /// Applies the fields present in `update`, stamping `updated_at`.
    pub fn apply_update(&mut self, update: &IncomeEntryUpdate, now: NaiveDateTime) {
        if let Some(amount) = update.amount {
            self.amount = amount;
        }
        if let Some(source) = &update.source {
            self.source = source.clone();
        }
        if let Some(description) = &update.description {
            self.description = description.clone();
        }
        if let Some(date) = update.date {
            self.date = date;
        }
        self.updated_at = now;
    }
}

/// Validated input for a new entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NewIncomeEntry {
    pub amount: Decimal,
    pub source: Option<String>,
    pub description: Option<String>,
    pub date: NaiveDate,
}

/// Validated partial update. `None` leaves a field unchanged; `Some(None)`
/// clears an optional text field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncomeEntryUpdate {
    pub amount: Option<Decimal>,
    pub source: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub date: Option<NaiveDate>,
}

impl IncomeEntryUpdate {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.source.is_none()
            && self.description.is_none()
            && self.date.is_none()
    }
}

/// Income entry fields as submitted by a client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeEntryInput {
    pub amount: Option<RawAmount>,
    pub source: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
}

impl IncomeEntryInput {
    /// Validates a new entry; a missing date falls back to `today`.
    pub fn into_new_entry(self, today: NaiveDate) -> std::result::Result<NewIncomeEntry, ValidationError> {
        let amount = parse_raw_amount(self.amount.as_ref(), "amount")?;
        let date = parse_optional_date(self.date.as_deref(), "date")?.unwrap_or(today);
        Ok(NewIncomeEntry {
            amount,
            source: normalize_text(self.source, "source", Some(SOURCE_MAX_LENGTH))?,
            description: normalize_text(self.description, "description", None)?,
            date,
        })
    }

    /// Validates a partial update. Absent fields stay untouched; blank text
    /// clears source/description.
    pub fn into_update(self) -> std::result::Result<IncomeEntryUpdate, ValidationError> {
        let amount = match &self.amount {
            Some(raw) => Some(parse_amount(&raw.as_text(), "amount")?),
            None => None,
        };
        let date = parse_optional_date(self.date.as_deref(), "date")?;
        let source = match self.source {
            Some(raw) => Some(normalize_text(Some(raw), "source", Some(SOURCE_MAX_LENGTH))?),
            None => None,
        };
        let description = match self.description {
            Some(raw) => Some(normalize_text(Some(raw), "description", None)?),
            None => None,
        };
        Ok(IncomeEntryUpdate {
            amount,
            source,
            description,
            date,
        })
    }
}

/// Filter for listing entries. Date bounds are inclusive.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IncomeFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Exact source label, compared case-insensitively.
    pub source: Option<String>,
    pub limit: Option<i64>,
}

impl IncomeFilter {
    pub fn between(start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Self {
        IncomeFilter {
            start_date,
            end_date,
            ..Default::default()
        }
    }

    /// Rejects an inverted date range or a non-positive limit.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(ValidationError::invalid("startDate", "must not be after endDate"));
            }
        }
        if self.limit.is_some_and(|limit| limit <= 0) {
            return Err(ValidationError::invalid("limit", "must be positive"));
        }
        Ok(())
    }

    pub fn matches(&self, entry: &IncomeEntry) -> bool {
        if self.start_date.is_some_and(|start| entry.date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| entry.date > end) {
            return false;
        }
        match (&self.source, &entry.source) {
            (None, _) => true,
            (Some(wanted), Some(actual)) => wanted.eq_ignore_ascii_case(actual),
            (Some(_), None) => false,
        }
    }
}
