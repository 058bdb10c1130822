//! Parsing and normalization of raw user input.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{AMOUNT_SCALE, MAX_AMOUNT};
use crate::errors::ValidationError;

/// A money amount as sent by a client: either decimal text (`"10.50"`) or a
/// JSON number. Numbers are read back through their textual form so no binary
/// float arithmetic touches the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Text(String),
    Number(serde_json::Number),
}

impl RawAmount {
    pub fn as_text(&self) -> String {
        match self {
            RawAmount::Text(text) => text.clone(),
            RawAmount::Number(number) => number.to_string(),
        }
    }
}

impl From<&str> for RawAmount {
    fn from(value: &str) -> Self {
        RawAmount::Text(value.to_string())
    }
}

/// Parses a required raw amount.
pub fn parse_raw_amount(raw: Option<&RawAmount>, field: &str) -> Result<Decimal, ValidationError> {
    match raw {
        Some(value) => parse_amount(&value.as_text(), field),
        None => Err(ValidationError::MissingField(field.to_string())),
    }
}

/// Parses a money amount and checks it is strictly positive, has at most
/// two fractional digits and fits the storage column.
pub fn parse_amount(raw: &str, field: &str) -> Result<Decimal, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field.to_string()));
    }
    let amount = Decimal::from_str(trimmed)
        .map_err(|_| ValidationError::invalid(field, format!("'{trimmed}' is not a number")))?;
    validate_amount(amount, field)?;
    Ok(to_money(amount))
}

/// Rescales an amount to the fixed two-decimal money representation.
pub fn to_money(amount: Decimal) -> Decimal {
    let mut money = amount.normalize();
    money.rescale(AMOUNT_SCALE);
    money
}

pub fn validate_amount(amount: Decimal, field: &str) -> Result<(), ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::invalid(field, "must be greater than zero"));
    }
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(ValidationError::invalid(
            field,
            format!("must have at most {AMOUNT_SCALE} decimal places"),
        ));
    }
    let max = Decimal::from_str(MAX_AMOUNT).unwrap_or(Decimal::MAX);
    if amount > max {
        return Err(ValidationError::invalid(
            field,
            format!("must not exceed {MAX_AMOUNT}"),
        ));
    }
    Ok(())
}

/// Parses an ISO `YYYY-MM-DD` calendar date.
pub fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        ValidationError::invalid(field, format!("'{}' is not a date (YYYY-MM-DD)", raw.trim()))
    })
}

/// Parses an optional date; blank strings count as absent.
pub fn parse_optional_date(
    raw: Option<&str>,
    field: &str,
) -> Result<Option<NaiveDate>, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_date(value, field).map(Some),
    }
}

/// Trims a free-text label. Blank labels become `None`.
pub fn normalize_text(
    raw: Option<String>,
    field: &str,
    max_len: Option<usize>,
) -> Result<Option<String>, ValidationError> {
    let Some(value) = raw else {
        return Ok(None);
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Some(max) = max_len {
        if trimmed.chars().count() > max {
            return Err(ValidationError::invalid(
                field,
                format!("must be at most {max} characters"),
            ));
        }
    }
    Ok(Some(trimmed.to_string()))
}
