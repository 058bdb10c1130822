//! Conversion helpers shared by the repository models.

use std::str::FromStr;

use chrono::{NaiveDateTime, Timelike, Utc};
use rust_decimal::Decimal;

use crate::errors::StorageError;
use onekaday_core::Result;

/// Parses a decimal stored as TEXT. A malformed value is reported rather than
/// silently read as zero.
pub fn parse_stored_decimal(value: &str, column: &str) -> Result<Decimal> {
    Decimal::from_str(value).map_err(|e| {
        log::error!("Failed to parse {} '{}' as decimal: {}", column, value, e);
        StorageError::CorruptValue(format!("{column}: {e}")).into()
    })
}

/// Fixed-scale text form used for every stored amount.
pub fn decimal_to_text(value: Decimal) -> String {
    value.to_string()
}

/// Current UTC time truncated to whole microseconds, matching what SQLite
/// round-trips.
pub fn now_utc() -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    now.with_nanosecond((now.nanosecond() / 1_000) * 1_000)
        .unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn stored_decimals_keep_their_scale() {
        assert_eq!(decimal_to_text(dec!(10.50)), "10.50");
        assert_eq!(parse_stored_decimal("0.10", "amount").unwrap(), dec!(0.10));
    }

    #[test]
    fn corrupt_decimal_is_an_error() {
        assert!(parse_stored_decimal("abc", "amount").is_err());
    }
}
