use chrono::{Datelike, Local, NaiveDate};

/// The calendar date used when an entry is created without an explicit date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - chrono::Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn week_start_is_monday() {
        // 2024-03-14 is a Thursday
        assert_eq!(week_start(d(2024, 3, 14)), d(2024, 3, 11));
        assert_eq!(week_start(d(2024, 3, 11)), d(2024, 3, 11));
        // Sunday belongs to the week that started six days earlier
        assert_eq!(week_start(d(2024, 3, 17)), d(2024, 3, 11));
    }

    #[test]
    fn month_start_resets_day() {
        assert_eq!(month_start(d(2024, 2, 29)), d(2024, 2, 1));
    }
}
