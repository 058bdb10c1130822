//! Pure aggregation functions over income entries.
//!
//! All arithmetic stays in `Decimal`; nothing here converts money to `f64`.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::reports_model::{DailyTotal, DateWindow, IncomeSummary, SourceTotal};
use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::income::IncomeEntry;

pub fn total_amount(entries: &[IncomeEntry]) -> Decimal {
    entries.iter().map(|e| e.amount).sum()
}

/// Total divided by entry count, rounded for display. Zero when there are no entries.
pub fn daily_average(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    (total / Decimal::from(count)).round_dp(DISPLAY_DECIMAL_PRECISION)
}

/// `min(100, total / target * 100)`, rounded for display. A non-positive
/// target yields zero.
pub fn goal_progress(total: Decimal, target: Decimal) -> Decimal {
    if target <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let hundred = Decimal::ONE_HUNDRED;
    let percentage = (total / target * hundred).min(hundred);
    percentage.max(Decimal::ZERO).round_dp(DISPLAY_DECIMAL_PRECISION)
}

/// Groups entries by source and ranks them by summed amount.
///
/// Equal sums keep the order in which each source was first seen, walking the
/// entries in insertion (`created_at`) order.
pub fn top_sources(entries: &[IncomeEntry], limit: usize) -> Vec<SourceTotal> {
    let mut ordered: Vec<&IncomeEntry> = entries.iter().collect();
    ordered.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    let mut totals: Vec<SourceTotal> = Vec::new();
    for entry in ordered {
        match totals.iter_mut().find(|t| t.source == entry.source) {
            Some(total) => {
                total.total += entry.amount;
                total.count += 1;
            }
            None => totals.push(SourceTotal {
                source: entry.source.clone(),
                total: entry.amount,
                count: 1,
            }),
        }
    }

    // sort_by is stable, so ties keep first-seen order
    totals.sort_by(|a, b| b.total.cmp(&a.total));
    totals.truncate(limit);
    totals
}

/// Per-day totals ascending by date.
pub fn daily_totals(entries: &[IncomeEntry]) -> Vec<DailyTotal> {
    let mut by_date: BTreeMap<_, (Decimal, usize)> = BTreeMap::new();
    for entry in entries {
        let slot = by_date.entry(entry.date).or_insert((Decimal::ZERO, 0));
        slot.0 += entry.amount;
        slot.1 += 1;
    }
    by_date
        .into_iter()
        .map(|(date, (total, count))| DailyTotal { date, total, count })
        .collect()
}

pub fn summarize(entries: &[IncomeEntry], window: DateWindow, top_n: usize) -> IncomeSummary {
    let in_window: Vec<IncomeEntry> = entries
        .iter()
        .filter(|e| window.contains(e.date))
        .cloned()
        .collect();
    let total = total_amount(&in_window);
    let count = in_window.len();
    IncomeSummary {
        window,
        total,
        count,
        daily_average: daily_average(total, count),
        top_sources: top_sources(&in_window, top_n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal_macros::dec;

    fn at(seconds: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(8, 0, seconds)
            .unwrap()
    }

    fn entry(amount: Decimal, source: Option<&str>, day: u32, seq: u32) -> IncomeEntry {
        IncomeEntry {
            id: format!("e{seq}"),
            user_id: "u".into(),
            amount,
            source: source.map(str::to_string),
            description: None,
            date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            created_at: at(seq),
            updated_at: at(seq),
        }
    }

    #[test]
    fn goal_progress_is_clamped_and_zero_safe() {
        assert_eq!(goal_progress(dec!(250), dec!(1000)), dec!(25));
        assert_eq!(goal_progress(dec!(1500), dec!(1000)), dec!(100));
        assert_eq!(goal_progress(dec!(1500), dec!(0)), dec!(0));
        assert_eq!(goal_progress(dec!(1), dec!(3)), dec!(33.33));
    }

    #[test]
    fn daily_average_divides_by_entry_count() {
        assert_eq!(daily_average(dec!(35), 3), dec!(11.67));
        assert_eq!(daily_average(dec!(0), 0), dec!(0));
    }

    #[test]
    fn top_sources_rank_by_sum_with_stable_ties() {
        let entries = vec![
            entry(dec!(30), Some("Beta"), 1, 2),
            entry(dec!(10), Some("Alpha"), 2, 1),
            entry(dec!(20), Some("Alpha"), 3, 3),
            entry(dec!(50), Some("Gamma"), 3, 4),
            entry(dec!(5), None, 4, 5),
        ];
        let ranked = top_sources(&entries, 3);
        let labels: Vec<_> = ranked.iter().map(|s| s.source.as_deref()).collect();
        // Alpha (first seen at seq 1) and Beta (seq 2) both sum to 30
        assert_eq!(labels, vec![Some("Gamma"), Some("Alpha"), Some("Beta")]);
        assert_eq!(ranked[1].count, 2);
        assert_eq!(top_sources(&entries, 10).len(), 4);
    }

    #[test]
    fn summarize_respects_window() {
        let entries = vec![
            entry(dec!(10.00), Some("A"), 1, 1),
            entry(dec!(20.00), Some("A"), 2, 2),
            entry(dec!(5.00), Some("B"), 2, 3),
        ];
        let window = DateWindow::day(NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
        let summary = summarize(&entries, window, 5);
        assert_eq!(summary.total, dec!(25.00));
        assert_eq!(summary.count, 2);
        assert_eq!(summary.daily_average, dec!(12.50));

        let all = summarize(&entries, DateWindow::all_time(), 5);
        assert_eq!(all.total, dec!(35.00));
    }

    #[test]
    fn daily_totals_are_ascending() {
        let entries = vec![
            entry(dec!(1), None, 3, 1),
            entry(dec!(2), None, 1, 2),
            entry(dec!(3), None, 3, 3),
        ];
        let totals = daily_totals(&entries);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].total, dec!(2));
        assert_eq!(totals[1].total, dec!(4));
        assert_eq!(totals[1].count, 2);
    }
}
