//! Aggregated views over a user's income ledger.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::goals::Goal;
use crate::income::IncomeEntry;
use crate::utils::time_utils::{month_start, week_start};

/// Inclusive date range used for aggregation. Open bounds are unbounded.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DateWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    pub fn all_time() -> Self {
        DateWindow::default()
    }

    pub fn between(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        DateWindow { start, end }
    }

    pub fn day(date: NaiveDate) -> Self {
        DateWindow::between(Some(date), Some(date))
    }

    /// Monday of the current week through `today`.
    pub fn week_to_date(today: NaiveDate) -> Self {
        DateWindow::between(Some(week_start(today)), Some(today))
    }

    /// First of the month through `today`.
    pub fn month_to_date(today: NaiveDate) -> Self {
        DateWindow::between(Some(month_start(today)), Some(today))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}

/// Summed income for one source label. `source` is `None` for unlabelled entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SourceTotal {
    pub source: Option<String>,
    pub total: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IncomeSummary {
    pub window: DateWindow,
    pub total: Decimal,
    pub count: usize,
    /// Total divided by the number of entries, not by calendar days.
    pub daily_average: Decimal,
    pub top_sources: Vec<SourceTotal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub goal: Goal,
    pub achieved: Decimal,
    pub progress_percentage: Decimal,
}

/// Data for the income overview page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IncomeOverview {
    pub recent_entries: Vec<IncomeEntry>,
    pub today_total: Decimal,
    pub month_total: Decimal,
    pub total_income: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SummaryReport {
    pub window: DateWindow,
    pub monthly_income: Decimal,
    pub daily_average: Decimal,
    pub top_sources: Vec<SourceTotal>,
    pub income_trend: Vec<DailyTotal>,
    pub goal_progress: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetailedReport {
    pub entries: Vec<IncomeEntry>,
    pub summary: IncomeSummary,
    pub by_date: Vec<DailyTotal>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IncomeStats {
    pub today_income: Decimal,
    pub week_income: Decimal,
    pub month_income: Decimal,
    pub progress_percentage: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub stats: IncomeStats,
    pub lifetime_total: Decimal,
    pub entry_count: usize,
    pub active_goals: Vec<GoalProgress>,
}
