use chrono::NaiveDate;

use crate::errors::Result;
use crate::income::IncomeFilter;
use crate::reports::reports_model::{
    Dashboard, DetailedReport, GoalProgress, IncomeOverview, IncomeStats, SummaryReport,
};

/// Aggregations are recomputed from the store on every call.
pub trait ReportServiceTrait: Send + Sync {
    fn overview(&self, user_id: &str, today: NaiveDate, recent_limit: i64)
        -> Result<IncomeOverview>;
    fn summary_report(&self, user_id: &str, today: NaiveDate) -> Result<SummaryReport>;
    fn detailed_report(&self, user_id: &str, filter: &IncomeFilter) -> Result<DetailedReport>;
    fn stats(&self, user_id: &str, today: NaiveDate) -> Result<IncomeStats>;
    fn goals_progress(&self, user_id: &str, active_only: bool) -> Result<Vec<GoalProgress>>;
    fn dashboard(&self, user_id: &str, today: NaiveDate) -> Result<Dashboard>;
}
