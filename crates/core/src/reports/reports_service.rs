use std::sync::Arc;

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;

use super::aggregation::{daily_totals, goal_progress, summarize, total_amount};
use super::reports_model::{
    Dashboard, DateWindow, DetailedReport, GoalProgress, IncomeOverview, IncomeStats,
    SummaryReport,
};
use super::reports_traits::ReportServiceTrait;
use crate::constants::DEFAULT_TOP_SOURCES;
use crate::errors::{Result, ValidationError};
use crate::goals::{Goal, GoalRepositoryTrait, GoalStatus};
use crate::income::{IncomeEntry, IncomeFilter, IncomeRepositoryTrait};

pub struct ReportService {
    income_repository: Arc<dyn IncomeRepositoryTrait>,
    goal_repository: Arc<dyn GoalRepositoryTrait>,
    top_n: usize,
}

impl ReportService {
    pub fn new(
        income_repository: Arc<dyn IncomeRepositoryTrait>,
        goal_repository: Arc<dyn GoalRepositoryTrait>,
    ) -> Self {
        ReportService {
            income_repository,
            goal_repository,
            top_n: DEFAULT_TOP_SOURCES,
        }
    }

    pub fn with_top_sources(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    fn entries_in(&self, user_id: &str, window: DateWindow) -> Result<Vec<IncomeEntry>> {
        self.income_repository
            .list_entries(user_id, &IncomeFilter::between(window.start, window.end))
    }

    /// The active goal due soonest on or after `today`, falling back to the
    /// most recently overdue active goal.
    fn nearest_goal(goals: &[Goal], today: NaiveDate) -> Option<&Goal> {
        goals
            .iter()
            .find(|g| g.target_date >= today)
            .or_else(|| goals.last())
    }

    fn progress_for(goal: Goal, entries: &[IncomeEntry]) -> GoalProgress {
        let window = DateWindow::between(Some(goal.created_at.date()), Some(goal.target_date));
        let achieved: Decimal = entries
            .iter()
            .filter(|e| window.contains(e.date))
            .map(|e| e.amount)
            .sum();
        let progress_percentage = goal_progress(achieved, goal.target_amount);
        GoalProgress {
            goal,
            achieved,
            progress_percentage,
        }
    }

    fn stats_from(&self, user_id: &str, entries: &[IncomeEntry], today: NaiveDate) -> Result<IncomeStats> {
        let sum_in = |window: DateWindow| -> Decimal {
            entries
                .iter()
                .filter(|e| window.contains(e.date))
                .map(|e| e.amount)
                .sum()
        };
        let month_income = sum_in(DateWindow::month_to_date(today));
        let active = self
            .goal_repository
            .list_goals(user_id, Some(GoalStatus::Active))?;
        let progress_percentage = Self::nearest_goal(&active, today)
            .map(|goal| goal_progress(month_income, goal.target_amount))
            .unwrap_or(Decimal::ZERO);

        Ok(IncomeStats {
            today_income: sum_in(DateWindow::day(today)),
            week_income: sum_in(DateWindow::week_to_date(today)),
            month_income,
            progress_percentage,
        })
    }
}

impl ReportServiceTrait for ReportService {
    fn overview(
        &self,
        user_id: &str,
        today: NaiveDate,
        recent_limit: i64,
    ) -> Result<IncomeOverview> {
        if recent_limit <= 0 {
            return Err(ValidationError::invalid("limit", "must be positive").into());
        }
        let entries = self.entries_in(user_id, DateWindow::all_time())?;
        let today_total = summarize(&entries, DateWindow::day(today), 0).total;
        let month_total = summarize(&entries, DateWindow::month_to_date(today), 0).total;
        let total_income = total_amount(&entries);
        let recent_entries = entries.into_iter().take(recent_limit as usize).collect();
        Ok(IncomeOverview {
            recent_entries,
            today_total,
            month_total,
            total_income,
        })
    }

    fn summary_report(&self, user_id: &str, today: NaiveDate) -> Result<SummaryReport> {
        let window = DateWindow::month_to_date(today);
        let entries = self.entries_in(user_id, window)?;
        let summary = summarize(&entries, window, self.top_n);

        let active = self
            .goal_repository
            .list_goals(user_id, Some(GoalStatus::Active))?;
        let goal_progress = Self::nearest_goal(&active, today)
            .map(|goal| goal_progress(summary.total, goal.target_amount))
            .unwrap_or(Decimal::ZERO);

        debug!(
            "Summary report for user {}: {} entries in window",
            user_id, summary.count
        );
        Ok(SummaryReport {
            window,
            monthly_income: summary.total,
            daily_average: summary.daily_average,
            top_sources: summary.top_sources,
            income_trend: daily_totals(&entries),
            goal_progress,
        })
    }

    fn detailed_report(&self, user_id: &str, filter: &IncomeFilter) -> Result<DetailedReport> {
        filter.validate()?;
        let entries = self.income_repository.list_entries(user_id, filter)?;
        let window = DateWindow::between(filter.start_date, filter.end_date);
        let summary = summarize(&entries, window, self.top_n);
        let by_date = daily_totals(&entries);
        Ok(DetailedReport {
            entries,
            summary,
            by_date,
        })
    }

    fn stats(&self, user_id: &str, today: NaiveDate) -> Result<IncomeStats> {
        let entries = self.entries_in(user_id, DateWindow::between(None, Some(today)))?;
        self.stats_from(user_id, &entries, today)
    }

    fn goals_progress(&self, user_id: &str, active_only: bool) -> Result<Vec<GoalProgress>> {
        let status = active_only.then_some(GoalStatus::Active);
        let goals = self.goal_repository.list_goals(user_id, status)?;
        if goals.is_empty() {
            return Ok(Vec::new());
        }
        let entries = self.entries_in(user_id, DateWindow::all_time())?;
        Ok(goals
            .into_iter()
            .map(|goal| Self::progress_for(goal, &entries))
            .collect())
    }

    fn dashboard(&self, user_id: &str, today: NaiveDate) -> Result<Dashboard> {
        let entries = self.entries_in(user_id, DateWindow::all_time())?;
        let stats = self.stats_from(user_id, &entries, today)?;
        let active_goals = self
            .goal_repository
            .list_goals(user_id, Some(GoalStatus::Active))?
            .into_iter()
            .map(|goal| Self::progress_for(goal, &entries))
            .collect();
        Ok(Dashboard {
            stats,
            lifetime_total: total_amount(&entries),
            entry_count: entries.len(),
            active_goals,
        })
    }
}
