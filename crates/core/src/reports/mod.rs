//! Reports module - aggregation over the income ledger and goals.

pub mod aggregation;
mod reports_model;
mod reports_service;
mod reports_traits;

pub use reports_model::{
    DailyTotal, Dashboard, DateWindow, DetailedReport, GoalProgress, IncomeOverview,
    IncomeStats, IncomeSummary, SourceTotal, SummaryReport,
};
pub use reports_service::ReportService;
pub use reports_traits::ReportServiceTrait;
