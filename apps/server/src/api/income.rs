use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use onekaday_core::{
    constants::SOURCE_MAX_LENGTH,
    income::{IncomeEntry, IncomeEntryInput, IncomeFilter},
    reports::{DetailedReport, IncomeOverview, IncomeStats, SummaryReport},
    utils::{
        input::{normalize_text, parse_optional_date},
        time_utils::today,
    },
};
use serde::Deserialize;

use super::AppJson;
use crate::{auth::CurrentUser, error::ApiResult, main_lib::AppState};

#[derive(Debug, Default, Deserialize)]
pub struct DetailedQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub source: Option<String>,
    pub limit: Option<i64>,
}

impl DetailedQuery {
    fn into_filter(self) -> ApiResult<IncomeFilter> {
        Ok(IncomeFilter {
            start_date: parse_optional_date(self.start_date.as_deref(), "start_date")?,
            end_date: parse_optional_date(self.end_date.as_deref(), "end_date")?,
            source: normalize_text(self.source, "source", Some(SOURCE_MAX_LENGTH))?,
            limit: self.limit,
        })
    }
}

async fn overview(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<IncomeOverview>> {
    let overview = state.report_service.overview(&user.id, today(), state.page_size)?;
    Ok(Json(overview))
}

async fn add_entry(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    AppJson(payload): AppJson<IncomeEntryInput>,
) -> ApiResult<(StatusCode, Json<IncomeEntry>)> {
    let new_entry = payload.into_new_entry(today())?;
    let entry = state.income_service.add_entry(&user.id, new_entry).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn get_entry(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<IncomeEntry>> {
    Ok(Json(state.income_service.get_entry(&user.id, &id)?))
}

async fn edit_entry(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    AppJson(payload): AppJson<IncomeEntryInput>,
) -> ApiResult<Json<IncomeEntry>> {
    let update = payload.into_update()?;
    let entry = state
        .income_service
        .edit_entry(&user.id, &id, update)
        .await?;
    Ok(Json(entry))
}

async fn delete_entry(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<StatusCode> {
    state.income_service.delete_entry(&user.id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn summary_report(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<SummaryReport>> {
    Ok(Json(state.report_service.summary_report(&user.id, today())?))
}

async fn detailed_report(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<DetailedQuery>,
) -> ApiResult<Json<DetailedReport>> {
    let filter = query.into_filter()?;
    Ok(Json(state.report_service.detailed_report(&user.id, &filter)?))
}

async fn stats(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<IncomeStats>> {
    Ok(Json(state.report_service.stats(&user.id, today())?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/income", get(overview))
        .route("/income/", get(overview))
        .route("/income/add", post(add_entry))
        .route("/income/edit/{id}", get(get_entry).post(edit_entry))
        .route("/income/delete/{id}", post(delete_entry))
        .route("/income/reports/summary", get(summary_report))
        .route("/income/reports/detailed", get(detailed_report))
        .route("/income/api/stats", get(stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn detailed_query_builds_filter() {
        let query = DetailedQuery {
            start_date: Some("2024-03-01".into()),
            end_date: Some("".into()),
            source: Some("  Etsy ".into()),
            limit: None,
        };
        let filter = query.into_filter().unwrap();
        assert_eq!(filter.start_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(filter.end_date, None);
        assert_eq!(filter.source.as_deref(), Some("Etsy"));
    }

    #[test]
    fn detailed_query_rejects_bad_date() {
        let query = DetailedQuery {
            start_date: Some("03/01/2024".into()),
            ..Default::default()
        };
        assert!(query.into_filter().is_err());
    }
}
