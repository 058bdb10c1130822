use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use onekaday_core::{
    goals::{Goal, GoalInput},
    reports::GoalProgress,
};
use serde::Deserialize;

use super::AppJson;
use crate::{auth::CurrentUser, error::ApiResult, main_lib::AppState};

#[derive(Debug, Default, Deserialize)]
pub struct GoalListQuery {
    /// Only active goals when true.
    #[serde(default)]
    pub active: bool,
}

async fn list_goals(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<GoalListQuery>,
) -> ApiResult<Json<Vec<GoalProgress>>> {
    let goals = state.report_service.goals_progress(&user.id, query.active)?;
    Ok(Json(goals))
}

async fn set_goal(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    AppJson(payload): AppJson<GoalInput>,
) -> ApiResult<(StatusCode, Json<Goal>)> {
    let new_goal = payload.into_new_goal()?;
    let goal = state.goal_service.set_goal(&user.id, new_goal).await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

async fn get_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<Goal>> {
    Ok(Json(state.goal_service.get_goal(&user.id, &id)?))
}

async fn complete_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<Goal>> {
    Ok(Json(state.goal_service.mark_completed(&user.id, &id).await?))
}

async fn activate_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<Goal>> {
    Ok(Json(state.goal_service.mark_active(&user.id, &id).await?))
}

async fn delete_goal(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<StatusCode> {
    state.goal_service.delete_goal(&user.id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/income/goals", get(list_goals).post(set_goal))
        .route("/income/goals/{id}", get(get_goal))
        .route("/income/goals/{id}/complete", post(complete_goal))
        .route("/income/goals/{id}/activate", post(activate_goal))
        .route("/income/goals/{id}/delete", post(delete_goal))
}
