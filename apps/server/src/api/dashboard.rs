use std::sync::Arc;

use axum::{extract::State, routing::get, Extension, Json, Router};
use onekaday_core::{reports::Dashboard, utils::time_utils::today};

use crate::{auth::CurrentUser, error::ApiResult, main_lib::AppState};

async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> ApiResult<Json<Dashboard>> {
    Ok(Json(state.report_service.dashboard(&user.id, today())?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/dashboard/", get(dashboard))
}
