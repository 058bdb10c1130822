use std::sync::Arc;

use axum::{
    extract::State,
    http::{header::SET_COOKIE, StatusCode},
    response::{AppendHeaders, IntoResponse},
    routing::{get, post},
    Extension, Json, Router,
};
use onekaday_core::users::{NewUser, PasswordChange, User};
use serde::{Deserialize, Serialize};

use super::AppJson;
use crate::{auth::CurrentUser, error::ApiResult, main_lib::AppState};

#[derive(Deserialize)]
pub struct LoginRequest {
    /// Username or email address.
    #[serde(alias = "username", alias = "email")]
    pub identifier: String,
    pub password: String,
    #[serde(default)]
    pub remember: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: User,
}

#[derive(Deserialize)]
pub struct DeleteAccountRequest {
    pub password: String,
}

async fn login(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .user_service
        .authenticate(&payload.identifier, &payload.password)?;
    let session = state.sessions.issue(&user.id, payload.remember)?;
    tracing::info!(user_id = %user.id, remember = payload.remember, "User logged in");

    let cookie = state.sessions.session_cookie(&session);
    let body = LoginResponse {
        expires_in: session.expires_in.as_secs(),
        access_token: session.token,
        token_type: "Bearer".to_string(),
        user,
    };
    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Json(body)))
}

async fn register(
    State(state): State<Arc<AppState>>,
    AppJson(payload): AppJson<NewUser>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state.user_service.register(payload).await?;
    tracing::info!(user_id = %user.id, "User registered");
    Ok((StatusCode::CREATED, Json(user)))
}

async fn logout(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        AppendHeaders([(SET_COOKIE, state.sessions.clear_cookie())]),
    )
}

async fn profile(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<User> {
    Json(user)
}

async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    AppJson(payload): AppJson<PasswordChange>,
) -> ApiResult<StatusCode> {
    state.user_service.change_password(&user.id, payload).await?;
    tracing::info!(user_id = %user.id, "Password changed");
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_account(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    AppJson(payload): AppJson<DeleteAccountRequest>,
) -> ApiResult<impl IntoResponse> {
    state
        .user_service
        .delete_account(&user.id, &payload.password)
        .await?;
    tracing::info!(user_id = %user.id, "Account deleted");
    Ok((
        StatusCode::NO_CONTENT,
        AppendHeaders([(SET_COOKIE, state.sessions.clear_cookie())]),
    ))
}

pub fn public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/logout", get(logout))
}

pub fn protected_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/profile", get(profile))
        .route("/auth/password", post(change_password))
        .route("/auth/delete", post(delete_account))
}
