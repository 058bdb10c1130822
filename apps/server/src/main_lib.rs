use std::sync::Arc;

use onekaday_core::{
    goals::{GoalService, GoalServiceTrait},
    income::{IncomeService, IncomeServiceTrait},
    reports::{ReportService, ReportServiceTrait},
    users::{UserService, UserServiceTrait},
};
use onekaday_storage_sqlite::{
    db::{self, write_actor},
    goals::GoalRepository,
    income::IncomeRepository,
    users::UserRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::{auth::SessionManager, config::Config};

pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait + Send + Sync>,
    pub income_service: Arc<dyn IncomeServiceTrait + Send + Sync>,
    pub goal_service: Arc<dyn GoalServiceTrait + Send + Sync>,
    pub report_service: Arc<dyn ReportServiceTrait + Send + Sync>,
    pub sessions: Arc<SessionManager>,
    pub page_size: i64,
}

pub fn init_tracing() {
    let log_format = std::env::var("OKD_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let user_repository = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let income_repository = Arc::new(IncomeRepository::new(pool.clone(), writer.clone()));
    let goal_repository = Arc::new(GoalRepository::new(pool.clone(), writer.clone()));

    let user_service = Arc::new(UserService::new(user_repository));
    let income_service = Arc::new(IncomeService::new(income_repository.clone()));
    let goal_service = Arc::new(GoalService::new(goal_repository.clone()));
    let report_service = Arc::new(
        ReportService::new(income_repository, goal_repository)
            .with_top_sources(config.top_sources),
    );

    Ok(Arc::new(AppState {
        user_service,
        income_service,
        goal_service,
        report_service,
        sessions: Arc::new(SessionManager::new(config)),
        page_size: config.page_size,
    }))
}
