use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use fintrack_core::budgets::{BudgetService, BudgetServiceTrait};
use fintrack_core::categories::{CategoryService, CategoryServiceTrait};
use fintrack_core::transactions::{TransactionService, TransactionServiceTrait};
use fintrack_core::users::{UserService, UserServiceTrait};
use fintrack_storage_sqlite::budgets::BudgetRepository;
use fintrack_storage_sqlite::categories::CategoryRepository;
use fintrack_storage_sqlite::db;
use fintrack_storage_sqlite::transactions::TransactionRepository;
use fintrack_storage_sqlite::users::UserRepository;

use crate::auth::AuthManager;
use crate::config::Config;

pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait + Send + Sync>,
    pub category_service: Arc<dyn CategoryServiceTrait + Send + Sync>,
    pub transaction_service: Arc<dyn TransactionServiceTrait + Send + Sync>,
    pub budget_service: Arc<dyn BudgetServiceTrait + Send + Sync>,
    pub auth: Arc<AuthManager>,
    pub db_path: String,
}

pub fn init_tracing() {
    let log_format = std::env::var("FT_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
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
    let writer = db::spawn_writer((*pool).clone());

    let user_repository = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let user_service = Arc::new(UserService::new(user_repository));

    let category_repository = Arc::new(CategoryRepository::new(pool.clone(), writer.clone()));
    let category_service = Arc::new(CategoryService::new(category_repository.clone()));

    let transaction_repository =
        Arc::new(TransactionRepository::new(pool.clone(), writer.clone()));
    let transaction_service = Arc::new(TransactionService::new(
        transaction_repository.clone(),
        category_repository.clone(),
    ));

    let budget_repository = Arc::new(BudgetRepository::new(pool.clone(), writer.clone()));
    let budget_service = Arc::new(BudgetService::new(
        budget_repository,
        category_repository,
        transaction_repository,
        config.min_budget_year..=config.max_budget_year,
    ));

    let auth = Arc::new(AuthManager::new(
        &config.jwt_secret,
        config.access_ttl_secs,
        config.refresh_ttl_secs,
    ));

    Ok(Arc::new(AppState {
        user_service,
        category_service,
        transaction_service,
        budget_service,
        auth,
        db_path,
    }))
}
