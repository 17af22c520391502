//! 应用层：路由与处理器

pub mod auth;
pub mod inventory;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::core::middleware::request_logging_middleware;
use crate::infrastructure::SheetBackend;
use auth::service::{AuthService, ConfigUserStore, UserStore};
use inventory::{repository::InventoryRepository, service::InventoryService};

/// 处理器共享状态，启动时构建一次
#[derive(Clone)]
pub struct AppState {
    pub inventory: InventoryService,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(backend: Arc<dyn SheetBackend>, users: Arc<dyn UserStore>, config: &Config) -> Self {
        let repository = InventoryRepository::new(backend);
        Self {
            inventory: InventoryService::new(repository, config.inventory.clone()),
            auth: AuthService::new(users),
        }
    }

    /// 使用配置文件中的用户列表
    pub fn from_config(backend: Arc<dyn SheetBackend>, config: &Config) -> Self {
        let users = Arc::new(ConfigUserStore::new(config.auth.users.clone()));
        Self::new(backend, users, config)
    }
}

/// API 路由
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/auth/login", post(auth::handler::login))
        .route("/api/products", get(inventory::handler::list_products))
        .route(
            "/api/products/search",
            post(inventory::handler::search_products),
        )
        .route("/api/products/add", post(inventory::handler::add_product))
        .route(
            "/api/products/:id/withdraw",
            post(inventory::handler::withdraw_product),
        )
        .route("/api/kpi", get(inventory::handler::get_kpi))
        .route("/api/sync", post(inventory::handler::sync_data))
        .route("/api/health", get(inventory::handler::health_check))
        .with_state(state)
}

/// 带中间件的完整应用
pub fn build_app(state: AppState, config: &Config) -> Router {
    router(state)
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.http.timeout_seconds,
        )))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
