use std::sync::Arc;

use axum::{Router, routing::get};

use cache::KvStore;
use config::Config;

pub mod cache;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn KvStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn KvStore>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// 构建路由：最外层 CORS / OPTIONS，其次错误日志，再到可选的爬虫过滤
pub fn app(state: AppState) -> Router {
    let router = Router::new()
        .route("/get", get(routes::counter::get_counts).fallback(routes::counter::usage))
        .route("/get/", get(routes::counter::get_counts).fallback(routes::counter::usage))
        .route("/get/{*path}", get(routes::counter::get_counts).fallback(routes::counter::usage))
        .route("/hit", get(routes::counter::hit).fallback(routes::counter::usage))
        .route("/hit/", get(routes::counter::hit).fallback(routes::counter::usage))
        .route("/hit/{*path}", get(routes::counter::hit).fallback(routes::counter::usage))
        .fallback(routes::counter::usage);

    let router = if state.config.bot_filter {
        router.layer(axum::middleware::from_fn(middleware::bot_filter))
    } else {
        router
    };

    router
        .layer(axum::middleware::from_fn(middleware::log_errors))
        .layer(axum::middleware::from_fn(middleware::cors))
        .with_state(state)
}
