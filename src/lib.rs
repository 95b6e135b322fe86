use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub mod client;
pub mod config;
pub mod domain;
pub mod envelope;
pub mod errors;
pub mod http;
pub mod invoker;
pub mod logging;
pub mod registry;

use registry::Registry;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
}

impl AppState {
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(http::handlers::health))
        .route(
            "/api/tools/{name}/execute",
            post(http::handlers::execute_tool),
        )
        .route(
            "/api/resources/{*path}",
            get(http::handlers::read_resource),
        )
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
