use axum::routing::{get, post};
use axum::Router;

use relay_application::AppState;

use crate::handlers::{ops_handlers, webhook_handlers, ws_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(ws_handlers::ws_upgrade))
        .route("/webhook", post(webhook_handlers::receive_status_event))
        .route("/health/live", get(ops_handlers::health_live))
        .route("/connections", get(ops_handlers::list_connections))
        .route("/metrics", get(ops_handlers::metrics_prometheus))
        .fallback(ops_handlers::greeting)
        .with_state(state)
}
