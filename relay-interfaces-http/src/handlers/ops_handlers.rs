use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use relay_application::queries::connection_queries;
use relay_application::AppState;
use relay_domain::RegistrySnapshot;

pub async fn health_live() -> StatusCode {
    StatusCode::OK
}

pub async fn list_connections(State(state): State<AppState>) -> Json<RegistrySnapshot> {
    Json(connection_queries::get_connection_snapshot(&state).await)
}

pub async fn metrics_prometheus(State(state): State<AppState>) -> impl IntoResponse {
    let active = state.registry.len().await;
    let payload = state.metrics.render_prometheus(active);
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    (headers, payload)
}

/// Any unmatched route answers with the configured greeting.
pub async fn greeting(State(state): State<AppState>) -> String {
    state.config.greeting.clone()
}
