use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use tracing::warn;

use relay_application::commands::dispatch_commands;
use relay_application::AppState;
use relay_domain::BroadcastReport;

use crate::error::HttpError;
use crate::middleware::parse_status_event;

/// POST /webhook
pub async fn receive_status_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<Json<BroadcastReport>, HttpError> {
    let event = parse_status_event(&headers, &body, state.config.max_body_bytes).map_err(|err| {
        state.metrics.record_event();
        state.metrics.record_malformed_event();
        warn!("failed to parse webhook body: {}", err);
        HttpError::BadRequest(err.to_string())
    })?;

    let report = dispatch_commands::dispatch_status_event(&state, event).await?;
    Ok(Json(report))
}
