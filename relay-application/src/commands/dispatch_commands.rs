use std::sync::Arc;

use tracing::{debug, warn};

use crate::{AppError, AppState};
use relay_domain::{BroadcastReport, StatusEvent, StatusUpdateMessage};

/// Fans one status event out to every connection watching its order id.
///
/// Zero recipients is a normal outcome. Individual delivery failures are only
/// counted in the report; the failing connections are pruned by the registry.
pub async fn dispatch_status_event(
    state: &AppState,
    event: StatusEvent,
) -> Result<BroadcastReport, AppError> {
    state.metrics.record_event();
    if event.order_id.is_empty() {
        state.metrics.record_malformed_event();
        warn!(status = %event.status, "rejected event without order_id");
        return Err(AppError::MalformedEvent(
            "order_id must not be empty".to_string(),
        ));
    }

    let payload: Arc<str> = StatusUpdateMessage::from(&event)
        .to_json()
        .map_err(|err| AppError::Internal(err.into()))?
        .into();
    let report = state
        .registry
        .broadcast(&event.correlation_key(), payload)
        .await;
    state.metrics.record_broadcast(&report);
    debug!(
        order_id = %event.order_id,
        status = %event.status,
        delivered = report.delivered,
        failed = report.failed,
        "status event dispatched"
    );
    Ok(report)
}
