use std::sync::atomic::{AtomicU64, Ordering};

use relay_domain::BroadcastReport;

#[derive(Debug, Default)]
pub struct Metrics {
    events_received: AtomicU64,
    events_malformed: AtomicU64,
    messages_delivered: AtomicU64,
    delivery_failures: AtomicU64,
    connections_opened: AtomicU64,
    connections_closed: AtomicU64,
}

impl Metrics {
    pub fn record_event(&self) {
        self.events_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_malformed_event(&self) {
        self.events_malformed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_broadcast(&self, report: &BroadcastReport) {
        self.messages_delivered
            .fetch_add(report.delivered as u64, Ordering::Relaxed);
        self.delivery_failures
            .fetch_add(report.failed as u64, Ordering::Relaxed);
    }

    pub fn record_connection_opened(&self) {
        self.connections_opened.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_connection_closed(&self) {
        self.connections_closed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn render_prometheus(&self, active_connections: usize) -> String {
        let received = self.events_received.load(Ordering::Relaxed);
        let malformed = self.events_malformed.load(Ordering::Relaxed);
        let delivered = self.messages_delivered.load(Ordering::Relaxed);
        let failures = self.delivery_failures.load(Ordering::Relaxed);
        let opened = self.connections_opened.load(Ordering::Relaxed);
        let closed = self.connections_closed.load(Ordering::Relaxed);

        format!(
            "# TYPE relay_events_received_total counter\n\
relay_events_received_total {}\n\
# TYPE relay_events_malformed_total counter\n\
relay_events_malformed_total {}\n\
# TYPE relay_messages_delivered_total counter\n\
relay_messages_delivered_total {}\n\
# TYPE relay_delivery_failures_total counter\n\
relay_delivery_failures_total {}\n\
# TYPE relay_connections_opened_total counter\n\
relay_connections_opened_total {}\n\
# TYPE relay_connections_closed_total counter\n\
relay_connections_closed_total {}\n\
# TYPE relay_connections_active gauge\n\
relay_connections_active {}\n",
            received, malformed, delivered, failures, opened, closed, active_connections
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prometheus_output_reflects_counters() {
        let metrics = Metrics::default();
        metrics.record_event();
        metrics.record_event();
        metrics.record_malformed_event();
        metrics.record_broadcast(&BroadcastReport {
            delivered: 3,
            failed: 1,
        });
        let text = metrics.render_prometheus(2);
        assert!(text.contains("relay_events_received_total 2\n"));
        assert!(text.contains("relay_events_malformed_total 1\n"));
        assert!(text.contains("relay_messages_delivered_total 3\n"));
        assert!(text.contains("relay_delivery_failures_total 1\n"));
        assert!(text.contains("relay_connections_active 2\n"));
    }
}
