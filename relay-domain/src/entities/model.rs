use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::value_objects::{ConnectionId, CorrelationKey};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionSummary {
    pub id: ConnectionId,
    pub order_id: CorrelationKey,
    pub opened_at_ms: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub total: usize,
    pub by_order_id: BTreeMap<String, usize>,
}

impl RegistrySnapshot {
    pub fn from_summaries(summaries: &[ConnectionSummary]) -> Self {
        let mut by_order_id = BTreeMap::new();
        for summary in summaries {
            *by_order_id
                .entry(summary.order_id.as_str().to_string())
                .or_insert(0) += 1;
        }
        Self {
            total: summaries.len(),
            by_order_id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub send_timeout_ms: u64,
    pub outbound_buffer: usize,
    pub greeting: String,
}

impl RuntimeConfig {
    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 15,
            send_timeout_ms: 2_000,
            outbound_buffer: 32,
            greeting: "order relay is running".to_string(),
        }
    }
}
