// Event entity
// A status change pushed by the webhook sender, and the message fanned out to watchers

use serde::{Deserialize, Serialize};

use crate::value_objects::CorrelationKey;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub order_id: String,
    pub status: String,
}

impl StatusEvent {
    pub fn new(order_id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            status: status.into(),
        }
    }

    pub fn correlation_key(&self) -> CorrelationKey {
        CorrelationKey::new(self.order_id.clone())
    }
}

/// Outbound wire message. Field order is part of the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusUpdateMessage<'a> {
    pub order_id: &'a str,
    pub status: &'a str,
}

impl<'a> From<&'a StatusEvent> for StatusUpdateMessage<'a> {
    fn from(event: &'a StatusEvent) -> Self {
        Self {
            order_id: &event.order_id,
            status: &event.status,
        }
    }
}

impl StatusUpdateMessage<'_> {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
