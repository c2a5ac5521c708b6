use std::time::Duration;

use thiserror::Error;

/// A single connection could not take a broadcast message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("connection closed")]
    Closed,
    #[error("send timed out after {0:?}")]
    TimedOut(Duration),
}

/// Faults of the client channel itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("channel open failed: {0}")]
    Upgrade(String),
    #[error("channel read failed: {0}")]
    Read(String),
    #[error("channel write failed: {0}")]
    Write(String),
}
