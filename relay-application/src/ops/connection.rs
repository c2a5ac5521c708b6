use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc::error::SendTimeoutError;
use tokio::sync::{mpsc, Notify};

use relay_domain::{ConnectionId, ConnectionSummary, CorrelationKey, DeliveryError};

/// Registry-facing half of one client connection.
///
/// Holds only the sending side of the connection's outbound queue; the
/// channel itself stays with the lifecycle driver, so dropping every
/// `Connection` handle never closes the socket on its own.
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    correlation_key: CorrelationKey,
    opened_at_ms: i64,
    outbound: mpsc::Sender<Arc<str>>,
    close: Notify,
}

impl Connection {
    pub fn new(correlation_key: CorrelationKey, outbound: mpsc::Sender<Arc<str>>) -> Self {
        Self {
            id: ConnectionId::new(),
            correlation_key,
            opened_at_ms: Utc::now().timestamp_millis(),
            outbound,
            close: Notify::new(),
        }
    }

    /// Builds a connection together with the receiving end of its outbound queue.
    pub fn with_queue(
        correlation_key: CorrelationKey,
        buffer: usize,
    ) -> (Self, mpsc::Receiver<Arc<str>>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        (Self::new(correlation_key, tx), rx)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn correlation_key(&self) -> &CorrelationKey {
        &self.correlation_key
    }

    pub fn summary(&self) -> ConnectionSummary {
        ConnectionSummary {
            id: self.id,
            order_id: self.correlation_key.clone(),
            opened_at_ms: self.opened_at_ms,
        }
    }

    /// Queues one text message, waiting at most `timeout` for queue space.
    pub async fn send(&self, message: Arc<str>, timeout: Duration) -> Result<(), DeliveryError> {
        match self.outbound.send_timeout(message, timeout).await {
            Ok(()) => Ok(()),
            Err(SendTimeoutError::Closed(_)) => Err(DeliveryError::Closed),
            Err(SendTimeoutError::Timeout(_)) => Err(DeliveryError::TimedOut(timeout)),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.outbound.is_closed()
    }

    /// Asks the owning lifecycle driver to shut the connection down.
    pub fn request_close(&self) {
        self.close.notify_one();
    }

    pub(crate) async fn close_requested(&self) {
        self.close.notified().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_reaches_queue() {
        let (conn, mut rx) = Connection::with_queue(CorrelationKey::from("order-1"), 4);
        conn.send(Arc::from("hello"), Duration::from_millis(50))
            .await
            .expect("send");
        assert_eq!(rx.recv().await.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn send_fails_once_receiver_is_gone() {
        let (conn, rx) = Connection::with_queue(CorrelationKey::from("order-1"), 4);
        drop(rx);
        assert!(conn.is_closed());
        let err = conn
            .send(Arc::from("hello"), Duration::from_millis(50))
            .await
            .expect_err("closed");
        assert_eq!(err, DeliveryError::Closed);
    }

    #[tokio::test]
    async fn send_times_out_on_full_queue() {
        let (conn, _rx) = Connection::with_queue(CorrelationKey::from("order-1"), 1);
        let timeout = Duration::from_millis(20);
        conn.send(Arc::from("first"), timeout).await.expect("first");
        let err = conn
            .send(Arc::from("second"), timeout)
            .await
            .expect_err("queue full");
        assert_eq!(err, DeliveryError::TimedOut(timeout));
    }

    #[tokio::test]
    async fn close_request_is_remembered_until_awaited() {
        let (conn, _rx) = Connection::with_queue(CorrelationKey::default(), 1);
        conn.request_close();
        tokio::time::timeout(Duration::from_millis(100), conn.close_requested())
            .await
            .expect("close request observed");
    }
}
