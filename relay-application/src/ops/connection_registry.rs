use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use relay_domain::{BroadcastReport, ConnectionId, ConnectionSummary, CorrelationKey};

use super::Connection;

/// Live connections indexed by id.
///
/// Every operation takes the map lock for its whole read or mutation, so
/// register, unregister and the recipient selection of a broadcast never
/// interleave. Sends happen after the lock is released; connections whose
/// send fails are pruned under a second write lock.
pub struct ConnectionRegistry {
    connections: RwLock<HashMap<ConnectionId, Arc<Connection>>>,
    send_timeout: Duration,
}

impl ConnectionRegistry {
    pub fn new(send_timeout: Duration) -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            send_timeout,
        }
    }

    pub async fn register(&self, connection: Arc<Connection>) {
        let id = connection.id();
        let mut conns = self.connections.write().await;
        if conns.insert(id, connection).is_some() {
            debug!(connection_id = %id, "connection registered twice, entry replaced");
        }
    }

    /// Returns whether an entry was removed.
    pub async fn unregister(&self, id: ConnectionId) -> bool {
        let mut conns = self.connections.write().await;
        conns.remove(&id).is_some()
    }

    pub async fn broadcast(&self, key: &CorrelationKey, payload: Arc<str>) -> BroadcastReport {
        let recipients: Vec<Arc<Connection>> = {
            let conns = self.connections.read().await;
            conns
                .values()
                .filter(|conn| conn.correlation_key() == key)
                .cloned()
                .collect()
        };
        if recipients.is_empty() {
            debug!(order_id = %key, "broadcast without recipients");
            return BroadcastReport::default();
        }

        let timeout = self.send_timeout;
        let outcomes = join_all(recipients.iter().map(|conn| {
            let payload = Arc::clone(&payload);
            async move { (conn, conn.send(payload, timeout).await) }
        }))
        .await;

        let mut report = BroadcastReport::default();
        let mut dead = Vec::new();
        for (conn, outcome) in outcomes {
            match outcome {
                Ok(()) => report.delivered += 1,
                Err(err) => {
                    warn!(connection_id = %conn.id(), order_id = %key, error = %err, "delivery failed, pruning connection");
                    report.failed += 1;
                    dead.push(Arc::clone(conn));
                }
            }
        }
        if !dead.is_empty() {
            let mut conns = self.connections.write().await;
            for conn in &dead {
                conns.remove(&conn.id());
            }
            drop(conns);
            // The driver may be parked on a stalled write; wake it so it tears down.
            for conn in &dead {
                conn.request_close();
            }
        }

        debug!(
            order_id = %key,
            delivered = report.delivered,
            failed = report.failed,
            "broadcast finished"
        );
        report
    }

    /// Signals the lifecycle driver of `id` to close; the driver unregisters it.
    pub async fn request_close(&self, id: ConnectionId) -> bool {
        let conns = self.connections.read().await;
        match conns.get(&id) {
            Some(conn) => {
                conn.request_close();
                true
            }
            None => false,
        }
    }

    pub async fn contains(&self, id: ConnectionId) -> bool {
        self.connections.read().await.contains_key(&id)
    }

    pub async fn len(&self) -> usize {
        self.connections.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.connections.read().await.is_empty()
    }

    pub async fn snapshot(&self) -> Vec<ConnectionSummary> {
        let conns = self.connections.read().await;
        conns.values().map(|conn| conn.summary()).collect()
    }
}
