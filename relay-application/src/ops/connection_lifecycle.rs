//! Per-connection driver: registers the connection, forwards queued
//! broadcasts to the channel and watches inbound traffic for closure.

use std::fmt::Display;
use std::sync::Arc;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tracing::{debug, info};

use relay_domain::{CorrelationKey, TransportError};

use super::Connection;
use crate::AppState;

/// Inbound frame kinds, reduced to what closure detection needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundFrame {
    Data,
    Ping,
    Pong,
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    PeerClosed,
    StreamEnded,
    ReadFailed(TransportError),
    WriteFailed(TransportError),
    CloseRequested,
}

impl CloseReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            CloseReason::PeerClosed => "peer_closed",
            CloseReason::StreamEnded => "stream_ended",
            CloseReason::ReadFailed(_) => "read_failed",
            CloseReason::WriteFailed(_) => "write_failed",
            CloseReason::CloseRequested => "close_requested",
        }
    }
}

/// Runs one connection from OPEN to CLOSED.
///
/// `sink` and `stream` are the two halves of an already opened channel.
/// The connection is unregistered and `sink` closed exactly once, whichever
/// side ends the connection. A connection the registry pruned after a failed
/// delivery ends here through its close request.
pub async fn run_connection<Tx, Rx, E>(
    state: &AppState,
    key: CorrelationKey,
    mut sink: Tx,
    mut stream: Rx,
) -> CloseReason
where
    Tx: Sink<String> + Unpin,
    Tx::Error: Display,
    Rx: Stream<Item = Result<InboundFrame, E>> + Unpin,
    E: Display,
{
    let (connection, mut outbound_rx) =
        Connection::with_queue(key, state.config.outbound_buffer);
    let connection = Arc::new(connection);
    let id = connection.id();

    state.registry.register(Arc::clone(&connection)).await;
    state.metrics.record_connection_opened();
    info!(
        connection_id = %id,
        order_id = %connection.correlation_key(),
        "connection opened"
    );

    let reason = {
        let writer = async {
            while let Some(message) = outbound_rx.recv().await {
                if let Err(err) = sink.send(message.to_string()).await {
                    return CloseReason::WriteFailed(TransportError::Write(err.to_string()));
                }
            }
            // every sender is gone, nothing can be delivered any more
            CloseReason::CloseRequested
        };
        let reader = async {
            loop {
                match stream.next().await {
                    None => return CloseReason::StreamEnded,
                    Some(Ok(InboundFrame::Close)) => return CloseReason::PeerClosed,
                    Some(Ok(frame)) => {
                        debug!(connection_id = %id, ?frame, "ignoring inbound frame");
                    }
                    Some(Err(err)) => {
                        return CloseReason::ReadFailed(TransportError::Read(err.to_string()));
                    }
                }
            }
        };

        tokio::select! {
            reason = reader => reason,
            reason = writer => reason,
            _ = connection.close_requested() => CloseReason::CloseRequested,
        }
    };

    state.registry.unregister(id).await;
    outbound_rx.close();
    // A stalled peer never acknowledges the close; give up after the send timeout.
    match tokio::time::timeout(state.config.send_timeout(), sink.close()).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => debug!(connection_id = %id, error = %err, "channel close failed"),
        Err(_) => debug!(connection_id = %id, "channel close timed out"),
    }
    state.metrics.record_connection_closed();
    info!(
        connection_id = %id,
        order_id = %connection.correlation_key(),
        reason = reason.as_str(),
        "connection closed"
    );
    reason
}
