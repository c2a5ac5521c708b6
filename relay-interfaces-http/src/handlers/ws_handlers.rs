use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use futures_util::future;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::warn;

use relay_application::ops::{run_connection, InboundFrame};
use relay_application::AppState;
use relay_domain::{CorrelationKey, TransportError};

#[derive(Debug, Deserialize)]
pub struct WatchQuery {
    pub order_id: Option<String>,
}

/// GET /ws?order_id=<id>
/// Upgrades to a WebSocket watching one order. A missing order id registers an empty key.
pub async fn ws_upgrade(
    State(state): State<AppState>,
    Query(query): Query<WatchQuery>,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let ws = match upgrade {
        Ok(ws) => ws,
        Err(rejection) => {
            let err = TransportError::Upgrade(rejection.body_text());
            warn!(error = %err, "websocket upgrade rejected");
            return rejection.into_response();
        }
    };

    let key = CorrelationKey::from(query.order_id);
    ws.on_failed_upgrade(|err: axum::Error| {
        let err = TransportError::Upgrade(err.to_string());
        warn!(error = %err, "websocket upgrade failed");
    })
    .on_upgrade(move |socket| serve_socket(socket, state, key))
}

async fn serve_socket(socket: WebSocket, state: AppState, key: CorrelationKey) {
    let (sink, stream) = socket.split();
    let sink = sink.with(|text: String| future::ready(Ok::<_, axum::Error>(Message::Text(text))));
    let stream = stream.map(|frame| frame.map(|message| inbound_frame(&message)));
    run_connection(&state, key, sink, stream).await;
}

fn inbound_frame(message: &Message) -> InboundFrame {
    match message {
        Message::Text(_) | Message::Binary(_) => InboundFrame::Data,
        Message::Ping(_) => InboundFrame::Ping,
        Message::Pong(_) => InboundFrame::Pong,
        Message::Close(_) => InboundFrame::Close,
    }
}
