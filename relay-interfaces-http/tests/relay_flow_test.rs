//! End-to-end relay tests: a served router, WebSocket watchers and webhook posts.

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::StreamExt;
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use relay_application::AppState;
use relay_domain::RuntimeConfig;
use relay_interfaces_http::build_router;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn spawn_relay() -> (SocketAddr, AppState) {
    let state = AppState::new(RuntimeConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        send_timeout_ms: 200,
        ..RuntimeConfig::default()
    });
    let app = build_router(state.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    (addr, state)
}

async fn watch(addr: SocketAddr, order_id: &str) -> Client {
    let (ws, _) = connect_async(format!("ws://{}/ws?order_id={}", addr, order_id))
        .await
        .expect("ws connect");
    ws
}

async fn wait_for_connections(state: &AppState, expected: usize) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while state.registry.len().await != expected {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("registry reached expected size");
}

async fn post_webhook(addr: SocketAddr, body: &'static str) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("http://{}/webhook", addr))
        .header("Content-Type", "application/json")
        .body(body)
        .send()
        .await
        .expect("webhook request")
}

async fn next_text(ws: &mut Client) -> String {
    let frame = tokio::time::timeout(Duration::from_secs(2), ws.next())
        .await
        .expect("message before timeout")
        .expect("stream open")
        .expect("frame");
    match frame {
        Message::Text(text) => text,
        other => panic!("unexpected frame: {:?}", other),
    }
}

#[tokio::test]
async fn watcher_receives_status_update() {
    let (addr, state) = spawn_relay().await;
    let mut ws = watch(addr, "order-1").await;
    wait_for_connections(&state, 1).await;

    let response = post_webhook(addr, r#"{"order_id":"order-1","status":"shipped"}"#).await;
    assert_eq!(response.status(), 200);
    let report: Value = response.json().await.expect("report");
    assert_eq!(report["delivered"].as_u64(), Some(1));
    assert_eq!(report["failed"].as_u64(), Some(0));

    assert_eq!(
        next_text(&mut ws).await,
        r#"{"order_id":"order-1","status":"shipped"}"#
    );
}

#[tokio::test]
async fn update_only_reaches_matching_order() {
    let (addr, state) = spawn_relay().await;
    let mut ws_a = watch(addr, "order-1").await;
    let mut ws_b = watch(addr, "order-2").await;
    wait_for_connections(&state, 2).await;

    post_webhook(addr, r#"{"order_id":"order-1","status":"shipped"}"#).await;
    assert!(next_text(&mut ws_a).await.contains("order-1"));

    let nothing = tokio::time::timeout(Duration::from_millis(150), ws_b.next()).await;
    assert!(nothing.is_err(), "order-2 watcher must not be notified");
}

#[tokio::test]
async fn event_without_watchers_succeeds() {
    let (addr, _state) = spawn_relay().await;
    let response = post_webhook(addr, r#"{"order_id":"order-9","status":"shipped"}"#).await;
    assert_eq!(response.status(), 200);
    let report: Value = response.json().await.expect("report");
    assert_eq!(report["delivered"].as_u64(), Some(0));
    assert_eq!(report["failed"].as_u64(), Some(0));
}

#[tokio::test]
async fn closed_watcher_is_removed() {
    let (addr, state) = spawn_relay().await;
    let mut ws = watch(addr, "order-1").await;
    wait_for_connections(&state, 1).await;

    ws.close(None).await.expect("close");
    wait_for_connections(&state, 0).await;

    let response = post_webhook(addr, r#"{"order_id":"order-1","status":"shipped"}"#).await;
    let report: Value = response.json().await.expect("report");
    assert_eq!(report["delivered"].as_u64(), Some(0));
    assert!(state.registry.is_empty().await);
}

#[tokio::test]
async fn malformed_event_is_rejected_and_registry_untouched() {
    let (addr, state) = spawn_relay().await;
    let _ws = watch(addr, "order-1").await;
    wait_for_connections(&state, 1).await;

    let response = post_webhook(addr, r#"{"status":"shipped"}"#).await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("error body");
    assert!(body["error"]
        .as_str()
        .unwrap_or_default()
        .contains("order_id"));
    assert_eq!(state.registry.len().await, 1);

    let response = post_webhook(addr, r#"{"order_id":"","status":"shipped"}"#).await;
    assert_eq!(response.status(), 400);
    assert_eq!(state.registry.len().await, 1);

    // undecodable and empty-key bodies both count as received and malformed
    let exposition = state.metrics.render_prometheus(1);
    assert!(exposition.contains("relay_events_received_total 2\n"));
    assert!(exposition.contains("relay_events_malformed_total 2\n"));
}

#[tokio::test]
async fn missing_order_id_watches_empty_key() {
    let (addr, state) = spawn_relay().await;
    let (_ws, _) = connect_async(format!("ws://{}/ws", addr))
        .await
        .expect("ws connect");
    wait_for_connections(&state, 1).await;

    let snapshot = state.registry.snapshot().await;
    assert!(snapshot[0].order_id.is_empty());
}

#[tokio::test]
async fn unmatched_route_returns_greeting() {
    let (addr, _state) = spawn_relay().await;
    let response = reqwest::get(format!("http://{}/", addr))
        .await
        .expect("request");
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.text().await.expect("body"),
        RuntimeConfig::default().greeting
    );
}
