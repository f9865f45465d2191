//! WebSocket sessions against a served router on an ephemeral port.

use futures::{SinkExt, StreamExt};
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use talentrisk_config::Config;
use talentrisk_db::{EmployeeRepository, MemoryStore};
use talentrisk_scorer::RiskModel;
use talentrisk_web::router::router_with_shared;
use talentrisk_web::state::{AppEvent, AppState, SharedState};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn serve(heartbeat_secs: u64) -> (String, SharedState) {
    let mut config = Config::default();
    config.server.heartbeat_secs = heartbeat_secs;
    let repo = EmployeeRepository::new(Arc::new(MemoryStore::new()), Arc::new(RiskModel::default()));
    let state: SharedState = Arc::new(AppState::new(repo, config));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router_with_shared(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("ws://{}/ws", addr), state)
}

async fn connect(url: &str) -> (Client, Value) {
    let (mut client, _) = connect_async(url).await.unwrap();
    let welcome = next_frame(&mut client).await;
    (client, welcome)
}

async fn next_frame(client: &mut Client) -> Value {
    loop {
        let message = tokio::time::timeout(Duration::from_secs(5), client.next())
            .await
            .expect("frame within 5s")
            .expect("socket open")
            .unwrap();
        if let Message::Text(text) = message {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

/// Next frame of `kind`, skipping heartbeats and anything else in between.
async fn frame_of(client: &mut Client, kind: &str) -> Value {
    loop {
        let frame = next_frame(client).await;
        if frame["type"] == kind {
            return frame;
        }
    }
}

#[tokio::test]
async fn session_starts_with_welcome_then_heartbeats() {
    let (url, _state) = serve(1).await;
    let (mut client, welcome) = connect(&url).await;

    assert_eq!(welcome["type"], "welcome");
    assert!(!welcome["connectionId"].as_str().unwrap().is_empty());

    let heartbeat = next_frame(&mut client).await;
    assert_eq!(heartbeat["type"], "heartbeat");
    assert_eq!(heartbeat["message"], "Server is alive");
    assert_eq!(heartbeat["activeConnections"], 1);
}

#[tokio::test]
async fn ping_and_plain_text_are_answered() {
    let (url, _state) = serve(30).await;
    let (mut client, _) = connect(&url).await;

    client.send(Message::text(r#"{"type":"ping"}"#)).await.unwrap();
    assert_eq!(next_frame(&mut client).await["type"], "pong");

    client.send(Message::text("hello")).await.unwrap();
    let echo = next_frame(&mut client).await;
    assert_eq!(echo["type"], "echo");
    assert_eq!(echo["message"], "Server received: hello");
}

#[tokio::test]
async fn client_broadcast_reaches_other_sessions() {
    let (url, _state) = serve(30).await;
    let (mut sender, welcome) = connect(&url).await;
    let (mut listener, _) = connect(&url).await;

    sender
        .send(Message::text(r#"{"type":"broadcast","message":"all hands at 3"}"#))
        .await
        .unwrap();

    let frame = frame_of(&mut listener, "broadcast").await;
    assert_eq!(frame["data"]["event"], "notice");
    assert_eq!(frame["data"]["message"], "all hands at 3");
    assert_eq!(frame["data"]["from"], welcome["connectionId"]);

    // The sender is a session too.
    let own = frame_of(&mut sender, "broadcast").await;
    assert_eq!(own["data"]["message"], "all hands at 3");
}

#[tokio::test]
async fn app_events_are_relayed_as_broadcast_frames() {
    let (url, state) = serve(30).await;
    let (mut client, _) = connect(&url).await;

    state.publish(AppEvent::EmployeeDeleted { id: "emp-7".into() });

    let frame = frame_of(&mut client, "broadcast").await;
    assert_eq!(frame["data"]["event"], "employee_deleted");
    assert_eq!(frame["data"]["id"], "emp-7");
}
