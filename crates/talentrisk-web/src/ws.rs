//! WebSocket channel: welcome, heartbeat, echo, and broadcast relay.
//!
//! Each session runs one loop over three sources: client frames, the
//! heartbeat timer, and the shared [`AppEvent`] broadcast. Delivery is best
//! effort; a lagging session skips the events it missed.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use talentrisk_common::employee::EmployeeSummary;
use talentrisk_db::EmployeeFilter;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info, warn};

use crate::handlers::sample_on_failure;
use crate::state::{AppEvent, SharedState};

/// Summaries returned for `get_employees`.
const EMPLOYEE_FRAME_LIMIT: usize = 50;

/// Frames sent by the server, tagged by `type`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ServerFrame {
    Welcome { message: String, connection_id: String, timestamp: DateTime<Utc> },
    Heartbeat { message: String, active_connections: usize, timestamp: DateTime<Utc> },
    Pong { timestamp: DateTime<Utc> },
    Echo { message: String, timestamp: DateTime<Utc> },
    EmployeesData {
        data: Vec<EmployeeSummary>,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        fallback: bool,
        timestamp: DateTime<Utc>,
    },
    Broadcast { data: AppEvent, timestamp: DateTime<Utc> },
    Error { message: String, timestamp: DateTime<Utc> },
}

/// Frames understood from clients. Anything else is echoed.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientFrame {
    Ping,
    GetEmployees,
    Broadcast { message: String },
}

/// GET /ws: upgrade to a WebSocket session.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<SharedState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn send(socket: &mut WebSocket, frame: &ServerFrame) -> Result<(), axum::Error> {
    let text = serde_json::to_string(frame).map_err(axum::Error::new)?;
    socket.send(Message::Text(text.into())).await
}

async fn handle_socket(mut socket: WebSocket, state: SharedState) {
    let _guard = state.track_connection();
    let connection_id: String = uuid::Uuid::new_v4().simple().to_string().chars().take(9).collect();
    info!(connection_id, active = state.active_connections(), "WebSocket connected");

    // Subscribed before the welcome, so a client that has seen it gets every later event.
    let mut events = state.subscribe();
    let welcome = ServerFrame::Welcome {
        message: "Connected to Talent Risk WebSocket server".to_string(),
        connection_id: connection_id.clone(),
        timestamp: Utc::now(),
    };
    if send(&mut socket, &welcome).await.is_err() {
        return;
    }

    let period = Duration::from_secs(state.config.server.heartbeat_secs);
    let mut heartbeat = interval_at(Instant::now() + period, period);

    loop {
        let outgoing = tokio::select! {
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    match handle_client_text(&state, &connection_id, text.as_str()).await {
                        Some(frame) => frame,
                        None => continue,
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                // axum answers pings itself; binary frames are not part of the protocol.
                Some(Ok(_)) => continue,
                Some(Err(err)) => {
                    debug!(connection_id, error = %err, "WebSocket receive failed");
                    break;
                }
            },
            _ = heartbeat.tick() => ServerFrame::Heartbeat {
                message: "Server is alive".to_string(),
                active_connections: state.active_connections(),
                timestamp: Utc::now(),
            },
            event = events.recv() => match event {
                Ok(data) => ServerFrame::Broadcast { data, timestamp: Utc::now() },
                Err(RecvError::Lagged(skipped)) => {
                    warn!(connection_id, skipped, "WebSocket session lagging, events dropped");
                    continue;
                }
                Err(RecvError::Closed) => break,
            },
        };

        if let Err(err) = send(&mut socket, &outgoing).await {
            debug!(connection_id, error = %err, "WebSocket send failed");
            break;
        }
    }

    info!(connection_id, "WebSocket disconnected");
}

/// Reply for one client text frame, or `None` when the reply arrives via the
/// broadcast channel instead.
async fn handle_client_text(state: &SharedState, connection_id: &str, text: &str) -> Option<ServerFrame> {
    let now = Utc::now();
    match serde_json::from_str::<ClientFrame>(text) {
        Ok(ClientFrame::Ping) => Some(ServerFrame::Pong { timestamp: now }),
        Ok(ClientFrame::GetEmployees) => Some(employees_frame(state).await),
        Ok(ClientFrame::Broadcast { message }) => {
            state.publish(AppEvent::Notice { message, from: Some(connection_id.to_string()) });
            None
        }
        Err(_) => Some(ServerFrame::Echo {
            message: format!("Server received: {}", text),
            timestamp: now,
        }),
    }
}

async fn employees_frame(state: &SharedState) -> ServerFrame {
    let filter = EmployeeFilter::all().limit(EMPLOYEE_FRAME_LIMIT);
    let (employees, fallback) = match state.repo.list(&filter).await {
        Ok(employees) => (employees, false),
        Err(err) => match sample_on_failure(state, err, "websocket employees") {
            Ok(mut sample) => {
                sample.truncate(EMPLOYEE_FRAME_LIMIT);
                (sample, true)
            }
            Err(err) => {
                return ServerFrame::Error {
                    message: format!("Failed to load employees: {}", err),
                    timestamp: Utc::now(),
                }
            }
        },
    };

    ServerFrame::EmployeesData {
        data: employees.iter().map(|e| e.summary()).collect(),
        fallback,
        timestamp: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use std::sync::Arc;
    use talentrisk_config::Config;
    use talentrisk_db::{EmployeeRepository, MemoryStore};
    use talentrisk_scorer::RiskModel;
    use talentrisk_test_utils::new_employee;

    fn state() -> SharedState {
        let repo = EmployeeRepository::new(Arc::new(MemoryStore::new()), Arc::new(RiskModel::default()));
        Arc::new(AppState::new(repo, Config::default()))
    }

    #[test]
    fn test_frame_shapes() {
        let frame = ServerFrame::Welcome {
            message: "hi".into(),
            connection_id: "abc".into(),
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["type"], "welcome");
        assert_eq!(json["connectionId"], "abc");

        let frame = ServerFrame::Heartbeat {
            message: "Server is alive".into(),
            active_connections: 2,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["type"], "heartbeat");
        assert_eq!(json["activeConnections"], 2);
    }

    #[tokio::test]
    async fn test_ping_gets_pong() {
        let state = state();
        let reply = handle_client_text(&state, "c1", r#"{"type":"ping"}"#).await;
        assert!(matches!(reply, Some(ServerFrame::Pong { .. })));
    }

    #[tokio::test]
    async fn test_unknown_and_plain_text_are_echoed() {
        let state = state();
        for text in ["hello there", r#"{"type":"subscribe"}"#] {
            match handle_client_text(&state, "c1", text).await {
                Some(ServerFrame::Echo { message, .. }) => {
                    assert_eq!(message, format!("Server received: {}", text))
                }
                other => panic!("expected echo, got {:?}", other),
            }
        }
    }

    #[tokio::test]
    async fn test_broadcast_goes_to_subscribers() {
        let state = state();
        let mut rx = state.subscribe();
        let reply = handle_client_text(&state, "c1", r#"{"type":"broadcast","message":"standup in 5"}"#).await;
        assert!(reply.is_none());
        assert_eq!(
            rx.recv().await.unwrap(),
            AppEvent::Notice { message: "standup in 5".into(), from: Some("c1".into()) }
        );
    }

    #[tokio::test]
    async fn test_get_employees_returns_summaries() {
        let state = state();
        state.repo.create(new_employee("Jo Lee", "Finance")).await.unwrap();
        match handle_client_text(&state, "c1", r#"{"type":"get_employees"}"#).await {
            Some(ServerFrame::EmployeesData { data, fallback, .. }) => {
                assert_eq!(data.len(), 1);
                assert_eq!(data[0].name, "Jo Lee");
                assert!(!fallback);
            }
            other => panic!("expected employees_data, got {:?}", other),
        }
    }
}
