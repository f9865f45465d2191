//! Shared application state for the web server.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use talentrisk_common::employee::EmployeeSummary;
use talentrisk_config::Config;
use talentrisk_db::EmployeeRepository;
use tokio::sync::broadcast;

/// Events relayed to every WebSocket session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AppEvent {
    EmployeeCreated { employee: EmployeeSummary },
    EmployeeUpdated { employee: EmployeeSummary },
    EmployeeDeleted { id: String },
    RiskRecalculated { updated: usize },
    /// Free-form message sent by a client
    Notice {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        from: Option<String>,
    },
}

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub repo: EmployeeRepository,
    pub config: Arc<Config>,
    /// Broadcast channel for WebSocket push events
    pub event_tx: broadcast::Sender<AppEvent>,
    connections: AtomicUsize,
    started_at: Instant,
}

impl AppState {
    pub fn new(repo: EmployeeRepository, config: Config) -> Self {
        let (event_tx, _) = broadcast::channel(256);
        Self {
            repo,
            config: Arc::new(config),
            event_tx,
            connections: AtomicUsize::new(0),
            started_at: Instant::now(),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.event_tx.subscribe()
    }

    /// Send to all sessions. Having none connected is not an error.
    pub fn publish(&self, event: AppEvent) {
        match self.event_tx.send(event) {
            Ok(receivers) => tracing::debug!(receivers, "event published"),
            Err(_) => tracing::trace!("event dropped, no subscribers"),
        }
    }

    pub fn active_connections(&self) -> usize {
        self.connections.load(Ordering::Relaxed)
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// Count a WebSocket session for as long as the guard lives.
    pub fn track_connection(self: &Arc<Self>) -> ConnectionGuard {
        self.connections.fetch_add(1, Ordering::Relaxed);
        ConnectionGuard { state: Arc::clone(self) }
    }
}

pub struct ConnectionGuard {
    state: SharedState,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.state.connections.fetch_sub(1, Ordering::Relaxed);
    }
}

pub type SharedState = Arc<AppState>;
