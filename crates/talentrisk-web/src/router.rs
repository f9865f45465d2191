//! Axum router: maps all URL paths to handlers.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};
use std::sync::Arc;
use crate::state::{AppState, SharedState};
use crate::handlers::{
    dashboard::dashboard_metrics,
    employees::{
        create_employee, delete_employee, get_employee, high_risk_employees, list_employees,
        update_employee,
    },
    health::health,
    risk::{assess, department_risk, employee_assessment, recalculate, risk_config},
};
use crate::ws::ws_handler;

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    router_with_shared(Arc::new(state))
}

/// Same as [`build_router`] for callers that keep a handle on the state.
pub fn router_with_shared(shared: SharedState) -> Router {
    Router::new()
        .route("/api/health", get(health))

        // Employees
        .route("/api/employees",           get(list_employees).post(create_employee))
        .route("/api/employees/high-risk", get(high_risk_employees))
        .route("/api/employees/{id}",      get(get_employee).put(update_employee).delete(delete_employee))

        // Dashboard & risk
        .route("/api/dashboard/metrics",   get(dashboard_metrics))
        .route("/api/risk/config",         get(risk_config))
        .route("/api/risk/departments",    get(department_risk))
        .route("/api/risk/employees/{id}", get(employee_assessment))
        .route("/api/risk/assess",         post(assess))
        .route("/api/risk/recalculate",    post(recalculate))

        // WebSocket
        .route("/ws",     get(ws_handler))
        .route("/api/ws", get(ws_handler))

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
