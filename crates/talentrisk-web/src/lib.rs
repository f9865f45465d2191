//! talentrisk-web: HTTP and WebSocket API for Talent Risk
//! Provides:
//!   - Employee CRUD with scoring on write
//!   - High-risk listing and dashboard metrics
//!   - Risk model inspection and ad-hoc assessment
//!   - A WebSocket channel for heartbeats, echo, and change broadcasts

pub mod router;
pub mod handlers;
pub mod state;
pub mod ws;
