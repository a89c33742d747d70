//! Health check endpoint handler.
//!
//! This module provides the `/health` endpoint handler that returns the
//! status of every page as JSON.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use portwatch::{Connection, PageStatus};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "ok" when no page is in the failed state, "degraded" otherwise.
    pub status: &'static str,
    pub uptime_seconds: u64,
    pub api_base: String,
    pub pages: Vec<PageStatus>,
}

/// Handler for the /health endpoint.
#[instrument(skip(state))]
pub async fn health_handler(State(state): State<SharedState>) -> impl IntoResponse {
    debug!("Processing /health request");

    let pages = state.statuses().await;
    let failing = pages
        .iter()
        .filter(|page| page.connection == Connection::Error)
        .count();

    // Derive HTTP status from page state
    let (status, message) = if failing == 0 {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    debug!("Health check: {} - {} failing page(s)", status, failing);
    (
        status,
        Json(HealthResponse {
            status: message,
            uptime_seconds: state.start_time.elapsed().as_secs(),
            api_base: state.config.api_base().to_string(),
            pages,
        }),
    )
}
