//! Filter selection handlers.
//!
//! The filter buttons of a page are links to these routes. Selecting a
//! filter stores it on the page, applies it to the rendered rows and sends
//! the browser back to the page.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::{info, instrument};

use super::error_response;
use crate::state::SharedState;

/// Handler for the `/filter/{filter}` endpoint.
#[instrument(skip(state))]
pub async fn overview_filter_handler(
    State(state): State<SharedState>,
    Path(filter): Path<String>,
) -> Response {
    match state.overview.dashboard.select_filter_by_name(&filter).await {
        Ok(visible) => {
            info!(filter = %filter, visible, "Overview filter selected");
            Redirect::to("/").into_response()
        }
        Err(e) => error_response(e),
    }
}

/// Handler for the `/device/{ip}/filter/{filter}` endpoint.
#[instrument(skip(state))]
pub async fn device_filter_handler(
    State(state): State<SharedState>,
    Path((ip, filter)): Path<(String, String)>,
) -> Response {
    let entry = match state.device(&ip) {
        Ok(entry) => entry,
        Err(e) => return error_response(e),
    };

    match entry.dashboard.select_filter_by_name(&filter).await {
        Ok(visible) => {
            info!(device = %ip, filter = %filter, visible, "Device filter selected");
            Redirect::to(&format!("/device/{ip}")).into_response()
        }
        Err(e) => error_response(e),
    }
}
