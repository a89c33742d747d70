//! Page handlers.
//!
//! Serve the current document of a dashboard as HTML. Pages are never
//! rendered on request; whatever the last cycle left behind is returned.

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
};
use tracing::{debug, instrument};

use super::error_response;
use crate::state::SharedState;

/// Handler for the `/` endpoint.
#[instrument(skip(state))]
pub async fn overview_handler(State(state): State<SharedState>) -> Html<String> {
    debug!("Processing overview request");
    Html(state.overview.dashboard.html().await)
}

/// Handler for the `/device/{ip}` endpoint.
#[instrument(skip(state))]
pub async fn device_handler(
    State(state): State<SharedState>,
    Path(ip): Path<String>,
) -> Response {
    match state.device(&ip) {
        Ok(entry) => Html(entry.dashboard.html().await).into_response(),
        Err(e) => {
            debug!("Rejected device page request: {}", e);
            error_response(e)
        }
    }
}
