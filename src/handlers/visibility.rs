//! Visibility signal handler.
//!
//! Pages report whether they are being looked at. The value is published on
//! a watch channel; the pause-when-hidden policy, when enabled, stops and
//! restarts the pollers from it.

use axum::{
    extract::{Query, State},
    Json,
};
use portwatch::Visibility;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct VisibilityQuery {
    pub state: Visibility,
}

#[derive(Debug, Serialize)]
pub struct VisibilityResponse {
    pub visibility: Visibility,
    /// Whether this request changed the stored value.
    pub changed: bool,
    /// Whether polling is paused as a result.
    pub paused: bool,
}

/// Handler for the `/visibility?state=hidden|visible` endpoint.
#[instrument(skip(state))]
pub async fn visibility_handler(
    State(state): State<SharedState>,
    Query(query): Query<VisibilityQuery>,
) -> Json<VisibilityResponse> {
    let changed = state.visibility.send_if_modified(|current| {
        if *current == query.state {
            false
        } else {
            *current = query.state;
            true
        }
    });
    debug!(visibility = ?query.state, changed, "Visibility reported");

    Json(VisibilityResponse {
        visibility: query.state,
        changed,
        paused: query.state == Visibility::Hidden && state.config.pause_when_hidden(),
    })
}
