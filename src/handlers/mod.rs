//! HTTP endpoint handlers for the dashboard server.
//!
//! This module provides handlers for all HTTP endpoints:
//! - `/`: Overview page
//! - `/device/{ip}`: Device detail page
//! - `/filter/{filter}`, `/device/{ip}/filter/{filter}`: Filter selection
//! - `/visibility`: Page visibility signal
//! - `/health`: Per-page status as JSON

pub mod filter;
pub mod health;
pub mod pages;
pub mod visibility;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use portwatch::DashboardError;

use crate::state::SharedState;

// Re-export handlers
pub use filter::{device_filter_handler, overview_filter_handler};
pub use health::health_handler;
pub use pages::{device_handler, overview_handler};
pub use visibility::visibility_handler;

/// Builds the application router.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(overview_handler))
        .route("/filter/{filter}", get(overview_filter_handler))
        .route("/device/{ip}", get(device_handler))
        .route("/device/{ip}/filter/{filter}", get(device_filter_handler))
        .route("/visibility", get(visibility_handler).post(visibility_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Maps a dashboard error onto an HTTP response.
pub fn error_response(err: DashboardError) -> Response {
    let status = match err {
        DashboardError::UnknownDevice(_) => StatusCode::NOT_FOUND,
        DashboardError::UnknownFilter(_) | DashboardError::UnsupportedFilter { .. } => {
            StatusCode::BAD_REQUEST
        }
    };
    (status, err.to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::state::AppState;
    use async_trait::async_trait;
    use portwatch::{DeviceSource, FetchError};
    use std::sync::Arc;
    use tokio::net::TcpListener;

    const PAYLOAD: &str = r#"{
        "system_info": {"model": "GS1920", "system_name": "core-sw"},
        "interfaces": {
            "1": {"status": 1, "admin_status": 1, "in_octets": 10, "out_octets": 5},
            "2": {"status": 2, "admin_status": 1, "in_errors": 3}
        }
    }"#;

    struct StaticSource;

    #[async_trait]
    impl DeviceSource for StaticSource {
        async fn fetch(&self, _path: &str) -> Result<Vec<u8>, FetchError> {
            Ok(PAYLOAD.as_bytes().to_vec())
        }
    }

    async fn serve(devices: &[&str]) -> (String, SharedState) {
        let config = Config {
            devices: Some(devices.iter().map(|d| d.to_string()).collect()),
            ..Config::default()
        };
        let state = Arc::new(AppState::new(config, Arc::new(StaticSource)));
        state.overview.dashboard.run_cycle().await.unwrap();
        for entry in state.devices.values() {
            entry.dashboard.run_cycle().await.unwrap();
        }

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), state)
    }

    #[tokio::test]
    async fn test_overview_page() {
        let (base, _state) = serve(&[]).await;
        let response = reqwest::get(format!("{}/", base)).await.unwrap();
        assert_eq!(response.status(), 200);
        let body = response.text().await.unwrap();
        assert!(body.starts_with("<!DOCTYPE html>"));
        assert!(body.contains("core-sw"));
        assert!(body.contains("id=\"portsContainer\""));
    }

    #[tokio::test]
    async fn test_pages_report_visibility() {
        let (base, _state) = serve(&["10.0.0.1"]).await;
        for path in ["/", "/device/10.0.0.1"] {
            let body = reqwest::get(format!("{}{}", base, path))
                .await
                .unwrap()
                .text()
                .await
                .unwrap();
            assert!(body.contains("<script>"), "{path}");
            assert!(body.contains("addEventListener('visibilitychange'"), "{path}");
            assert!(
                body.contains("fetch('/visibility?state=' + (document.hidden ? 'hidden' : 'visible'))"),
                "{path}"
            );
        }
    }

    #[tokio::test]
    async fn test_filter_redirects_and_applies() {
        let (base, state) = serve(&[]).await;
        let response = reqwest::get(format!("{}/filter/errors", base)).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.url().path(), "/");

        let page = state.overview.dashboard.snapshot().await;
        assert_eq!(page.state.filter, portwatch::PortFilter::Errors);
        let shown: Vec<_> = page
            .document
            .rows()
            .into_iter()
            .filter(|row| row.is_displayed())
            .filter_map(|row| row.get("data-port").map(str::to_string))
            .collect();
        assert_eq!(shown, ["2"]);
    }

    #[tokio::test]
    async fn test_bad_filter_is_rejected() {
        let (base, _state) = serve(&["10.0.0.1"]).await;
        let response = reqwest::get(format!("{}/filter/bogus", base)).await.unwrap();
        assert_eq!(response.status(), 400);

        // Detail pages have no "errors" filter
        let response = reqwest::get(format!("{}/device/10.0.0.1/filter/errors", base))
            .await
            .unwrap();
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn test_device_pages() {
        let (base, _state) = serve(&["10.0.0.1"]).await;
        let response = reqwest::get(format!("{}/device/10.0.0.1", base)).await.unwrap();
        assert_eq!(response.status(), 200);
        assert!(response.text().await.unwrap().contains("device-details-content"));

        let response = reqwest::get(format!("{}/device/10.9.9.9", base)).await.unwrap();
        assert_eq!(response.status(), 404);

        let response = reqwest::get(format!("{}/device/10.0.0.1/filter/active", base))
            .await
            .unwrap();
        assert_eq!(response.url().path(), "/device/10.0.0.1");
    }

    #[tokio::test]
    async fn test_health_lists_pages() {
        let (base, _state) = serve(&["10.0.0.2", "10.0.0.1"]).await;
        let body: serde_json::Value = reqwest::get(format!("{}/health", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");
        let names: Vec<&str> = body["pages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["overview:zyxel", "device:10.0.0.1", "device:10.0.0.2"]);
        assert_eq!(body["pages"][0]["connection"], "online");
    }

    #[tokio::test]
    async fn test_visibility_signal() {
        let (base, state) = serve(&[]).await;
        let mut rx = state.visibility.subscribe();

        let body: serde_json::Value = reqwest::get(format!("{}/visibility?state=hidden", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["visibility"], "hidden");
        assert_eq!(body["changed"], true);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), portwatch::Visibility::Hidden);

        // Same state again is not a change
        let body: serde_json::Value = reqwest::get(format!("{}/visibility?state=hidden", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["changed"], false);
        assert!(!rx.has_changed().unwrap());

        let response = reqwest::get(format!("{}/visibility?state=sideways", base))
            .await
            .unwrap();
        assert_eq!(response.status(), 400);
    }
}
