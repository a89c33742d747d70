//! Integration tests for the HTTP device source.
//!
//! A small axum app stands in for the device API.

use axum::{extract::Path, http::StatusCode, response::IntoResponse, routing::get, Router};
use portwatch::view::overview::PORTS_ID;
use portwatch::{Connection, Dashboard, DeviceSource, FetchError, HttpSource, Locale, OverviewView};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

const PAYLOAD: &str = r#"{"system_info": {"model": "GS1920"}, "interfaces": {"3": {"status": "up", "admin_status": "enabled"}}}"#;

async fn device(Path(id): Path<String>) -> impl IntoResponse {
    match id.as_str() {
        "zyxel" => (StatusCode::OK, PAYLOAD.to_string()),
        "broken" => (StatusCode::OK, "<html>oops</html>".to_string()),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            (StatusCode::OK, PAYLOAD.to_string())
        }
        _ => (StatusCode::NOT_FOUND, "no such device".to_string()),
    }
}

async fn serve_api() -> String {
    let app = Router::new().route("/api/device/{id}", get(device));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_fetch_success() {
    let base = serve_api().await;
    let source = HttpSource::new(&base, None).unwrap();
    let body = source.fetch("/api/device/zyxel").await.unwrap();
    assert_eq!(body, PAYLOAD.as_bytes());
}

#[tokio::test]
async fn test_non_success_status() {
    let base = serve_api().await;
    let source = HttpSource::new(&base, None).unwrap();
    let err = source.fetch("/api/device/unknown").await.unwrap_err();
    assert!(matches!(err, FetchError::Status(404)));
    assert_eq!(err.to_string(), "HTTP error! status: 404");
}

#[tokio::test]
async fn test_connection_refused() {
    // Bind and drop to get a port nobody listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let source = HttpSource::new(&format!("http://{}", addr), None).unwrap();
    let err = source.fetch("/api/device/zyxel").await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
}

#[tokio::test]
async fn test_timeout() {
    let base = serve_api().await;
    let source = HttpSource::new(&base, Some(Duration::from_millis(100))).unwrap();
    let err = source.fetch("/api/device/slow").await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
}

#[tokio::test]
async fn test_dashboard_over_http() {
    let base = serve_api().await;
    let source = Arc::new(HttpSource::new(&base, None).unwrap());

    let dashboard = Dashboard::new(OverviewView::default(), source.clone(), Locale::En);
    dashboard.run_cycle().await.unwrap();
    let page = dashboard.snapshot().await;
    assert_eq!(page.state.connection, Connection::Online);
    assert_eq!(page.document.rows().len(), 1);

    let broken = Dashboard::new(
        OverviewView::new("broken", Duration::from_secs(5)),
        source,
        Locale::En,
    );
    let err = broken.run_cycle().await.unwrap_err();
    assert!(matches!(err, FetchError::Parse(_)));
    assert_eq!(
        broken.snapshot().await.document.text_of(PORTS_ID).as_deref(),
        Some("Failed to load port data.")
    );
}
