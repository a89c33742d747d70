//! Render command implementation.
//!
//! Runs a single fetch-and-render cycle without starting the server and
//! writes the resulting page. A failed fetch still writes the page (with its
//! failure placeholders) and then reports the error.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use portwatch::{
    Dashboard, DashboardError, DeviceSource, DeviceView, FetchError, HttpSource, Locale,
    OverviewView, PortFilter, View,
};
use tracing::info;

use crate::config::Config;

/// Renders the overview, or the detail page of `device`, once.
pub async fn command_render(
    device: Option<String>,
    filter: PortFilter,
    output: PathBuf,
    config: &Config,
) -> anyhow::Result<()> {
    let source: Arc<dyn DeviceSource> = Arc::new(
        HttpSource::new(config.api_base(), config.request_timeout())
            .context("Failed to build device API client")?,
    );

    let (html, outcome) = match device {
        Some(ip) => {
            let view = DeviceView::new(ip, config.device_interval());
            render_once(view, source, config.locale(), filter).await?
        }
        None => {
            let view = OverviewView::new(config.overview_key(), config.overview_interval());
            render_once(view, source, config.locale(), filter).await?
        }
    };

    if output.to_string_lossy() == "-" {
        println!("{}", html);
    } else {
        fs::write(&output, &html)
            .with_context(|| format!("Failed to write page to {}", output.display()))?;
        info!("Page written to: {}", output.display());
    }

    outcome.context("Device API request failed")
}

/// Builds a throwaway dashboard, selects `filter` and runs one cycle.
///
/// Returns the page HTML together with the outcome of the fetch.
pub async fn render_once<V: View>(
    view: V,
    source: Arc<dyn DeviceSource>,
    locale: Locale,
    filter: PortFilter,
) -> Result<(String, Result<(), FetchError>), DashboardError> {
    let dashboard = Dashboard::new(view, source, locale);
    dashboard.select_filter(filter).await?;
    let outcome = dashboard.run_cycle().await;
    Ok((dashboard.html().await, outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;

    struct FixedSource(Option<&'static str>);

    #[async_trait]
    impl DeviceSource for FixedSource {
        async fn fetch(&self, _path: &str) -> Result<Vec<u8>, FetchError> {
            match self.0 {
                Some(body) => Ok(body.as_bytes().to_vec()),
                None => Err(FetchError::Status(502)),
            }
        }
    }

    const PAYLOAD: &str = r#"{"interfaces": {
        "10": {"admin_status": 1, "oper_status": 1, "speed": 1000000000},
        "2": {"admin_status": 2, "oper_status": 2}
    }}"#;

    #[tokio::test]
    async fn test_render_device_page() {
        let view = DeviceView::new("10.0.0.1", Duration::from_secs(10));
        let (html, outcome) = render_once(
            view,
            Arc::new(FixedSource(Some(PAYLOAD))),
            Locale::En,
            PortFilter::Active,
        )
        .await
        .unwrap();

        assert!(outcome.is_ok());
        assert!(html.contains("1000 Mbps"));
        // Port 2 sorts before port 10 and is hidden by the filter
        let two = html.find("data-port=\"2\"").unwrap();
        let ten = html.find("data-port=\"10\"").unwrap();
        assert!(two < ten);
    }

    #[tokio::test]
    async fn test_render_failure_still_returns_page() {
        let (html, outcome) = render_once(
            OverviewView::default(),
            Arc::new(FixedSource(None)),
            Locale::En,
            PortFilter::All,
        )
        .await
        .unwrap();

        assert!(matches!(outcome, Err(FetchError::Status(502))));
        assert!(html.contains("id=\"portsContainer\""));
    }

    #[tokio::test]
    async fn test_render_rejects_unsupported_filter() {
        let view = DeviceView::new("10.0.0.1", Duration::from_secs(10));
        let err = render_once(
            view,
            Arc::new(FixedSource(Some(PAYLOAD))),
            Locale::En,
            PortFilter::Errors,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DashboardError::UnsupportedFilter { .. }));
    }
}
