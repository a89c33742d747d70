//! Application state management for the dashboard server.
//!
//! This module defines the shared application state that is passed
//! to HTTP handlers: one dashboard per page, the controllers driving their
//! pollers, and the visibility signal.

use ahash::AHashMap as HashMap;
use portwatch::{
    Dashboard, DashboardError, DeviceSource, DeviceView, OverviewView, PageController, PageStatus,
    View, Visibility,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

use crate::config::Config;

/// Type alias for shared application state.
pub type SharedState = Arc<AppState>;

/// A dashboard and the controller that polls it.
pub struct PageEntry<V: View> {
    pub dashboard: Arc<Dashboard<V>>,
    pub controller: Arc<PageController>,
}

impl<V: View> PageEntry<V> {
    fn new(view: V, source: Arc<dyn DeviceSource>, config: &Config) -> Self {
        let dashboard = Arc::new(Dashboard::new(view, source, config.locale()));
        let controller = Arc::new(PageController::new(dashboard.clone()));
        Self {
            dashboard,
            controller,
        }
    }
}

/// Global application state shared across requests and background tasks.
pub struct AppState {
    pub config: Arc<Config>,
    pub overview: PageEntry<OverviewView>,
    /// Detail pages keyed by device IP.
    pub devices: HashMap<String, PageEntry<DeviceView>>,
    /// Last reported page visibility.
    pub visibility: watch::Sender<Visibility>,
    /// Server start time for uptime calculation.
    pub start_time: Instant,
}

impl AppState {
    /// Builds every configured page. Nothing polls until `start_all`.
    pub fn new(config: Config, source: Arc<dyn DeviceSource>) -> Self {
        let overview = PageEntry::new(
            OverviewView::new(config.overview_key(), config.overview_interval()),
            source.clone(),
            &config,
        );

        let devices = config
            .devices()
            .iter()
            .map(|ip| {
                let view = DeviceView::new(ip.clone(), config.device_interval());
                (ip.clone(), PageEntry::new(view, source.clone(), &config))
            })
            .collect();

        let (visibility, _) = watch::channel(Visibility::Visible);

        Self {
            config: Arc::new(config),
            overview,
            devices,
            visibility,
            start_time: Instant::now(),
        }
    }

    pub fn device(&self, ip: &str) -> Result<&PageEntry<DeviceView>, DashboardError> {
        self.devices
            .get(ip)
            .ok_or_else(|| DashboardError::UnknownDevice(ip.to_string()))
    }

    pub fn controllers(&self) -> Vec<Arc<PageController>> {
        std::iter::once(self.overview.controller.clone())
            .chain(self.devices.values().map(|entry| entry.controller.clone()))
            .collect()
    }

    /// Page is ready: start every poller.
    pub fn start_all(&self) {
        for controller in self.controllers() {
            controller.ready();
        }
    }

    /// Unload: stop every poller. Returns how many were running.
    pub fn stop_all(&self) -> usize {
        self.controllers()
            .iter()
            .filter(|controller| controller.unload())
            .count()
    }

    /// Status of every page, overview first, devices sorted by IP.
    pub async fn statuses(&self) -> Vec<PageStatus> {
        let mut ips: Vec<&String> = self.devices.keys().collect();
        ips.sort();

        let mut statuses = Vec::with_capacity(ips.len() + 1);
        statuses.push(self.overview.dashboard.status().await);
        for ip in ips {
            statuses.push(self.devices[ip].dashboard.status().await);
        }
        statuses
    }
}
