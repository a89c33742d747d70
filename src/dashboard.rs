//! The generic poll + render + filter component.
//!
//! A `Dashboard` owns one page (document and view state) and knows how to run
//! a fetch-and-render cycle against its `DeviceSource`. The page variant is
//! supplied as a `View`.

use async_trait::async_trait;
use chrono::Local;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use crate::filter::{apply_filter, mark_active_button, PortFilter};
use crate::labels::{Labels, Locale};
use crate::poller::Refresh;
use crate::source::{DeviceSource, FetchError};
use crate::view::{Connection, Page, View, ViewState};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum DashboardError {
    #[error("Unknown filter '{0}'")]
    UnknownFilter(String),

    #[error("Filter '{filter}' is not available on page {page}")]
    UnsupportedFilter { filter: PortFilter, page: String },

    #[error("Unknown device '{0}'")]
    UnknownDevice(String),
}

/// Point-in-time summary of a page, used by the health endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct PageStatus {
    pub name: String,
    pub online: bool,
    pub connection: Connection,
    pub last_update: Option<String>,
    pub filter: PortFilter,
    pub auto_update: bool,
    pub cycles: u64,
    pub failures: u64,
}

pub struct Dashboard<V: View> {
    view: V,
    source: Arc<dyn DeviceSource>,
    labels: &'static Labels,
    page: RwLock<Page>,
    cycles: AtomicU64,
    failures: AtomicU64,
}

impl<V: View> Dashboard<V> {
    pub fn new(view: V, source: Arc<dyn DeviceSource>, locale: Locale) -> Self {
        let labels = locale.labels();
        let state = ViewState::default();
        let mut document = view.skeleton(labels);
        view.show_connection(&mut document, state.connection, labels);
        view.show_last_update(&mut document, state.last_update, labels);
        view.show_auto_update(&mut document, state.auto_update, labels);
        mark_active_button(&mut document, state.filter);

        Self {
            view,
            source,
            labels,
            page: RwLock::new(Page { document, state }),
            cycles: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    async fn fetch_payload(&self) -> Result<V::Payload, FetchError> {
        let body = self.source.fetch(&self.view.endpoint()).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Runs one fetch-and-render cycle.
    ///
    /// The page lock is only taken once the fetch has finished, so filter
    /// changes and page reads are not blocked by a slow device.
    #[instrument(skip(self), fields(page = %self.view.name()))]
    pub async fn run_cycle(&self) -> Result<(), FetchError> {
        let result = self.fetch_payload().await;
        self.cycles.fetch_add(1, Ordering::Relaxed);

        let mut page = self.page.write().await;
        let Page { document, state } = &mut *page;

        match result {
            Ok(payload) => {
                self.view.render(document, &payload, self.labels);

                state.last_update = Some(Local::now());
                self.view
                    .show_last_update(document, state.last_update, self.labels);

                state.online = true;
                state.connection = self.view.connection_for(&payload);
                self.view
                    .show_connection(document, state.connection, self.labels);

                let visible = apply_filter(document, state.filter);
                mark_active_button(document, state.filter);
                debug!(visible, filter = %state.filter, "Page refreshed");
                Ok(())
            }
            Err(e) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                warn!("Error loading data: {}", e);

                self.view.render_failure(document, self.labels);
                state.online = false;
                state.connection = Connection::Error;
                self.view
                    .show_connection(document, state.connection, self.labels);
                Err(e)
            }
        }
    }

    /// Stores `filter` as the page's current filter and applies it to the
    /// rendered rows. Returns the number of visible rows.
    pub async fn select_filter(&self, filter: PortFilter) -> Result<usize, DashboardError> {
        if !self.view.filters().contains(&filter) {
            return Err(DashboardError::UnsupportedFilter {
                filter,
                page: self.view.name(),
            });
        }
        let mut page = self.page.write().await;
        page.state.filter = filter;
        mark_active_button(&mut page.document, filter);
        Ok(apply_filter(&mut page.document, filter))
    }

    pub async fn select_filter_by_name(&self, name: &str) -> Result<usize, DashboardError> {
        let filter: PortFilter = name
            .parse()
            .map_err(|_| DashboardError::UnknownFilter(name.to_string()))?;
        self.select_filter(filter).await
    }

    pub async fn set_auto_update(&self, enabled: bool) {
        let mut page = self.page.write().await;
        page.state.auto_update = enabled;
        self.view
            .show_auto_update(&mut page.document, enabled, self.labels);
    }

    pub async fn html(&self) -> String {
        self.page.read().await.document.to_html()
    }

    /// Copy of the current page.
    pub async fn snapshot(&self) -> Page {
        self.page.read().await.clone()
    }

    pub async fn status(&self) -> PageStatus {
        let page = self.page.read().await;
        PageStatus {
            name: self.view.name(),
            online: page.state.online,
            connection: page.state.connection,
            last_update: page.state.last_update.map(|t| t.to_rfc3339()),
            filter: page.state.filter,
            auto_update: page.state.auto_update,
            cycles: self.cycles.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }
}

#[async_trait]
impl<V: View> Refresh for Dashboard<V> {
    fn name(&self) -> String {
        self.view.name()
    }

    fn interval(&self) -> Duration {
        self.view.interval()
    }

    async fn tick(&self) {
        // Failures are already rendered and logged; the next tick is the retry.
        let _ = self.run_cycle().await;
    }

    async fn auto_update_changed(&self, enabled: bool) {
        self.set_auto_update(enabled).await;
    }
}
