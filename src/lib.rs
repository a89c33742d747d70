//! portwatch library
//!
//! Live switch port dashboards driven by a device JSON API. A page is an
//! in-memory document with named containers; a background poller fetches the
//! device payload, re-renders those containers and re-applies the selected
//! port filter.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use portwatch::{Dashboard, HttpSource, Locale, OverviewView, PageController};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let source = Arc::new(HttpSource::new("http://127.0.0.1:5000", None)?);
//! let dashboard = Arc::new(Dashboard::new(OverviewView::default(), source, Locale::En));
//!
//! // Start polling: one cycle now, then every 5 seconds
//! let controller = PageController::new(dashboard.clone());
//! controller.ready();
//!
//! // Narrow the port list down to ports with errors
//! dashboard.select_filter_by_name("errors").await?;
//! println!("{}", dashboard.html().await);
//! # Ok(())
//! # }
//! ```

pub mod dashboard;
pub mod filter;
pub mod format;
pub mod fragment;
pub mod labels;
pub mod model;
pub mod poller;
pub mod source;
pub mod view;

// Re-export main types for convenience
pub use dashboard::{Dashboard, DashboardError, PageStatus};
pub use filter::PortFilter;
pub use format::{format_bytes, format_speed};
pub use labels::Locale;
pub use model::{DevicePayload, Interface, InterfaceMap, SystemInfo};
pub use poller::{spawn_visibility_policy, PageController, Poller, Refresh, Visibility};
pub use source::{DeviceSource, FetchError, HttpSource};
pub use view::{Connection, DeviceView, OverviewView, Page, View};
