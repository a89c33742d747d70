//! Page variants.
//!
//! A `View` binds one page layout to the generic dashboard: which endpoint
//! it polls, how often, which containers it owns and how a payload turns into
//! fragments. Two views exist:
//! - `OverviewView`: every port of the main switch, link-based activity
//! - `DeviceView`: interfaces of a single device, admin+oper activity

pub mod common;
pub mod device;
pub mod overview;

use chrono::{DateTime, Local};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::filter::PortFilter;
use crate::fragment::Document;
use crate::labels::Labels;

pub use device::DeviceView;
pub use overview::OverviewView;

/// Id of the "last updated" text span, shared by both layouts.
pub const LAST_UPDATE_ID: &str = "lastUpdateTime";

/// Outcome shown by the connection indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Connection {
    /// No cycle has completed yet.
    Pending,
    Online,
    /// The API answered but reports the device itself as unreachable.
    DeviceDown,
    /// Fetch or parse failed.
    Error,
}

/// Per-page view state. Owned by the page, overwritten every cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub filter: PortFilter,
    /// Outcome of the last fetch.
    pub online: bool,
    pub connection: Connection,
    pub last_update: Option<DateTime<Local>>,
    pub auto_update: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            filter: PortFilter::All,
            online: false,
            connection: Connection::Pending,
            last_update: None,
            auto_update: true,
        }
    }
}

/// A page document together with its view state.
#[derive(Debug, Clone)]
pub struct Page {
    pub document: Document,
    pub state: ViewState,
}

pub trait View: Send + Sync + 'static {
    type Payload: DeserializeOwned + Send;

    /// Short name used in logs and health output.
    fn name(&self) -> String;

    /// Path of the device API endpoint, relative to the API base.
    fn endpoint(&self) -> String;

    /// Path this page is served under; filter links hang off it.
    fn base_path(&self) -> String;

    fn interval(&self) -> Duration;

    /// Filters this page offers, in button order.
    fn filters(&self) -> &'static [PortFilter];

    /// Static layout with empty containers.
    fn skeleton(&self, labels: &Labels) -> Document;

    /// Replaces the content containers with fragments built from `payload`.
    fn render(&self, doc: &mut Document, payload: &Self::Payload, labels: &Labels);

    /// Replaces the content containers with the failure placeholder.
    fn render_failure(&self, doc: &mut Document, labels: &Labels);

    /// Indicator state after a successful fetch.
    fn connection_for(&self, _payload: &Self::Payload) -> Connection {
        Connection::Online
    }

    fn show_connection(&self, doc: &mut Document, connection: Connection, labels: &Labels);

    fn show_last_update(&self, doc: &mut Document, at: Option<DateTime<Local>>, labels: &Labels) {
        let text = match at {
            Some(at) => at.format("%H:%M:%S").to_string(),
            None => labels.never_updated.to_string(),
        };
        doc.set_text(LAST_UPDATE_ID, text);
    }

    /// Layouts without an auto-update indicator ignore this.
    fn show_auto_update(&self, _doc: &mut Document, _enabled: bool, _labels: &Labels) {}
}
