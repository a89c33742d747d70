//! Overview page: all ports of the main switch.
//!
//! Ports are listed in numeric order. A port counts as active when its link
//! is up, regardless of admin state.

use std::time::Duration;

use crate::filter::PortFilter;
use crate::format::format_speed;
use crate::fragment::{el, Document, Element, Node};
use crate::labels::Labels;
use crate::model::{non_empty, sorted_ports, DevicePayload, Interface, InterfaceMap};
use crate::view::common::{
    byte_spans, failure_placeholder, filter_bar, mobile_label, page_shell, system_info_items,
};
use crate::view::{Connection, View, LAST_UPDATE_ID};

pub const SYSTEM_INFO_ID: &str = "systemInfo";
pub const PORTS_ID: &str = "portsContainer";
pub const CONNECTION_STATUS_ID: &str = "connectionStatus";
pub const CONNECTION_TEXT_ID: &str = "connectionText";
pub const AUTO_UPDATE_ID: &str = "autoUpdateStatus";

pub const DEFAULT_OVERVIEW_KEY: &str = "zyxel";
pub const DEFAULT_OVERVIEW_INTERVAL: Duration = Duration::from_secs(5);

const FILTERS: &[PortFilter] = &[
    PortFilter::All,
    PortFilter::Active,
    PortFilter::Inactive,
    PortFilter::Connected,
    PortFilter::Errors,
];

#[derive(Debug, Clone)]
pub struct OverviewView {
    key: String,
    interval: Duration,
}

impl OverviewView {
    pub fn new(key: impl Into<String>, interval: Duration) -> Self {
        Self {
            key: key.into(),
            interval,
        }
    }
}

impl Default for OverviewView {
    fn default() -> Self {
        Self::new(DEFAULT_OVERVIEW_KEY, DEFAULT_OVERVIEW_INTERVAL)
    }
}

impl View for OverviewView {
    type Payload = DevicePayload;

    fn name(&self) -> String {
        format!("overview:{}", self.key)
    }

    fn endpoint(&self) -> String {
        format!("/api/device/{}", self.key)
    }

    fn base_path(&self) -> String {
        String::new()
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn filters(&self) -> &'static [PortFilter] {
        FILTERS
    }

    fn skeleton(&self, labels: &Labels) -> Document {
        let status_bar = el("div")
            .class("status-bar")
            .child(
                el("span")
                    .id(CONNECTION_STATUS_ID)
                    .class("status-indicator"),
            )
            .child(el("span").id(CONNECTION_TEXT_ID).text(labels.loading))
            .child(
                el("span")
                    .text(format!("{}: ", labels.last_update))
                    .child(el("span").id(LAST_UPDATE_ID).text(labels.never_updated)),
            )
            .child(
                el("span")
                    .text(format!("{}: ", labels.auto_update))
                    .child(el("span").id(AUTO_UPDATE_ID).text(labels.auto_update_on)),
            );

        let content = el("div")
            .child(el("h1").text(labels.overview_title))
            .child(status_bar)
            .child(
                el("div")
                    .id(SYSTEM_INFO_ID)
                    .class("info-grid")
                    .child(failure_placeholder(labels.loading)),
            )
            .child(filter_bar(&self.base_path(), FILTERS, labels))
            .child(
                el("div")
                    .id(PORTS_ID)
                    .class("ports")
                    .child(failure_placeholder(labels.loading)),
            );

        Document::new(page_shell(
            labels.overview_title,
            self.interval.as_secs().max(1),
            content,
            labels,
        ))
    }

    fn render(&self, doc: &mut Document, payload: &DevicePayload, labels: &Labels) {
        doc.replace_children(
            SYSTEM_INFO_ID,
            system_info_items(payload.system_info.as_ref(), labels),
        );
        let empty = InterfaceMap::new();
        let ports = payload.interfaces.as_ref().unwrap_or(&empty);
        doc.replace_children(PORTS_ID, port_rows(ports, labels));
    }

    fn render_failure(&self, doc: &mut Document, labels: &Labels) {
        doc.replace_children(SYSTEM_INFO_ID, vec![failure_placeholder(labels.info_failed)]);
        doc.replace_children(PORTS_ID, vec![failure_placeholder(labels.ports_failed)]);
    }

    fn show_connection(&self, doc: &mut Document, connection: Connection, labels: &Labels) {
        let (class, text) = match connection {
            Connection::Pending => ("status-indicator", labels.loading),
            Connection::Online => ("status-indicator status-online", labels.online),
            Connection::DeviceDown | Connection::Error => {
                ("status-indicator status-offline", labels.offline)
            }
        };
        doc.set_class(CONNECTION_STATUS_ID, class);
        doc.set_text(CONNECTION_TEXT_ID, text);
    }

    fn show_auto_update(&self, doc: &mut Document, enabled: bool, labels: &Labels) {
        let text = if enabled {
            labels.auto_update_on
        } else {
            labels.auto_update_paused
        };
        doc.set_text(AUTO_UPDATE_ID, text);
    }
}

/// One row per port, in numeric id order.
pub fn port_rows(ports: &InterfaceMap, labels: &Labels) -> Vec<Node> {
    sorted_ports(ports)
        .into_iter()
        .map(|(id, port)| Node::from(port_row(id, port, labels)))
        .collect()
}

/// Builds a port row. The derived flags are cached as `data-*` attributes so
/// filtering never has to look at the payload again.
pub fn port_row(id: &str, port: &Interface, labels: &Labels) -> Element {
    let connected = port.is_connected();
    let active = port.is_link_up();
    let admin_up = port.is_admin_up();
    let has_traffic = port.has_traffic();
    let has_errors = port.has_errors();

    let number = el("div")
        .class("port_number")
        .text(id)
        .child(mobile_label(labels.port))
        .maybe(connected.then(|| el("div").class("port_edit").text("✏️")));

    let admin = el("div")
        .class("port_admin_status")
        .class(if admin_up { "port_green" } else { "port_red" })
        .child(mobile_label(labels.admin_status))
        .text(if admin_up {
            labels.admin_enabled
        } else {
            labels.admin_disabled
        });

    let mut link = el("div")
        .class("port_link_status")
        .class(if active { "port_green" } else { "port_red" })
        .child(mobile_label(labels.link))
        .text(if active { "up" } else { "down" });
    if active && port.speed > 0 {
        link = link.child(el("br")).text(format_speed(port.speed as f64));
    }

    el("div")
        .class("item")
        .data("port", id)
        .data("status", if active { "up" } else { "down" })
        .data("admin", if admin_up { "enabled" } else { "disabled" })
        .data("connected", connected)
        .data("active", active)
        .data("traffic", has_traffic)
        .data("errors", has_errors)
        .child(number)
        .child(connection_block(port, connected, labels))
        .child(admin)
        .child(link)
        .child(
            el("div")
                .class("port_color")
                .class(if active { "active" } else { "" }),
        )
        .child(traffic_block(port, has_traffic, has_errors, labels))
}

fn alias_label(port: &Interface) -> Option<Element> {
    non_empty(&port.alias).map(|alias| el("span").class("label_backblack").text(alias))
}

fn connection_block(port: &Interface, connected: bool, labels: &Labels) -> Element {
    let mut block = el("div")
        .class("port_connection")
        .child(mobile_label(labels.connection));

    if connected {
        block = block
            .maybe(
                non_empty(&port.connection)
                    .map(|c| el("div").class("client-name").text(c)),
            )
            .maybe(non_empty(&port.address).map(|a| el("div").class("address").text(a)))
            .maybe(alias_label(port))
            .maybe(non_empty(&port.descr).map(|d| {
                el("div")
                    .class("port-descr")
                    .child(el("b").text(format!("{}:", labels.port_descr)))
                    .text(format!(" {}", d))
            }));
    } else {
        block = block.maybe(alias_label(port));
    }

    let name = non_empty(&port.name).unwrap_or(labels.not_available);
    block.child(
        el("div")
            .class("port-descr")
            .child(el("b").text(format!("{}:", labels.name)))
            .text(format!(" {}", name)),
    )
}

fn traffic_block(
    port: &Interface,
    has_traffic: bool,
    has_errors: bool,
    labels: &Labels,
) -> Element {
    let mut block = el("div")
        .class("port_traf")
        .child(mobile_label(labels.traffic))
        .text("in: ")
        .children(byte_spans(port.in_octets))
        .child(el("br"))
        .text("out: ")
        .children(byte_spans(port.out_octets));

    if has_traffic {
        block = block.child(
            el("div")
                .class("traf-speed")
                .child(el("span").class("traf-icon us-traf-in").text("▲"))
                .child(el("b").text(format_speed(port.speed_in.unwrap_or(0.0))))
                .child(el("span").class("traf-icon us-traf-out").text("▼"))
                .child(el("b").text(format_speed(port.speed_out.unwrap_or(0.0)))),
        );
    }

    if has_errors {
        block = block.child(el("div").class("info_block").text(format!(
            "{}: In {}, Out {}",
            labels.errors, port.in_errors, port.out_errors
        )));
    }

    block
}
