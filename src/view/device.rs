//! Device detail page: interfaces of a single device addressed by IP.
//!
//! An interface is active only when it is administratively enabled AND
//! operationally up. Traffic is shown as cumulative MB, speed as whole Mbps.

use std::time::Duration;

use crate::filter::PortFilter;
use crate::format::{format_megabits, format_megabytes};
use crate::fragment::{el, Document, Element, Node};
use crate::labels::Labels;
use crate::model::{non_empty, sorted_ports, DevicePayload, Interface, InterfaceMap};
use crate::view::common::{failure_placeholder, filter_bar, page_shell, system_info_items};
use crate::view::{Connection, View, LAST_UPDATE_ID};

pub const DETAILS_ID: &str = "device-details-content";
pub const STATUS_CONTAINER_ID: &str = "device-status-container";
pub const STATUS_TEXT_ID: &str = "device-status-text";
pub const LOADING_ID: &str = "loading";

pub const DEFAULT_DEVICE_INTERVAL: Duration = Duration::from_secs(10);

const FILTERS: &[PortFilter] = &[PortFilter::All, PortFilter::Active, PortFilter::Inactive];

#[derive(Debug, Clone)]
pub struct DeviceView {
    ip: String,
    interval: Duration,
}

impl DeviceView {
    pub fn new(ip: impl Into<String>, interval: Duration) -> Self {
        Self {
            ip: ip.into(),
            interval,
        }
    }

    pub fn ip(&self) -> &str {
        &self.ip
    }
}

impl View for DeviceView {
    type Payload = DevicePayload;

    fn name(&self) -> String {
        format!("device:{}", self.ip)
    }

    fn endpoint(&self) -> String {
        format!("/api/device/{}", self.ip)
    }

    fn base_path(&self) -> String {
        format!("/device/{}", self.ip)
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    fn filters(&self) -> &'static [PortFilter] {
        FILTERS
    }

    fn skeleton(&self, labels: &Labels) -> Document {
        let title = format!("{} {}", labels.device_title, self.ip);
        let content = el("div")
            .child(el("h1").text(title.clone()))
            .child(
                el("div")
                    .class("status-bar")
                    .child(
                        el("span")
                            .id(STATUS_CONTAINER_ID)
                            .class("status-indicator"),
                    )
                    .child(el("span").id(STATUS_TEXT_ID).text(labels.loading))
                    .child(
                        el("span")
                            .text(format!("{}: ", labels.last_update))
                            .child(el("span").id(LAST_UPDATE_ID).text(labels.never_updated)),
                    ),
            )
            .child(filter_bar(&self.base_path(), FILTERS, labels))
            .child(el("div").id(LOADING_ID).class("loading").text(labels.loading))
            .child(el("div").id(DETAILS_ID));

        Document::new(page_shell(
            &title,
            self.interval.as_secs().max(1),
            content,
            labels,
        ))
    }

    fn render(&self, doc: &mut Document, payload: &DevicePayload, labels: &Labels) {
        hide_loading(doc);
        let empty = InterfaceMap::new();
        let interfaces = payload.interfaces.as_ref().unwrap_or(&empty);
        doc.replace_children(
            DETAILS_ID,
            vec![
                Node::from(
                    el("div")
                        .class("info-grid")
                        .children(system_info_items(payload.system_info.as_ref(), labels)),
                ),
                Node::from(
                    el("div")
                        .class("interfaces")
                        .children(interface_rows(interfaces, labels)),
                ),
            ],
        );
    }

    fn render_failure(&self, doc: &mut Document, labels: &Labels) {
        hide_loading(doc);
        doc.replace_children(DETAILS_ID, vec![failure_placeholder(labels.details_failed)]);
    }

    fn connection_for(&self, payload: &DevicePayload) -> Connection {
        match payload.device_status {
            Some(false) => Connection::DeviceDown,
            _ => Connection::Online,
        }
    }

    fn show_connection(&self, doc: &mut Document, connection: Connection, labels: &Labels) {
        let (class, text) = match connection {
            Connection::Pending => ("status-indicator", labels.loading),
            Connection::Online => ("status-indicator status-online", labels.device_online),
            Connection::DeviceDown => ("status-indicator status-offline", labels.device_offline),
            Connection::Error => ("status-indicator status-error", labels.offline),
        };
        doc.set_class(STATUS_CONTAINER_ID, class);
        doc.set_text(STATUS_TEXT_ID, text);
    }
}

fn hide_loading(doc: &mut Document) {
    if let Some(loading) = doc.get_mut(LOADING_ID) {
        loading.set_attr("style", "display: none");
    }
}

pub fn interface_rows(interfaces: &InterfaceMap, labels: &Labels) -> Vec<Node> {
    sorted_ports(interfaces)
        .into_iter()
        .map(|(id, iface)| Node::from(interface_row(id, iface, labels)))
        .collect()
}

pub fn interface_row(id: &str, iface: &Interface, labels: &Labels) -> Element {
    let active = iface.is_admin_up() && iface.is_link_up();
    let has_errors = iface.has_errors();

    let name = el("div")
        .class("iface-name")
        .text(non_empty(&iface.name).unwrap_or(labels.not_available))
        .maybe(
            non_empty(&iface.alias)
                .map(|alias| el("div").class("label_backblack").text(alias)),
        );

    let traffic = el("div")
        .class("iface-traffic")
        .text(format!("↓ {}", format_megabytes(iface.in_octets)))
        .child(el("br"))
        .text(format!("↑ {}", format_megabytes(iface.out_octets)));

    el("div")
        .class("item")
        .class("interface-row")
        .data("port", id)
        .data("status", if iface.is_link_up() { "up" } else { "down" })
        .data("admin", if iface.is_admin_up() { "enabled" } else { "disabled" })
        .data("active", active)
        .data("errors", has_errors)
        .child(el("div").class("iface-index").text(id))
        .child(name)
        .child(
            el("div")
                .class("iface-status")
                .class(if active { "port_green" } else { "port_red" })
                .text(if active { "up" } else { "down" }),
        )
        .child(el("div").class("iface-speed").text(format_megabits(iface.speed)))
        .child(traffic)
        .maybe(has_errors.then(|| {
            el("span").class("badge-error").text(format!(
                "{}: {}",
                labels.errors,
                iface.total_errors()
            ))
        }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::EN;

    fn iface(json: &str) -> Interface {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_active_requires_admin_and_oper() {
        let link_only = interface_row("1", &iface(r#"{"status": 1, "admin_status": 2}"#), &EN);
        assert!(!link_only.flag("active"));
        let both = interface_row("2", &iface(r#"{"status": 1, "admin_status": 1}"#), &EN);
        assert!(both.flag("active"));
    }

    #[test]
    fn test_units() {
        let row = interface_row(
            "5",
            &iface(r#"{"speed": 100000000, "in_octets": 1572864, "out_octets": 0}"#),
            &EN,
        );
        let text = row.text_content();
        assert!(text.contains("100 Mbps"));
        assert!(text.contains("↓ 1.50 MB"));
        assert!(text.contains("↑ 0.00 MB"));
    }

    #[test]
    fn test_error_badge() {
        let clean = interface_row("1", &iface("{}"), &EN);
        assert!(!clean.text_content().contains("Errors"));
        let noisy = interface_row("1", &iface(r#"{"in_errors": 4, "out_errors": 1}"#), &EN);
        assert!(noisy.text_content().contains("Errors: 5"));
    }

    #[test]
    fn test_device_down_indicator() {
        let view = DeviceView::new("10.0.0.2", DEFAULT_DEVICE_INTERVAL);
        let payload = DevicePayload {
            device_status: Some(false),
            ..Default::default()
        };
        assert_eq!(view.connection_for(&payload), Connection::DeviceDown);

        let mut doc = view.skeleton(&EN);
        view.show_connection(&mut doc, Connection::DeviceDown, &EN);
        assert_eq!(
            doc.get(STATUS_CONTAINER_ID).and_then(|e| e.get("class")),
            Some("status-indicator status-offline")
        );
        assert_eq!(doc.text_of(STATUS_TEXT_ID).as_deref(), Some("Offline"));
    }

    #[test]
    fn test_render_hides_loading() {
        let view = DeviceView::new("10.0.0.2", DEFAULT_DEVICE_INTERVAL);
        let mut doc = view.skeleton(&EN);
        assert!(doc.get(LOADING_ID).is_some_and(|e| e.is_displayed()));
        view.render(&mut doc, &DevicePayload::default(), &EN);
        assert!(doc.get(LOADING_ID).is_some_and(|e| !e.is_displayed()));
    }
}
