//! Fragments shared by both page layouts.

use crate::filter::PortFilter;
use crate::format::byte_components;
use crate::fragment::{el, Element, Node};
use crate::labels::Labels;
use crate::model::{non_empty, SystemInfo};

const STYLE: &str = "
body { font-family: -apple-system, BlinkMacSystemFont, Segoe UI, Roboto, sans-serif; margin: 0; padding: 20px; background: #f5f5f5; }
.container { max-width: 1400px; margin: 0 auto; background: white; padding: 30px; border-radius: 8px; }
h1 { color: #333; border-bottom: 3px solid #007bff; padding-bottom: 10px; }
.status-bar { display: flex; gap: 20px; align-items: center; color: #555; }
.status-indicator { display: inline-block; width: 12px; height: 12px; border-radius: 50%; background: #aaa; }
.status-online { background: #28a745; }
.status-offline { background: #dc3545; }
.status-error { background: #ffc107; }
.filters { margin: 20px 0; }
.filter-btn { display: inline-block; padding: 6px 14px; margin-right: 8px; border-radius: 4px; background: #e9ecef; color: #333; text-decoration: none; }
.filter-btn.active { background: #007bff; color: white; }
.info-grid { display: flex; flex-wrap: wrap; gap: 20px; margin-bottom: 20px; }
.info-item { padding: 10px 15px; background: #e9ecef; border-radius: 4px; }
.info-label { font-weight: 600; color: #555; }
.item { display: grid; grid-template-columns: 80px 2fr 1fr 1fr 10px 2fr; gap: 10px; padding: 10px; border-bottom: 1px solid #ddd; }
.port_green { color: #28a745; font-weight: 600; }
.port_red { color: #dc3545; font-weight: 600; }
.port_color.active { background: #28a745; }
.label_backblack { background: #333; color: white; padding: 1px 6px; border-radius: 3px; }
.bold_text { font-weight: 700; }
.red_text { color: #dc3545; }
.div_small { font-size: 0.8em; }
.info_block { color: #dc3545; font-size: 0.9em; }
.mobile-only { display: none; }
.loading { color: #666; padding: 20px; }
.badge-error { background: #dc3545; color: white; padding: 1px 6px; border-radius: 3px; }
";

/// Reports tab visibility to the server so polling can pause while no one
/// is looking.
pub const VISIBILITY_HOOK: &str = "
(function () {
  function report() {
    fetch('/visibility?state=' + (document.hidden ? 'hidden' : 'visible')).catch(function () {});
  }
  document.addEventListener('visibilitychange', report);
  report();
})();
";

/// Wraps page content in the document shell. The page reloads itself every
/// `refresh_secs` so the browser follows the poll cycle.
pub fn page_shell(title: &str, refresh_secs: u64, content: Element, labels: &Labels) -> Element {
    el("html")
        .attr("lang", labels.lang)
        .child(
            el("head")
                .child(el("meta").attr("charset", "UTF-8"))
                .child(
                    el("meta")
                        .attr("http-equiv", "refresh")
                        .attr("content", refresh_secs.to_string()),
                )
                .child(el("title").text(title))
                .child(el("style").text(STYLE)),
        )
        .child(
            el("body")
                .child(el("div").class("container").child(content))
                .child(el("script").text(VISIBILITY_HOOK)),
        )
}

pub fn filter_caption(filter: PortFilter, labels: &Labels) -> &'static str {
    match filter {
        PortFilter::All => labels.filter_all,
        PortFilter::Active => labels.filter_active,
        PortFilter::Inactive => labels.filter_inactive,
        PortFilter::Connected => labels.filter_connected,
        PortFilter::Errors => labels.filter_errors,
    }
}

/// Filter buttons as links to `{base}/filter/{name}`.
pub fn filter_bar(base: &str, filters: &[PortFilter], labels: &Labels) -> Element {
    el("div").class("filters").children(filters.iter().map(|f| {
        Node::from(
            el("a")
                .class("filter-btn")
                .class(if *f == PortFilter::All { "active" } else { "" })
                .data("filter", f.as_str())
                .attr("href", format!("{}/filter/{}", base, f.as_str()))
                .text(filter_caption(*f, labels)),
        )
    }))
}

fn info_item(label: &str, value: Option<&str>, labels: &Labels) -> Node {
    el("div")
        .class("info-item")
        .child(el("div").class("info-label").text(label))
        .child(
            el("div")
                .class("info-value")
                .text(value.unwrap_or(labels.unknown)),
        )
        .into()
}

/// Four label/value pairs; blank or missing values read "Unknown".
pub fn system_info_items(info: Option<&SystemInfo>, labels: &Labels) -> Vec<Node> {
    let empty = SystemInfo::default();
    let info = info.unwrap_or(&empty);
    vec![
        info_item(labels.model, non_empty(&info.model), labels),
        info_item(labels.system_name, non_empty(&info.system_name), labels),
        info_item(labels.mac_address, non_empty(&info.mac_address), labels),
        info_item(labels.uptime, non_empty(&info.uptime), labels),
    ]
}

pub fn mobile_label(text: &str) -> Element {
    el("span").class("mobile-only mobile-label").text(text)
}

pub fn failure_placeholder(text: &str) -> Node {
    el("div").class("loading").text(text).into()
}

/// Byte counter as styled value/unit spans, largest unit first.
pub fn byte_spans(bytes: u64) -> Vec<Node> {
    let components = byte_components(bytes);
    if components.is_empty() {
        return vec![value_span(0), unit_span("B")];
    }
    let mut nodes = Vec::new();
    for (i, (value, unit)) in components.into_iter().enumerate() {
        if i > 0 {
            nodes.push(Node::text(" "));
        }
        nodes.push(value_span(value));
        nodes.push(unit_span(unit));
    }
    nodes
}

fn value_span(value: u64) -> Node {
    el("span").class("bold_text red_text").text(value.to_string()).into()
}

fn unit_span(unit: &str) -> Node {
    el("span").class("div_small").text(unit).into()
}
