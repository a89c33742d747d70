//! Device API payload types.
//!
//! The device API is an external contract. Every field is optional on the
//! wire; a missing or null value falls back to a default instead of failing
//! the whole payload.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::warn;

/// Ports keyed by their string-encoded numeric index.
pub type InterfaceMap = BTreeMap<String, Interface>;

/// Body of `GET /api/device/{identifier}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DevicePayload {
    #[serde(default, deserialize_with = "lenient_system_info")]
    pub system_info: Option<SystemInfo>,
    #[serde(default, deserialize_with = "lenient_interfaces")]
    pub interfaces: Option<InterfaceMap>,
    /// Reachability of the device itself, reported by the detail endpoint.
    #[serde(default, deserialize_with = "lenient_flag")]
    pub device_status: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SystemInfo {
    #[serde(default, deserialize_with = "scalar_string")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub system_name: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub mac_address: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub uptime: Option<String>,
}

/// Operational (link) status of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Up,
    #[default]
    Down,
}

/// Administrative status of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminStatus {
    Enabled,
    #[default]
    Disabled,
}

/// Status values arrive as SNMP integers (`1` = up), strings or booleans.
fn status_is_on(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::String(text) => matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "1" | "up" | "enabled" | "true"
        ),
        Value::Bool(b) => *b,
        _ => false,
    }
}

impl From<Option<&Value>> for LinkStatus {
    fn from(value: Option<&Value>) -> Self {
        match value {
            Some(v) if status_is_on(v) => LinkStatus::Up,
            _ => LinkStatus::Down,
        }
    }
}

impl From<Option<&Value>> for AdminStatus {
    fn from(value: Option<&Value>) -> Self {
        match value {
            Some(v) if status_is_on(v) => AdminStatus::Enabled,
            _ => AdminStatus::Disabled,
        }
    }
}

impl<'de> Deserialize<'de> for LinkStatus {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(Option::<Value>::deserialize(d)?.as_ref().into())
    }
}

impl<'de> Deserialize<'de> for AdminStatus {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(Option::<Value>::deserialize(d)?.as_ref().into())
    }
}

/// Counter value: integers, floats and numeric strings are accepted;
/// anything else, including negatives, reads as 0.
fn counter_value(value: Option<&Value>) -> u64 {
    let number = match value {
        Some(Value::Number(n)) => match n.as_u64() {
            Some(exact) => return exact,
            None => n.as_f64(),
        },
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(v) if v.is_finite() && v > 0.0 => v as u64,
        _ => 0,
    }
}

fn rate_value(value: Option<&Value>) -> Option<f64> {
    let rate = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    rate.filter(|v| v.is_finite())
}

/// Strings pass through; numbers and booleans are printed; the rest is absent.
fn text_value(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn scalar_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(text_value(Option::<Value>::deserialize(d)?.as_ref()))
}

fn lenient_flag<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => None,
        Some(v) => Some(status_is_on(&v)),
    })
}

fn lenient_system_info<'de, D: Deserializer<'de>>(d: D) -> Result<Option<SystemInfo>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(v @ Value::Object(_)) => serde_json::from_value(v)
            .map_err(|e| warn!("Ignoring malformed system_info: {}", e))
            .ok(),
        _ => None,
    })
}

/// A record that is not an object is kept as an empty port rather than
/// failing the whole payload.
fn lenient_interfaces<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<InterfaceMap>, D::Error> {
    let records = match Option::<Value>::deserialize(d)? {
        Some(Value::Object(records)) => records,
        _ => return Ok(None),
    };
    let map = records
        .into_iter()
        .map(|(id, record)| {
            let port = match &record {
                Value::Object(fields) => Interface::from_fields(fields),
                other => {
                    warn!(port = %id, "Malformed interface record: {}", other);
                    Interface::default()
                }
            };
            (id, port)
        })
        .collect();
    Ok(Some(map))
}

/// One switch port as reported by the device API.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Interface {
    pub admin_status: AdminStatus,
    pub status: LinkStatus,

    pub connection: Option<String>,
    pub address: Option<String>,
    pub alias: Option<String>,
    pub descr: Option<String>,
    pub name: Option<String>,

    pub in_octets: u64,
    pub out_octets: u64,
    pub in_pkts: u64,
    pub out_pkts: u64,
    pub in_errors: u64,
    pub out_errors: u64,

    /// Instantaneous rates in bits per second.
    pub speed_in: Option<f64>,
    pub speed_out: Option<f64>,

    /// Nominal link speed in bits per second.
    pub speed: u64,
}

impl<'de> Deserialize<'de> for Interface {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Object(fields) => Interface::from_fields(&fields),
            _ => Interface::default(),
        })
    }
}

impl Interface {
    /// Builds a port from a raw record. `status` wins over `oper_status`
    /// when both are present.
    pub fn from_fields(fields: &serde_json::Map<String, Value>) -> Self {
        let get = |key: &str| fields.get(key).filter(|v| !v.is_null());
        Self {
            admin_status: get("admin_status").into(),
            status: get("status").or_else(|| get("oper_status")).into(),
            connection: text_value(get("connection")),
            address: text_value(get("address")),
            alias: text_value(get("alias")),
            descr: text_value(get("descr")),
            name: text_value(get("name")),
            in_octets: counter_value(get("in_octets")),
            out_octets: counter_value(get("out_octets")),
            in_pkts: counter_value(get("in_pkts")),
            out_pkts: counter_value(get("out_pkts")),
            in_errors: counter_value(get("in_errors")),
            out_errors: counter_value(get("out_errors")),
            speed_in: rate_value(get("speed_in")),
            speed_out: rate_value(get("speed_out")),
            speed: counter_value(get("speed")),
        }
    }

    pub fn is_link_up(&self) -> bool {
        self.status == LinkStatus::Up
    }

    pub fn is_admin_up(&self) -> bool {
        self.admin_status == AdminStatus::Enabled
    }

    pub fn is_connected(&self) -> bool {
        non_empty(&self.connection).is_some()
    }

    pub fn has_errors(&self) -> bool {
        self.in_errors > 0 || self.out_errors > 0
    }

    /// Bytes have moved and a live rate is being reported.
    pub fn has_traffic(&self) -> bool {
        let moved = self.in_octets > 0 || self.out_octets > 0;
        let flowing =
            self.speed_in.unwrap_or(0.0) > 0.0 || self.speed_out.unwrap_or(0.0) > 0.0;
        moved && flowing
    }

    pub fn total_octets(&self) -> u64 {
        self.in_octets.saturating_add(self.out_octets)
    }

    pub fn total_errors(&self) -> u64 {
        self.in_errors.saturating_add(self.out_errors)
    }
}

/// Returns the string when it is present and not blank.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// Orders port ids numerically; non-numeric ids follow, lexically.
pub fn compare_port_ids(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<u64>(), b.trim().parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Ports in numeric id order.
pub fn sorted_ports(map: &InterfaceMap) -> Vec<(&str, &Interface)> {
    let mut ports: Vec<(&str, &Interface)> =
        map.iter().map(|(id, port)| (id.as_str(), port)).collect();
    ports.sort_by(|(a, _), (b, _)| compare_port_ids(a, b));
    ports
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_decoding_integer_and_string() {
        let json = r#"{
            "1": {"admin_status": 1, "status": 1},
            "2": {"admin_status": 2, "oper_status": 2},
            "3": {"admin_status": "enabled", "status": "up"},
            "4": {"admin_status": null, "status": "down"}
        }"#;
        let map: InterfaceMap = serde_json::from_str(json).unwrap();
        assert!(map["1"].is_admin_up() && map["1"].is_link_up());
        assert!(!map["2"].is_admin_up() && !map["2"].is_link_up());
        assert!(map["3"].is_admin_up() && map["3"].is_link_up());
        assert!(!map["4"].is_admin_up() && !map["4"].is_link_up());
    }

    #[test]
    fn test_missing_and_null_fields_default() {
        let port: Interface =
            serde_json::from_str(r#"{"in_octets": null, "extra": "ignored"}"#).unwrap();
        assert_eq!(port.in_octets, 0);
        assert_eq!(port.status, LinkStatus::Down);
        assert!(port.speed_in.is_none());
    }

    const GOOD_PORT: &str = r#""1": {"admin_status": 1, "status": 1, "in_octets": 500}"#;

    fn payload_with(bad_port: &str) -> DevicePayload {
        let json = format!(r#"{{"interfaces": {{{}, "2": {}}}}}"#, GOOD_PORT, bad_port);
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_status_and_oper_status_together() {
        let payload = payload_with(r#"{"status": "up", "oper_status": 2}"#);
        let ports = payload.interfaces.unwrap();
        assert!(ports["1"].is_link_up());
        assert!(ports["2"].is_link_up());

        let payload = payload_with(r#"{"status": null, "oper_status": 1}"#);
        assert!(payload.interfaces.unwrap()["2"].is_link_up());
    }

    #[test]
    fn test_float_speed() {
        let ports = payload_with(r#"{"speed": 1.0e9, "speed_in": 1200.5}"#)
            .interfaces
            .unwrap();
        assert_eq!(ports["2"].speed, 1_000_000_000);
        assert_eq!(ports["2"].speed_in, Some(1200.5));
    }

    #[test]
    fn test_null_record_becomes_empty_port() {
        let ports = payload_with("null").interfaces.unwrap();
        assert_eq!(ports.len(), 2);
        assert_eq!(ports["2"], Interface::default());
        assert_eq!(ports["1"].in_octets, 500);

        let ports = payload_with(r#""garbage""#).interfaces.unwrap();
        assert_eq!(ports["2"], Interface::default());
    }

    #[test]
    fn test_string_and_negative_counters() {
        let ports = payload_with(r#"{"in_octets": "1024", "out_octets": -5, "in_errors": "x"}"#)
            .interfaces
            .unwrap();
        assert_eq!(ports["2"].in_octets, 1024);
        assert_eq!(ports["2"].out_octets, 0);
        assert_eq!(ports["2"].in_errors, 0);
    }

    #[test]
    fn test_numeric_uptime() {
        let json = r#"{"system_info": {"model": "DGS-1210", "uptime": 86400, "mac_address": null},
                       "interfaces": {"1": {}}}"#;
        let payload: DevicePayload = serde_json::from_str(json).unwrap();
        let info = payload.system_info.unwrap();
        assert_eq!(info.uptime.as_deref(), Some("86400"));
        assert_eq!(info.model.as_deref(), Some("DGS-1210"));
        assert!(info.mac_address.is_none());
    }

    #[test]
    fn test_malformed_sections_are_dropped() {
        let json = r#"{"system_info": "n/a", "interfaces": [1, 2], "device_status": "up"}"#;
        let payload: DevicePayload = serde_json::from_str(json).unwrap();
        assert!(payload.system_info.is_none());
        assert!(payload.interfaces.is_none());
        assert_eq!(payload.device_status, Some(true));
    }

    #[test]
    fn test_connected_requires_non_empty() {
        let mut port = Interface::default();
        assert!(!port.is_connected());
        port.connection = Some("".into());
        assert!(!port.is_connected());
        port.connection = Some("Office 12".into());
        assert!(port.is_connected());
    }

    #[test]
    fn test_has_traffic_needs_octets_and_rate() {
        let mut port = Interface {
            in_octets: 10,
            ..Default::default()
        };
        assert!(!port.has_traffic());
        port.speed_out = Some(5.0);
        assert!(port.has_traffic());
        port.in_octets = 0;
        assert!(!port.has_traffic());
    }

    #[test]
    fn test_numeric_sort_not_lexical() {
        let mut map = InterfaceMap::new();
        for id in ["10", "2", "1", "uplink", "25"] {
            map.insert(id.to_string(), Interface::default());
        }
        let order: Vec<&str> = sorted_ports(&map).into_iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec!["1", "2", "10", "25", "uplink"]);
    }
}
