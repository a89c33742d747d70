//! User-visible strings for the dashboard pages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display language of the rendered pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Uk,
}

impl Locale {
    pub fn labels(self) -> &'static Labels {
        match self {
            Locale::En => &EN,
            Locale::Uk => &UK,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => write!(f, "en"),
            Locale::Uk => write!(f, "uk"),
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "uk" | "ua" => Ok(Locale::Uk),
            other => Err(format!("Invalid locale '{}', expected 'en' or 'uk'", other)),
        }
    }
}

/// String table for one locale.
#[derive(Debug)]
pub struct Labels {
    /// Value of the page's `lang` attribute.
    pub lang: &'static str,

    pub unknown: &'static str,
    pub not_available: &'static str,

    pub model: &'static str,
    pub system_name: &'static str,
    pub mac_address: &'static str,
    pub uptime: &'static str,

    pub port: &'static str,
    pub connection: &'static str,
    pub admin_status: &'static str,
    pub link: &'static str,
    pub traffic: &'static str,
    pub name: &'static str,
    pub port_descr: &'static str,
    pub admin_enabled: &'static str,
    pub admin_disabled: &'static str,
    pub errors: &'static str,

    pub online: &'static str,
    pub offline: &'static str,
    pub device_online: &'static str,
    pub device_offline: &'static str,
    pub auto_update_on: &'static str,
    pub auto_update_paused: &'static str,
    pub never_updated: &'static str,

    pub info_failed: &'static str,
    pub ports_failed: &'static str,
    pub details_failed: &'static str,
    pub loading: &'static str,

    pub filter_all: &'static str,
    pub filter_active: &'static str,
    pub filter_inactive: &'static str,
    pub filter_connected: &'static str,
    pub filter_errors: &'static str,

    pub overview_title: &'static str,
    pub device_title: &'static str,
    pub last_update: &'static str,
    pub auto_update: &'static str,
}

pub static EN: Labels = Labels {
    lang: "en",
    unknown: "Unknown",
    not_available: "N/A",
    model: "Hardware model",
    system_name: "System name",
    mac_address: "MAC address",
    uptime: "Uptime",
    port: "Port",
    connection: "Connection",
    admin_status: "Admin status",
    link: "Link",
    traffic: "Traffic",
    name: "Name",
    port_descr: "Port descr",
    admin_enabled: "enabled",
    admin_disabled: "disabled",
    errors: "Errors",
    online: "Connection active",
    offline: "Connection error",
    device_online: "Online",
    device_offline: "Offline",
    auto_update_on: "Enabled",
    auto_update_paused: "Paused",
    never_updated: "--:--:--",
    info_failed: "Failed to load system information.",
    ports_failed: "Failed to load port data.",
    details_failed: "Failed to load device details.",
    loading: "Loading...",
    filter_all: "All",
    filter_active: "Active",
    filter_inactive: "Inactive",
    filter_connected: "Connected",
    filter_errors: "Errors",
    overview_title: "Switch ports",
    device_title: "Device",
    last_update: "Last update",
    auto_update: "Auto update",
};

pub static UK: Labels = Labels {
    lang: "uk",
    unknown: "Невідомо",
    not_available: "N/A",
    model: "Модель обладнання",
    system_name: "Системне ім'я",
    mac_address: "MAC-адреса",
    uptime: "Час роботи",
    port: "Порт",
    connection: "Комутація",
    admin_status: "Адмін статус",
    link: "Лінк",
    traffic: "Трафік",
    name: "Name",
    port_descr: "Port descr",
    admin_enabled: "активен",
    admin_disabled: "вимк",
    errors: "Помилки",
    online: "Підключення активне",
    offline: "Помилка підключення",
    device_online: "Онлайн",
    device_offline: "Офлайн",
    auto_update_on: "Увімкнено",
    auto_update_paused: "Призупинено",
    never_updated: "--:--:--",
    info_failed: "Не вдалося завантажити системну інформацію.",
    ports_failed: "Не вдалося завантажити дані портів.",
    details_failed: "Не вдалося завантажити дані пристрою.",
    loading: "Завантаження...",
    filter_all: "Всі",
    filter_active: "Активні",
    filter_inactive: "Неактивні",
    filter_connected: "Підключені",
    filter_errors: "З помилками",
    overview_title: "Порти комутатора",
    device_title: "Пристрій",
    last_update: "Останнє оновлення",
    auto_update: "Автооновлення",
};
