//! Configuration management for portwatch.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use crate::cli::{Args, ConfigFormat, LogLevel};
use clap::ValueEnum;
use portwatch::view::overview::DEFAULT_OVERVIEW_KEY;
use portwatch::Locale;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

// Default configuration constants
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 9280;
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000";
pub const DEFAULT_OVERVIEW_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_DEVICE_INTERVAL_SECS: u64 = 10;

/// Effective configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server configuration
    pub port: Option<u16>,
    pub bind: Option<String>,

    // Upstream device API
    #[serde(alias = "api-base")]
    pub api_base: Option<String>,
    /// Timeout for one upstream request; unset means the transport default
    #[serde(alias = "request-timeout-secs")]
    pub request_timeout_secs: Option<u64>,

    // Pages
    /// Pseudo-key of the overview device
    #[serde(alias = "overview-key")]
    pub overview_key: Option<String>,
    #[serde(alias = "overview-interval-secs")]
    pub overview_interval_secs: Option<u64>,
    /// Device IPs that get a detail page
    pub devices: Option<Vec<String>>,
    #[serde(alias = "device-interval-secs")]
    pub device_interval_secs: Option<u64>,
    pub locale: Option<Locale>,
    /// Stop polling while the page is hidden
    #[serde(alias = "pause-when-hidden")]
    pub pause_when_hidden: Option<bool>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,

    // TLS/SSL Configuration
    #[serde(alias = "enable-tls")]
    pub enable_tls: Option<bool>,
    #[serde(alias = "tls-cert-path")]
    pub tls_cert_path: Option<String>,
    #[serde(alias = "tls-key-path")]
    pub tls_key_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: Some(DEFAULT_BIND_ADDR.to_string()),
            port: Some(DEFAULT_PORT),
            api_base: Some(DEFAULT_API_BASE.to_string()),
            request_timeout_secs: None,
            overview_key: Some(DEFAULT_OVERVIEW_KEY.to_string()),
            overview_interval_secs: Some(DEFAULT_OVERVIEW_INTERVAL_SECS),
            devices: None,
            device_interval_secs: Some(DEFAULT_DEVICE_INTERVAL_SECS),
            locale: Some(Locale::En),
            pause_when_hidden: Some(true),
            log_level: Some("info".into()),
            enable_tls: Some(false),
            tls_cert_path: None,
            tls_key_path: None,
        }
    }
}

impl Config {
    pub fn api_base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }

    pub fn overview_key(&self) -> &str {
        self.overview_key.as_deref().unwrap_or(DEFAULT_OVERVIEW_KEY)
    }

    pub fn overview_interval(&self) -> Duration {
        Duration::from_secs(
            self.overview_interval_secs
                .unwrap_or(DEFAULT_OVERVIEW_INTERVAL_SECS),
        )
    }

    pub fn device_interval(&self) -> Duration {
        Duration::from_secs(
            self.device_interval_secs
                .unwrap_or(DEFAULT_DEVICE_INTERVAL_SECS),
        )
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn devices(&self) -> &[String] {
        self.devices.as_deref().unwrap_or(&[])
    }

    pub fn locale(&self) -> Locale {
        self.locale.unwrap_or_default()
    }

    pub fn pause_when_hidden(&self) -> bool {
        self.pause_when_hidden.unwrap_or(true)
    }

    /// Configured log level; unknown names fall back to info.
    pub fn log_level(&self) -> LogLevel {
        self.log_level
            .as_deref()
            .and_then(|level| LogLevel::from_str(level, true).ok())
            .unwrap_or(LogLevel::Info)
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(level) = cfg.log_level.as_deref() {
        if LogLevel::from_str(level, true).is_err() {
            return Err(format!(
                "Invalid log_level '{}', expected off, error, warn, info, debug or trace",
                level
            )
            .into());
        }
    }

    // Upstream API
    let api_base = cfg.api_base();
    if api_base.trim().is_empty() {
        return Err("api_base must not be empty".into());
    }
    if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
        return Err(format!(
            "Invalid api_base '{}', expected an http:// or https:// URL",
            api_base
        )
        .into());
    }

    if cfg.overview_key().trim().is_empty() {
        return Err("overview_key must not be empty".into());
    }

    // Poll intervals
    if cfg.overview_interval_secs == Some(0) {
        return Err("overview_interval_secs must be greater than 0".into());
    }
    if cfg.device_interval_secs == Some(0) {
        return Err("device_interval_secs must be greater than 0".into());
    }
    if cfg.request_timeout_secs == Some(0) {
        return Err("request_timeout_secs must be greater than 0".into());
    }

    // Device list
    for device in cfg.devices() {
        if device.trim().is_empty() || device.contains('/') {
            return Err(format!("Invalid device identifier '{}'", device).into());
        }
    }

    // TLS validation
    if cfg.enable_tls.unwrap_or(false) {
        let cert_path = cfg.tls_cert_path.as_deref();
        let key_path = cfg.tls_key_path.as_deref();

        match (cert_path, key_path) {
            (None, None) => {
                return Err(
                    "TLS is enabled but neither tls_cert_path nor tls_key_path are set".into(),
                );
            }
            (Some(_), None) => {
                return Err("TLS is enabled but tls_key_path is not set".into());
            }
            (None, Some(_)) => {
                return Err("TLS is enabled but tls_cert_path is not set".into());
            }
            (Some(cert), Some(key)) => {
                check_pem_file(cert, "certificate")?;
                check_pem_file(key, "private key")?;
            }
        }
    }

    Ok(())
}

fn check_pem_file(path: &str, what: &str) -> Result<(), Box<dyn std::error::Error>> {
    let file = Path::new(path);
    if !file.exists() {
        return Err(format!("TLS {} file not found: {}", what, path).into());
    }
    match fs::metadata(file) {
        Ok(meta) if meta.len() == 0 => Err(format!("TLS {} file is empty: {}", what, path).into()),
        Err(e) => Err(format!("TLS {} file is not readable: {} ({})", what, path, e).into()),
        Ok(_) => Ok(()),
    }
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref().and_then(|p| p.to_str()))?
    };

    // Override with CLI args
    if let Some(bind_ip) = args.bind {
        config.bind = Some(bind_ip.to_string());
    }
    if let Some(cli_port) = args.port {
        config.port = Some(cli_port);
    }

    if let Some(api_base) = &args.api_base {
        config.api_base = Some(api_base.clone());
    }
    if let Some(timeout) = args.request_timeout {
        config.request_timeout_secs = Some(timeout);
    }

    if let Some(key) = &args.overview_key {
        config.overview_key = Some(key.clone());
    }
    if let Some(secs) = args.overview_interval {
        config.overview_interval_secs = Some(secs);
    }
    if let Some(secs) = args.device_interval {
        config.device_interval_secs = Some(secs);
    }

    // Parse comma-separated device list
    if let Some(devices) = &args.devices {
        config.devices = Some(
            devices
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        );
    }

    if let Some(locale) = args.locale {
        config.locale = Some(locale.into());
    }
    if args.no_pause_when_hidden {
        config.pause_when_hidden = Some(false);
    }

    if let Some(level) = args.log_level.as_ref().and_then(|l| l.to_possible_value()) {
        config.log_level = Some(level.get_name().to_string());
    }

    // TLS configuration: CLI wins if provided
    if args.enable_tls {
        config.enable_tls = Some(true);
    }
    if let Some(cert_path) = &args.tls_cert {
        config.tls_cert_path = Some(cert_path.to_string_lossy().to_string());
    }
    if let Some(key_path) = &args.tls_key {
        config.tls_key_path = Some(key_path.to_string_lossy().to_string());
    }

    Ok(config)
}

/// Configuration loading with multiple format support
pub fn load_config(path: Option<&str>) -> Result<Config, Box<dyn std::error::Error>> {
    let path = if let Some(p) = path {
        PathBuf::from(p)
    } else {
        // Try default locations
        let defaults = [
            "/etc/portwatch/portwatch.yaml",
            "/etc/portwatch/portwatch.yml",
            "/etc/portwatch/portwatch.json",
            "/etc/portwatch/portwatch.toml",
            "./portwatch.yaml",
            "./portwatch.yml",
            "./portwatch.json",
            "./portwatch.toml",
        ];

        defaults
            .iter()
            .find(|p| Path::new(p).exists())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(""))
    };

    if !path.exists() || path.to_string_lossy().is_empty() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)?;
    let config = parse_config(&content, path.extension().and_then(|s| s.to_str()))?;
    info!("Loaded configuration from: {}", path.display());
    Ok(config)
}

/// Parses config text by file extension; anything unknown is YAML.
///
/// Keys missing from the file keep their defaults.
pub fn parse_config(
    content: &str,
    extension: Option<&str>,
) -> Result<Config, Box<dyn std::error::Error>> {
    let parsed: Config = match extension {
        Some("json") => serde_json::from_str(content)?,
        Some("toml") => toml::from_str(content)?,
        _ => serde_yaml::from_str(content)?,
    };
    Ok(parsed.merged_over(Config::default()))
}

impl Config {
    /// Fills every unset field from `base`.
    fn merged_over(self, base: Config) -> Config {
        Config {
            port: self.port.or(base.port),
            bind: self.bind.or(base.bind),
            api_base: self.api_base.or(base.api_base),
            request_timeout_secs: self.request_timeout_secs.or(base.request_timeout_secs),
            overview_key: self.overview_key.or(base.overview_key),
            overview_interval_secs: self.overview_interval_secs.or(base.overview_interval_secs),
            devices: self.devices.or(base.devices),
            device_interval_secs: self.device_interval_secs.or(base.device_interval_secs),
            locale: self.locale.or(base.locale),
            pause_when_hidden: self.pause_when_hidden.or(base.pause_when_hidden),
            log_level: self.log_level.or(base.log_level),
            enable_tls: self.enable_tls.or(base.enable_tls),
            tls_cert_path: self.tls_cert_path.or(base.tls_cert_path),
            tls_key_path: self.tls_key_path.or(base.tls_key_path),
        }
    }
}

/// Renders configuration in the requested format
pub fn render_config(
    config: &Config,
    format: &ConfigFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    Ok(match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    })
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", render_config(config, &format)?);
    Ok(())
}
