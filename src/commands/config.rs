//! Config command implementation.
//!
//! Generates configuration files in various formats.

use std::fs;
use std::path::PathBuf;

use crate::cli::ConfigFormat;
use crate::config::{render_config, Config};

/// Generates configuration files.
pub fn command_config(
    output: Option<PathBuf>,
    format: ConfigFormat,
    commented: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    let output = match output {
        Some(path) => path,
        None => PathBuf::from(match format {
            ConfigFormat::Json => "portwatch.json",
            ConfigFormat::Toml => "portwatch.toml",
            ConfigFormat::Yaml => "portwatch.yaml",
        }),
    };

    let mut content = render_config(&config, &format)?;
    if commented && matches!(format, ConfigFormat::Yaml) {
        content = add_config_comments(content);
    }

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# portwatch Configuration
# =======================
#
# Server Configuration
# --------------------
# bind: "0.0.0.0"              # Bind IP (0.0.0.0 = all interfaces)
# port: 9280                   # HTTP port
#
# Device API
# ----------
# api_base: "http://127.0.0.1:5000"  # Serves /api/device/{id}
# request_timeout_secs: null   # Per-request timeout (null = transport default)
#
# Pages
# -----
# overview_key: "zyxel"        # Device key polled by the overview page
# overview_interval_secs: 5    # Overview poll interval
# devices: null                # Device IPs with a detail page (e.g. ["10.0.0.1"])
# device_interval_secs: 10     # Detail page poll interval
# locale: "en"                 # en, uk
# pause_when_hidden: true      # Stop polling while the page is hidden
#
# Logging
# -------
# log_level: "info"            # off, error, warn, info, debug, trace
#
# TLS/SSL Configuration
# ---------------------
# enable_tls: false            # Enable HTTPS (default: false)
# tls_cert_path: null          # Path to TLS certificate (PEM format)
# tls_key_path: null           # Path to TLS private key (PEM format)
"#;

    format!("{comments}\n{yaml}")
}
