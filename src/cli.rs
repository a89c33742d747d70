//! CLI arguments and subcommands for portwatch.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use portwatch::{Locale, PortFilter};
use std::net::IpAddr;
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Page language for CLI parsing
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LocaleArg {
    En,
    Uk,
}

impl From<LocaleArg> for Locale {
    fn from(arg: LocaleArg) -> Self {
        match arg {
            LocaleArg::En => Locale::En,
            LocaleArg::Uk => Locale::Uk,
        }
    }
}

/// Port filter for CLI parsing
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FilterArg {
    All,
    Active,
    Inactive,
    Connected,
    Errors,
}

impl From<FilterArg> for PortFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => PortFilter::All,
            FilterArg::Active => PortFilter::Active,
            FilterArg::Inactive => PortFilter::Inactive,
            FilterArg::Connected => PortFilter::Connected,
            FilterArg::Errors => PortFilter::Errors,
        }
    }
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "portwatch",
    about = "Live switch port dashboard backed by a device JSON API",
    long_about = "Live switch port dashboard backed by a device JSON API.\n\n\
                  Polls /api/device/{id} on the monitoring backend, renders the system \
                  information and port table of each configured device and serves the \
                  resulting pages over HTTP, with client-side port filters.",
    version = "0.1.0",
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// HTTP listen port
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// Bind to specific interface/IP
    #[arg(long)]
    pub bind: Option<IpAddr>,

    /// Base URL of the device API (e.g. http://127.0.0.1:5000)
    #[arg(short = 'a', long)]
    pub api_base: Option<String>,

    /// Pseudo-key of the device shown on the overview page
    #[arg(long)]
    pub overview_key: Option<String>,

    /// Device IPs that get a detail page (comma-separated)
    #[arg(long)]
    pub devices: Option<String>,

    /// Overview poll interval in seconds
    #[arg(long)]
    pub overview_interval: Option<u64>,

    /// Device detail poll interval in seconds
    #[arg(long)]
    pub device_interval: Option<u64>,

    /// Upstream request timeout in seconds (default: transport default)
    #[arg(long)]
    pub request_timeout: Option<u64>,

    /// Page language
    #[arg(long, value_enum)]
    pub locale: Option<LocaleArg>,

    /// Keep polling while the page is hidden
    #[arg(long)]
    pub no_pause_when_hidden: bool,

    /// Log level (default: config file, then info)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,

    /// Enable TLS/SSL for HTTPS
    #[arg(long)]
    pub enable_tls: bool,

    /// Path to TLS certificate file (PEM format)
    #[arg(long)]
    pub tls_cert: Option<PathBuf>,

    /// Path to TLS private key file (PEM format)
    #[arg(long)]
    pub tls_key: Option<PathBuf>,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one fetch-and-render cycle and print the page HTML
    Render {
        /// Render the detail page of this device instead of the overview
        #[arg(short = 'd', long)]
        device: Option<String>,

        /// Filter to apply before printing
        #[arg(short = 'f', long, value_enum, default_value = "all")]
        filter: FilterArg,

        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long, default_value = "-")]
        output: PathBuf,
    },

    /// Generate configuration files
    Config {
        /// Output file path
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },
}
