//! portwatch - version 0.1.0
//!
//! Live switch port dashboard with tracing logging.
//! This is the main entry point that initializes the server and handles subcommands.

mod cli;
mod commands;
mod config;
mod handlers;
mod state;

use axum_server::tls_rustls::RustlsConfig;
use clap::Parser;
use portwatch::{spawn_visibility_policy, DeviceSource, HttpSource};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tracing::{error, info, level_filters::LevelFilter};

use cli::{Args, Commands, LogLevel};
use commands::{command_config, command_render};
use config::{
    resolve_config, show_config, validate_effective_config, Config, DEFAULT_BIND_ADDR, DEFAULT_PORT,
};
use state::AppState;

/// Initializes tracing logging subsystem with configured log level.
///
/// Log lines go to stderr so that `render` output on stdout stays clean.
fn setup_logging(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let level = config.log_level();
    let filter = match level {
        LogLevel::Off => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Logging initialized with level: {:?}", level);
    Ok(())
}

/// Helper function to load and validate configuration.
/// Exits the process with error code 1 if validation fails.
fn load_validated_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let config = resolve_config(args)?;
    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        std::process::exit(1);
    }
    Ok(config)
}

/// Resolves on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), shutting down gracefully...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }
}

/// Main application entry point.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let config = resolve_config(&args)?;

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                eprintln!("❌ Configuration invalid: {}", e);
                std::process::exit(1);
            }
            println!("✅ Configuration is valid");
            return Ok(());
        }

        return show_config(&config, args.config_format);
    }

    // Handle subcommands
    if let Some(command) = &args.command {
        return match command {
            Commands::Config {
                output,
                format,
                commented,
            } => command_config(output.clone(), format.clone(), *commented),

            Commands::Render {
                device,
                filter,
                output,
            } => {
                let config = load_validated_config(&args)?;
                setup_logging(&config)?;
                command_render(device.clone(), (*filter).into(), output.clone(), &config)
                    .await
                    .map_err(Into::into)
            }
        };
    }

    // Load configuration for main server mode
    let config = load_validated_config(&args)?;
    setup_logging(&config)?;

    info!("Starting portwatch");

    let bind_ip_str = config.bind.as_deref().unwrap_or(DEFAULT_BIND_ADDR).to_string();
    let port = config.port.unwrap_or(DEFAULT_PORT);
    let addr: SocketAddr = format!("{}:{}", bind_ip_str, port).parse()?;

    let source: Arc<dyn DeviceSource> = Arc::new(HttpSource::new(
        config.api_base(),
        config.request_timeout(),
    )?);
    info!("Polling device API at {}", config.api_base());

    let pause_when_hidden = config.pause_when_hidden();
    let enable_tls = config.enable_tls.unwrap_or(false);
    let tls_paths = (config.tls_cert_path.clone(), config.tls_key_path.clone());

    let state = Arc::new(AppState::new(config, source));
    info!(
        "Serving overview '{}' and {} device page(s)",
        state.config.overview_key(),
        state.devices.len()
    );

    // Every page starts polling right away
    state.start_all();

    let policy = if pause_when_hidden {
        info!("Polling pauses while pages are hidden");
        Some(spawn_visibility_policy(
            state.controllers(),
            state.visibility.subscribe(),
        ))
    } else {
        None
    };

    let app = handlers::router(state.clone());

    match (enable_tls, tls_paths) {
        (true, (Some(cert_path), Some(key_path))) => {
            info!("Loading TLS certificate from: {}", cert_path);
            info!("Loading TLS private key from: {}", key_path);

            let tls_config = RustlsConfig::from_pem_file(&cert_path, &key_path)
                .await
                .map_err(|e| {
                    error!("Failed to load TLS configuration: {}", e);
                    e
                })?;

            info!("portwatch listening on https://{}:{}", bind_ip_str, port);

            let server = axum_server::bind_rustls(addr, tls_config).serve(app.into_make_service());

            tokio::select! {
                result = server => {
                    if let Err(e) = result {
                        error!("Server error: {}", e);
                        return Err(e.into());
                    }
                }
                _ = shutdown_signal() => {
                    info!("Shutdown signal received, exiting...");
                }
            }
        }
        (true, _) => {
            return Err("TLS is enabled but certificate or key path is missing".into());
        }
        (false, _) => {
            let listener = TcpListener::bind(addr).await?;
            info!("portwatch listening on http://{}:{}", bind_ip_str, port);

            let server = axum::serve(listener, app);

            tokio::select! {
                result = server => {
                    if let Err(e) = result {
                        error!("Server error: {}", e);
                        return Err(e.into());
                    }
                }
                _ = shutdown_signal() => {
                    info!("Shutdown signal received, exiting...");
                }
            }
        }
    }

    // Unload every page
    if let Some(policy) = policy {
        policy.abort();
    }
    let stopped = state.stop_all();
    info!("Stopped {} poller(s)", stopped);

    info!("portwatch stopped gracefully");
    Ok(())
}
