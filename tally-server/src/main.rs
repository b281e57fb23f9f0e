//! tally-server - live election tally service
//!
//! Serves the public results dashboard on `/`, the admin tally board on
//! `/tally` and the JSON API both pages poll.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tally_common::api::AdminPassword;
use tally_common::config::{ConfigOverrides, TallyConfig, TomlConfig};
use tally_common::db::init_database;
use tally_server::{build_router, AppState};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "tally_server=info,tower_http=info";

/// Command-line arguments for tally-server
#[derive(Parser, Debug)]
#[command(name = "tally-server")]
#[command(about = "Live election tally: results dashboard, admin board and CSV import")]
#[command(version)]
struct Args {
    /// Folder holding elections.db and candidates.csv
    #[arg(short, long, env = "TALLY_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "TALLY_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(short, long, env = "TALLY_BIND")]
    bind: Option<String>,

    /// Shared admin password for mutation endpoints
    #[arg(long, env = "ADMIN_PASS", hide_env_values = true)]
    admin_pass: Option<String>,

    /// TOML config file (defaults to ~/.config/tally/config.toml)
    #[arg(short, long, env = "TALLY_CONFIG")]
    config: Option<PathBuf>,

    /// CSV read by sync-file when the request names no path
    #[arg(long)]
    candidates_csv: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = TomlConfig::load(args.config.as_deref()).context("Failed to load config")?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        toml_config
            .logging
            .level
            .as_deref()
            .unwrap_or(DEFAULT_LOG_FILTER)
            .into()
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting tally-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = TallyConfig::resolve(
        ConfigOverrides {
            root_folder: args.root_folder,
            admin_pass: args.admin_pass,
            bind: args.bind,
            port: args.port,
            candidates_csv: args.candidates_csv,
        },
        toml_config,
    );

    config
        .ensure_root_folder()
        .context("Failed to create root folder")?;

    let db_path = config.database_path();
    info!("Database path: {}", db_path.display());
    info!("Candidates CSV: {}", config.candidates_csv.display());

    let pool = init_database(&db_path)
        .await
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;
    info!("Database ready");

    let state = AppState::new(
        pool,
        AdminPassword::new(&config.admin_pass),
        config.candidates_csv.clone(),
    );
    let app = build_router(state);

    let addr = format!("{}:{}", config.bind, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("tally-server listening on http://{}", addr);
    info!("Admin board: http://{}/tally", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
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
            Ok(mut sig) => {
                sig.recv().await;
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
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
