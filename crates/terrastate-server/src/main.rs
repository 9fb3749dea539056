//! Binary entrypoint for the terrastate HTTP server.
//!
//! Configuration comes from an optional JSON file plus flags, each flag
//! also readable from a `TERRASTATE_*` environment variable. Log verbosity
//! follows `RUST_LOG`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use terrastate_server::config::{Config, Overrides};
use terrastate_server::error::StartupError;
use terrastate_server::router::build_router;
use terrastate_server::state::AppState;

/// Remote state backend with per-environment locking.
#[derive(Parser)]
#[command(name = "terrastate", about = "Remote state backend with per-environment locking")]
struct Cli {
    /// JSON config file (keys: statePath, host, port, maxBodyBytes).
    #[arg(short, long, env = "TERRASTATE_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for state documents and lock markers.
    #[arg(short, long, env = "TERRASTATE_STATE_PATH")]
    state_path: Option<PathBuf>,

    /// Listen address.
    #[arg(long, env = "TERRASTATE_HOST")]
    host: Option<String>,

    /// Listen port.
    #[arg(short, long, env = "TERRASTATE_PORT")]
    port: Option<u16>,

    /// Largest accepted request body, in bytes.
    #[arg(long, env = "TERRASTATE_MAX_BODY_BYTES")]
    max_body_bytes: Option<usize>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), StartupError> {
    let config = Config::load(
        cli.config.as_deref(),
        Overrides {
            state_path: cli.state_path,
            host: cli.host,
            port: cli.port,
            max_body_bytes: cli.max_body_bytes,
        },
    )?;

    let state = AppState::new(&config)?;
    let app = build_router(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!(
        state_path = %config.state_path.display(),
        "terrastate listening on {}",
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("cannot listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
