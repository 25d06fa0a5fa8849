//! # Paging Server
//!
//! HTTP backend of the baggage-belt paging system: the admin CRUD API, operator
//! accounts, the audit log, the flight-number lookup and a JSON display view.
//!
//! ## Key Features:
//! - **Two stores**: PostgreSQL through `deadpool-postgres` when `DATABASE_URL`
//!   is set, an in-memory store otherwise.
//! - **Layered config**: defaults, `server_paging.conf`, then env and CLI.
//! - **Structured logging**: `tracing` to console and a JSON log file.
//! - **Graceful shutdown** on Ctrl-C or SIGTERM.

use anyhow::Result;
use paging_common::loggers::setup_logging;
use paging_common::retrieve::ArrivalsFeed;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{info, warn};

mod paging_logic;
use paging_logic::{config, routes, state::AppState, store::Store};

#[tokio::main]
async fn main() -> Result<()> {
    // load .env files before anything else
    dotenvy::dotenv().ok();

    let settings = config::load_config()?;
    let _guard = setup_logging("server_paging", &settings.log_dir, &settings.log_level, true)?;

    if settings.api_key == config::DEFAULT_API_KEY {
        warn!("Using the default API key; set PAGING_API_KEY for production");
    }

    // --- Phase 1: Storage ---
    let store = Store::connect(settings.database_url.as_deref()).await?;

    // --- Phase 2: Arrivals feed ---
    let arrivals = match &settings.arrivals_credentials {
        Some((username, password)) => Some(ArrivalsFeed::new(&settings.arrivals_url, username.clone(), password.clone())?),
        None => {
            warn!("No arrivals feed credentials configured; /api/flightnos is disabled");
            None
        }
    };

    // --- Phase 3: Serve ---
    let backend = store.backend();
    let app = routes::router(AppState::new(store, &settings.api_key, arrivals));
    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    info!(backend, "Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown complete.");
    Ok(())
}

async fn shutdown_signal() {
    let terminate = async {
        #[cfg(unix)]
        {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut term_signal) => {
                    term_signal.recv().await;
                    info!("SIGTERM received, initiating shutdown.");
                }
                Err(e) => {
                    warn!("Cannot listen for SIGTERM: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        }
        #[cfg(not(unix))]
        {
            // On non-unix platforms, just wait forever.
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = signal::ctrl_c() => match result {
            Ok(()) => info!("Ctrl-C received, initiating shutdown."),
            Err(e) => warn!("Cannot listen for Ctrl-C: {}", e),
        },
        _ = terminate => {}
    }
}
