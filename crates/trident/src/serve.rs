// SPDX-FileCopyrightText: 2026 Trident Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `trident serve` command implementation.
//!
//! Opens SQLite storage, wires the authorizer, content provider, and job
//! scheduler into the gateway, then serves until a shutdown signal. On
//! shutdown the listener closes first, then running jobs are cancelled and
//! drained within the configured grace period.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use trident_auth::Authorizer;
use trident_config::TridentConfig;
use trident_core::{ContentProvider, CredentialStore, JobLedger, PluginAdapter, TridentError};
use trident_gateway::{start_server, GatewayState};
use trident_scheduler::{JobScheduler, RandomContent};
use trident_storage::SqliteStorage;

use crate::shutdown;

/// Runs the `trident serve` command.
pub async fn run_serve(config: TridentConfig) -> Result<(), TridentError> {
    init_tracing(&config.server.log_level);

    info!(version = env!("CARGO_PKG_VERSION"), "starting trident serve");

    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;
    info!(path = %config.storage.database_path, "storage initialized");

    let ledger: Arc<dyn JobLedger> = storage.clone();
    let credentials: Arc<dyn CredentialStore> = storage.clone();
    let content: Arc<dyn ContentProvider> =
        Arc::new(RandomContent::new(&config.image, &config.vision));

    let cancel = shutdown::install_signal_handler();

    let scheduler = JobScheduler::new(
        Arc::clone(&ledger),
        Arc::clone(&content),
        config.chat.clone(),
        config.image.clone(),
        &config.scheduler,
        cancel.clone(),
    );
    let authorizer = Authorizer::new(credentials, config.faults.clone());
    let state = GatewayState::new(
        ledger,
        authorizer,
        scheduler.clone(),
        content,
        &config.chat,
        config.vision.clone(),
    );

    if !config.faults.enabled {
        info!("fault injection disabled");
    }

    let served = start_server(&config.server, state, cancel.clone()).await;
    // A bind failure returns before any signal; stop the scheduler either way.
    cancel.cancel();

    let grace = Duration::from_millis(config.scheduler.shutdown_grace_ms);
    if let Err(e) = scheduler.shutdown(grace).await {
        warn!(error = %e, "background jobs did not drain in time");
    }
    if let Err(e) = storage.shutdown().await {
        warn!(error = %e, "storage shutdown failed");
    }

    served?;
    info!("trident stopped");
    Ok(())
}

/// Initialize the tracing subscriber with the configured log level.
///
/// `RUST_LOG` takes precedence when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("trident={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
