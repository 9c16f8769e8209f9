//! Bootstrap around the ledger core: configuration, wallet seeding, logging and the HTTP server.
//! It lives in the library so integration tests can drive the real router.

use std::fs::File;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::{
    auth::AuthGuard,
    service::LedgerService,
    store::in_memory::{InMemoryHistoryLedger, InMemoryWalletStore},
};
use config::Config;
use csv_parser::load_wallets;
use routes::{AppState, create_router};

pub mod config;
pub mod csv_parser;
pub mod logging;
pub mod routes;

pub struct Service {
    pub config: Config,
}

impl Service {
    /// Builds the ledger and the auth guard from the configuration.
    pub fn state(&self) -> Result<AppState> {
        anyhow::ensure!(
            !self.config.secret_key.is_empty(),
            "Secret key must not be empty"
        );
        let guard = AuthGuard::new(self.config.secret_key.as_bytes())
            .map_err(|err| anyhow::anyhow!("Failed to initialise the digest key: {err}"))?;

        let wallets = match &self.config.wallets {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open `{}`", path.display()))?;
                load_wallets(file)
                    .with_context(|| format!("Failed to load wallets from `{}`", path.display()))?
            }
            None => {
                warn!("No wallets file configured, every wallet lookup will fail");
                Vec::new()
            }
        };
        let store: InMemoryWalletStore = wallets.into_iter().collect();
        info!(wallets = store.len(), "wallets loaded");

        Ok(AppState::new(
            LedgerService::new(store, InMemoryHistoryLedger::default()),
            guard,
        ))
    }

    pub async fn run(self) -> Result<()> {
        let router = create_router(self.state()?);
        let listener = TcpListener::bind(self.config.listen)
            .await
            .with_context(|| format!("Failed to bind `{}`", self.config.listen))?;
        info!(address = %self.config.listen, "wallet ledger listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("HTTP server failed")
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(%err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
