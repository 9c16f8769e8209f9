use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;

/// In-memory wallet ledger served over HTTP
#[derive(Debug, Clone, Parser)]
#[command(name = "wallet-ledger", version)]
pub struct Config {
    /// Address the HTTP server binds to
    #[arg(long, env = "WALLET_LEDGER_LISTEN", default_value = "0.0.0.0:8080")]
    pub listen: SocketAddr,

    /// Shared secret used to verify the `X-Digest` header
    #[arg(long, env = "WALLET_LEDGER_SECRET_KEY", hide_env_values = true)]
    pub secret_key: String,

    /// CSV file with the pre-existing wallets (`wallet_id,identified,balance`)
    #[arg(long, env = "WALLET_LEDGER_WALLETS")]
    pub wallets: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, env = "WALLET_LEDGER_LOG_JSON")]
    pub log_json: bool,
}
