use anyhow::Result;
use clap::Parser;
use wallet_ledger::bin_utils::{Service, config::Config, logging::init_logging};

#[tokio::main]
async fn main() -> Result<()> {
    // a missing .env file is fine, the environment and flags still apply
    let _ = dotenvy::dotenv();
    let config = Config::parse();
    init_logging(config.log_json);

    Service { config }.run().await
}
