//! Scoring API server entry point

use clap::Parser;
use scoring_api_server::{init_logging, serve, ServeCli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = ServeCli::parse();
    let config = cli.load_config()?;

    init_logging(&config.logging)?;

    serve(config).await
}
