use anyhow::Result;
use clap::Parser;

use ghd_uploader::cli::{Cli, run};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let result = run(cli).await;
    match &result {
        Ok(_) => tracing::info!("ghd-uploader completed successfully"),
        Err(e) => tracing::error!(error = %e, "ghd-uploader exited with error"),
    }
    result
}
