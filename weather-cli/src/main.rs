//! Binary crate for the `weather` dashboard.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive prompts and configuration
//! - Rendering metrics, the temperature chart, daily cards and the location map

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod chart;
mod cli;
mod configure;
mod interactive;
mod map;
mod render;
mod session;
mod theme;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Development convenience: OPENWEATHER_API_KEY may live in a local .env.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
