//! Binary crate for `owm-service`, the upstream adapter in front of
//! OpenWeatherMap.
//!
//! This crate focuses on:
//! - Parsing CLI / environment configuration
//! - Wiring the HTTP routes to the core pipeline

use clap::Parser;

mod cli;
mod routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run().await
}
