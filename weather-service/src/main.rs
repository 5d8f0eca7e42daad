//! Binary crate for `weather-service`, the forecast relay in front of
//! `owm-service`.
//!
//! This crate focuses on:
//! - Parsing CLI / environment configuration
//! - Relaying forecast and ping calls to the upstream adapter

use clap::Parser;

mod cli;
mod routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run().await
}
