use anyhow::Context;
use clap::Parser;
use weather_core::{Credential, ReqwestCaller, TelemetryArgs, server, telemetry};

use crate::routes::{self, AppState, SERVICE_NAME};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "owm-service", version, about = "OpenWeatherMap adapter service")]
pub struct Cli {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8082)]
    pub port: u16,

    #[command(flatten)]
    pub telemetry: TelemetryArgs,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let guard = telemetry::init_tracing(SERVICE_NAME, &self.telemetry)?;
        tracing::info!("Starting {SERVICE_NAME}");

        let caller = ReqwestCaller::new().context("Failed to build HTTP client")?;
        let state = AppState::new(Credential::from_env(), caller);
        let router = server::instrument_router(
            routes::router(state),
            SERVICE_NAME,
            self.telemetry.hostname.clone(),
        );

        let served = server::serve(router, self.port).await;
        guard.shutdown();
        served
    }
}
