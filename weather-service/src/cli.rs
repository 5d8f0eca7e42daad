use anyhow::Context;
use clap::Parser;
use weather_core::{ReqwestCaller, TelemetryArgs, server, telemetry};

use crate::routes::{self, AppState, SERVICE_NAME};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-service", version, about = "Weather forecast relay service")]
pub struct Cli {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Address of owm-service, as host:port.
    #[arg(long, env = "OWM_ADDR", default_value = "localhost:8082")]
    pub owm_addr: String,

    #[command(flatten)]
    pub telemetry: TelemetryArgs,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let guard = telemetry::init_tracing(SERVICE_NAME, &self.telemetry)?;
        tracing::info!(upstream = %self.owm_addr, "Starting {SERVICE_NAME}");

        let caller = ReqwestCaller::new().context("Failed to build HTTP client")?;
        let state = AppState::new(self.owm_addr, caller);
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from(["weather-service", "--port", "9000", "--owm-addr", "owm:8082"])
            .expect("flags should parse");

        assert_eq!(cli.port, 9000);
        assert_eq!(cli.owm_addr, "owm:8082");
    }
}
