use clap::Args;
use std::{convert::TryFrom, str::FromStr};

use crate::error::WeatherError;

/// Environment variable holding the OpenWeatherMap API key.
pub const API_KEY_ENV: &str = "OWM_APP_ID";

/// Where finished spans are exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TracerKind {
    /// Pretty-printed spans on stdout.
    Stdout,
    /// OTLP over HTTP to a Jaeger collector.
    Jaeger,
    /// OTLP over gRPC to an OpenTelemetry collector.
    Otlp,
}

impl TracerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TracerKind::Stdout => "stdouttrace",
            TracerKind::Jaeger => "jaeger",
            TracerKind::Otlp => "oteltrace",
        }
    }

    pub const fn all() -> &'static [TracerKind] {
        &[TracerKind::Stdout, TracerKind::Jaeger, TracerKind::Otlp]
    }
}

impl std::fmt::Display for TracerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TracerKind {
    type Error = WeatherError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "stdouttrace" | "stdout" => Ok(TracerKind::Stdout),
            "jaeger" => Ok(TracerKind::Jaeger),
            "oteltrace" | "otlp" => Ok(TracerKind::Otlp),
            _ => Err(WeatherError::UnrecognizedTracerKind(value.to_string())),
        }
    }
}

impl FromStr for TracerKind {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TracerKind::try_from(s)
    }
}

/// Telemetry settings shared by both services.
#[derive(Debug, Clone, Args)]
pub struct TelemetryArgs {
    /// Span exporter: stdouttrace, jaeger or oteltrace.
    #[arg(long, env = "TRACER_KIND", default_value = "stdouttrace")]
    pub tracer_kind: TracerKind,

    /// Collector endpoint. `host:port` for oteltrace, the full
    /// `/v1/traces` URL for jaeger. Unused by stdouttrace.
    #[arg(long, env = "TRACER_ENDPOINT")]
    pub tracer_endpoint: Option<String>,

    /// `Host` resource attribute of exported spans.
    #[arg(long, env = "HOSTNAME", default_value = "")]
    pub hostname: String,
}

/// Source of the provider API key, resolved on every lookup.
#[derive(Debug, Clone)]
pub enum Credential {
    /// Read the named environment variable at call time.
    Env(&'static str),
    Fixed(String),
}

impl Credential {
    pub fn from_env() -> Self {
        Credential::Env(API_KEY_ENV)
    }

    /// Current key; empty when the variable is unset.
    pub fn api_key(&self) -> String {
        match self {
            Credential::Env(var) => std::env::var(var).unwrap_or_default(),
            Credential::Fixed(key) => key.clone(),
        }
    }
}
