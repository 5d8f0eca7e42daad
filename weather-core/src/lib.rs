//! Core library for the OWM adapter and the weather relay services.
//!
//! This crate defines:
//! - The single-shot HTTP call helper and its injectable transport
//! - The OpenWeatherMap client and the projection to a simplified shape
//! - The relay and health-check clients used by the weather service
//! - Tracing, configuration and HTTP-boundary glue shared by both binaries

pub mod adapter;
pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod ping;
pub mod provider;
pub mod relay;
pub mod server;
pub mod telemetry;

pub use config::{Credential, TelemetryArgs, TracerKind};
pub use error::WeatherError;
pub use http::{HttpCaller, HttpResponse, ReqwestCaller};
pub use model::{SimplifiedForecast, SimplifiedWeather, WeatherQuery};
pub use provider::{CurrentWeatherResponse, OpenWeatherMap};
pub use telemetry::{NoopTracer, TraceContextTracer, Tracer};
