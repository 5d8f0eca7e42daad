//! Error taxonomy shared by every step of the lookup pipeline.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("no api keys present")]
    MissingCredential,

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("provider response contained no weather conditions")]
    EmptyConditions,

    #[error("StatusCode: {status}, Body: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("unrecognized tracer kind '{0}'. Supported kinds: stdouttrace, jaeger, oteltrace")]
    UnrecognizedTracerKind(String),
}

pub type Result<T, E = WeatherError> = std::result::Result<T, E>;
