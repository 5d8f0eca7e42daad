//! HTTP boundary shared by both services.

use anyhow::Context;
use axum::{
    Router,
    body::Body,
    extract::rejection::PathRejection,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};
use tokio::net::TcpListener;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::{error::WeatherError, telemetry};

const INTERNAL_ERROR_BODY: &str = "Internal Server Error";

/// Any failure behind a route, answered as a bare 500. The cause is only
/// logged.
#[derive(Debug)]
pub enum ApiError {
    Pipeline(WeatherError),
    /// The route matched but its path could not be extracted, e.g. a
    /// percent-decoded segment that is not UTF-8.
    Path(PathRejection),
}

impl From<WeatherError> for ApiError {
    fn from(err: WeatherError) -> Self {
        ApiError::Pipeline(err)
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Path(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Pipeline(err) => tracing::error!(error = %err, "request failed"),
            ApiError::Path(rejection) => {
                tracing::error!(error = %rejection.body_text(), "rejected request path")
            }
        }
        (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response()
    }
}

/// Adds request ids, a per-request span continuing the caller's trace, and
/// panic recovery.
pub fn instrument_router(router: Router, service: &'static str, host: String) -> Router {
    let trace = TraceLayer::new_for_http().make_span_with(move |req: &Request<Body>| {
        let span = tracing::info_span!(
            "request",
            service,
            host = %host,
            method = %req.method(),
            uri = %req.uri(),
            version = ?req.version(),
            request_id = ?req.headers().get("x-request-id"),
        );
        span.set_parent(telemetry::extract_context(req.headers()));
        span
    });

    router
        .layer(CatchPanicLayer::new())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(trace)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Binds `0.0.0.0:<port>` and serves until Ctrl-C or SIGTERM.
pub async fn serve(router: Router, port: u16) -> anyhow::Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {port}"))?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
