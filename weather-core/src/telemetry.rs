//! Tracing capability injected into every pipeline call, W3C trace-context
//! propagation, and span export.

use anyhow::Context as _;
use opentelemetry::{
    Context, KeyValue,
    baggage::BaggageExt,
    propagation::{TextMapCompositePropagator, TextMapPropagator},
    trace::TracerProvider as _,
};
use opentelemetry_http::{HeaderExtractor, HeaderInjector};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    propagation::{BaggagePropagator, TraceContextPropagator},
    runtime,
    trace::{Sampler, TracerProvider},
};
use reqwest::header::HeaderMap;
use std::fmt::Debug;
use tracing::{Span, subscriber::DefaultGuard};
use tracing_opentelemetry::OpenTelemetrySpanExt;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{TelemetryArgs, TracerKind};

pub const TRACEPARENT: &str = "traceparent";
pub const BAGGAGE: &str = "baggage";

/// Opens spans for pipeline steps and writes propagation headers onto
/// outgoing requests.
pub trait Tracer: Send + Sync + Debug {
    fn span(&self, name: &str) -> Span;

    fn inject(&self, headers: &mut HeaderMap);
}

/// Tracer that records nothing and injects no headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    fn span(&self, _name: &str) -> Span {
        Span::none()
    }

    fn inject(&self, _headers: &mut HeaderMap) {}
}

/// Per-route tracer. Spans nest under the current span; outgoing requests
/// carry the current span as `traceparent` and the route as baggage.
#[derive(Debug, Clone)]
pub struct TraceContextTracer {
    service: &'static str,
    route: &'static str,
}

impl TraceContextTracer {
    pub fn new(service: &'static str, route: &'static str) -> Self {
        Self { service, route }
    }
}

impl Tracer for TraceContextTracer {
    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "call",
            otel.name = name,
            service = self.service,
            route = self.route,
        )
    }

    fn inject(&self, headers: &mut HeaderMap) {
        let cx = Span::current()
            .context()
            .with_baggage(vec![KeyValue::new("FunctionRoute", self.route)]);
        propagator().inject_context(&cx, &mut HeaderInjector(headers));
    }
}

fn propagator() -> TextMapCompositePropagator {
    TextMapCompositePropagator::new(vec![
        Box::new(TraceContextPropagator::new()),
        Box::new(BaggagePropagator::new()),
    ])
}

/// Remote parent carried by inbound `traceparent` / `baggage` headers.
/// Empty when the headers are missing or malformed.
pub fn extract_context(headers: &HeaderMap) -> Context {
    propagator().extract(&HeaderExtractor(headers))
}

/// Flushes exported spans on shutdown.
#[derive(Debug)]
pub struct TelemetryGuard {
    provider: TracerProvider,
}

impl TelemetryGuard {
    pub fn shutdown(self) {
        if let Err(e) = self.provider.shutdown() {
            tracing::warn!(error = %e, "failed to shut down tracer provider");
        }
    }
}

/// Installs the global subscriber: `RUST_LOG`-filtered log output plus span
/// export to the configured backend.
pub fn init_tracing(service: &'static str, args: &TelemetryArgs) -> anyhow::Result<TelemetryGuard> {
    let provider = tracer_provider(service, args)?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_opentelemetry::layer().with_tracer(provider.tracer(service)))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!(
        service.name = service,
        host = %args.hostname,
        kind = %args.tracer_kind,
        endpoint = args.tracer_endpoint.as_deref().unwrap_or(""),
        "tracing initialized"
    );
    Ok(TelemetryGuard { provider })
}

fn tracer_provider(service: &'static str, args: &TelemetryArgs) -> anyhow::Result<TracerProvider> {
    let resource = Resource::default().merge(&Resource::new([
        KeyValue::new("service.name", service),
        KeyValue::new("Host", args.hostname.clone()),
    ]));
    let endpoint = args.tracer_endpoint.as_deref().filter(|e| !e.is_empty());

    let builder = TracerProvider::builder()
        .with_sampler(Sampler::AlwaysOn)
        .with_resource(resource);

    let builder = match args.tracer_kind {
        TracerKind::Stdout => {
            builder.with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
        }
        TracerKind::Otlp => {
            let mut exporter = opentelemetry_otlp::SpanExporter::builder().with_tonic();
            if let Some(endpoint) = endpoint {
                exporter = exporter.with_endpoint(with_scheme(endpoint));
            }
            let exporter = exporter.build().context("Failed to build OTLP gRPC exporter")?;
            builder.with_batch_exporter(exporter, runtime::Tokio)
        }
        TracerKind::Jaeger => {
            let mut exporter = opentelemetry_otlp::SpanExporter::builder().with_http();
            if let Some(endpoint) = endpoint {
                exporter = exporter.with_endpoint(with_scheme(endpoint));
            }
            let exporter = exporter.build().context("Failed to build Jaeger OTLP/HTTP exporter")?;
            builder.with_batch_exporter(exporter, runtime::Tokio)
        }
    };

    Ok(builder.build())
}

/// Collector addresses are often given as bare `host:port`.
fn with_scheme(endpoint: &str) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("http://{endpoint}")
    }
}

/// Keeps a thread-local subscriber alive; spans get real ids but are not
/// exported anywhere.
pub struct ScopedTracing {
    _guard: DefaultGuard,
    _provider: TracerProvider,
}

/// Records spans on the current thread only, for code running outside a
/// service process.
pub fn scoped_tracing(service: &'static str) -> ScopedTracing {
    let provider = TracerProvider::builder().build();
    let subscriber = tracing_subscriber::registry()
        .with(tracing_opentelemetry::layer().with_tracer(provider.tracer(service)));

    ScopedTracing {
        _guard: tracing::subscriber::set_default(subscriber),
        _provider: provider,
    }
}
