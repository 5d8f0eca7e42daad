//! Single-shot outbound GET shared by every upstream call.

use async_trait::async_trait;
use reqwest::{Client, header::HeaderMap};
use std::{fmt::Debug, time::Duration, time::Instant};
use tracing::Instrument;

use crate::{error::Result, telemetry::Tracer};

/// Applied to every outbound call, independent of the caller's deadline.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Status and full body of an upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Issues one GET. Status codes are not interpreted; a 4xx/5xx is a
/// successful call.
#[async_trait]
pub trait HttpCaller: Send + Sync + Debug {
    async fn get(&self, url: &str, tracer: &dyn Tracer) -> Result<HttpResponse>;
}

#[derive(Debug, Clone)]
pub struct ReqwestCaller {
    http: Client,
}

impl ReqwestCaller {
    pub fn new() -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http })
    }

    async fn send(&self, url: &str, tracer: &dyn Tracer) -> Result<HttpResponse> {
        let mut headers = HeaderMap::new();
        tracer.inject(&mut headers);

        tracing::info!(method = "GET", url, "outbound request");
        let started = Instant::now();

        let res = self
            .http
            .get(url)
            .headers(headers)
            .send()
            .await
            .inspect_err(|e| tracing::warn!(method = "GET", url, error = %e, "outbound request failed"))?;

        let status = res.status().as_u16();
        let body = res.text().await?;

        tracing::info!(
            method = "GET",
            url,
            status,
            duration_ms = started.elapsed().as_millis() as u64,
            "outbound response"
        );

        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl HttpCaller for ReqwestCaller {
    async fn get(&self, url: &str, tracer: &dyn Tracer) -> Result<HttpResponse> {
        let span = tracer.span("http.get");
        self.send(url, tracer).instrument(span).await
    }
}
