use tracing::Instrument;

use crate::{
    error::{Result, WeatherError},
    http::HttpCaller,
    telemetry::Tracer,
};

/// Calls `http://<host>/ping` and returns the body. Anything but 200 is an
/// error carrying the status and body.
pub async fn ping(http: &dyn HttpCaller, host: &str, tracer: &dyn Tracer) -> Result<String> {
    let span = tracer.span("ping");
    call_ping(http, host, tracer).instrument(span).await
}

async fn call_ping(http: &dyn HttpCaller, host: &str, tracer: &dyn Tracer) -> Result<String> {
    let res = http.get(&format!("http://{host}/ping"), tracer).await?;

    if res.status != 200 {
        return Err(WeatherError::UpstreamStatus {
            status: res.status,
            body: res.body,
        });
    }

    Ok(res.body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{http::testing::FakeCaller, telemetry::NoopTracer};

    #[tokio::test]
    async fn returns_body_on_200() {
        let caller = FakeCaller::new(200, "OWMService");
        let body = ping(&caller, "owm:8082", &NoopTracer).await.unwrap();

        assert_eq!(body, "OWMService");
        assert_eq!(caller.urls(), vec!["http://owm:8082/ping"]);
    }

    #[tokio::test]
    async fn non_200_is_an_error() {
        let caller = FakeCaller::new(204, "");
        let err = ping(&caller, "owm:8082", &NoopTracer).await.unwrap_err();
        assert!(matches!(err, WeatherError::UpstreamStatus { status: 204, .. }));
    }
}
