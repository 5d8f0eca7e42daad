use axum::{
    Json, Router,
    extract::{Path, State, rejection::PathRejection},
    routing::get,
};
use std::sync::Arc;
use weather_core::{
    HttpCaller, SimplifiedForecast, TraceContextTracer, ping, relay, server::ApiError,
};

pub const SERVICE_NAME: &str = "WeatherService";

/// Shared state for HTTP handlers
#[derive(Debug, Clone)]
pub struct AppState {
    owm_addr: Arc<str>,
    http: Arc<dyn HttpCaller>,
}

impl AppState {
    pub fn new(owm_addr: impl Into<Arc<str>>, http: impl HttpCaller + 'static) -> Self {
        Self {
            owm_addr: owm_addr.into(),
            http: Arc::new(http),
        }
    }
}

/// GET /ping - Own name followed by the upstream's ping answer
async fn ping_caller(State(state): State<AppState>) -> Result<String, ApiError> {
    let tracer = TraceContextTracer::new(SERVICE_NAME, "pingCallerRoute");

    let upstream = ping::ping(state.http.as_ref(), &state.owm_addr, &tracer).await?;
    Ok(format!("{SERVICE_NAME} -> {upstream}"))
}

/// GET /forecast/{city} - Forecast relayed from owm-service
async fn weather_forecast(
    State(state): State<AppState>,
    city: Result<Path<String>, PathRejection>,
) -> Result<Json<SimplifiedForecast>, ApiError> {
    let Path(city) = city?;
    let tracer = TraceContextTracer::new(SERVICE_NAME, "weatherForecast");

    let forecast =
        relay::get_weather_forecast(state.http.as_ref(), &state.owm_addr, &city, &tracer).await?;
    Ok(Json(forecast))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(ping_caller))
        .route("/forecast/{city}", get(weather_forecast))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, response::IntoResponse};
    use weather_core::{ReqwestCaller, WeatherError, telemetry};
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn state(server: &MockServer) -> AppState {
        AppState::new(server.address().to_string(), ReqwestCaller::new().unwrap())
    }

    #[tokio::test]
    async fn ping_prefixes_upstream_answer() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ping"))
            .and(header_exists("traceparent"))
            .respond_with(ResponseTemplate::new(200).set_body_string("OWMService"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let _tracing = telemetry::scoped_tracing("test");
        let body = ping_caller(State(state(&mock_server))).await.unwrap();
        assert_eq!(body, "WeatherService -> OWMService");
    }

    #[tokio::test]
    async fn ping_failure_is_a_500() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ping"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let err = ping_caller(State(state(&mock_server)))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApiError::Pipeline(WeatherError::UpstreamStatus { status: 503, .. })
        ));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn forecast_is_relayed_unchanged() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/getweather/owm/Berlin"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Condition": "Snow",
                "Temperature": -1.5,
                "Humidity": 78
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let Json(forecast) =
            weather_forecast(State(state(&mock_server)), Ok(Path("Berlin".into())))
                .await
                .unwrap();

        assert_eq!(
            forecast,
            SimplifiedForecast {
                condition: "Snow".into(),
                temperature: -1.5,
                humidity: 78,
            }
        );
    }

    #[tokio::test]
    async fn upstream_500_page_is_a_500() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/getweather/owm/Berlin"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error\n"))
            .mount(&mock_server)
            .await;

        let err = weather_forecast(State(state(&mock_server)), Ok(Path("Berlin".into())))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Pipeline(WeatherError::Decode(_))));
    }

    #[tokio::test]
    async fn undecodable_city_is_a_500_without_upstream_call() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(state(&mock_server));
        tokio::spawn(async move { axum::serve(listener, app).await });

        let res = reqwest::get(format!("http://{addr}/forecast/%C3%28"))
            .await
            .unwrap();

        assert_eq!(res.status(), 500);
        assert_eq!(res.text().await.unwrap(), "Internal Server Error");
    }
}
