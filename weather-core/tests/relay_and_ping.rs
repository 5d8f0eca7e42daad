//! Integration tests for the relay and ping clients against a mock owm-service.

use weather_core::{
    NoopTracer, ReqwestCaller, SimplifiedForecast, WeatherError, ping::ping,
    relay::get_weather_forecast,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn host(server: &MockServer) -> String {
    server.address().to_string()
}

#[tokio::test]
async fn forecast_matches_upstream_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/getweather/owm/Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Condition": "Clear",
            "Temperature": 21.5,
            "Humidity": 40
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let caller = ReqwestCaller::new().unwrap();
    let forecast = get_weather_forecast(&caller, &host(&mock_server), "Paris", &NoopTracer)
        .await
        .unwrap();

    assert_eq!(
        forecast,
        SimplifiedForecast {
            condition: "Clear".to_string(),
            temperature: 21.5,
            humidity: 40,
        }
    );
}

#[tokio::test]
async fn malformed_forecast_is_a_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/getweather/owm/Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"Condition": "Clear", "#))
        .mount(&mock_server)
        .await;

    let caller = ReqwestCaller::new().unwrap();
    let err = get_weather_forecast(&caller, &host(&mock_server), "Paris", &NoopTracer)
        .await
        .unwrap_err();

    assert!(matches!(err, WeatherError::Decode(_)));
}

#[tokio::test]
async fn ping_returns_upstream_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OWMService"))
        .mount(&mock_server)
        .await;

    let caller = ReqwestCaller::new().unwrap();
    let body = ping(&caller, &host(&mock_server), &NoopTracer).await.unwrap();

    assert_eq!(body, "OWMService");
}

#[tokio::test]
async fn ping_reports_unavailable_upstream() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down for maintenance"))
        .mount(&mock_server)
        .await;

    let caller = ReqwestCaller::new().unwrap();
    let err = ping(&caller, &host(&mock_server), &NoopTracer).await.unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("503"), "Error should mention 503 status: {msg}");
    assert!(msg.contains("down for maintenance"));
}
