use axum::{
    Json, Router,
    extract::{Path, State, rejection::PathRejection},
    routing::get,
};
use std::sync::Arc;
use weather_core::{
    Credential, HttpCaller, OpenWeatherMap, SimplifiedWeather, TraceContextTracer, Tracer,
    adapter, server::ApiError,
};

pub const SERVICE_NAME: &str = "OWMService";

/// Shared state for HTTP handlers
#[derive(Debug, Clone)]
pub struct AppState {
    credential: Credential,
    http: Arc<dyn HttpCaller>,
}

impl AppState {
    pub fn new(credential: Credential, http: impl HttpCaller + 'static) -> Self {
        Self {
            credential,
            http: Arc::new(http),
        }
    }
}

/// GET /ping - Service name
async fn ping_receiver() -> &'static str {
    let tracer = TraceContextTracer::new(SERVICE_NAME, "pingReceiverRoute");
    let _span = tracer.span("ping_receiver").entered();
    tracing::debug!("ping received");
    SERVICE_NAME
}

/// GET /getweather/owm/{city} - Simplified current weather
async fn get_weather_by_city(
    State(state): State<AppState>,
    city: Result<Path<String>, PathRejection>,
) -> Result<Json<SimplifiedWeather>, ApiError> {
    let Path(city) = city?;
    let tracer = TraceContextTracer::new(SERVICE_NAME, "getWeatherByCity");
    let owm = OpenWeatherMap::new(state.credential.api_key(), state.http.clone());

    let weather = adapter::weather_by_city(&owm, &city, &tracer).await?;
    Ok(Json(weather))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(ping_receiver))
        .route("/getweather/owm/{city}", get(get_weather_by_city))
        .with_state(state)
}
