use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use tracing::Instrument;

use crate::{
    error::{Result, WeatherError},
    http::HttpCaller,
    model::WeatherQuery,
    telemetry::Tracer,
};

/// OpenWeatherMap API host. Requests go over plain HTTP.
pub const API_URL: &str = "api.openweathermap.org";

/// Current-weather client for OpenWeatherMap, metric units.
#[derive(Debug, Clone)]
pub struct OpenWeatherMap {
    api_key: String,
    http: Arc<dyn HttpCaller>,
}

impl OpenWeatherMap {
    pub fn new(api_key: impl Into<String>, http: Arc<dyn HttpCaller>) -> Self {
        Self {
            api_key: api_key.into(),
            http,
        }
    }

    pub async fn current_weather_from_city(
        &self,
        city: &str,
        tracer: &dyn Tracer,
    ) -> Result<CurrentWeatherResponse> {
        self.current_weather(&WeatherQuery::City(city.to_string()), tracer).await
    }

    pub async fn current_weather_from_coordinates(
        &self,
        lat: f64,
        lon: f64,
        tracer: &dyn Tracer,
    ) -> Result<CurrentWeatherResponse> {
        self.current_weather(&WeatherQuery::Coordinates { lat, lon }, tracer).await
    }

    pub async fn current_weather_from_zip(
        &self,
        zip: i64,
        tracer: &dyn Tracer,
    ) -> Result<CurrentWeatherResponse> {
        self.current_weather(&WeatherQuery::Zip(zip), tracer).await
    }

    pub async fn current_weather_from_city_id(
        &self,
        id: i64,
        tracer: &dyn Tracer,
    ) -> Result<CurrentWeatherResponse> {
        self.current_weather(&WeatherQuery::CityId(id), tracer).await
    }

    /// Fetches and decodes the raw provider payload. The HTTP status is not
    /// checked; whatever body comes back is decoded.
    pub async fn current_weather(
        &self,
        query: &WeatherQuery,
        tracer: &dyn Tracer,
    ) -> Result<CurrentWeatherResponse> {
        let span = tracer.span("owm.current_weather");
        self.fetch_current(query, tracer).instrument(span).await
    }

    async fn fetch_current(
        &self,
        query: &WeatherQuery,
        tracer: &dyn Tracer,
    ) -> Result<CurrentWeatherResponse> {
        if self.api_key.is_empty() {
            return Err(WeatherError::MissingCredential);
        }

        let url = self.current_weather_url(query);
        let res = self.http.get(&url, tracer).await?;

        let parsed: CurrentWeatherResponse = serde_json::from_str(&res.body)?;
        tracing::debug!(
            city = %parsed.name,
            observed_at = ?parsed.observation_time(),
            conditions = parsed.weather.len(),
            "decoded provider response"
        );

        Ok(parsed)
    }

    fn current_weather_url(&self, query: &WeatherQuery) -> String {
        format!(
            "http://{API_URL}/data/2.5/weather?{}&units=metric&APPID={}",
            query.query_params(),
            self.api_key
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Coord {
    #[serde(deserialize_with = "null_as_default")]
    pub lon: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub lat: f64,
}

/// One weather condition record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Condition {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub main: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub icon: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Main {
    #[serde(deserialize_with = "null_as_default")]
    pub temp: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub pressure: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub humidity: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub temp_min: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub temp_max: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Wind {
    #[serde(deserialize_with = "null_as_default")]
    pub speed: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub deg: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Clouds {
    #[serde(deserialize_with = "null_as_default")]
    pub all: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Rain {
    #[serde(rename = "3h", deserialize_with = "null_as_default")]
    pub three_hours: f64,
}

/// Full `/data/2.5/weather` payload. Absent or `null` fields decode to zero
/// values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CurrentWeatherResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub coord: Coord,
    #[serde(deserialize_with = "null_as_default")]
    pub weather: Vec<Condition>,
    #[serde(deserialize_with = "null_as_default")]
    pub main: Main,
    #[serde(deserialize_with = "null_as_default")]
    pub wind: Wind,
    #[serde(deserialize_with = "null_as_default")]
    pub rain: Rain,
    #[serde(deserialize_with = "null_as_default")]
    pub clouds: Clouds,
    #[serde(deserialize_with = "null_as_default")]
    pub dt: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
}

impl CurrentWeatherResponse {
    pub fn observation_time(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp(self.dt, 0)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
