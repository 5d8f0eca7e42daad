use serde::{Deserialize, Serialize};

/// Lookup key for a single provider call. Exactly one mode per call.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    City(String),
    Coordinates { lat: f64, lon: f64 },
    Zip(i64),
    CityId(i64),
}

impl WeatherQuery {
    /// Mode-specific part of the provider query string.
    ///
    /// City names are interpolated as given, without percent-encoding.
    pub fn query_params(&self) -> String {
        match self {
            WeatherQuery::City(city) => format!("q={city}"),
            WeatherQuery::Coordinates { lat, lon } => format!("lat={lat:.6}&lon={lon:.6}"),
            WeatherQuery::Zip(zip) => format!("zip={zip}"),
            WeatherQuery::CityId(id) => format!("id={id}"),
        }
    }
}

/// Weather served by the OWM adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SimplifiedWeather {
    pub condition: String,
    pub temperature: f64,
    pub humidity: i64,
}

/// Forecast as decoded by the relay from the adapter's response.
///
/// Same wire shape as [`SimplifiedWeather`], kept separate because the relay
/// decodes it at its own trust boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SimplifiedForecast {
    pub condition: String,
    pub temperature: f64,
    pub humidity: i32,
}
