//! Projection of the raw provider payload into the adapter's response shape.

use std::convert::TryFrom;
use tracing::Instrument;

use crate::{
    error::{Result, WeatherError},
    model::SimplifiedWeather,
    provider::{CurrentWeatherResponse, OpenWeatherMap},
    telemetry::Tracer,
};

impl TryFrom<&CurrentWeatherResponse> for SimplifiedWeather {
    type Error = WeatherError;

    /// Uses the first condition record; an empty sequence is an error.
    fn try_from(raw: &CurrentWeatherResponse) -> Result<Self> {
        let first = raw.weather.first().ok_or(WeatherError::EmptyConditions)?;

        Ok(SimplifiedWeather {
            condition: first.main.clone(),
            temperature: raw.main.temp,
            humidity: raw.main.humidity,
        })
    }
}

/// Current weather for `city`, reduced to condition, temperature and humidity.
pub async fn weather_by_city(
    owm: &OpenWeatherMap,
    city: &str,
    tracer: &dyn Tracer,
) -> Result<SimplifiedWeather> {
    let span = tracer.span("owm.weather_by_city");

    async {
        let raw = owm.current_weather_from_city(city, tracer).await?;
        SimplifiedWeather::try_from(&raw)
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        http::{HttpCaller, testing::FakeCaller},
        provider::openweather::fixtures,
        telemetry::NoopTracer,
    };
    use std::sync::Arc;

    #[test]
    fn projects_first_condition_and_main_block() {
        let raw: CurrentWeatherResponse = serde_json::from_str(fixtures::PARIS).unwrap();

        let weather = SimplifiedWeather::try_from(&raw).unwrap();
        assert_eq!(
            weather,
            SimplifiedWeather {
                condition: "Clear".into(),
                temperature: 21.5,
                humidity: 40,
            }
        );
    }

    #[test]
    fn empty_conditions_is_an_error() {
        let raw = CurrentWeatherResponse::default();
        let err = SimplifiedWeather::try_from(&raw).unwrap_err();
        assert!(matches!(err, WeatherError::EmptyConditions));
    }

    #[tokio::test]
    async fn weather_by_city_end_to_end() {
        let caller = Arc::new(FakeCaller::new(200, fixtures::PARIS));
        let owm = OpenWeatherMap::new("KEY", caller.clone() as Arc<dyn HttpCaller>);

        let weather = weather_by_city(&owm, "Paris", &NoopTracer).await.unwrap();
        assert_eq!(weather.condition, "Clear");
        assert_eq!(caller.calls(), 1);
    }

    #[tokio::test]
    async fn provider_error_body_fails_projection() {
        let caller = Arc::new(FakeCaller::new(401, fixtures::UNAUTHORIZED));
        let owm = OpenWeatherMap::new("BAD", caller as Arc<dyn HttpCaller>);

        let err = weather_by_city(&owm, "Paris", &NoopTracer).await.unwrap_err();
        assert!(matches!(err, WeatherError::EmptyConditions));
    }
}
