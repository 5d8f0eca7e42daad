//! Client side of the forecast relay: calls owm-service and decodes its answer.

use tracing::Instrument;

use crate::{error::Result, http::HttpCaller, model::SimplifiedForecast, telemetry::Tracer};

pub const FORECAST_PATH: &str = "getweather/owm";

/// Fetches `http://<host>/getweather/owm/<city>`. The city is placed into the
/// path as given.
pub async fn get_weather_forecast(
    http: &dyn HttpCaller,
    host: &str,
    city: &str,
    tracer: &dyn Tracer,
) -> Result<SimplifiedForecast> {
    let span = tracer.span("relay.get_weather_forecast");

    async {
        let url = format!("http://{host}/{FORECAST_PATH}/{city}");
        let res = http.get(&url, tracer).await?;
        parse_forecast(&res.body, tracer)
    }
    .instrument(span)
    .await
}

fn parse_forecast(body: &str, tracer: &dyn Tracer) -> Result<SimplifiedForecast> {
    let _entered = tracer.span("relay.parse_forecast").entered();
    Ok(serde_json::from_str(body)?)
}
