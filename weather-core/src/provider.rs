//! Upstream weather providers.

pub mod openweather;

pub use openweather::{CurrentWeatherResponse, OpenWeatherMap};
