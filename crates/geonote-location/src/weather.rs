//! Current conditions from Open-Meteo.

use async_trait::async_trait;
use geonote_core::TemperatureUnit;
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::http::get_json;
use crate::types::{Coordinate, LookupError, WeatherResult};

pub const OPEN_METEO_URL: &str = "https://api.open-meteo.com";

/// Fetches current weather for a coordinate.
#[async_trait]
pub trait WeatherLookup: Send + Sync {
    async fn current(
        &self,
        coordinate: &Coordinate,
        unit: TemperatureUnit,
    ) -> Result<WeatherResult, LookupError>;
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: Option<CurrentWeather>,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
    weathercode: i32,
}

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    client: Client,
    base_url: String,
}

impl OpenMeteoProvider {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl WeatherLookup for OpenMeteoProvider {
    #[instrument(skip(self), level = "debug")]
    async fn current(
        &self,
        coordinate: &Coordinate,
        unit: TemperatureUnit,
    ) -> Result<WeatherResult, LookupError> {
        let url = format!("{}/v1/forecast", self.base_url);

        let request = self.client.get(&url).query(&[
            ("latitude", coordinate.latitude.to_string()),
            ("longitude", coordinate.longitude.to_string()),
            ("current_weather", "true".to_string()),
            ("temperature_unit", unit.as_param().to_string()),
        ]);

        let body: ForecastResponse = get_json(request).await?;
        let current = body
            .current_weather
            .ok_or_else(|| LookupError::InvalidResponse("missing current_weather".to_string()))?;

        let weather = WeatherResult::from_reading(current.temperature, unit, current.weathercode);
        tracing::debug!("Current weather: {}", weather.format());
        Ok(weather)
    }
}
