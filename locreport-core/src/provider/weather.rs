use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::model::Weather;
use crate::provider::truncate_body;

#[async_trait]
pub trait WeatherClient: Send + Sync {
    /// Current weather at the given coordinates.
    async fn current_weather(&self, latitude: f64, longitude: f64) -> Result<Weather>;
}

/// Current weather from OpenWeather, queried by coordinates.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self { api_key, http: Client::new() }
    }
}

#[async_trait]
impl WeatherClient for OpenWeatherClient {
    async fn current_weather(&self, latitude: f64, longitude: f64) -> Result<Weather> {
        let url = "https://api.openweathermap.org/data/2.5/weather";

        let res = self
            .http
            .get(url)
            .query(&[
                ("lat", latitude.to_string().as_str()),
                ("lon", longitude.to_string().as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .context("Failed to send request to OpenWeather (current weather)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather current response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather current request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).context("Failed to parse OpenWeather current JSON")?;

        Ok(map_current(parsed))
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    /// Meters; absent in some edge responses.
    #[serde(default)]
    visibility: f64,
    /// UTC offset of the queried location, seconds.
    timezone: i32,
}

fn map_current(parsed: OwCurrentResponse) -> Weather {
    let description = parsed
        .weather
        .first()
        .map(|w| w.description.clone())
        .unwrap_or_else(|| "Unknown".to_string());

    Weather {
        temperature_c: parsed.main.temp,
        description,
        humidity_pct: parsed.main.humidity,
        visibility: parsed.visibility,
        wind_speed_mps: parsed.wind.speed,
        timezone_offset_seconds: parsed.timezone,
    }
}
