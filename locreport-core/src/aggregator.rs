//! Fetches the independent facts about a location and merges them
//! into one immutable [`LocationInfo`] for the renderer.
//!
//! All network asynchrony lives here; the renderer itself never
//! suspends.

use anyhow::{Context, Result};

use crate::config::Config;
use crate::model::LocationInfo;
use crate::provider::{
    ExchangeRateClient, GeoClient, OpenWeatherClient, ProviderId, RatesClient,
    RestCountriesClient, WeatherClient,
};

/// Currency all reported exchange rates are expressed in.
pub const BASE_CURRENCY: &str = "RUB";

pub struct Aggregator {
    geo: Box<dyn GeoClient>,
    weather: Box<dyn WeatherClient>,
    rates: Box<dyn RatesClient>,
    base_currency: String,
}

impl Aggregator {
    /// Build an aggregator over caller-supplied clients.
    pub fn new(
        geo: Box<dyn GeoClient>,
        weather: Box<dyn WeatherClient>,
        rates: Box<dyn RatesClient>,
    ) -> Self {
        Self { geo, weather, rates, base_currency: BASE_CURRENCY.to_string() }
    }

    /// Build an aggregator over the real providers, pulling the
    /// OpenWeather API key from config.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.require_api_key(ProviderId::OpenWeather)?;

        Ok(Self::new(
            Box::new(RestCountriesClient::new()),
            Box::new(OpenWeatherClient::new(api_key.to_owned())),
            Box::new(ExchangeRateClient::new()),
        ))
    }

    /// Look the country up, then fetch capital weather and currency
    /// rates concurrently and merge everything into one record.
    pub async fn fetch(&self, country_name: &str) -> Result<LocationInfo> {
        let geo = self
            .geo
            .get_country(country_name)
            .await
            .with_context(|| format!("Failed to resolve country '{country_name}'"))?;

        let (weather, currency_rates) = tokio::try_join!(
            self.weather.current_weather(geo.location.latitude, geo.location.longitude),
            self.rates.rates(&geo.currency_codes, &self.base_currency),
        )
        .with_context(|| format!("Failed to gather facts for '{}'", geo.location.name))?;

        Ok(LocationInfo { location: geo.location, weather, currency_rates })
    }
}
