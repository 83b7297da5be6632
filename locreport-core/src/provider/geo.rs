use std::collections::BTreeMap;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::model::{Language, Location};
use crate::provider::truncate_body;

/// Country metadata plus the currency codes the rates lookup needs.
#[derive(Debug, Clone)]
pub struct GeoInfo {
    pub location: Location,
    pub currency_codes: Vec<String>,
}

#[async_trait]
pub trait GeoClient: Send + Sync {
    /// Look a country up by (partial) name.
    async fn get_country(&self, name: &str) -> Result<GeoInfo>;
}

/// Geo metadata from the REST Countries API. No API key required.
#[derive(Debug, Clone)]
pub struct RestCountriesClient {
    http: Client,
}

impl RestCountriesClient {
    pub fn new() -> Self {
        Self { http: Client::new() }
    }
}

impl Default for RestCountriesClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GeoClient for RestCountriesClient {
    async fn get_country(&self, name: &str) -> Result<GeoInfo> {
        let url = format!("https://restcountries.com/v3.1/name/{name}");

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .context("Failed to send request to REST Countries")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read REST Countries response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "REST Countries request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: Vec<RcCountry> =
            serde_json::from_str(&body).context("Failed to parse REST Countries JSON")?;

        let country = parsed
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No country found matching '{name}'"))?;

        map_country(country)
    }
}

#[derive(Debug, Deserialize)]
struct RcCountry {
    name: RcName,
    #[serde(default)]
    capital: Vec<String>,
    #[serde(default)]
    subregion: Option<String>,
    area: f64,
    population: u64,
    /// Language code -> display name, e.g. "rus" -> "Russian".
    #[serde(default)]
    languages: BTreeMap<String, String>,
    /// Currency code -> details; only the codes are used.
    #[serde(default)]
    currencies: BTreeMap<String, serde_json::Value>,
    #[serde(rename = "capitalInfo")]
    capital_info: RcCapitalInfo,
}

#[derive(Debug, Deserialize)]
struct RcName {
    common: String,
    /// Language code -> native spelling of the country name's language.
    #[serde(rename = "nativeName", default)]
    native_name: BTreeMap<String, RcNativeName>,
}

#[derive(Debug, Deserialize)]
struct RcNativeName {
    common: String,
}

#[derive(Debug, Deserialize)]
struct RcCapitalInfo {
    #[serde(default)]
    latlng: Vec<f64>,
}

fn map_country(country: RcCountry) -> Result<GeoInfo> {
    let capital = country
        .capital
        .first()
        .cloned()
        .ok_or_else(|| anyhow!("Country '{}' has no capital listed", country.name.common))?;

    let (latitude, longitude) = match country.capital_info.latlng.as_slice() {
        [lat, lon, ..] => (*lat, *lon),
        _ => {
            return Err(anyhow!(
                "Country '{}' has no capital coordinates listed",
                country.name.common
            ));
        }
    };

    // BTreeMap keys give a stable (code-sorted) language order.
    let languages = country
        .languages
        .iter()
        .map(|(code, name)| Language {
            name: name.clone(),
            native_name: country
                .name
                .native_name
                .get(code)
                .map_or_else(|| name.clone(), |n| n.common.clone()),
        })
        .collect();

    Ok(GeoInfo {
        location: Location {
            name: country.name.common,
            capital,
            subregion: country.subregion.unwrap_or_default(),
            area: country.area,
            population: country.population,
            latitude,
            longitude,
            languages,
        },
        currency_codes: country.currencies.keys().cloned().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SWEDEN: &str = r#"{
        "name": {
            "common": "Sweden",
            "nativeName": { "swe": { "official": "Konungariket Sverige", "common": "Sverige" } }
        },
        "capital": ["Stockholm"],
        "subregion": "Northern Europe",
        "area": 450295.0,
        "population": 10353442,
        "languages": { "swe": "Swedish" },
        "currencies": { "SEK": { "name": "Swedish krona", "symbol": "kr" } },
        "capitalInfo": { "latlng": [59.33, 18.07] }
    }"#;

    #[test]
    fn maps_country_fields() {
        let country: RcCountry = serde_json::from_str(SWEDEN).unwrap();
        let info = map_country(country).unwrap();

        assert_eq!(info.location.name, "Sweden");
        assert_eq!(info.location.capital, "Stockholm");
        assert_eq!(info.location.subregion, "Northern Europe");
        assert_eq!(info.location.population, 10353442);
        assert_eq!(info.location.latitude, 59.33);
        assert_eq!(info.location.longitude, 18.07);
        assert_eq!(
            info.location.languages,
            vec![Language {
                name: "Swedish".to_string(),
                native_name: "Sverige".to_string()
            }]
        );
        assert_eq!(info.currency_codes, vec!["SEK".to_string()]);
    }

    #[test]
    fn missing_capital_is_an_error() {
        let mut country: RcCountry = serde_json::from_str(SWEDEN).unwrap();
        country.capital.clear();

        let err = map_country(country).unwrap_err();
        assert!(err.to_string().contains("no capital listed"));
    }

    #[test]
    fn missing_coordinates_is_an_error() {
        let mut country: RcCountry = serde_json::from_str(SWEDEN).unwrap();
        country.capital_info.latlng.clear();

        let err = map_country(country).unwrap_err();
        assert!(err.to_string().contains("no capital coordinates"));
    }

    #[test]
    fn language_without_native_name_falls_back_to_display_name() {
        let json = SWEDEN.replace(r#""swe": { "official": "Konungariket Sverige", "common": "Sverige" }"#, r#""xxx": { "official": "x", "common": "x" }"#);
        let country: RcCountry = serde_json::from_str(&json).unwrap();
        let info = map_country(country).unwrap();

        assert_eq!(info.location.languages[0].native_name, "Swedish");
    }
}
