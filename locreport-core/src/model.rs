use serde::{Deserialize, Serialize};

/// A language spoken in the country, with its local spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
    pub native_name: String,
}

/// Country-level metadata plus capital coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub capital: String,
    pub subregion: String,
    /// Area in km².
    pub area: f64,
    pub population: u64,
    pub latitude: f64,
    pub longitude: f64,
    /// Insertion order is display order.
    pub languages: Vec<Language>,
}

/// Current weather at the capital.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weather {
    pub temperature_c: f64,
    pub description: String,
    pub humidity_pct: u8,
    pub visibility: f64,
    pub wind_speed_mps: f64,
    /// UTC offset of the capital, in seconds.
    pub timezone_offset_seconds: i32,
}

/// One exchange rate: 1 unit of `code` costs `rate` units of the base currency.
///
/// The rate is kept as the provider's decimal text so rounding can be
/// exact; binary floats cannot represent values like 73.005.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyRate {
    pub code: String,
    pub rate: String,
}

/// Fully aggregated facts about one location, read-only to the renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationInfo {
    pub location: Location,
    pub weather: Weather,
    /// Insertion order is display order; codes are unique.
    pub currency_rates: Vec<CurrencyRate>,
}

/// A single top headline, adjacent to the report itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub source: String,
    pub url: String,
}
