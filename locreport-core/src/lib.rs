//! Core library for the `locreport` CLI.
//!
//! This crate defines:
//! - The rendering engine: location facts in, three display-ready tables out
//! - Shared domain models (location, weather, currency rates)
//! - Clients for the geo, weather, rates, and news providers
//! - The aggregator that merges provider responses into one record
//! - Configuration & credentials handling
//!
//! It is used by `locreport-cli`, but can also be reused by other binaries or services.

pub mod aggregator;
pub mod config;
pub mod model;
pub mod provider;
pub mod render;
pub mod table;

pub use aggregator::{Aggregator, BASE_CURRENCY};
pub use config::{Config, ProviderConfig};
pub use model::{CurrencyRate, Language, Location, LocationInfo, NewsArticle, Weather};
pub use provider::{GeoClient, NewsClient, ProviderId, RatesClient, WeatherClient};
pub use render::{Clock, FormatError, SystemClock, Units, render};
pub use table::{RenderedReport, ReportTable};
