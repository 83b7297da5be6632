use anyhow::Result;
use clap::{Parser, Subcommand};
use locreport_core::provider::NewsApiClient;
use locreport_core::render::SystemClock;
use locreport_core::{Aggregator, Config, NewsClient, ProviderId, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "locreport", version, about = "Location report CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, e.g. "openweather" or "newsapi".
        provider: String,
    },

    /// Show the country, capital, and weather tables for a country.
    Report {
        /// Country name, e.g. "Sweden".
        country: String,
    },

    /// Show top headlines for a country.
    News {
        /// Two-letter country code, e.g. "se".
        country_code: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Report { country } => report(&country).await,
            Command::News { country_code } => news(&country_code).await,
        }
    }
}

fn configure(provider: &str) -> Result<()> {
    let id = ProviderId::try_from(provider)?;

    let api_key = inquire::Password::new(&format!("API key for {id}:"))
        .without_confirmation()
        .prompt()?;

    let mut config = Config::load()?;
    config.upsert_provider_api_key(id, api_key);
    config.save()?;

    println!("Saved API key for {id} to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn report(country: &str) -> Result<()> {
    let config = Config::load()?;
    let aggregator = Aggregator::from_config(&config)?;

    let info = aggregator.fetch(country).await?;
    let report = render(&info, &SystemClock)?;

    println!("{}", report.country);
    println!("{}", report.capital);
    println!("{}", report.weather);

    Ok(())
}

async fn news(country_code: &str) -> Result<()> {
    let config = Config::load()?;
    let api_key = config.require_api_key(ProviderId::NewsApi)?;

    let client = NewsApiClient::new(api_key.to_owned());
    let articles = client.top_headlines(country_code).await?;

    if articles.is_empty() {
        println!("No headlines found for '{country_code}'.");
        return Ok(());
    }

    for article in articles {
        println!("{}: {}", article.source, article.title);
        println!("  {}", article.url);
    }

    Ok(())
}
