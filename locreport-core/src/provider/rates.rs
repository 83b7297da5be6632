use std::collections::BTreeMap;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::model::CurrencyRate;
use crate::provider::truncate_body;

#[async_trait]
pub trait RatesClient: Send + Sync {
    /// Exchange rates: 1 unit of each requested code, in the base currency.
    async fn rates(&self, codes: &[String], base: &str) -> Result<Vec<CurrencyRate>>;
}

/// Exchange rates from the open.er-api.com endpoint. No API key required.
///
/// The endpoint quotes 1 unit of the path currency in every other
/// currency, so one request per requested code, picking out the base.
#[derive(Debug, Clone)]
pub struct ExchangeRateClient {
    http: Client,
}

impl ExchangeRateClient {
    pub fn new() -> Self {
        Self { http: Client::new() }
    }

    async fn rate_in_base(&self, code: &str, base: &str) -> Result<CurrencyRate> {
        let url = format!("https://open.er-api.com/v6/latest/{code}");

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to send rates request for {code}"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read rates response body for {code}"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "Rates request for {} failed with status {}: {}",
                code,
                status,
                truncate_body(&body),
            ));
        }

        let parsed: ErApiResponse =
            serde_json::from_str(&body).with_context(|| format!("Failed to parse rates JSON for {code}"))?;

        rate_from_response(parsed, code, base)
    }
}

impl Default for ExchangeRateClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RatesClient for ExchangeRateClient {
    async fn rates(&self, codes: &[String], base: &str) -> Result<Vec<CurrencyRate>> {
        let mut out = Vec::with_capacity(codes.len());
        for code in codes {
            out.push(self.rate_in_base(code, base).await?);
        }
        Ok(out)
    }
}

#[derive(Debug, Deserialize)]
struct ErApiResponse {
    result: String,
    /// Quoted currency -> rate. Numbers kept as decimal text so the
    /// renderer can round them exactly.
    #[serde(default)]
    rates: BTreeMap<String, serde_json::Number>,
}

fn rate_from_response(parsed: ErApiResponse, code: &str, base: &str) -> Result<CurrencyRate> {
    if parsed.result != "success" {
        return Err(anyhow!("Rates provider reported '{}' for {code}", parsed.result));
    }

    let rate = parsed
        .rates
        .get(base)
        .ok_or_else(|| anyhow!("Rates response for {code} does not quote {base}"))?;

    Ok(CurrencyRate { code: code.to_string(), rate: rate.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    const USD: &str = r#"{
        "result": "success",
        "base_code": "USD",
        "rates": { "USD": 1, "RUB": 90.255, "EUR": 0.92 }
    }"#;

    #[test]
    fn picks_base_currency_rate() {
        let parsed: ErApiResponse = serde_json::from_str(USD).unwrap();
        let rate = rate_from_response(parsed, "USD", "RUB").unwrap();

        assert_eq!(rate.code, "USD");
        assert_eq!(rate.rate, "90.255");
    }

    #[test]
    fn decimal_text_survives_deserialization() {
        // 73.005 has no exact f64 form; the text must come through untouched.
        let parsed: ErApiResponse =
            serde_json::from_str(r#"{ "result": "success", "rates": { "RUB": 73.005 } }"#).unwrap();
        let rate = rate_from_response(parsed, "EUR", "RUB").unwrap();

        assert_eq!(rate.rate, "73.005");
    }

    #[test]
    fn missing_base_is_an_error() {
        let parsed: ErApiResponse = serde_json::from_str(USD).unwrap();
        let err = rate_from_response(parsed, "USD", "XXX").unwrap_err();

        assert!(err.to_string().contains("does not quote XXX"));
    }

    #[test]
    fn provider_failure_is_an_error() {
        let parsed: ErApiResponse =
            serde_json::from_str(r#"{ "result": "error", "rates": {} }"#).unwrap();
        let err = rate_from_response(parsed, "USD", "RUB").unwrap_err();

        assert!(err.to_string().contains("reported 'error'"));
    }
}
