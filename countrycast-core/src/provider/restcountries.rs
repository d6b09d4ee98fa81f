use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::{
    error::LookupError,
    model::{Coordinate, CountryRecord, Currency, NOT_AVAILABLE},
    provider::{CountrySource, truncate_body},
};

#[derive(Debug, Clone)]
pub struct RestCountriesClient {
    http: Client,
    url: String,
}

impl RestCountriesClient {
    pub fn new(http: Client, url: String) -> Self {
        Self { http, url }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RawName {
    pub common: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawFlags {
    pub png: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawCurrency {
    pub name: Option<String>,
    pub symbol: Option<String>,
}

/// One entry of the "all countries" payload, only the consumed fields.
#[derive(Debug, Default, Deserialize)]
pub struct RawCountry {
    #[serde(default)]
    pub name: Option<RawName>,
    #[serde(default)]
    pub flags: Option<RawFlags>,
    #[serde(default)]
    pub latlng: Vec<f64>,
    #[serde(default)]
    pub currencies: Option<BTreeMap<String, RawCurrency>>,
}

fn non_empty(value: Option<String>) -> String {
    value
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Map a raw dataset entry to its stable record form.
pub fn normalize(raw: RawCountry) -> CountryRecord {
    let name = non_empty(raw.name.and_then(|n| n.common));
    let flag_url = non_empty(raw.flags.and_then(|f| f.png));

    let currencies = raw
        .currencies
        .unwrap_or_default()
        .into_iter()
        .map(|(code, c)| Currency {
            code,
            name: c.name,
            symbol: c.symbol,
        })
        .collect();

    CountryRecord {
        name,
        flag_url,
        latitude: Coordinate::from_raw(raw.latlng.first().copied()),
        longitude: Coordinate::from_raw(raw.latlng.get(1).copied()),
        currencies,
    }
}

/// Parse and normalize a full dataset body.
pub fn parse_dataset(body: &str) -> Result<Vec<CountryRecord>, LookupError> {
    let raw: Vec<RawCountry> = serde_json::from_str(body)
        .map_err(|e| LookupError::DatasetLoad(format!("failed to parse country JSON: {e}")))?;

    Ok(raw.into_iter().map(normalize).collect())
}

#[async_trait]
impl CountrySource for RestCountriesClient {
    async fn fetch_all(&self) -> Result<Vec<CountryRecord>, LookupError> {
        log::debug!("GET {}", self.url);

        let res = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| LookupError::DatasetLoad(e.to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| LookupError::DatasetLoad(format!("failed to read body: {e}")))?;

        if !status.is_success() {
            return Err(LookupError::DatasetLoad(format!(
                "status {}: {}",
                status,
                truncate_body(&body)
            )));
        }

        parse_dataset(&body)
    }
}
