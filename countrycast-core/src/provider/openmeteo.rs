use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::LookupError,
    model::WeatherForecast,
    provider::{ForecastSource, truncate_body},
};

const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,weathercode";

#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: Client,
    url: String,
    forecast_days: Option<u8>,
}

impl OpenMeteoClient {
    pub fn new(http: Client, url: String, forecast_days: Option<u8>) -> Self {
        Self {
            http,
            url,
            forecast_days,
        }
    }

    fn query(&self, latitude: f64, longitude: f64) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("timezone", "auto".to_string()),
        ];
        if let Some(days) = self.forecast_days {
            query.push(("forecast_days", days.to_string()));
        }
        query
    }
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    time: Vec<NaiveDate>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
    weathercode: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    daily: OmDaily,
}

/// Parse a forecast body into an aligned [`WeatherForecast`].
pub fn parse_forecast(body: &str) -> Result<WeatherForecast, LookupError> {
    let parsed: OmForecastResponse = serde_json::from_str(body)
        .map_err(|e| LookupError::MalformedForecast(e.to_string()))?;

    let daily = parsed.daily;
    WeatherForecast::new(
        daily.time,
        daily.temperature_2m_max,
        daily.temperature_2m_min,
        daily.weathercode,
    )
}

#[async_trait]
impl ForecastSource for OpenMeteoClient {
    async fn get_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherForecast, LookupError> {
        log::debug!("GET {} lat={latitude} lon={longitude}", self.url);

        let res = self
            .http
            .get(&self.url)
            .query(&self.query(latitude, longitude))
            .send()
            .await
            .map_err(|e| LookupError::WeatherTransport(e.to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| LookupError::WeatherTransport(format!("failed to read body: {e}")))?;

        if !status.is_success() {
            return Err(LookupError::WeatherStatus {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let forecast = parse_forecast(&body)?;
        log::debug!("Received {} forecast days", forecast.len());
        Ok(forecast)
    }
}
