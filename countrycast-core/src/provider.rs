use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, time::Duration};

use crate::{
    Config,
    error::LookupError,
    model::{CountryRecord, WeatherForecast},
};

pub mod openmeteo;
pub mod restcountries;

pub use openmeteo::OpenMeteoClient;
pub use restcountries::RestCountriesClient;

/// Source of the full country dataset.
#[async_trait]
pub trait CountrySource: Send + Sync + Debug {
    async fn fetch_all(&self) -> Result<Vec<CountryRecord>, LookupError>;
}

/// Source of daily forecasts for a coordinate pair.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn get_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherForecast, LookupError>;
}

/// Build the shared HTTP client used by both sources.
pub fn http_client(timeout: Duration) -> Result<Client, LookupError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("countrycast/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| LookupError::DatasetLoad(format!("could not build HTTP client: {e}")))
}

/// Construct both network sources from config.
pub fn sources_from_config(
    config: &Config,
) -> Result<(Box<dyn CountrySource>, Box<dyn ForecastSource>), LookupError> {
    let http = http_client(config.request_timeout())?;

    let countries = RestCountriesClient::new(http.clone(), config.countries_url.clone());
    let forecast = OpenMeteoClient::new(http, config.forecast_url.clone(), config.forecast_days);

    Ok((Box::new(countries), Box::new(forecast)))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

/// One-shot HTTP responder on a local port, for exercising the real clients.
#[cfg(test)]
pub(crate) async fn serve_once(status_line: &'static str, body: String) -> String {
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind local listener");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await;

        let response = format!(
            "HTTP/1.1 {status_line}\r\n\
             content-type: application/json\r\n\
             content-length: {}\r\n\
             connection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    });

    format!("http://{addr}")
}

#[cfg(test)]
pub(crate) fn direct_client() -> Client {
    Client::builder().no_proxy().build().expect("test client")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("not found"), "not found");
    }

    #[test]
    fn truncate_body_cuts_on_char_boundary() {
        let body = "é".repeat(150);
        let out = truncate_body(&body);

        assert!(out.ends_with("..."));
        assert!(out.len() <= 203);
    }

    #[test]
    fn sources_from_default_config_build() {
        let cfg = Config::default();
        assert!(sources_from_config(&cfg).is_ok());
    }
}
