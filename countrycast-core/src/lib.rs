//! Core library for the `countrycast` CLI.
//!
//! This crate defines:
//! - The normalized country dataset and its case-insensitive resolver
//! - Abstraction over the country and forecast sources
//! - Travel tip and icon selection by temperature band
//! - Pure rendering of results into a view tree
//!
//! It is used by `countrycast-cli`, but can also be reused by other binaries or services.

pub mod catalog;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod render;
pub mod tip;
pub mod view;
pub mod weather_code;

pub use catalog::CountryCatalog;
pub use config::{Config, IconPaths};
pub use error::{LookupError, PipelineError};
pub use model::{Coordinate, CountryDetails, CountryRecord, Currency, WeatherForecast};
pub use pipeline::{Pipeline, Submission};
pub use provider::{CountrySource, ForecastSource};
pub use render::{DayLabels, PageView, RenderOptions};
