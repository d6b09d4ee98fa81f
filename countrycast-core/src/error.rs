use std::time::Duration;

use thiserror::Error;

/// Failures of the individual lookup steps.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Country dataset request failed: {0}")]
    DatasetLoad(String),

    #[error("Country dataset was not ready after {0:?}")]
    DatasetNotReady(Duration),

    #[error("Country not found: '{0}'")]
    NotFound(String),

    #[error("Country '{0}' has no known coordinates")]
    MissingCoordinates(String),

    #[error("Weather request failed with status {status}: {body}")]
    WeatherStatus { status: u16, body: String },

    #[error("Weather request failed: {0}")]
    WeatherTransport(String),

    #[error("Malformed weather payload: {0}")]
    MalformedForecast(String),
}

/// Generic message shown to the user for every failed submission.
pub const USER_FAILURE_MESSAGE: &str =
    "Something went wrong. Please check the country name and try again.";

/// Message shown when the submitted text is blank.
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter a valid country.";

/// Failure of a whole submission.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No country name entered")]
    EmptyInput,

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl PipelineError {
    /// The single user-facing alert for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            PipelineError::EmptyInput => EMPTY_INPUT_MESSAGE,
            PipelineError::Lookup(_) => USER_FAILURE_MESSAGE,
        }
    }
}
