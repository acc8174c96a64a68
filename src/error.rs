use reqwest::StatusCode;
use thiserror::Error;



/// Reasons why a single price or rate could not be obtained.
///
/// None of these are fatal for the process. Updater treats every variant as
/// "no value" for the source in question.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("remote endpoint returned status: {0}")]
    Status(StatusCode),

    #[error("could not decode response as JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected response format, missing field `{0}`")]
    MissingField(String),

    #[error("provider reported unsuccessful response")]
    Rejected,

    #[error("value is not a positive number: {0}")]
    InvalidValue(f64),

    #[error("no API key configured, set {0}")]
    MissingCredentials(&'static str),
}



#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored record is not a valid snapshot: {0}")]
    Corrupt(serde_json::Error),

    #[error("could not encode snapshot: {0}")]
    Encode(serde_json::Error),
}



#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{name} has unsupported value `{value}`")]
    Unsupported { name: &'static str, value: String },

    #[error("{name} must be a positive integer, got `{value}`")]
    InvalidNumber { name: &'static str, value: String },
}
