//! Unified SDK error types.

use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// HTTP-layer errors.
///
/// Exchange-reported errors keep the original `code`/`msg` untouched so
/// callers can react to Binance's own error taxonomy.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// The exchange rejected the request with a structured error body.
    #[error("Binance error {code} (HTTP {status}): {msg}")]
    Api { status: u16, code: i64, msg: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Rate limited (HTTP {status}): {body}")]
    RateLimited { status: u16, body: String },

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },
}

/// Client configuration errors — raised at construction or resolution time,
/// never retried.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unknown API category: {0}")]
    UnknownCategory(String),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Missing configuration: {0}")]
    MissingOption(&'static str),
}

/// Authentication errors.
#[derive(Error, Debug)]
pub enum AuthError {
    /// A private endpoint was called without API key + secret. Raised before
    /// any network I/O.
    #[error("Private endpoint requires API key and secret")]
    MissingCredentials,
}
