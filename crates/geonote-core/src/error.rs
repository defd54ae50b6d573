//! Error types shared by the GeoNote crates.
//!
//! Every fatal error ends up as an `AppError`. Its `Display` output is for
//! logs; `user_message()` is the short phrase shown to the user.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Every positioning strategy failed.
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("Note error: {0}")]
    Note(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Never includes provider or OS error text.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::LocationUnavailable(_) => "Failed to get location",
            AppError::Note(_) => "Could not update the note. Is its frontmatter valid YAML?",
            AppError::Io(_) => "Could not read or write the file.",
            AppError::Other(_) => "Something went wrong. Run with RUST_LOG=debug for details.",
        }
    }
}

/// HTTP failures from the lookup services
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => "Could not reach the lookup service.",
            NetworkError::Timeout => "The lookup service did not answer in time.",
            NetworkError::ServerError { status: 429, .. } => {
                "The lookup service is rate limiting requests. Wait a moment."
            }
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The lookup service is having problems."
            }
            NetworkError::ServerError { .. } => "The lookup service rejected the request.",
            NetworkError::InvalidResponse(_) => "The lookup service sent an unexpected answer.",
        }
    }
}

/// References to templates, places or formats that do not exist
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("Unknown place: {0}")]
    UnknownPlace(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::UnknownFormat(_) => "No built-in format or template has that id.",
            ConfigError::UnknownTemplate(_) => "No template has that id.",
            ConfigError::UnknownPlace(_) => "No saved place has that id.",
        }
    }
}

/// Classify a reqwest failure.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        let message = self.to_string();
        if self.is_timeout() {
            return NetworkError::Timeout;
        }
        match self.status() {
            Some(status) => NetworkError::ServerError {
                status: status.as_u16(),
                message,
            },
            None if self.is_decode() => NetworkError::InvalidResponse(message),
            None => NetworkError::ConnectionFailed(message),
        }
    }
}
