//! Error types for the smartcab crate

use thiserror::Error;

/// Main error type for the smartcab crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A dimension value that the enumerated state space does not contain
    #[error("value '{value}' is outside the {dimension} domain")]
    Domain { dimension: String, value: String },

    /// A well-formed state that the value table was never built with
    #[error("state {state} is not in the value table")]
    KeyNotFound { state: String },

    #[error("invalid value for `{name}`: {value} (must be in the interval [{low}, {high}])")]
    OutOfInterval {
        name: &'static str,
        value: f64,
        low: f64,
        high: f64,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn domain(dimension: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Domain {
            dimension: dimension.into(),
            value: value.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }
}

/// Result alias with the crate [`Error`]
pub type Result<T> = std::result::Result<T, Error>;
