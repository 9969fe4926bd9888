// src/domain/errors.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Broker error: {0}")]
    Broker(#[from] BrokerError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failures of the session/broker round trip.
#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("Session token unavailable at {}: {reason}", .path.display())]
    TokenUnavailable { path: PathBuf, reason: String },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Order rejected ({kind}): {message}")]
    OrderRejected { kind: String, message: String },

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl BrokerError {
    pub fn rejected(kind: impl Into<String>, message: impl Into<String>) -> Self {
        BrokerError::OrderRejected {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl From<hyper::Error> for BrokerError {
    fn from(e: hyper::Error) -> Self {
        BrokerError::Transport(e.to_string())
    }
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
pub type BrokerResult<T> = Result<T, BrokerError>;
