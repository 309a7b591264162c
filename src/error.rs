//! Error types shared by the session core.
//!
//! Every error that can reach more than one caller (a refresh outcome is fanned
//! out to all queued waiters) is `Clone`, so wrapped library errors are kept as
//! their rendered message.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure of the underlying HTTP primitive (connect, timeout, body read).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
    pub timed_out: bool,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: true,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout(format!("request timed out: {err}"))
        } else {
            Self::new(err.to_string())
        }
    }
}

/// Failure of a single token endpoint exchange.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExchangeError {
    #[error("token request failed ({}): {message}", describe_status(.status))]
    Network {
        status: Option<StatusCode>,
        message: String,
    },

    #[error("malformed token response: {0}")]
    Decode(String),
}

impl From<TransportError> for ExchangeError {
    fn from(err: TransportError) -> Self {
        ExchangeError::Network {
            status: None,
            message: err.message,
        }
    }
}

/// Failure to obtain a usable access token.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("no refresh token stored, sign in again")]
    NoRefreshToken,

    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    #[error("credential storage failed: {0}")]
    Storage(String),

    #[error("signed out while the request was waiting for a token")]
    SignedOut,

    #[error("token refresh was interrupted before completing")]
    Interrupted,
}

impl From<StorageError> for AuthError {
    fn from(err: StorageError) -> Self {
        AuthError::Storage(err.to_string())
    }
}

/// Failure of an authenticated Web API call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("not authenticated: {0}")]
    Unauthenticated(String),

    #[error("request failed ({}){}", describe_status(.status), describe_body(.body))]
    Transport {
        status: Option<StatusCode>,
        body: Option<String>,
    },

    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl From<TransportError> for RequestError {
    fn from(err: TransportError) -> Self {
        RequestError::Transport {
            status: None,
            body: Some(err.message),
        }
    }
}

fn describe_status(status: &Option<StatusCode>) -> String {
    status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "no response".into())
}

fn describe_body(body: &Option<String>) -> String {
    body.as_deref()
        .map(|b| format!(": {b}"))
        .unwrap_or_default()
}

/// Failure to read or write the persisted credential.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("credential file i/o: {0}")]
    Io(#[from] std::io::Error),

    #[error("credential file is not valid json: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value: {value}")]
    Invalid { var: &'static str, value: String },

    #[error("cannot load environment file: {0}")]
    Env(String),
}
