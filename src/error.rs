//! Error types for user-digest
//!
//! Every fetch returns a [`Result`]; a failed request never travels through the
//! pipeline disguised as a record. The variants separate "the resource does not
//! exist" from "the request failed" from "the response was unusable", so the
//! aggregator can decide per call whether a failure is fatal or skippable.

use thiserror::Error;

/// Result type alias for user-digest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for user-digest
#[derive(Debug, Error)]
pub enum Error {
    /// The requested id yielded zero records
    #[error("{resource} {id} not found")]
    NotFound {
        /// Kind of resource that was requested (e.g., "user")
        resource: &'static str,
        /// The id that matched nothing
        id: u64,
    },

    /// Network or connection failure, including timeouts
    #[error("transport error fetching {url}: {message}")]
    Transport {
        /// The URL being fetched
        url: String,
        /// Message from the underlying HTTP client
        message: String,
    },

    /// The server answered with a non-success status code
    #[error("HTTP {status} from {url}")]
    Status {
        /// The URL being fetched
        url: String,
        /// HTTP status code returned by the server
        status: u16,
    },

    /// Response body was not valid JSON or lacked expected fields
    #[error("failed to decode response from {url}: {message}")]
    Decode {
        /// The URL whose body could not be decoded
        url: String,
        /// Message from the JSON decoder
        message: String,
    },

    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "base_url")
        key: Option<String>,
    },

    /// I/O error (config file, report output)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The aggregation pass was cancelled before it finished
    #[error("aggregation cancelled")]
    Cancelled,
}

impl Error {
    /// Build a [`Error::Transport`] from a reqwest failure, keeping the timeout
    /// and connect cases distinguishable in the message.
    pub fn transport(url: &str, err: &reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("request timed out: {}", err)
        } else if err.is_connect() {
            format!("connection failed: {}", err)
        } else {
            err.to_string()
        };
        Error::Transport {
            url: url.to_string(),
            message,
        }
    }

    /// Build a [`Error::Decode`] for the given URL
    pub fn decode(url: &str, message: impl std::fmt::Display) -> Self {
        Error::Decode {
            url: url.to_string(),
            message: message.to_string(),
        }
    }

    /// Machine-readable error code, used as a structured log field
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::NotFound { .. } => "not_found",
            Error::Transport { .. } => "transport_error",
            Error::Status { .. } => "http_status",
            Error::Decode { .. } => "decode_error",
            Error::Config { .. } => "config_error",
            Error::Io(_) => "io_error",
            Error::Cancelled => "cancelled",
        }
    }

    /// Whether a per-id lookup may drop this failure and carry on.
    ///
    /// Lookup failures (missing record, transport, status, decode) only affect
    /// the one record. Cancellation, configuration and local I/O failures affect
    /// the whole pass and must propagate.
    pub fn is_skippable(&self) -> bool {
        match self {
            Error::NotFound { .. }
            | Error::Transport { .. }
            | Error::Status { .. }
            | Error::Decode { .. } => true,
            Error::Config { .. } | Error::Io(_) | Error::Cancelled => false,
        }
    }
}
