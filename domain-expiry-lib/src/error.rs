//! Error handling for domain expiry lookups.
//!
//! Errors come in two tiers: per-domain errors, which are always contained
//! and turned into placeholder rows, and request-level errors (configuration
//! and the like), which are rendered as an error page.

use std::fmt;

/// Main error type for domain expiry operations.
#[derive(Debug, Clone)]
pub enum DomainExpiryError {
    /// Network-related errors (connection refused, DNS failure, etc.)
    NetworkError {
        message: String,
        source: Option<String>,
    },

    /// The WHOIS API answered with a non-success HTTP status
    ApiError {
        domain: String,
        message: String,
        status_code: Option<u16>,
    },

    /// The API response has no usable `expires` field
    MissingExpiry {
        domain: String,
    },

    /// The `expires` value cannot be turned into a date
    InvalidExpiry {
        domain: String,
        value: String,
    },

    /// JSON parsing errors for API responses
    ParseError {
        message: String,
    },

    /// Configuration errors (missing domain list, invalid settings, etc.)
    ConfigError {
        message: String,
    },

    /// File I/O errors when reading configuration files
    FileError {
        path: String,
        message: String,
    },

    /// Timeout errors when a lookup takes too long
    Timeout {
        operation: String,
        duration: std::time::Duration,
    },

    /// Generic internal errors that don't fit other categories
    Internal {
        message: String,
    },
}

impl DomainExpiryError {
    /// Create a new network error.
    pub fn network<M: Into<String>>(message: M) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new network error with source information.
    pub fn network_with_source<M: Into<String>, S: Into<String>>(message: M, source: S) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a new API error with HTTP status code.
    pub fn api_with_status<D: Into<String>, M: Into<String>>(
        domain: D,
        message: M,
        status_code: u16,
    ) -> Self {
        Self::ApiError {
            domain: domain.into(),
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Create a new missing-expiry error.
    pub fn missing_expiry<D: Into<String>>(domain: D) -> Self {
        Self::MissingExpiry {
            domain: domain.into(),
        }
    }

    /// Create a new invalid-expiry error.
    pub fn invalid_expiry<D: Into<String>, V: Into<String>>(domain: D, value: V) -> Self {
        Self::InvalidExpiry {
            domain: domain.into(),
            value: value.into(),
        }
    }

    /// Create a new parse error.
    pub fn parse<M: Into<String>>(message: M) -> Self {
        Self::ParseError {
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: std::time::Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for DomainExpiryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NetworkError { message, source } => {
                if let Some(source) = source {
                    write!(f, "Network error: {} (source: {})", message, source)
                } else {
                    write!(f, "Network error: {}", message)
                }
            }
            Self::ApiError {
                domain,
                message,
                status_code,
            } => {
                if let Some(code) = status_code {
                    write!(f, "WHOIS API error for '{}' (HTTP {}): {}", domain, code, message)
                } else {
                    write!(f, "WHOIS API error for '{}': {}", domain, message)
                }
            }
            Self::MissingExpiry { domain } => {
                write!(
                    f,
                    "API response for {} does not contain an \"expires\" field",
                    domain
                )
            }
            Self::InvalidExpiry { domain, value } => {
                write!(f, "Invalid expiry date format for {}: {}", domain, value)
            }
            Self::ParseError { message } => {
                write!(f, "Parse error: {}", message)
            }
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::Timeout {
                operation,
                duration,
            } => {
                write!(f, "Timeout after {:?} during: {}", duration, operation)
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for DomainExpiryError {}

impl From<reqwest::Error> for DomainExpiryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network_with_source("HTTP request timed out", err.to_string())
        } else if err.is_connect() {
            Self::network_with_source("Connection failed", err.to_string())
        } else if err.is_decode() {
            Self::parse(format!("Failed to decode API response: {}", err))
        } else {
            Self::network_with_source("HTTP request failed", err.to_string())
        }
    }
}

impl From<serde_json::Error> for DomainExpiryError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(format!("JSON parsing failed: {}", err))
    }
}

impl From<std::io::Error> for DomainExpiryError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(format!("I/O error: {}", err))
    }
}

impl From<askama::Error> for DomainExpiryError {
    fn from(err: askama::Error) -> Self {
        Self::internal(format!("Failed to render page: {}", err))
    }
}
