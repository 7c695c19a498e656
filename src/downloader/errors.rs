// Error types for resolvers, strategies and the download session

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum DownloadError {
    /// Input is not an http(s) URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// URL does not belong to any supported platform
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// Requested format is not offered for this platform
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// Strategy or request did not finish in time
    #[error("Network timeout: provider is not responding")]
    NetworkTimeout,

    /// Transport-level failure (DNS, TLS, connection reset...)
    #[error("Network error: {0}")]
    Network(String),

    /// Provider answered with a non-success status
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),

    /// Provider answered but the body could not be understood
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Provider answered without the data we need
    #[error("No result: {0}")]
    NoResult(String),

    /// Strategy has nothing to offer for this platform
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// Attempt was abandoned by its caller
    #[error("Cancelled")]
    Cancelled,

    /// Final save step failed
    #[error("Save failed: {0}")]
    SaveFailed(String),

    #[error("I/O error: {0}")]
    Io(String),

    /// Session was driven out of order
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Smart detection of error types from free-form provider messages
impl From<String> for DownloadError {
    fn from(s: String) -> Self {
        let lower = s.to_lowercase();

        if lower.contains("timeout") || lower.contains("timed out") {
            return Self::NetworkTimeout;
        }

        if lower.contains("cancelled") || lower.contains("canceled") {
            return Self::Cancelled;
        }

        if lower.contains("parse") || lower.contains("json") {
            return Self::ParseError(s);
        }

        if lower.contains("invalid url") || lower.contains("unsupported url") {
            return Self::InvalidUrl(s);
        }

        if lower.contains("connection") || lower.contains("dns") || lower.contains("refused") {
            return Self::Network(s);
        }

        Self::Unknown(s)
    }
}

impl From<reqwest::Error> for DownloadError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::NetworkTimeout
        } else if let Some(status) = e.status() {
            Self::HttpStatus(status.as_u16())
        } else if e.is_decode() {
            Self::ParseError(e.to_string())
        } else if e.is_builder() {
            Self::InvalidUrl(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for DownloadError {
    fn from(e: serde_json::Error) -> Self {
        Self::ParseError(e.to_string())
    }
}

impl From<std::io::Error> for DownloadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_conversion_detects_timeout() {
        let err = DownloadError::from("operation timed out".to_string());
        assert!(matches!(err, DownloadError::NetworkTimeout));
    }

    #[test]
    fn test_string_conversion_detects_parse_errors() {
        let err = DownloadError::from("Invalid JSON at line 1".to_string());
        assert!(matches!(err, DownloadError::ParseError(_)));
    }

    #[test]
    fn test_string_conversion_falls_back_to_unknown() {
        let err = DownloadError::from("something odd".to_string());
        assert!(matches!(err, DownloadError::Unknown(_)));
    }
}
