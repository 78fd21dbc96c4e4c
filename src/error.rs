use thiserror::Error;

/// Errors that can occur while scraping listing and recipe pages
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Network failure, timeout or unreadable body
    #[error("Failed to fetch URL: {0}")]
    Fetch(#[from] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// A URL could not be built or resolved
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A configured CSS selector does not compile
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// Output file could not be written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output could not be serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl ScrapeError {
    /// Whether the error came from retrieving a page (network or non-2xx status).
    ///
    /// Only these are worth another attempt; the rest fail the same way again.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, ScrapeError::Fetch(_) | ScrapeError::Status { .. })
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status(status: u16) -> ScrapeError {
        ScrapeError::Status {
            url: "https://example.com".to_string(),
            status,
        }
    }

    #[test]
    fn test_any_status_is_a_fetch_failure() {
        assert!(status(500).is_fetch_failure());
        assert!(status(429).is_fetch_failure());
        assert!(status(404).is_fetch_failure());
        assert!(status(403).is_fetch_failure());
    }

    #[test]
    fn test_local_errors_are_not_fetch_failures() {
        assert!(!ScrapeError::InvalidSelector {
            selector: "[".to_string(),
            reason: "bad".to_string(),
        }
        .is_fetch_failure());
        assert!(!ScrapeError::InvalidUrl {
            url: "::".to_string(),
            reason: "bad".to_string(),
        }
        .is_fetch_failure());
    }

    #[test]
    fn test_status_message() {
        assert_eq!(status(404).to_string(), "HTTP 404 from https://example.com");
    }
}
