use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API request failed: {status} {reason} ({endpoint})")]
    ApiStatus {
        status: u16,
        reason: String,
        endpoint: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid endpoint pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether a retry has a chance of succeeding
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Error::ApiStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_status_message() {
        let err = Error::ApiStatus {
            status: 404,
            reason: "Not Found".to_string(),
            endpoint: "/api/users/1/profile/".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API request failed: 404 Not Found (/api/users/1/profile/)"
        );
    }

    #[test]
    fn test_transient_statuses() {
        let status = |status| Error::ApiStatus {
            status,
            reason: String::new(),
            endpoint: String::new(),
        };
        assert!(status(503).is_transient());
        assert!(status(429).is_transient());
        assert!(!status(404).is_transient());
        assert!(!Error::Config("bad".into()).is_transient());
    }
}
