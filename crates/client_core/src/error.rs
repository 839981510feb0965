use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("server url '{0}' cannot carry an API path")]
    UnsupportedBaseUrl(String),
    #[error("{operation} failed: HTTP error! status: {status}")]
    UnexpectedStatus {
        operation: String,
        status: StatusCode,
    },
    /// Transport failure or an unparseable response body.
    #[error("{operation} failed: {source}")]
    Http {
        operation: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ClientError {
    pub(crate) fn http(operation: &str, source: reqwest::Error) -> Self {
        Self::Http {
            operation: operation.to_string(),
            source,
        }
    }
}
