//! Typed failures for requests against the dataframe service.

use thiserror::Error;

/// Everything that can go wrong between issuing a GET and holding a decoded
/// payload.
///
/// `Clone` so views can keep the last error around for the status bar.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Nothing answered at the target address (refused, DNS, unreachable).
    #[error("cannot reach {url}: {message}")]
    Connect { url: String, message: String },

    /// The server answered with a non-success status code.
    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },

    /// A configured timeout elapsed before the response completed.
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// The body arrived but is not the JSON shape we asked for.
    #[error("malformed response body: {0}")]
    Decode(String),

    /// The configured service root is not a usable http(s) URL.
    #[error("invalid service url {url:?}: {message}")]
    BadUrl { url: String, message: String },

    /// Any other transport-level failure.
    #[error("transport error: {0}")]
    Transport(String),
}

impl FetchError {
    /// Short label for the status bar.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connect { .. } => "unreachable",
            Self::Status { .. } => "http error",
            Self::Timeout { .. } => "timeout",
            Self::Decode(_) => "bad payload",
            Self::BadUrl { .. } => "bad url",
            Self::Transport(_) => "transport",
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
