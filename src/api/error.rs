use thiserror::Error;

/// Errors reported by the fetch adapter. None of these are fatal: the caller
/// logs them and keeps the previous slot value.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FetchError {
    /// Transport-level failure (DNS, TLS, connection reset, ...).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    /// The body was not the JSON shape we expected.
    #[error("JSON decode error: {0}")]
    Decode(String),

    /// The configured base URL cannot carry endpoint paths.
    #[error("invalid endpoint URL: {0}")]
    Url(String),
}

impl From<simd_json::Error> for FetchError {
    fn from(err: simd_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
