//! Railway client error types.

/// Errors from an availability lookup.
///
/// `EmptyResult` is a valid negative answer rather than a failure; callers
/// render it as "no trains found". Use [`FetchError::is_transient`] to tell
/// the genuine failures apart.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed (connection refused, timeout, TLS, ...)
    #[error("HTTP error: {0}")]
    Network(#[from] reqwest::Error),

    /// Token rejected by the API
    #[error("unauthorized: check RAILWAY_API_TOKEN")]
    Unauthorized,

    /// API returned a non-success status code
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body was not the JSON we expected
    #[error("JSON parse error: {message}")]
    Decode {
        message: String,
        body: Option<String>,
    },

    /// API answered but flagged the request as failed (`hasError`)
    #[error("railway API reported an error")]
    Rejected,

    /// API answered successfully with zero trains
    #[error("no trains found")]
    EmptyResult,

    /// Client or fixture setup problem
    #[error("not configured: {0}")]
    NotConfigured(String),
}

impl FetchError {
    /// Whether this is a real failure, as opposed to an empty result.
    pub fn is_transient(&self) -> bool {
        !matches!(self, FetchError::EmptyResult)
    }
}
