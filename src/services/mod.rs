pub mod narrative;
pub mod segmentation;

use thiserror::Error;

/// Errors from the external segmentation and LLM services. Single-attempt
/// calls: any failure surfaces to the client as a retryable condition, no
/// retry policy lives on this side.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Cannot reach service at {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Service returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Failed to parse service response: {0}")]
    ResponseParsing(String),

    #[error("HTTP client error: {0}")]
    Http(String),
}

pub(crate) fn map_reqwest_error(err: reqwest::Error, base_url: &str, timeout_secs: u64) -> ServiceError {
    if err.is_connect() {
        ServiceError::Connection(base_url.to_string())
    } else if err.is_timeout() {
        ServiceError::Timeout(timeout_secs)
    } else {
        ServiceError::Http(err.to_string())
    }
}
