// Failure taxonomy for upstream API calls.
//
// Shape anomalies in a 2xx body are NOT errors — they normalize to empty
// results in `normalize`. These variants cover the cases where no usable
// body arrived at all.

use thiserror::Error;

/// What went wrong talking to the booru API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The host could not be reached, or the request timed out.
    #[error("could not reach the booru API: {0}")]
    Connection(#[source] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("booru API returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Anything else — an unparseable body, a broken response stream.
    #[error("unexpected booru API failure: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl ApiError {
    /// Classify a reqwest error. Timeouts count as connection failures:
    /// from the caller's perspective the host never answered.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            ApiError::Connection(err)
        } else {
            ApiError::Unexpected(err.into())
        }
    }
}
