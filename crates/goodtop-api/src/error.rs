use thiserror::Error;

/// Top-level error type for the `goodtop-api` crate.
///
/// The snapshot path degrades every one of these to field defaults and the
/// mutation path degrades them to `false`, so callers mostly see this type
/// through `test_connection` and through debug logs.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The device answered with a status other than 200. The firmware never
    /// uses status codes meaningfully, so anything but 200 is a failure.
    #[error("Unexpected HTTP status: {status}")]
    UnexpectedStatus { status: u16 },
}

impl Error {
    /// Returns `true` if the underlying failure was a request timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_timeout())
    }

    /// Returns `true` for failures where the device was never reached.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Transport(e) if e.is_connect())
    }
}
