//! CLI error types with miette diagnostics.
//!
//! Maps `goodtop_api::Error` into user-facing errors with actionable help
//! text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

/// Exit codes. Stable so embedding hosts can branch on them.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("No switch host configured")]
    #[diagnostic(
        code(goodtop::no_host),
        help("Pass --host (-H) or set the GOODTOP_HOST environment variable.")
    )]
    NoHost,

    #[error("Invalid switch host '{host}'")]
    #[diagnostic(
        code(goodtop::invalid_host),
        help("Use a bare address (192.168.200.11) or a full http:// URL.")
    )]
    InvalidHost {
        host: String,
        #[source]
        source: goodtop_api::Error,
    },

    #[error("Could not connect to switch at {url}")]
    #[diagnostic(
        code(goodtop::connection_failed),
        help(
            "Check that the switch is powered and reachable.\n\
             URL: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: goodtop_api::Error,
    },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(goodtop::timeout),
        help("Increase --timeout or check switch responsiveness.")
    )]
    Timeout { seconds: u64 },

    #[error("The switch rejected '{action}'")]
    #[diagnostic(
        code(goodtop::rejected),
        help(
            "The device answered but did not accept the change.\n\
             Check the credentials and re-run with -vv for the HTTP exchange."
        )
    )]
    Rejected { action: String },
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoHost | Self::InvalidHost { .. } => exit_code::USAGE,
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Rejected { .. } => exit_code::GENERAL,
        }
    }

    /// Classify an API error that surfaced while talking to `url`.
    pub fn from_api(err: goodtop_api::Error, url: &url::Url, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                seconds: timeout_secs,
            }
        } else {
            Self::ConnectionFailed {
                url: url.to_string(),
                source: err,
            }
        }
    }
}
