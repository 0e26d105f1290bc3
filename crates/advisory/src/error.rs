//! Error types for outbound provider calls.

use thiserror::Error;

/// Failures talking to an external provider.
///
/// These never reach HTTP clients. The gateway logs them and answers with a
/// fixed user-facing message instead.
#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("provider returned status {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("failed to parse provider response: {0}")]
    Parse(String),
}
