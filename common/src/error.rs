//! Errors raised by collaborator service calls.

use thiserror::Error;

/// A failure talking to, or understanding, an upstream REST collaborator.
///
/// Procedures never match on the variants: at a stage boundary every
/// `ApiError` is uniformly rewrapped into the domain error type.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {endpoint} failed: {reason}")]
    Transport { endpoint: String, reason: String },
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    #[error("unexpected response from {endpoint}: {reason}")]
    Response { endpoint: String, reason: String },
}

impl ApiError {
    pub fn transport(endpoint: &str, reason: impl ToString) -> Self {
        ApiError::Transport {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn response(endpoint: &str, reason: impl ToString) -> Self {
        ApiError::Response {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }
}
