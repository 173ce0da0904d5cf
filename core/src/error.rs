//! Error types for the Trello client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the resource does not exist" from "the server returned an unexpected
//! status." All other non-2xx responses land in `Http` with the raw status
//! code and body for debugging. `UnsupportedMethod` is raised by dispatch
//! before any request leaves the process.

use thiserror::Error;

/// Errors returned by `ApiBase` dispatch and the resource clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP verb passed to dispatch is not one of GET/POST/PUT/DELETE.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The request never produced a response (DNS, connect, TLS, I/O).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The server returned 404: the requested resource does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The local record carries no identifier, so there is nothing to address.
    #[error("{0} has no id")]
    MissingId(&'static str),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Status code carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound => Some(404),
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_reported_for_server_errors_only() {
        assert_eq!(ApiError::NotFound.status(), Some(404));
        let err = ApiError::Http {
            status: 401,
            body: "invalid key".to_string(),
        };
        assert_eq!(err.status(), Some(401));
        assert_eq!(ApiError::Transport("refused".to_string()).status(), None);
    }

    #[test]
    fn display_includes_status_and_body() {
        let err = ApiError::Http {
            status: 400,
            body: "invalid value for idBoard".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 400: invalid value for idBoard");
        assert_eq!(
            ApiError::UnsupportedMethod("PATCH".to_string()).to_string(),
            "unsupported HTTP method: PATCH"
        );
    }
}
