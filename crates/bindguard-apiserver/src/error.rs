// Allow unused assignments for diagnostic fields - they're used by the macros
#![allow(unused_assignments)]

use crate::response::StatusReason;
use axum::http::StatusCode;
use bindguard_core::CodecError;
use bindguard_store::StoreError;
use miette::Diagnostic;
use thiserror::Error;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    /// Internal server error (500)
    Internal(String),

    /// Method not allowed (405)
    MethodNotAllowed(String),
}

impl ApiError {
    /// HTTP status, Status reason and message of this error
    pub fn parts(&self) -> (StatusCode, StatusReason, String) {
        match self {
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                StatusReason::InternalError,
                format!("Internal error occurred: {}", msg),
            ),
            ApiError::MethodNotAllowed(msg) => (
                StatusCode::METHOD_NOT_ALLOWED,
                StatusReason::MethodNotAllowed,
                msg.clone(),
            ),
        }
    }
}

/// Failure to turn a request body into a Binding
#[derive(Error, Debug, Diagnostic)]
pub enum DecodeError {
    /// Codec could not parse the payload
    #[error("failed to decode Binding resource from request body: {source}")]
    #[diagnostic(
        code(apiserver::decode_failed),
        help("Send a v1 Binding encoded as JSON or YAML")
    )]
    Codec {
        #[from]
        source: CodecError,
    },

    /// Payload decoded as a different kind
    #[error("expected binding object, got {found}")]
    #[diagnostic(
        code(apiserver::wrong_type),
        help("The binding subresource only accepts {expected} objects")
    )]
    WrongType { expected: String, found: String },
}

/// Failure to fetch the pod named by a Binding
#[derive(Error, Debug, Diagnostic)]
pub enum LookupError {
    /// Store returned an error (including not found)
    #[error("failed to get pod {key}: {source}")]
    #[diagnostic(
        code(apiserver::lookup_failed),
        help("Check that the pod exists and the pod store is reachable")
    )]
    Store {
        key: String,
        #[source]
        source: StoreError,
    },

    /// Request was cancelled while the lookup was in flight
    #[error("failed to get pod {key}: request cancelled")]
    #[diagnostic(code(apiserver::lookup_cancelled))]
    Cancelled { key: String },

    /// Lookup did not finish before the request deadline
    #[error("failed to get pod {key}: deadline exceeded")]
    #[diagnostic(
        code(apiserver::lookup_deadline_exceeded),
        help("Increase the lookup timeout or check pod store latency")
    )]
    DeadlineExceeded { key: String },
}

impl LookupError {
    /// Create a Store error
    pub fn store(key: impl Into<String>, source: StoreError) -> Self {
        Self::Store {
            key: key.into(),
            source,
        }
    }

    /// Create a Cancelled error
    pub fn cancelled(key: impl Into<String>) -> Self {
        Self::Cancelled { key: key.into() }
    }

    /// Create a DeadlineExceeded error
    pub fn deadline_exceeded(key: impl Into<String>) -> Self {
        Self::DeadlineExceeded { key: key.into() }
    }
}
