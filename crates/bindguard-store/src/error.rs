// Allow unused assignments for diagnostic fields - they're used by the macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Pod store error type
#[derive(Error, Debug, Diagnostic)]
pub enum StoreError {
    /// Pod not found
    #[error("pods \"{name}\" not found in namespace {namespace}")]
    #[diagnostic(
        code(store::not_found),
        help("Verify the pod exists before binding it to a node")
    )]
    NotFound { namespace: String, name: String },

    /// Namespace or name cannot be used as a URL path segment
    #[error("invalid {field} {value:?}: {reason}")]
    #[diagnostic(
        code(store::invalid_name),
        help("Pod names and namespaces may not be '.', '..' or contain '/' or '%'")
    )]
    InvalidName {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    /// The API server answered with a non-success status
    #[error("Request failed with status {status}: {message}")]
    #[diagnostic(
        code(store::request_failed),
        help("Check the API server logs for details")
    )]
    RequestFailed { status: u16, message: String },

    /// Transport-level failure
    #[error("HTTP request failed: {message}")]
    #[diagnostic(
        code(store::transport_error),
        help("Check that the API server is reachable at the configured URL")
    )]
    TransportError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Response body could not be parsed
    #[error("Failed to parse pod: {message}")]
    #[diagnostic(
        code(store::parse_error),
        help("Ensure the API server returns v1 Pod objects")
    )]
    ParseError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type for pod store operations
pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// Create a NotFound error
    pub fn not_found(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::NotFound {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Create an InvalidName error
    pub fn invalid_name(field: &'static str, value: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidName {
            field,
            value: value.into(),
            reason,
        }
    }

    /// Create a RequestFailed error
    pub fn request_failed(status: u16, message: impl Into<String>) -> Self {
        Self::RequestFailed {
            status,
            message: message.into(),
        }
    }

    /// Create a TransportError
    pub fn transport_error(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::TransportError {
            message: message.into(),
            source,
        }
    }

    /// Create a ParseError
    pub fn parse_error(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ParseError {
            message: message.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::parse_error(err.to_string(), Some(Box::new(err)))
        } else {
            StoreError::transport_error(err.to_string(), Some(Box::new(err)))
        }
    }
}
