// Allow unused assignments for diagnostic fields - they're used by the macros
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

/// Core error type for Bindguard operations
#[derive(Error, Debug, Diagnostic)]
pub enum BindguardError {
    /// Configuration could not be parsed
    #[error("Invalid configuration: {message}")]
    #[diagnostic(
        code(bindguard::invalid_config),
        help("Check that the hybrid scheduling section has 'enabled' and 'hostSchedulers' fields")
    )]
    InvalidConfig {
        #[allow(unused)]
        message: String,
        #[source]
        #[allow(unused)]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization error
    #[error("Serialization error: {message}")]
    #[diagnostic(
        code(bindguard::serialization_error),
        help("Ensure the resource format is valid JSON or YAML")
    )]
    SerializationError {
        #[allow(unused)]
        message: String,
        #[source]
        #[allow(unused)]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Invalid API version
    #[error("Invalid API version: {api_version}")]
    #[diagnostic(
        code(bindguard::invalid_api_version),
        help("Use a valid Kubernetes API version like 'v1' or 'apps/v1'")
    )]
    InvalidApiVersion {
        #[allow(unused)]
        api_version: String,
    },
}

/// Result type alias for Bindguard operations
pub type Result<T> = std::result::Result<T, BindguardError>;

impl BindguardError {
    /// Create an InvalidConfig error
    pub fn invalid_config(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::InvalidConfig {
            message: message.into(),
            source,
        }
    }

    /// Create a SerializationError
    pub fn serialization_error(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::SerializationError {
            message: message.into(),
            source,
        }
    }

    /// Create an InvalidApiVersion error
    pub fn invalid_api_version(api_version: impl Into<String>) -> Self {
        Self::InvalidApiVersion {
            api_version: api_version.into(),
        }
    }
}

/// Errors produced while turning raw bytes into a runtime object
#[derive(Error, Debug, Diagnostic)]
pub enum CodecError {
    /// Nothing to decode
    #[error("Empty request body")]
    #[diagnostic(
        code(codec::empty_payload),
        help("Send a JSON or YAML encoded object in the request body")
    )]
    EmptyPayload,

    /// Bytes are not valid JSON or YAML
    #[error("Malformed {format} payload: {message}")]
    #[diagnostic(
        code(codec::malformed_payload),
        help("Ensure the request body is valid JSON or YAML")
    )]
    Malformed {
        format: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Document parsed but is not a map
    #[error("Expected an object, found {found}")]
    #[diagnostic(
        code(codec::not_an_object),
        help("The request body must be a single object with apiVersion and kind")
    )]
    NotAnObject { found: String },

    /// Document does not match the schema of its kind
    #[error("Invalid {gvk} object: {message}")]
    #[diagnostic(
        code(codec::invalid_object),
        help("Check the object fields against the {gvk} schema")
    )]
    InvalidObject {
        gvk: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl CodecError {
    /// Create a Malformed error
    pub fn malformed(
        format: impl Into<String>,
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Malformed {
            format: format.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a NotAnObject error
    pub fn not_an_object(found: impl Into<String>) -> Self {
        Self::NotAnObject {
            found: found.into(),
        }
    }

    /// Create an InvalidObject error
    pub fn invalid_object(
        gvk: impl Into<String>,
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::InvalidObject {
            gvk: gvk.into(),
            message: message.into(),
            source,
        }
    }
}
