//! Bindguard Core - Shared types for the pod binding scheduler guard
//!
//! This crate provides:
//! - Hybrid scheduling configuration
//! - Error types with miette diagnostics
//! - GroupVersionKind and object keys
//! - A universal decoder producing tagged runtime objects

pub mod codec;
pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use codec::{Codec, RuntimeObject, UniversalDecoder};
pub use config::HybridSchedulingConfig;
pub use error::{BindguardError, CodecError, Result};
pub use types::{GroupVersionKind, ObjectKey};

// Re-export k8s-openapi types for convenience
pub use k8s_openapi;
pub use k8s_openapi::api::core::v1::{Binding, ObjectReference, Pod, PodSpec};
pub use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// Read the declared scheduler name of a pod
///
/// A pod without a spec or without `schedulerName` reads as the empty string.
pub fn scheduler_name(pod: &Pod) -> &str {
    pod.spec
        .as_ref()
        .and_then(|spec| spec.scheduler_name.as_deref())
        .unwrap_or_default()
}
