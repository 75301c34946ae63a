//! Bindguard API Server - Pod binding scheduler check
//!
//! This crate provides:
//! - Request info resolution for Kubernetes API paths
//! - Classification of pod binding requests
//! - Binding decoding and pod lookup
//! - Host scheduler policy
//! - A tower layer refusing bindings for host-scheduled pods
//! - Negotiated Kubernetes Status responses

pub mod classifier;
pub mod decoder;
pub mod error;
pub mod filter;
pub mod policy;
pub mod request_info;
pub mod resolver;
pub mod response;
pub mod server;
pub mod state;

// Re-export commonly used types
pub use error::{ApiError, DecodeError, LookupError};
pub use filter::{FilterConfig, PodSchedulerCheck, PodSchedulerCheckLayer};
pub use policy::Decision;
pub use request_info::{RequestInfo, RequestInfoLayer};
pub use resolver::{LookupContext, PodResolver};
pub use server::guard;
pub use state::FilterState;
