//! Bindguard Store - Pod lookup clients
//!
//! This crate provides:
//! - PodStore trait for point lookups of pods
//! - In-memory store for cached clients and tests
//! - HTTP client against a Kubernetes-compatible API server

pub mod api_client;
pub mod error;
pub mod memory;
pub mod store;

// Re-export commonly used types
pub use api_client::ApiPodStore;
pub use error::{Result, StoreError};
pub use memory::MemoryPodStore;
pub use store::PodStore;
