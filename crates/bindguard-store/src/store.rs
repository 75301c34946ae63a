use crate::Result;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;

/// Read access to pods of the virtual cluster
///
/// Implementations are shared between concurrent requests, so lookups take
/// `&self` and must not hold locks across requests.
#[async_trait]
pub trait PodStore: Send + Sync {
    /// Fetch a single pod by namespace and name
    async fn get_pod(&self, namespace: &str, name: &str) -> Result<Pod>;
}

