use crate::{PodStore, Result, StoreError};
use async_trait::async_trait;
use bindguard_core::ObjectKey;
use k8s_openapi::api::core::v1::Pod;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory pod store
///
/// Backs a cached view of the virtual cluster's pods. Pods are keyed by
/// their metadata namespace and name.
#[derive(Clone, Default)]
pub struct MemoryPodStore {
    pods: Arc<RwLock<HashMap<ObjectKey, Pod>>>,
}

impl MemoryPodStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a pod, returning the previous one
    pub async fn insert(&self, pod: Pod) -> Option<Pod> {
        let key = ObjectKey::new(
            pod.metadata.namespace.clone().unwrap_or_default(),
            pod.metadata.name.clone().unwrap_or_default(),
        );
        debug!("Caching pod {}", key);
        self.pods.write().await.insert(key, pod)
    }

    /// Remove a pod
    pub async fn remove(&self, namespace: &str, name: &str) -> Option<Pod> {
        self.pods
            .write()
            .await
            .remove(&ObjectKey::new(namespace, name))
    }

    pub async fn len(&self) -> usize {
        self.pods.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.pods.read().await.is_empty()
    }
}

#[async_trait]
impl PodStore for MemoryPodStore {
    async fn get_pod(&self, namespace: &str, name: &str) -> Result<Pod> {
        self.pods
            .read()
            .await
            .get(&ObjectKey::new(namespace, name))
            .cloned()
            .ok_or_else(|| StoreError::not_found(namespace, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_pod(namespace: &str, name: &str, scheduler: &str) -> Pod {
        let mut pod = Pod::default();
        pod.metadata.name = Some(name.to_string());
        pod.metadata.namespace = Some(namespace.to_string());
        pod.spec = Some(Default::default());
        pod.spec.as_mut().unwrap().scheduler_name = Some(scheduler.to_string());
        pod
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let store = MemoryPodStore::new();
        assert!(store.is_empty().await);

        store.insert(make_pod("default", "nginx", "default-scheduler")).await;
        let pod = store.get_pod("default", "nginx").await.unwrap();
        assert_eq!(pod.metadata.name.as_deref(), Some("nginx"));

        // Same name, different namespace
        assert!(matches!(
            store.get_pod("kube-system", "nginx").await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_replace_and_remove() {
        let store = MemoryPodStore::new();
        store.insert(make_pod("default", "nginx", "a")).await;
        let previous = store.insert(make_pod("default", "nginx", "b")).await;
        assert!(previous.is_some());
        assert_eq!(store.len().await, 1);

        let pod = store.get_pod("default", "nginx").await.unwrap();
        assert_eq!(bindguard_core::scheduler_name(&pod), "b");

        assert!(store.remove("default", "nginx").await.is_some());
        assert!(store.get_pod("default", "nginx").await.is_err());
    }

    #[tokio::test]
    async fn test_not_found_message() {
        let store = MemoryPodStore::new();
        let err = store.get_pod("default", "missing").await.unwrap_err();
        assert_eq!(err.to_string(), "pods \"missing\" not found in namespace default");
    }
}
