use crate::error::LookupError;
use bindguard_core::ObjectKey;
use bindguard_store::PodStore;
use k8s_openapi::api::core::v1::Pod;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Cancellation and deadline of the request a lookup runs for
#[derive(Debug, Clone, Default)]
pub struct LookupContext {
    cancellation: CancellationToken,
    deadline: Option<Instant>,
}

impl LookupContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort the lookup when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Abort the lookup at `deadline`
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Abort the lookup once `timeout` has elapsed from now
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

/// Fetches the pod a Binding refers to
#[derive(Clone)]
pub struct PodResolver {
    store: Arc<dyn PodStore>,
}

impl PodResolver {
    pub fn new(store: Arc<dyn PodStore>) -> Self {
        Self { store }
    }

    /// Look up a pod, attempting the store exactly once
    pub async fn resolve(&self, ctx: &LookupContext, namespace: &str, name: &str) -> Result<Pod, LookupError> {
        let key = ObjectKey::new(namespace, name);
        debug!("Resolving pod {}", key);

        let lookup = async {
            let get = self.store.get_pod(namespace, name);
            match ctx.deadline {
                Some(deadline) => match tokio::time::timeout_at(deadline, get).await {
                    Ok(result) => result.map_err(|e| LookupError::store(key.to_string(), e)),
                    Err(_) => Err(LookupError::deadline_exceeded(key.to_string())),
                },
                None => get.await.map_err(|e| LookupError::store(key.to_string(), e)),
            }
        };

        let result = tokio::select! {
            biased;
            _ = ctx.cancellation.cancelled() => Err(LookupError::cancelled(key.to_string())),
            result = lookup => result,
        };

        if let Err(e) = &result {
            warn!("Pod lookup failed: {}", e);
        }
        result
    }
}
