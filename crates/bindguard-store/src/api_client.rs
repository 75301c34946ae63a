use crate::{PodStore, Result, StoreError};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

/// Pod store backed by a Kubernetes-compatible API server
pub struct ApiPodStore {
    base_url: String,
    client: Client,
}

impl ApiPodStore {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Use a preconfigured client (TLS, auth headers, timeouts)
    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of a single pod, with namespace and name as escaped path segments
    fn pod_url(&self, namespace: &str, name: &str) -> Result<Url> {
        validate_path_segment("namespace", namespace)?;
        validate_path_segment("name", name)?;

        let mut url = Url::parse(&self.base_url).map_err(|e| {
            StoreError::transport_error(format!("invalid base URL {}: {}", self.base_url, e), Some(Box::new(e)))
        })?;
        url.path_segments_mut()
            .map_err(|_| StoreError::transport_error(format!("base URL {} cannot carry a path", self.base_url), None))?
            .pop_if_empty()
            .extend(["api", "v1", "namespaces", namespace, "pods", name]);
        Ok(url)
    }
}

/// Reject object names the API server could never serve as one path segment
fn validate_path_segment(field: &'static str, value: &str) -> Result<()> {
    let reason = match value {
        "" => "may not be empty",
        "." | ".." => "may not be '.' or '..'",
        _ if value.contains('/') => "may not contain '/'",
        _ if value.contains('%') => "may not contain '%'",
        _ => return Ok(()),
    };
    Err(StoreError::invalid_name(field, value, reason))
}

#[async_trait]
impl PodStore for ApiPodStore {
    /// GET /api/v1/namespaces/{namespace}/pods/{name}
    async fn get_pod(&self, namespace: &str, name: &str) -> Result<Pod> {
        let url = self.pod_url(namespace, name)?;
        debug!("GET {}", url);

        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::not_found(namespace, name));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::request_failed(status.as_u16(), body));
        }

        Ok(resp.json::<Pod>().await?)
    }
}
