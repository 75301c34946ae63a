//! Request metadata derived from Kubernetes API paths
//!
//! Paths look like:
//! - `/api/{version}/namespaces/{namespace}/{resource}/{name}/{subresource}`
//! - `/apis/{group}/{version}/{resource}/{name}`
//! - `/api/{version}/watch/{resource}` (deprecated watch form)
//!
//! Anything outside `/api` and `/apis` is a non-resource request.

use axum::extract::{Query, Request};
use axum::http::{Method, Uri};
use serde::Deserialize;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::debug;

/// Namespace subresources that stay attached to the namespace resource
const NAMESPACE_SUBRESOURCES: &[&str] = &["status", "finalize"];

/// Verbs that may be given as a path segment
const SPECIAL_VERBS: &[&str] = &["proxy", "watch"];

/// Metadata describing what an API request targets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestInfo {
    /// Whether the path addresses an API resource
    pub is_resource_request: bool,
    pub path: String,
    /// Kubernetes verb (create, get, list, watch, update, patch, delete, ...)
    pub verb: String,
    pub api_prefix: String,
    pub api_group: String,
    pub api_version: String,
    pub namespace: String,
    pub resource: String,
    pub subresource: String,
    pub name: String,
    /// Path segments from the resource onwards
    pub parts: Vec<String>,
}

/// Query parameters relevant to verb resolution
#[derive(Debug, Deserialize, Default)]
struct ListParams {
    /// Set to "true" or "1" to enable watch mode
    watch: Option<String>,
}

impl ListParams {
    fn from_uri(uri: &Uri) -> Self {
        Query::<ListParams>::try_from_uri(uri)
            .map(|Query(params)| params)
            .unwrap_or_default()
    }

    fn is_watch(&self) -> bool {
        self.watch
            .as_deref()
            .is_some_and(|v| v == "true" || v == "1")
    }
}

impl RequestInfo {
    /// Resolve request metadata from the method and URI
    pub fn resolve(method: &Method, uri: &Uri) -> Self {
        let path = uri.path();
        let non_resource = || RequestInfo {
            is_resource_request: false,
            path: path.to_string(),
            verb: method.as_str().to_lowercase(),
            ..Default::default()
        };

        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        if segments.len() < 3 {
            return non_resource();
        }

        let mut info = RequestInfo {
            path: path.to_string(),
            api_prefix: segments[0].to_string(),
            ..Default::default()
        };

        let mut parts = match segments[0] {
            "api" => &segments[1..],
            "apis" => {
                if segments.len() < 4 {
                    return non_resource();
                }
                info.api_group = segments[1].to_string();
                &segments[2..]
            }
            _ => return non_resource(),
        };

        info.is_resource_request = true;
        info.api_version = parts[0].to_string();
        parts = &parts[1..];

        if SPECIAL_VERBS.contains(&parts[0]) {
            if parts.len() < 2 {
                return non_resource();
            }
            info.verb = parts[0].to_string();
            parts = &parts[1..];
        } else {
            info.verb = verb_for_method(method).to_string();
        }

        if parts[0] == "namespaces" && parts.len() > 1 {
            info.namespace = parts[1].to_string();
            if parts.len() > 2 && !NAMESPACE_SUBRESOURCES.contains(&parts[2]) {
                parts = &parts[2..];
            }
        }

        info.parts = parts.iter().map(|s| s.to_string()).collect();
        info.resource = parts[0].to_string();
        if let Some(name) = parts.get(1) {
            info.name = name.to_string();
        }
        if info.verb != "proxy" {
            if let Some(subresource) = parts.get(2) {
                info.subresource = subresource.to_string();
            }
        }

        if info.name.is_empty() {
            match info.verb.as_str() {
                "get" if ListParams::from_uri(uri).is_watch() => info.verb = "watch".to_string(),
                "get" => info.verb = "list".to_string(),
                "delete" => info.verb = "deletecollection".to_string(),
                _ => {}
            }
        }

        info
    }
}

fn verb_for_method(method: &Method) -> &'static str {
    match *method {
        Method::POST => "create",
        Method::GET | Method::HEAD => "get",
        Method::PUT => "update",
        Method::PATCH => "patch",
        Method::DELETE => "delete",
        _ => "",
    }
}

/// Layer that attaches [`RequestInfo`] to every request's extensions
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestInfoLayer;

impl<S> Layer<S> for RequestInfoLayer {
    type Service = RequestInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestInfoService { inner }
    }
}

/// Service produced by [`RequestInfoLayer`]
#[derive(Debug, Clone)]
pub struct RequestInfoService<S> {
    inner: S,
}

impl<S> Service<Request> for RequestInfoService<S>
where
    S: Service<Request>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let info = RequestInfo::resolve(req.method(), req.uri());
        debug!(
            "{} {} resolved to verb={} resource={} subresource={}",
            req.method(),
            info.path,
            info.verb,
            info.resource,
            info.subresource
        );
        req.extensions_mut().insert(info);
        self.inner.call(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(method: Method, uri: &'static str) -> RequestInfo {
        RequestInfo::resolve(&method, &Uri::from_static(uri))
    }

    #[test]
    fn test_pod_binding() {
        let info = resolve(Method::POST, "/api/v1/namespaces/default/pods/nginx/binding");
        assert!(info.is_resource_request);
        assert_eq!(info.api_prefix, "api");
        assert_eq!(info.api_group, "");
        assert_eq!(info.api_version, "v1");
        assert_eq!(info.namespace, "default");
        assert_eq!(info.resource, "pods");
        assert_eq!(info.name, "nginx");
        assert_eq!(info.subresource, "binding");
        assert_eq!(info.verb, "create");
        assert_eq!(info.parts, vec!["pods", "nginx", "binding"]);
    }

    #[test]
    fn test_grouped_resources() {
        let info = resolve(Method::PUT, "/apis/apps/v1/namespaces/default/deployments/web");
        assert_eq!(info.api_prefix, "apis");
        assert_eq!(info.api_group, "apps");
        assert_eq!(info.api_version, "v1");
        assert_eq!(info.resource, "deployments");
        assert_eq!(info.name, "web");
        assert_eq!(info.verb, "update");

        let info = resolve(Method::GET, "/apis/storage.k8s.io/v1/storageclasses");
        assert_eq!(info.api_group, "storage.k8s.io");
        assert_eq!(info.namespace, "");
        assert_eq!(info.verb, "list");
    }

    #[test]
    fn test_collection_verbs() {
        assert_eq!(resolve(Method::GET, "/api/v1/namespaces/default/pods").verb, "list");
        assert_eq!(
            resolve(Method::GET, "/api/v1/namespaces/default/pods?watch=true").verb,
            "watch"
        );
        assert_eq!(resolve(Method::GET, "/api/v1/pods?watch=1").verb, "watch");
        assert_eq!(
            resolve(Method::DELETE, "/api/v1/namespaces/default/pods").verb,
            "deletecollection"
        );
        assert_eq!(resolve(Method::GET, "/api/v1/namespaces/default/pods/nginx").verb, "get");
    }

    #[test]
    fn test_special_verbs() {
        let info = resolve(Method::GET, "/api/v1/watch/namespaces/default/pods");
        assert_eq!(info.verb, "watch");
        assert_eq!(info.namespace, "default");
        assert_eq!(info.resource, "pods");

        let info = resolve(Method::GET, "/api/v1/proxy/namespaces/default/pods/nginx/healthz");
        assert_eq!(info.verb, "proxy");
        assert_eq!(info.name, "nginx");
        assert_eq!(info.subresource, "");
    }

    #[test]
    fn test_namespace_resource() {
        let info = resolve(Method::GET, "/api/v1/namespaces/kube-system");
        assert_eq!(info.resource, "namespaces");
        assert_eq!(info.name, "kube-system");
        assert_eq!(info.namespace, "kube-system");

        let info = resolve(Method::PUT, "/api/v1/namespaces/kube-system/finalize");
        assert_eq!(info.resource, "namespaces");
        assert_eq!(info.subresource, "finalize");
    }

    #[test]
    fn test_non_resource_requests() {
        for (method, uri) in [
            (Method::GET, "/healthz"),
            (Method::GET, "/api"),
            (Method::GET, "/api/v1"),
            (Method::GET, "/apis/apps/v1"),
            (Method::POST, "/openapi/v2/spec"),
            (Method::GET, "/api/v1/watch"),
        ] {
            let info = RequestInfo::resolve(&method, &Uri::from_static(uri));
            assert!(!info.is_resource_request, "{} should be non-resource", uri);
            assert_eq!(info.verb, method.as_str().to_lowercase());
        }
    }
}
