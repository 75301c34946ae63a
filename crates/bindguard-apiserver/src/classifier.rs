use crate::request_info::RequestInfo;
use k8s_openapi::api::core::v1::Pod;
use k8s_openapi::Resource;

/// Resource name of pods
pub const PODS_RESOURCE: &str = "pods";

/// Subresource used to bind a pod to a node
pub const BINDING_SUBRESOURCE: &str = "binding";

/// Whether a request creates a binding for a pod
pub fn is_create_pod_binding_request(info: &RequestInfo) -> bool {
    if !info.is_resource_request {
        return false;
    }

    info.api_group == Pod::GROUP
        && info.api_version == Pod::VERSION
        && info.resource == PODS_RESOURCE
        && info.subresource == BINDING_SUBRESOURCE
        && info.verb == "create"
}
