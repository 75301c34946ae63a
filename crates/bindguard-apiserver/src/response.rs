use crate::ApiError;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::Status;
use tracing::error;

const APPLICATION_JSON: &str = "application/json";
const APPLICATION_YAML: &str = "application/yaml";

/// Machine-readable reason carried by a failure Status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusReason {
    InternalError,
    MethodNotAllowed,
}

impl StatusReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusReason::InternalError => "InternalError",
            StatusReason::MethodNotAllowed => "MethodNotAllowed",
        }
    }
}

/// Serialization picked for a response body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Json,
    Yaml,
}

impl MediaType {
    /// Pick the supported media type with the highest q-value from an Accept header
    ///
    /// Ties go to the earlier range. Wildcards, unsupported types (e.g.
    /// protobuf) and a missing header all fall back to JSON.
    pub fn negotiate(accept: Option<&HeaderValue>) -> Self {
        let Some(accept) = accept.and_then(|v| v.to_str().ok()) else {
            return MediaType::Json;
        };

        let mut best: Option<(MediaType, f32)> = None;
        for range in accept.split(',') {
            let mut params = range.split(';').map(str::trim);
            let media_type = match params.next() {
                Some(APPLICATION_JSON | "application/*" | "*/*") => MediaType::Json,
                Some(APPLICATION_YAML) => MediaType::Yaml,
                _ => continue,
            };
            let quality = params
                .filter_map(|param| param.strip_prefix("q="))
                .find_map(|q| q.parse::<f32>().ok())
                .unwrap_or(1.0);

            // q=0 means "not acceptable"
            if quality <= 0.0 {
                continue;
            }
            if best.map_or(true, |(_, q)| quality > q) {
                best = Some((media_type, quality));
            }
        }

        best.map_or(MediaType::Json, |(media_type, _)| media_type)
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            MediaType::Json => APPLICATION_JSON,
            MediaType::Yaml => APPLICATION_YAML,
        }
    }
}

/// Build a failure Status object for an error
pub fn failure_status(err: &ApiError) -> Status {
    let (code, reason, message) = err.parts();
    Status {
        code: Some(i32::from(code.as_u16())),
        message: Some(message),
        reason: Some(reason.as_str().to_string()),
        status: Some("Failure".to_string()),
        ..Default::default()
    }
}

/// Create a failure Status response, serialized per the Accept header
pub fn status_failure(err: &ApiError, accept: Option<&HeaderValue>) -> Response {
    let (code, _, _) = err.parts();
    let media_type = MediaType::negotiate(accept);
    let status = failure_status(err);

    let body = match media_type {
        MediaType::Json => serde_json::to_vec(&status).map_err(|e| e.to_string()),
        MediaType::Yaml => serde_yaml::to_string(&status)
            .map(String::into_bytes)
            .map_err(|e| e.to_string()),
    };

    match body {
        Ok(body) => (code, [(CONTENT_TYPE, media_type.content_type())], body).into_response(),
        Err(e) => {
            error!("Failed to serialize Status response: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, e).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_negotiate() {
        let negotiate = |v: &'static str| MediaType::negotiate(Some(&HeaderValue::from_static(v)));

        assert_eq!(MediaType::negotiate(None), MediaType::Json);
        assert_eq!(negotiate("application/yaml"), MediaType::Yaml);
        assert_eq!(negotiate("application/json;q=0.9"), MediaType::Json);
        assert_eq!(
            negotiate("application/vnd.kubernetes.protobuf, application/yaml"),
            MediaType::Yaml
        );
        assert_eq!(negotiate("application/vnd.kubernetes.protobuf"), MediaType::Json);
        assert_eq!(negotiate("*/*"), MediaType::Json);
    }

    #[test]
    fn test_negotiate_quality() {
        let negotiate = |v: &'static str| MediaType::negotiate(Some(&HeaderValue::from_static(v)));

        assert_eq!(negotiate("application/json;q=0.1, application/yaml"), MediaType::Yaml);
        assert_eq!(negotiate("application/yaml; q=0.5, application/json; q=0.8"), MediaType::Json);
        assert_eq!(negotiate("application/yaml, application/json"), MediaType::Yaml);
        assert_eq!(negotiate("application/json, application/yaml"), MediaType::Json);
        assert_eq!(negotiate("application/yaml;q=0, */*;q=0.1"), MediaType::Json);
        assert_eq!(negotiate("application/yaml;q=0"), MediaType::Json);
    }

    #[tokio::test]
    async fn test_status_failure_json() {
        let err = ApiError::MethodNotAllowed("not here".to_string());
        let response = status_failure(&err, None);

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[CONTENT_TYPE], APPLICATION_JSON);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["kind"], "Status");
        assert_eq!(json["apiVersion"], "v1");
        assert_eq!(json["status"], "Failure");
        assert_eq!(json["reason"], "MethodNotAllowed");
        assert_eq!(json["message"], "not here");
        assert_eq!(json["code"], 405);
    }

    #[tokio::test]
    async fn test_status_failure_yaml() {
        let err = ApiError::Internal("boom".to_string());
        let accept = HeaderValue::from_static("application/yaml");
        let response = status_failure(&err, Some(&accept));

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[CONTENT_TYPE], APPLICATION_YAML);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let status: Status = serde_yaml::from_slice(&body).unwrap();
        assert_eq!(status.code, Some(500));
        assert_eq!(status.reason.as_deref(), Some("InternalError"));
        assert_eq!(status.message.as_deref(), Some("Internal error occurred: boom"));
    }
}
