use crate::{CodecError, GroupVersionKind};
use k8s_openapi::api::core::v1::{Binding, Pod};
use serde_json::{Map, Value};
use tracing::debug;

/// A decoded object, tagged by its concrete kind
#[derive(Debug, Clone)]
pub enum RuntimeObject {
    Binding(Binding),
    Pod(Box<Pod>),
    /// Any kind without a typed representation here
    Unknown {
        gvk: GroupVersionKind,
        object: Value,
    },
}

impl RuntimeObject {
    /// GroupVersionKind of the decoded object
    pub fn gvk(&self) -> GroupVersionKind {
        match self {
            RuntimeObject::Binding(_) => GroupVersionKind::of::<Binding>(),
            RuntimeObject::Pod(_) => GroupVersionKind::of::<Pod>(),
            RuntimeObject::Unknown { gvk, .. } => gvk.clone(),
        }
    }
}

/// Turns raw request bytes into a runtime object
pub trait Codec: Send + Sync {
    /// Decode `data`, using `hint` for any type information the payload omits
    fn decode(&self, data: &[u8], hint: &GroupVersionKind) -> Result<RuntimeObject, CodecError>;
}

/// Decoder accepting JSON or YAML documents of any kind
///
/// `apiVersion` and `kind` are read from the payload and defaulted from the
/// hint when absent. Known kinds are decoded into their k8s-openapi types,
/// everything else is returned as [`RuntimeObject::Unknown`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UniversalDecoder;

impl UniversalDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Codec for UniversalDecoder {
    fn decode(&self, data: &[u8], hint: &GroupVersionKind) -> Result<RuntimeObject, CodecError> {
        let mut object = match parse_document(data)? {
            Value::Object(map) => map,
            other => return Err(CodecError::not_an_object(value_type(&other))),
        };

        let gvk = apply_type_defaults(&mut object, hint)?;
        debug!("Decoded payload as {}", gvk);

        let value = Value::Object(object);
        if gvk.is::<Binding>() {
            decode_typed(&gvk, value).map(RuntimeObject::Binding)
        } else if gvk.is::<Pod>() {
            decode_typed(&gvk, value).map(|pod| RuntimeObject::Pod(Box::new(pod)))
        } else {
            Ok(RuntimeObject::Unknown { gvk, object: value })
        }
    }
}

/// Parse bytes as JSON, falling back to YAML for non-JSON documents
fn parse_document(data: &[u8]) -> Result<Value, CodecError> {
    let trimmed = data.trim_ascii_start();
    if trimmed.is_empty() {
        return Err(CodecError::EmptyPayload);
    }

    match serde_json::from_slice::<Value>(trimmed) {
        Ok(value) => Ok(value),
        Err(e) if matches!(trimmed.first(), Some(b'{') | Some(b'[')) => Err(CodecError::malformed(
            "JSON",
            e.to_string(),
            Some(Box::new(e)),
        )),
        Err(_) => serde_yaml::from_slice::<Value>(trimmed)
            .map_err(|e| CodecError::malformed("YAML", e.to_string(), Some(Box::new(e)))),
    }
}

/// Fill in apiVersion/kind from the hint and return the resulting GVK
fn apply_type_defaults(
    object: &mut Map<String, Value>,
    hint: &GroupVersionKind,
) -> Result<GroupVersionKind, CodecError> {
    let api_version = type_field(object, "apiVersion")?.unwrap_or_else(|| hint.api_version());
    let kind = type_field(object, "kind")?.unwrap_or_else(|| hint.kind.clone());

    let gvk = GroupVersionKind::parse(&api_version, &kind)
        .map_err(|e| CodecError::invalid_object(format!("{}/{}", api_version, kind), e.to_string(), Some(Box::new(e))))?;

    object.insert("apiVersion".to_string(), Value::String(api_version));
    object.insert("kind".to_string(), Value::String(kind));
    Ok(gvk)
}

fn type_field(object: &Map<String, Value>, field: &str) -> Result<Option<String>, CodecError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(CodecError::malformed(
            "object",
            format!("{} must be a string, found {}", field, value_type(other)),
            None,
        )),
    }
}

fn decode_typed<T: serde::de::DeserializeOwned>(gvk: &GroupVersionKind, value: Value) -> Result<T, CodecError> {
    serde_json::from_value(value)
        .map_err(|e| CodecError::invalid_object(gvk.to_string(), e.to_string(), Some(Box::new(e))))
}

fn value_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding_hint() -> GroupVersionKind {
        GroupVersionKind::of::<Binding>()
    }

    #[test]
    fn test_decode_json_binding() {
        let data = br#"{
            "apiVersion": "v1",
            "kind": "Binding",
            "metadata": {"name": "nginx", "namespace": "default"},
            "target": {"apiVersion": "v1", "kind": "Node", "name": "node-1"}
        }"#;

        match UniversalDecoder::new().decode(data, &binding_hint()).unwrap() {
            RuntimeObject::Binding(binding) => {
                assert_eq!(binding.metadata.name.as_deref(), Some("nginx"));
                assert_eq!(binding.metadata.namespace.as_deref(), Some("default"));
                assert_eq!(binding.target.name.as_deref(), Some("node-1"));
            }
            other => panic!("expected binding, got {:?}", other.gvk()),
        }
    }

    #[test]
    fn test_decode_yaml_binding_with_defaults() {
        let data = b"metadata:\n  name: nginx\n  namespace: default\ntarget:\n  name: node-1\n";

        let object = UniversalDecoder::new().decode(data, &binding_hint()).unwrap();
        assert!(matches!(object, RuntimeObject::Binding(_)));
    }

    #[test]
    fn test_decode_other_kinds() {
        let decoder = UniversalDecoder::new();

        let pod = br#"{"apiVersion": "v1", "kind": "Pod", "metadata": {"name": "nginx"}}"#;
        let object = decoder.decode(pod, &binding_hint()).unwrap();
        assert!(matches!(object, RuntimeObject::Pod(_)));

        let deployment = br#"{"apiVersion": "apps/v1", "kind": "Deployment", "metadata": {"name": "web"}}"#;
        let object = decoder.decode(deployment, &binding_hint()).unwrap();
        assert_eq!(object.gvk(), GroupVersionKind::new("apps", "v1", "Deployment"));
        assert!(matches!(object, RuntimeObject::Unknown { .. }));
    }

    #[test]
    fn test_decode_errors() {
        let decoder = UniversalDecoder::new();

        assert!(matches!(
            decoder.decode(b"  \n", &binding_hint()),
            Err(CodecError::EmptyPayload)
        ));
        assert!(matches!(
            decoder.decode(b"{\"metadata\": ", &binding_hint()),
            Err(CodecError::Malformed { .. })
        ));
        assert!(matches!(
            decoder.decode(b"[1, 2]", &binding_hint()),
            Err(CodecError::NotAnObject { .. })
        ));
        assert!(matches!(
            decoder.decode(b"just a string", &binding_hint()),
            Err(CodecError::NotAnObject { .. })
        ));
        assert!(matches!(
            decoder.decode(br#"{"kind": 7}"#, &binding_hint()),
            Err(CodecError::Malformed { .. })
        ));
        assert!(matches!(
            decoder.decode(br#"{"target": "node-1"}"#, &binding_hint()),
            Err(CodecError::InvalidObject { .. })
        ));
    }
}
