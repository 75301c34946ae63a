use crate::error::DecodeError;
use bindguard_core::{Codec, GroupVersionKind, RuntimeObject};
use k8s_openapi::api::core::v1::Binding;
use std::sync::Arc;
use tracing::debug;

/// Decodes request payloads into Bindings
#[derive(Clone)]
pub struct BindingDecoder {
    codec: Arc<dyn Codec>,
}

impl BindingDecoder {
    pub fn new(codec: Arc<dyn Codec>) -> Self {
        Self { codec }
    }

    /// Decode a payload, failing if it is not a Binding
    pub fn decode(&self, payload: &[u8]) -> Result<Binding, DecodeError> {
        let expected = GroupVersionKind::of::<Binding>();

        match self.codec.decode(payload, &expected)? {
            RuntimeObject::Binding(binding) => {
                debug!(
                    "Decoded binding for pod {}/{}",
                    binding.metadata.namespace.as_deref().unwrap_or_default(),
                    binding.metadata.name.as_deref().unwrap_or_default()
                );
                Ok(binding)
            }
            other => Err(DecodeError::WrongType {
                expected: expected.to_string(),
                found: other.gvk().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bindguard_core::{CodecError, UniversalDecoder};

    /// Codec that always returns the same object
    struct FixedCodec(RuntimeObject);

    impl Codec for FixedCodec {
        fn decode(&self, _data: &[u8], _hint: &GroupVersionKind) -> Result<RuntimeObject, CodecError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_decode_binding() {
        let decoder = BindingDecoder::new(Arc::new(UniversalDecoder::new()));
        let binding = decoder
            .decode(br#"{"apiVersion":"v1","kind":"Binding","metadata":{"name":"nginx","namespace":"default"},"target":{"name":"node-1"}}"#)
            .unwrap();

        assert_eq!(binding.metadata.name.as_deref(), Some("nginx"));
        assert_eq!(binding.target.name.as_deref(), Some("node-1"));
    }

    #[test]
    fn test_decode_unparsable() {
        let decoder = BindingDecoder::new(Arc::new(UniversalDecoder::new()));
        let err = decoder.decode(b"{not json").unwrap_err();
        assert!(matches!(err, DecodeError::Codec { .. }));
        assert!(err
            .to_string()
            .starts_with("failed to decode Binding resource from request body"));
    }

    #[test]
    fn test_decode_wrong_type() {
        let decoder = BindingDecoder::new(Arc::new(UniversalDecoder::new()));
        let err = decoder
            .decode(br#"{"apiVersion":"v1","kind":"Pod","metadata":{"name":"nginx"}}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            DecodeError::WrongType { ref found, .. } if found == "v1/Pod"
        ));

        let unknown = RuntimeObject::Unknown {
            gvk: GroupVersionKind::new("apps", "v1", "Deployment"),
            object: serde_json::json!({}),
        };
        let decoder = BindingDecoder::new(Arc::new(FixedCodec(unknown)));
        assert!(matches!(decoder.decode(b""), Err(DecodeError::WrongType { .. })));
    }
}
