use crate::decoder::BindingDecoder;
use crate::resolver::PodResolver;
use bindguard_core::{Codec, HybridSchedulingConfig, UniversalDecoder};
use bindguard_store::PodStore;
use std::sync::Arc;

/// Shared, read-only dependencies of the scheduler check
#[derive(Clone)]
pub struct FilterState {
    /// Hybrid scheduling settings, fixed for the process lifetime
    pub config: Arc<HybridSchedulingConfig>,

    /// Binding payload decoder
    pub decoder: BindingDecoder,

    /// Pod lookups against the virtual cluster
    pub resolver: PodResolver,
}

impl FilterState {
    /// Create a FilterState with explicit codec and pod store
    pub fn new(
        config: Arc<HybridSchedulingConfig>,
        codec: Arc<dyn Codec>,
        store: Arc<dyn PodStore>,
    ) -> Self {
        Self {
            config,
            decoder: BindingDecoder::new(codec),
            resolver: PodResolver::new(store),
        }
    }

    /// Create a FilterState decoding payloads with [`UniversalDecoder`]
    pub fn with_store(config: Arc<HybridSchedulingConfig>, store: Arc<dyn PodStore>) -> Self {
        Self::new(config, Arc::new(UniversalDecoder::new()), store)
    }
}
