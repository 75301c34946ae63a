use crate::{BindguardError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Hybrid scheduling settings for pods synced to the host cluster
///
/// When enabled, pods may be scheduled either by the host cluster or by a
/// scheduler running inside the virtual cluster. Scheduler names listed in
/// `host_schedulers` belong to the host, so bindings made inside the virtual
/// cluster for pods naming one of them are refused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HybridSchedulingConfig {
    /// Whether the binding check runs at all
    pub enabled: bool,
    /// Scheduler names reserved for the host cluster
    pub host_schedulers: HashSet<String>,
}

impl HybridSchedulingConfig {
    /// Create an enabled config reserving the given scheduler names
    pub fn enabled<I, S>(host_schedulers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enabled: true,
            host_schedulers: host_schedulers.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a disabled config
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Parse the config from YAML
    pub fn from_yaml(data: &str) -> Result<Self> {
        serde_yaml::from_str(data).map_err(|e| {
            BindguardError::invalid_config(
                format!("Failed to parse hybrid scheduling config from YAML: {}", e),
                Some(Box::new(e)),
            )
        })
    }

    /// Parse the config from JSON
    pub fn from_json(data: &str) -> Result<Self> {
        serde_json::from_str(data).map_err(|e| {
            BindguardError::invalid_config(
                format!("Failed to parse hybrid scheduling config from JSON: {}", e),
                Some(Box::new(e)),
            )
        })
    }

    /// Serialize the config to YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            BindguardError::serialization_error(
                format!("Failed to serialize to YAML: {}", e),
                Some(Box::new(e)),
            )
        })
    }
}
