//! Activation configuration for the northbound pipeline.

use serde::Deserialize;

/// Which applications to enable, in activation order.
///
/// Order matters: dependency checking is structural, so every application
/// must appear after the applications it depends on.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct NorthboundConfig {
    /// Application names, compared case-insensitively by the manager.
    #[serde(default)]
    pub applications: Vec<String>,
}

impl NorthboundConfig {
    /// Parses the configuration from YAML.
    pub fn from_yaml(input: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(input)
    }
}
