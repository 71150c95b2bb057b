use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Feature toggles evaluated by conditional schema members during preprocessing.
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PreprocessorConfig {
    /// Keeps schema members marked as beta features.
    ///
    /// Can also be set via the `BETA_FEATURES_ENABLED` environment variable.
    #[serde(default)]
    pub beta_features_enabled: bool,
}

impl PreprocessorConfig {
    pub fn with_beta_features(mut self, enabled: bool) -> Self {
        self.beta_features_enabled = enabled;
        self
    }
}
