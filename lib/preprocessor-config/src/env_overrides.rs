use config::{builder::BuilderState, ConfigBuilder, ConfigError};
use envconfig::Envconfig;
use tracing::debug;

/// Values are kept as raw strings and validated together with the file values when the
/// configuration is deserialized.
#[derive(Envconfig)]
pub struct EnvVarOverrides {
    // Logger overrides
    #[envconfig(from = "LOG_LEVEL")]
    pub log_level: Option<String>,
    #[envconfig(from = "LOG_FORMAT")]
    pub log_format: Option<String>,
    #[envconfig(from = "LOG_FILTER")]
    pub log_filter: Option<String>,

    // Feature overrides
    #[envconfig(from = "BETA_FEATURES_ENABLED")]
    pub beta_features_enabled: Option<bool>,
}

#[derive(Debug, thiserror::Error)]
pub enum EnvVarOverridesError {
    #[error("Failed to override configuration: {0}")]
    FailedToOverrideConfig(#[from] ConfigError),
}

impl EnvVarOverrides {
    pub fn apply_overrides<T: BuilderState>(
        mut self,
        mut config: ConfigBuilder<T>,
    ) -> Result<ConfigBuilder<T>, EnvVarOverridesError> {
        if let Some(log_level) = self.log_level.take() {
            debug!("[config-override] 'log.level' = {:?}", log_level);
            config = config.set_override("log.level", log_level.to_lowercase())?;
        }
        if let Some(log_format) = self.log_format.take() {
            debug!("[config-override] 'log.format' = {:?}", log_format);
            config = config.set_override("log.format", log_format.to_lowercase())?;
        }
        if let Some(log_filter) = self.log_filter.take() {
            debug!("[config-override] 'log.filter' = {:?}", log_filter);
            config = config.set_override("log.filter", log_filter)?;
        }

        if let Some(enabled) = self.beta_features_enabled.take() {
            debug!(
                "[config-override] 'features.beta_features_enabled' = {}",
                enabled
            );
            config = config.set_override("features.beta_features_enabled", enabled)?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use config::Config;

    use super::EnvVarOverrides;
    use crate::{
        log::{LogFormat, LogLevel},
        SchemaPreprocessorConfig,
    };

    fn overrides() -> EnvVarOverrides {
        EnvVarOverrides {
            log_level: None,
            log_format: None,
            log_filter: None,
            beta_features_enabled: None,
        }
    }

    fn load(overrides: EnvVarOverrides) -> Result<SchemaPreprocessorConfig, config::ConfigError> {
        overrides
            .apply_overrides(Config::builder())
            .expect("overrides should apply")
            .build()?
            .try_deserialize()
    }

    #[test]
    fn overrides_replace_file_values() {
        let config = load(EnvVarOverrides {
            log_level: Some("WARN".to_string()),
            log_format: Some("Json".to_string()),
            beta_features_enabled: Some(true),
            ..overrides()
        })
        .expect("overrides should deserialize");

        assert_eq!(config.log.level, LogLevel::Warn);
        assert_eq!(config.log.format, LogFormat::Json);
        assert!(config.features.beta_features_enabled);
    }

    #[test]
    fn invalid_overrides_fail_to_deserialize() {
        let result = load(EnvVarOverrides {
            log_format: Some("fancy".to_string()),
            ..overrides()
        });

        assert!(result.is_err());
    }
}
