mod env_overrides;
pub mod features;
pub mod log;

use std::convert::Infallible;
use std::path::PathBuf;

use config::{Config, File, FileFormat, FileSourceFile};
use envconfig::Envconfig;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use crate::features::PreprocessorConfig;
use crate::{
    env_overrides::{EnvVarOverrides, EnvVarOverridesError},
    log::LoggingConfig,
};

#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SchemaPreprocessorConfig {
    /// The logger configuration.
    #[serde(default)]
    pub log: LoggingConfig,

    /// Feature toggles used to decide which conditional schema members are kept.
    #[serde(default)]
    pub features: PreprocessorConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum PreprocessorConfigError {
    #[error("Failed to load configuration: {0}")]
    ConfigLoadError(#[from] config::ConfigError),
    #[error("Failed to apply configuration overrides: {0}")]
    EnvVarOverridesError(#[from] EnvVarOverridesError),
    #[error("Failed to load the environment variables: {0}")]
    EnvVarLoadError(#[from] envconfig::Error),
    #[error("Failed to parse the configuration file path: {0}")]
    ConfigPathParseError(Infallible),
}

static DEFAULT_FILE_NAMES: &[&str] = &[
    "preprocessor.config.yaml",
    "preprocessor.config.yml",
    "preprocessor.config.json",
    "preprocessor.config.json5",
];

pub fn load_config(
    override_config_path: Option<String>,
) -> Result<SchemaPreprocessorConfig, PreprocessorConfigError> {
    let env_overrides = EnvVarOverrides::init_from_env()?;
    let mut config = Config::builder();

    if let Some(path_str) = override_config_path {
        let path_buf = path_str
            .parse::<PathBuf>()
            .map_err(PreprocessorConfigError::ConfigPathParseError)?;
        let as_file: File<FileSourceFile, _> = path_buf.into();

        config = config.add_source(as_file.required(true));
    } else {
        for name in DEFAULT_FILE_NAMES {
            config = config.add_source(File::with_name(name).required(false));
        }
    }

    config = env_overrides.apply_overrides(config)?;

    Ok(config
        .build()?
        .try_deserialize::<SchemaPreprocessorConfig>()?)
}

pub fn parse_yaml_config(
    config_raw: &str,
) -> Result<SchemaPreprocessorConfig, PreprocessorConfigError> {
    Config::builder()
        .add_source(File::from_str(config_raw, FileFormat::Yaml))
        .build()?
        .try_deserialize::<SchemaPreprocessorConfig>()
        .map_err(PreprocessorConfigError::ConfigLoadError)
}

#[cfg(test)]
mod tests {
    use crate::{
        log::{LogFormat, LogLevel},
        parse_yaml_config, PreprocessorConfig, SchemaPreprocessorConfig,
    };

    #[test]
    fn empty_document_uses_defaults() {
        let config = parse_yaml_config("").expect("empty config should load");
        assert_eq!(config, SchemaPreprocessorConfig::default());
        assert!(!config.features.beta_features_enabled);
    }

    #[test]
    fn reads_features_and_logging() {
        let config = parse_yaml_config(
            r#"
log:
  level: warn
  format: json
features:
  beta_features_enabled: true
"#,
        )
        .expect("config should load");

        assert_eq!(config.log.level, LogLevel::Warn);
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.log.env_filter_str(), "warn");
        assert!(config.features.beta_features_enabled);
    }

    #[test]
    fn filter_wins_over_level() {
        let config = parse_yaml_config(
            r#"
log:
  level: info
  filter: hive_schema_preprocessor=trace
"#,
        )
        .expect("config should load");

        assert_eq!(config.log.env_filter_str(), "hive_schema_preprocessor=trace");
    }

    #[test]
    fn rejects_unknown_toggles() {
        let result = parse_yaml_config(
            r#"
features:
  alpha_features_enabled: true
"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn features_deserialize_from_json() {
        let features: PreprocessorConfig =
            serde_json::from_str(r#"{ "beta_features_enabled": true }"#).unwrap();
        assert_eq!(features, PreprocessorConfig::default().with_beta_features(true));

        let features: PreprocessorConfig = serde_json::from_str("{}").unwrap();
        assert!(!features.beta_features_enabled);
    }
}
