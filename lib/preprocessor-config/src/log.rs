use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How the developer CLI reports what the preprocessor does.
///
/// The preprocessor logs excluded conditional types and cache hits at `debug` and
/// `trace`, so those levels are mostly useful when a schema comes out different than
/// expected.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Lowest level that is reported. Overridden by `LOG_LEVEL`.
    #[serde(default)]
    pub level: LogLevel,

    /// Output layout. Overridden by `LOG_FORMAT`.
    #[serde(default)]
    pub format: LogFormat,

    /// `EnvFilter` directives, for example `hive_schema_preprocessor=trace`. Replaces
    /// `level` entirely when present. Overridden by `LOG_FILTER`.
    #[serde(default)]
    pub filter: Option<String>,
}

impl LoggingConfig {
    pub fn env_filter_str(&self) -> &str {
        match &self.filter {
            Some(filter) => filter,
            None => self.level.directive(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[serde(alias = "warning")]
    Warn,
    Error,
}

impl LogLevel {
    fn directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Debug builds report every exclusion decision.
impl Default for LogLevel {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            LogLevel::Debug
        } else {
            LogLevel::Info
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    /// Indented spans, one level per nested visit.
    PrettyTree,
    PrettyCompact,
    Json,
}

impl Default for LogFormat {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            LogFormat::PrettyTree
        } else {
            LogFormat::PrettyCompact
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LogFormat, LogLevel, LoggingConfig};

    #[test]
    fn level_is_the_filter_unless_one_is_given() {
        let mut config = LoggingConfig {
            level: LogLevel::Warn,
            ..Default::default()
        };
        assert_eq!(config.env_filter_str(), "warn");

        config.filter = Some("hive_schema_preprocessor::sdl=trace".to_string());
        assert_eq!(config.env_filter_str(), "hive_schema_preprocessor::sdl=trace");
    }

    #[test]
    fn names_match_the_configuration_file() {
        let format: LogFormat = serde_json::from_str(r#""pretty-compact""#).unwrap();
        assert_eq!(format, LogFormat::PrettyCompact);

        let level: LogLevel = serde_json::from_str(r#""warning""#).unwrap();
        assert_eq!(level, LogLevel::Warn);

        assert!(serde_json::from_str::<LogLevel>(r#""loud""#).is_err());
    }
}
