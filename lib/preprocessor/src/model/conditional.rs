use std::{fmt, sync::Arc};

use hive_schema_preprocessor_config::PreprocessorConfig;

use super::TypeNode;

pub type Predicate = Arc<dyn Fn(&PreprocessorConfig) -> bool + Send + Sync>;

/// Includes `of_type` only when `condition` holds for the preprocessing configuration.
pub struct Conditional {
    pub of_type: TypeNode,
    pub suffix: String,
    pub condition: Predicate,
}

impl Conditional {
    pub fn new<F>(of_type: TypeNode, suffix: impl Into<String>, condition: F) -> Self
    where
        F: Fn(&PreprocessorConfig) -> bool + Send + Sync + 'static,
    {
        Self {
            of_type,
            suffix: suffix.into(),
            condition: Arc::new(condition),
        }
    }

    pub fn is_enabled(&self, config: &PreprocessorConfig) -> bool {
        (self.condition)(config)
    }

    pub fn name(&self) -> String {
        let inner = match self.of_type.name() {
            Some(name) => name.to_string(),
            None => self.of_type.identity(),
        };
        format!("{}{}", inner, self.suffix)
    }

    pub fn description(&self) -> Option<&str> {
        self.of_type.description()
    }

    pub fn identity(&self) -> String {
        format!("{}{}", self.of_type.identity(), self.suffix)
    }
}

impl fmt::Debug for Conditional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conditional")
            .field("of_type", &self.of_type)
            .field("suffix", &self.suffix)
            .finish_non_exhaustive()
    }
}
