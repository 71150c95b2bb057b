#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A lazily constructed member map of a type failed to build.
    /// This is an authoring error in the schema definition, never a runtime condition.
    #[error("Failed to build the members of type '{type_name}': {message}")]
    DeferredDefinition { type_name: String, message: String },
    #[error("Expected {expected} type, but found '{found}'")]
    UnexpectedKind {
        expected: &'static str,
        found: String,
    },
    #[error("Type '{0}' is referenced but never defined")]
    UnknownType(String),
    #[error("Type '{0}' is defined more than once")]
    DuplicateType(String),
    #[error("Root operation type '{0}' must be an object type")]
    InvalidRoot(String),
    #[error("Failed to parse schema: {0}")]
    Parse(String),
}

impl SchemaError {
    pub fn deferred(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        SchemaError::DeferredDefinition {
            type_name: type_name.into(),
            message: message.into(),
        }
    }
}
