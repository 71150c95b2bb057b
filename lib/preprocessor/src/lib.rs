pub mod authoring;
pub mod error;
pub mod model;
pub mod preprocess;
pub mod resolver;
pub mod sdl;
pub mod type_map;

#[cfg(test)]
mod tests;

pub use authoring::{beta, beta_enum_value, BETA_SUFFIX};
pub use error::SchemaError;
pub use hive_schema_preprocessor_config::PreprocessorConfig;
pub use model::{Schema, TypeNode};
pub use preprocess::preprocess_schema;
pub use type_map::TypeMap;
