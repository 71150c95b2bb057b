//! Reading input schemas from SDL and printing schemas back to SDL.

pub mod loader;
mod printer;

pub use loader::{
    schema_from_document, schema_from_sdl, BETA_DIRECTIVE, DEFAULT_DEPRECATION_REASON,
};
