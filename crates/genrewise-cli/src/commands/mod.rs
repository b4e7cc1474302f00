//! CLI command implementations

pub mod classify;
pub mod json_output;
pub mod presets;
pub mod rules;
pub mod validate;
pub mod vocab;
