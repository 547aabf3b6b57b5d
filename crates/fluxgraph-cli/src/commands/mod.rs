//! CLI command implementations.

pub mod graph;
pub mod presets;
pub mod run;
