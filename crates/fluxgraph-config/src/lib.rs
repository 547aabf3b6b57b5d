//! Configuration for fluxgraph simulations.
//!
//! # Features
//!
//! - **Simulation config**: [`SimConfig`] TOML files selecting topology,
//!   tick settings, stimulus and verification tolerance
//! - **Graph files**: [`GraphFile`] TOML descriptions of arbitrary networks
//! - **Validation**: range checks reported together as [`ValidationError`]
//! - **Paths**: platform config directory (`std` feature)
//!
//! # Example
//!
//! ```rust,no_run
//! use fluxgraph_config::{GraphFile, SimConfig};
//!
//! let config = SimConfig::load("sim.toml").unwrap();
//! let graph = config.topology.build().unwrap();
//!
//! // Export the generated network for hand editing
//! GraphFile::from_graph(&graph).save("radix2-8.toml").unwrap();
//! ```

mod error;
mod graph_file;
mod sim_config;

/// Config field validation.
pub mod validation;

/// Platform-specific config paths.
#[cfg(feature = "std")]
pub mod paths;

pub use error::ConfigError;
pub use graph_file::{EdgeEntry, GraphFile, NodeEntry, TwiddleEntry};
#[cfg(feature = "std")]
pub use paths::{default_config_path, ensure_user_config_dir, user_config_dir};
pub use sim_config::{
    RunConfig, RunMode, SimConfig, StimulusConfig, TopologyConfig, VerifyConfig,
};
pub use validation::{ValidationError, ValidationResult};
