//! Error types for configuration operations.

use std::path::PathBuf;

use fluxgraph_core::GraphError;
use fluxgraph_topology::TopologyError;
use thiserror::Error;

use crate::validation::ValidationError;

/// Errors that can occur while loading, saving or materializing configs.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Field values out of range
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Node kind name not recognized
    #[error("unknown node kind '{kind}' for node '{node}'")]
    UnknownNodeKind {
        /// Node declaring the kind.
        node: String,
        /// Unrecognized kind name.
        kind: String,
    },

    /// Node entry that cannot be built
    #[error("invalid node '{node}': {reason}")]
    InvalidNode {
        /// Offending node.
        node: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Edge endpoint not of the form `node.port`
    #[error("invalid port reference '{reference}' on edge '{edge}' (expected node.port)")]
    InvalidPortRef {
        /// Offending edge.
        edge: String,
        /// The malformed reference.
        reference: String,
    },

    /// Topology generation failed
    #[error("topology: {0}")]
    Topology(#[from] TopologyError),

    /// The assembled graph violates a structural invariant
    #[error("graph: {0}")]
    Graph(#[from] GraphError),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }
}

/// Reads `path` to a string.
pub(crate) fn read_to_string(path: &std::path::Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))
}

/// Writes `content` to `path`, creating the parent directory if needed.
pub(crate) fn write_with_parents(path: &std::path::Path, content: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
    }
    std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))
}
