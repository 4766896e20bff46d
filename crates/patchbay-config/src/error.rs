//! Error types for configuration operations.

use std::path::PathBuf;

use patchbay_core::PatchError;
use thiserror::Error;

/// Errors that can occur during configuration operations.
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

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Factory patch not found
    #[error("factory patch not found: {0}")]
    PatchNotFound(String),

    /// Module declared with a kind the registry does not know
    #[error("module '{module}' has unknown kind '{kind}'")]
    UnknownModuleKind {
        /// Module id as written.
        module: String,
        /// Kind as written.
        kind: String,
    },

    /// A connection was refused while building the patch
    #[error("connection #{index} ({from} -> {to}): {error}")]
    Connection {
        /// Position in the `[[connections]]` list.
        index: usize,
        /// Source address as written.
        from: String,
        /// Target address as written.
        to: String,
        /// Why it was refused.
        #[source]
        error: PatchError,
    },

    /// A module could not be added to the patch
    #[error(transparent)]
    Patch(#[from] PatchError),

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
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
