//! Patch file validation.
//!
//! [`PatchConfig::build`](crate::PatchConfig::build) stops at the first
//! problem. [`validate_config`] keeps going and reports every problem it can
//! find, which is what an editor or `patchbay check` wants to show.
//!
//! # Example
//!
//! ```rust
//! use patchbay_config::{ConfigIssue, PatchConfig, validate_config};
//! use patchbay_registry::ModuleRegistry;
//!
//! let config = PatchConfig::new("Broken")
//!     .with_module("osc-1", "oscillator")
//!     .with_module("t-1", "theremin")
//!     .with_connection("osc-1/audio_out", "destination")
//!     .with_connection("osc-1/audio_out", "destination");
//!
//! let issues = validate_config(&config, &ModuleRegistry::new());
//! assert_eq!(issues.len(), 2);
//! assert!(matches!(issues[0], ConfigIssue::UnknownKind { .. }));
//! ```

use patchbay_core::{Patch, PatchError};
use patchbay_registry::ModuleRegistry;
use thiserror::Error;

use crate::PatchConfig;

/// One problem found in a patch file.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    /// Module kind not in the registry.
    #[error("module '{module}': unknown kind '{kind}'")]
    UnknownKind {
        /// Module id as written.
        module: String,
        /// Kind as written.
        kind: String,
    },

    /// Module id rejected by the patch (invalid or duplicate).
    #[error("module '{module}': {error}")]
    Module {
        /// Module id as written.
        module: String,
        /// What the patch said.
        error: PatchError,
    },

    /// Connection refused by the validator or unparsable.
    #[error("connection #{index} ({from} -> {to}): {error}")]
    Connection {
        /// Position in the `[[connections]]` list.
        index: usize,
        /// Source address as written.
        from: String,
        /// Target address as written.
        to: String,
        /// What the patch said.
        error: PatchError,
    },
}

impl ConfigIssue {
    /// Index of the offending connection, if this is a connection issue.
    pub fn connection_index(&self) -> Option<usize> {
        match self {
            ConfigIssue::Connection { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// Validate a patch file against `registry`, collecting every issue.
///
/// Modules that fail are left out of the trial patch, so connections that
/// reference them are reported too (as unresolved endpoints). Connections
/// that fail are not added, so later duplicates of them are not reported
/// twice.
pub fn validate_config(config: &PatchConfig, registry: &ModuleRegistry) -> Vec<ConfigIssue> {
    let mut patch = Patch::new();
    let mut issues = Vec::new();

    for module in &config.modules {
        let Some(schema) = registry.try_schema(&module.kind) else {
            issues.push(ConfigIssue::UnknownKind {
                module: module.id.clone(),
                kind: module.kind.clone(),
            });
            continue;
        };
        if let Err(error) = patch.add_module(module.id.as_str(), schema) {
            issues.push(ConfigIssue::Module {
                module: module.id.clone(),
                error,
            });
        }
    }

    for (index, connection) in config.connections.iter().enumerate() {
        if let Err(error) = patch.propose_connection(&connection.source, &connection.target) {
            issues.push(ConfigIssue::Connection {
                index,
                from: connection.source.clone(),
                to: connection.target.clone(),
                error,
            });
        }
    }

    if !issues.is_empty() {
        tracing::debug!(name = %config.name, issues = issues.len(), "patch file has issues");
    }
    issues
}
