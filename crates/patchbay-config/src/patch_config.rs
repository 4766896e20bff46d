//! Patch file format and operations.

use std::path::Path;

use patchbay_core::Patch;
use patchbay_registry::ModuleRegistry;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One `[[modules]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModuleConfig {
    /// Instance id, unique within the patch.
    pub id: String,
    /// Registry kind (e.g. `"filter"`).
    pub kind: String,
}

impl ModuleConfig {
    /// Create a module entry.
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
        }
    }
}

/// One `[[connections]]` entry, in textual address form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Source address, e.g. `"osc-1/audio_out"`.
    pub source: String,
    /// Target address, e.g. `"mixer-1/inputs/2"`, `"filt-1/frequency"` or
    /// `"destination"`.
    pub target: String,
}

impl ConnectionConfig {
    /// Create a connection entry.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Patch file format.
///
/// Patches are stored as TOML files listing module instances and the
/// connections between them. Connections are replayed through the validator
/// in file order when the patch is built, so file order is insertion order.
///
/// # TOML Format
///
/// ```toml
/// name = "Basic subtractive"
/// description = "Oscillator through a filter, LFO on cutoff"
///
/// [[modules]]
/// id = "osc-1"
/// kind = "oscillator"
///
/// [[modules]]
/// id = "filt-1"
/// kind = "filter"
///
/// [[connections]]
/// source = "osc-1/audio_out"
/// target = "filt-1/audio_in"
///
/// [[connections]]
/// source = "filt-1/audio_out"
/// target = "destination"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatchConfig {
    /// Name of the patch.
    pub name: String,

    /// Optional description of the patch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Module instances, in declaration order.
    #[serde(default)]
    pub modules: Vec<ModuleConfig>,

    /// Connections, in insertion order.
    #[serde(default)]
    pub connections: Vec<ConnectionConfig>,
}

impl PatchConfig {
    /// Create a new empty patch file.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            modules: Vec::new(),
            connections: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declare a module.
    pub fn with_module(mut self, id: impl Into<String>, kind: impl Into<String>) -> Self {
        self.modules.push(ModuleConfig::new(id, kind));
        self
    }

    /// Declare a connection.
    pub fn with_connection(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.connections.push(ConnectionConfig::new(source, target));
        self
    }

    /// Load a patch from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let config: PatchConfig = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), name = %config.name, "patch file loaded");
        Ok(config)
    }

    /// Load a patch from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the patch to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the patch to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Instantiate every module and propose every connection, in file order.
    ///
    /// Stops at the first problem. Use
    /// [`validate_config`](crate::validate_config) to collect all of them.
    pub fn build(&self, registry: &ModuleRegistry) -> Result<Patch, ConfigError> {
        let mut patch = Patch::new();

        for module in &self.modules {
            let schema =
                registry
                    .try_schema(&module.kind)
                    .ok_or_else(|| ConfigError::UnknownModuleKind {
                        module: module.id.clone(),
                        kind: module.kind.clone(),
                    })?;
            patch.add_module(module.id.as_str(), schema)?;
        }

        for (index, connection) in self.connections.iter().enumerate() {
            patch
                .propose_connection(&connection.source, &connection.target)
                .map_err(|error| ConfigError::Connection {
                    index,
                    from: connection.source.clone(),
                    to: connection.target.clone(),
                    error,
                })?;
        }

        tracing::info!(
            name = %self.name,
            modules = self.modules.len(),
            connections = self.connections.len(),
            "patch built"
        );
        Ok(patch)
    }

    /// Capture an existing patch as a patch file.
    pub fn from_patch(name: impl Into<String>, patch: &Patch) -> Self {
        Self {
            name: name.into(),
            description: None,
            modules: patch
                .modules()
                .iter()
                .map(|m| ModuleConfig::new(m.id().as_str(), m.kind()))
                .collect(),
            connections: patch
                .list()
                .iter()
                .map(|c| ConnectionConfig::new(c.source.to_string(), c.target.to_string()))
                .collect(),
        }
    }

    /// Get the number of modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Check if the patch declares no modules.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Module kinds in declaration order.
    pub fn kinds(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.kind.as_str()).collect()
    }
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
