//! Serializable view of a patch for exporters.
//!
//! A [`PatchSnapshot`] holds exactly what is needed to regenerate the patch:
//! which modules to instantiate and which connections to make, in order.
//! Endpoints are stored in their textual address form (1-based slots).

use serde::{Deserialize, Serialize};

use crate::graph::connection::Connection;
use crate::graph::module::{ModuleId, ModuleInstance};
use crate::signal::SignalKind;

/// Captured patch state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchSnapshot {
    /// Modules in insertion order.
    pub modules: Vec<ModuleDeclaration>,
    /// Connections in insertion order.
    pub connections: Vec<ConnectionRecord>,
}

/// One module to instantiate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDeclaration {
    /// Instance id.
    pub id: ModuleId,
    /// Module kind (e.g. `"filter"`).
    pub kind: String,
}

impl From<&ModuleInstance> for ModuleDeclaration {
    fn from(instance: &ModuleInstance) -> Self {
        Self {
            id: instance.id().clone(),
            kind: instance.kind().to_owned(),
        }
    }
}

/// One connection to make.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    /// Source address, e.g. `"osc-1/audio_out"`.
    pub source: String,
    /// Target address, e.g. `"mixer-1/inputs/2"` or `"destination"`.
    pub target: String,
    /// Signal kind carried.
    pub signal: SignalKind,
}

impl From<&Connection> for ConnectionRecord {
    fn from(connection: &Connection) -> Self {
        Self {
            source: connection.source.to_string(),
            target: connection.target.to_string(),
            signal: connection.signal,
        }
    }
}
