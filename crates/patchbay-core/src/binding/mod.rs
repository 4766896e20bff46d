//! Engine binding: the boundary to the live audio engine.
//!
//! The compiler never owns processing objects. It talks to them through an
//! [`EngineBinding`], a registry from [`ModuleId`] to a live
//! [`EngineModule`]. Each module can
//!
//! - hand out [`TargetHandle`]s for its inputs, per-slot inputs and
//!   automatable parameters,
//! - `connect` one of its outputs to any handle,
//! - `disconnect` everything it (and its owned sub-objects) emit.
//!
//! [`RecordingBinding`] is an in-memory implementation that records every live
//! edge, for tests and dry runs.

mod recording;

pub use recording::{LiveEdge, RecordingBinding, RecordingModule};

use core::fmt;

use thiserror::Error;

use crate::graph::module::{ModuleId, ModuleInstance};

/// Where a connection lands inside the engine.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TargetHandle {
    /// A plain input.
    Input {
        /// Owning module.
        module: ModuleId,
        /// Input name.
        port: String,
    },
    /// One per-slot input of a bank, 0-based.
    Slot {
        /// Owning module.
        module: ModuleId,
        /// Bank name.
        port: String,
        /// 0-based slot index.
        index: usize,
    },
    /// An automatable control.
    Param {
        /// Owning module.
        module: ModuleId,
        /// Parameter name.
        param: String,
    },
    /// The global audio sink.
    Destination,
}

impl fmt::Display for TargetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetHandle::Input { module, port } => write!(f, "{module}.{port}"),
            TargetHandle::Slot {
                module,
                port,
                index,
            } => write!(f, "{module}.{port}[{index}]"),
            TargetHandle::Param { module, param } => write!(f, "{module}.{param}"),
            TargetHandle::Destination => f.write_str("destination"),
        }
    }
}

/// The emitting side of a live connection.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceHandle {
    /// Owning module.
    pub module: ModuleId,
    /// Output name.
    pub port: String,
}

impl fmt::Display for SourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.module, self.port)
    }
}

/// Failure reported by the engine while wiring.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The object refused the connection.
    #[error("engine object '{module}' refused the connection: {reason}")]
    Refused {
        /// Module whose object refused.
        module: ModuleId,
        /// Engine-supplied reason.
        reason: String,
    },
    /// The object has not finished starting up.
    #[error("engine object '{0}' is not ready")]
    NotReady(ModuleId),
}

/// One live processing object.
pub trait EngineModule {
    /// Returns `true` if the object has an output called `port`.
    fn has_output(&self, port: &str) -> bool;

    /// Handle for a plain input, if the object has one by that name.
    fn input(&self, port: &str) -> Option<TargetHandle>;

    /// Number of per-slot inputs in bank `port` (0 if there is no such bank).
    fn slot_count(&self, port: &str) -> usize;

    /// Handle for slot `index` (0-based) of bank `port`.
    fn slot(&self, port: &str, index: usize) -> Option<TargetHandle>;

    /// Handle for the automatable control `name`.
    fn param(&self, name: &str) -> Option<TargetHandle>;

    /// Connects output `port` to `target`.
    fn connect(&mut self, port: &str, target: &TargetHandle) -> Result<(), EngineError>;

    /// Drops every live connection this object emits, including those of
    /// owned sub-objects such as per-slot input gains.
    fn disconnect(&mut self);
}

/// Registry of live processing objects keyed by module id.
pub trait EngineBinding {
    /// Ids of every registered object, in a stable order.
    fn module_ids(&self) -> Vec<ModuleId>;

    /// Looks up an object.
    fn module(&self, id: &ModuleId) -> Option<&dyn EngineModule>;

    /// Looks up an object mutably.
    fn module_mut(&mut self, id: &ModuleId) -> Option<&mut dyn EngineModule>;

    /// Handle of the global sink.
    fn destination(&self) -> TargetHandle {
        TargetHandle::Destination
    }

    /// Called after a module joins the patch. Bindings that create live
    /// objects on demand do it here; the default does nothing.
    fn module_added(&mut self, _instance: &ModuleInstance) {}

    /// Called after a module leaves the patch.
    fn module_removed(&mut self, _id: &ModuleId) {}
}
