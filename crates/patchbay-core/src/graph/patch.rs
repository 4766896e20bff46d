//! The editable patch: module table, connection set, and compile entry point.
//!
//! [`Patch`] is what the interaction layer talks to. Gestures arrive as
//! textual addresses through [`Patch::propose_connection`] and
//! [`Patch::remove_connection`]; rejections come back as [`PatchError`] with
//! the failed rule intact. [`Patch::compile`] rebuilds a binding and notifies
//! registered observers.

use core::fmt;

use thiserror::Error;

use crate::address::{self, Address, AddressError, PortRef, Side};
use crate::binding::EngineBinding;
use crate::graph::compiler::{self, CompileReport};
use crate::graph::connection::{Connection, ConnectionSet};
use crate::graph::module::{ModuleId, ModuleInstance, ModuleLookup};
use crate::graph::snapshot::{ConnectionRecord, ModuleDeclaration, PatchSnapshot};
use crate::graph::validate::{self, Rejection};
use crate::observer::{TopologyObserver, TopologyUpdate};
use crate::schema::ModuleSchema;

/// Errors from editing a [`Patch`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    /// The id is empty, contains `/`, or is the `destination` sentinel.
    #[error("invalid module id '{0}'")]
    InvalidModuleId(ModuleId),
    /// A module with this id already exists.
    #[error("module '{0}' already exists")]
    DuplicateModule(ModuleId),
    /// No module with this id.
    #[error("module '{0}' not found")]
    ModuleNotFound(ModuleId),
    /// An address could not be parsed.
    #[error("{side} address: {error}")]
    Address {
        /// Which end.
        side: Side,
        /// Parse failure.
        error: AddressError,
    },
    /// The validator refused the connection.
    #[error("connection rejected: {0}")]
    Rejected(#[from] Rejection),
}

impl PatchError {
    /// The validator rejection, if that is what this is.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            PatchError::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }
}

/// Modules, their connections, and the observers to notify on compile.
#[derive(Default)]
pub struct Patch {
    modules: Vec<ModuleInstance>,
    connections: ConnectionSet,
    observers: Vec<Box<dyn TopologyObserver>>,
}

impl fmt::Debug for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Patch")
            .field("modules", &self.modules)
            .field("connections", &self.connections)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Patch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    // --- Modules ---

    /// Adds a module of the given kind.
    pub fn add_module(
        &mut self,
        id: impl Into<ModuleId>,
        schema: &'static ModuleSchema,
    ) -> Result<&ModuleInstance, PatchError> {
        let id = id.into();
        if !id.is_valid() {
            return Err(PatchError::InvalidModuleId(id));
        }
        if self.module(&id).is_some() {
            return Err(PatchError::DuplicateModule(id));
        }
        tracing::debug!(module = %id, kind = schema.kind, "module added");
        self.modules.push(ModuleInstance::new(id, schema));
        Ok(&self.modules[self.modules.len() - 1])
    }

    /// Removes a module and every connection that references it. Returns how
    /// many connections were purged.
    pub fn remove_module(&mut self, id: &ModuleId) -> Result<usize, PatchError> {
        let pos = self
            .modules
            .iter()
            .position(|m| m.id() == id)
            .ok_or_else(|| PatchError::ModuleNotFound(id.clone()))?;
        self.modules.remove(pos);
        let purged = self.connections.remove_module(id);
        tracing::debug!(module = %id, purged, "module removed");
        Ok(purged)
    }

    /// Looks up a module by id.
    pub fn module(&self, id: &ModuleId) -> Option<&ModuleInstance> {
        self.modules.iter().find(|m| m.id() == id)
    }

    /// Modules in insertion order.
    pub fn modules(&self) -> &[ModuleInstance] {
        &self.modules
    }

    // --- Connections ---

    /// Parses, resolves and validates `source → target`, then appends it.
    ///
    /// An address that parses but names nothing in the patch fails the
    /// direction rule.
    pub fn propose_connection(
        &mut self,
        source: &str,
        target: &str,
    ) -> Result<&Connection, PatchError> {
        let (from, to) = self.resolve_pair(source, target)?;
        match self.connections.add(from, to, &self.modules) {
            Ok(connection) => {
                tracing::debug!(%connection, "connection added");
                Ok(connection)
            }
            Err(rejection) => {
                tracing::debug!(
                    source,
                    target,
                    rule = ?rejection.rule(),
                    %rejection,
                    "connection rejected"
                );
                Err(rejection.into())
            }
        }
    }

    /// Appends an already-resolved connection after validation.
    pub fn connect(&mut self, source: PortRef, target: PortRef) -> Result<&Connection, PatchError> {
        Ok(self.connections.add(source, target, &self.modules)?)
    }

    /// Removes `source → target`.
    ///
    /// Returns `Ok(false)` when the pair is not connected, including when an
    /// address names something that does not exist. Only unparsable text is
    /// an error.
    pub fn remove_connection(&mut self, source: &str, target: &str) -> Result<bool, PatchError> {
        let from = parse(Side::Source, source)?;
        let to = parse(Side::Target, target)?;
        let (Ok(from), Ok(to)) = (
            address::resolve(&from, &self.modules),
            address::resolve(&to, &self.modules),
        ) else {
            return Ok(false);
        };
        Ok(self.disconnect(&from, &to))
    }

    /// Removes an already-resolved connection.
    pub fn disconnect(&mut self, source: &PortRef, target: &PortRef) -> bool {
        let removed = self.connections.remove(source, target);
        if removed {
            tracing::debug!(%source, %target, "connection removed");
        }
        removed
    }

    /// Returns `true` if `source → target` would be accepted right now.
    pub fn can_connect(&self, source: &str, target: &str) -> bool {
        self.resolve_pair(source, target).is_ok_and(|(from, to)| {
            validate::can_connect(&from, &to, &self.connections, &self.modules)
        })
    }

    /// Connections in insertion order.
    pub fn list(&self) -> &[Connection] {
        self.connections.list()
    }

    /// The underlying connection set.
    pub fn connections(&self) -> &ConnectionSet {
        &self.connections
    }

    fn resolve_pair(&self, source: &str, target: &str) -> Result<(PortRef, PortRef), PatchError> {
        let from = parse(Side::Source, source)?;
        let to = parse(Side::Target, target)?;
        let from = address::resolve(&from, &self.modules)
            .map_err(|e| Rejection::unresolved(Side::Source, source.trim(), e))?;
        let to = address::resolve(&to, &self.modules)
            .map_err(|e| Rejection::unresolved(Side::Target, target.trim(), e))?;
        Ok((from, to))
    }

    // --- Compile & observe ---

    /// Rebuilds `binding` from the connection set, then notifies observers.
    pub fn compile<B: EngineBinding + ?Sized>(&mut self, binding: &mut B) -> CompileReport {
        let report = compiler::compile(&self.connections, binding);
        if !report.is_clean() {
            tracing::info!(
                wired = report.wired,
                failed = report.failures.len(),
                "compile finished with skipped connections"
            );
        }
        let update = TopologyUpdate {
            connections: self.connections.list(),
            failures: &report.failures,
        };
        for observer in &mut self.observers {
            observer.topology_changed(&update);
        }
        report
    }

    /// Registers an observer notified after every compile.
    pub fn add_observer(&mut self, observer: impl TopologyObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Captures module declarations and connections for export.
    pub fn snapshot(&self) -> PatchSnapshot {
        PatchSnapshot {
            modules: self.modules.iter().map(ModuleDeclaration::from).collect(),
            connections: self.connections.iter().map(ConnectionRecord::from).collect(),
        }
    }
}

impl ModuleLookup for Patch {
    fn schema_of(&self, id: &ModuleId) -> Option<&'static ModuleSchema> {
        self.modules.schema_of(id)
    }
}

fn parse(side: Side, text: &str) -> Result<Address, PatchError> {
    text.parse()
        .map_err(|error| PatchError::Address { side, error })
}
