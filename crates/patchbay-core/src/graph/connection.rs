//! Connections and the ordered connection set.
//!
//! The [`ConnectionSet`] is the single source of truth for patch topology. It
//! only changes through [`add`](ConnectionSet::add) (validated) and the
//! removal methods; the compiler reads it and never writes it.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::address::PortRef;
use crate::graph::module::{ModuleId, ModuleLookup};
use crate::graph::validate::{self, Rejection};
use crate::signal::SignalKind;

/// A directed, typed link between two endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    /// Emitting endpoint; always a [`PortRef::Port`] for validated connections.
    pub source: PortRef,
    /// Receiving endpoint.
    pub target: PortRef,
    /// Signal kind of the source port.
    pub signal: SignalKind,
}

impl Connection {
    /// Creates a connection without validating it.
    pub fn new(source: PortRef, target: PortRef, signal: SignalKind) -> Self {
        Self {
            source,
            target,
            signal,
        }
    }

    /// Returns `true` if this connection links exactly `source` to `target`.
    #[inline]
    pub fn links(&self, source: &PortRef, target: &PortRef) -> bool {
        &self.source == source && &self.target == target
    }

    /// Returns `true` if either endpoint belongs to `module`.
    pub fn touches(&self, module: &ModuleId) -> bool {
        self.source.is_owned_by(module) || self.target.is_owned_by(module)
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {} ({})", self.source, self.target, self.signal)
    }
}

/// Insertion-ordered collection of validated connections.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectionSet {
    entries: Vec<Connection>,
}

impl ConnectionSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and appends a connection.
    ///
    /// Nothing is mutated when the validator refuses; the [`Rejection`] names
    /// the rule that failed.
    pub fn add<L: ModuleLookup + ?Sized>(
        &mut self,
        source: PortRef,
        target: PortRef,
        modules: &L,
    ) -> Result<&Connection, Rejection> {
        let connection = validate::validate(&source, &target, self, modules)?;
        self.entries.push(connection);
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Removes the first connection linking `source` to `target`.
    ///
    /// Returns `false` when no such connection exists; that is not an error.
    pub fn remove(&mut self, source: &PortRef, target: &PortRef) -> bool {
        match self.entries.iter().position(|c| c.links(source, target)) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Removes every connection with an endpoint on `module`, returning how
    /// many were dropped.
    pub fn remove_module(&mut self, module: &ModuleId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|c| !c.touches(module));
        before - self.entries.len()
    }

    /// Connections in insertion order.
    #[inline]
    pub fn list(&self) -> &[Connection] {
        &self.entries
    }

    /// Returns `true` if `source → target` is present.
    pub fn contains(&self, source: &PortRef, target: &PortRef) -> bool {
        self.entries.iter().any(|c| c.links(source, target))
    }

    /// Number of connections.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no connections.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates connections in insertion order.
    pub fn iter(&self) -> core::slice::Iter<'_, Connection> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a ConnectionSet {
    type Item = &'a Connection;
    type IntoIter = core::slice::Iter<'a, Connection>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
