//! Static port schema: which ports and parameter targets a module kind declares.
//!
//! Schemas are `'static` tables owned by whoever catalogues module kinds (see
//! the `patchbay-registry` crate). A [`ModuleSchema`] never changes at runtime;
//! every instance of a kind shares the same table.

use crate::signal::{Direction, SignalKind};

/// Declaration of one port on a module kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortSpec {
    /// Port name, unique within its module kind.
    pub name: &'static str,
    /// Whether the port emits or receives signal.
    pub direction: Direction,
    /// Signal carried by the port.
    pub signal: SignalKind,
    /// Number of independently addressable slots. Always ≥ 1; values above 1
    /// mark a multi-slot sink.
    pub slots: usize,
}

impl PortSpec {
    /// Declares a single-slot output.
    pub const fn source(name: &'static str, signal: SignalKind) -> Self {
        Self {
            name,
            direction: Direction::Source,
            signal,
            slots: 1,
        }
    }

    /// Declares a single-slot input.
    pub const fn sink(name: &'static str, signal: SignalKind) -> Self {
        Self {
            name,
            direction: Direction::Sink,
            signal,
            slots: 1,
        }
    }

    /// Declares a multi-slot input bank (e.g. the channel inputs of a mixer).
    ///
    /// # Panics
    ///
    /// Panics at compile time (in const context) if `slots` is zero.
    pub const fn bank(name: &'static str, signal: SignalKind, slots: usize) -> Self {
        assert!(slots > 0, "a port bank needs at least one slot");
        Self {
            name,
            direction: Direction::Sink,
            signal,
            slots,
        }
    }

    /// Returns `true` for ports that take a slot index.
    #[inline]
    pub const fn is_multi_slot(&self) -> bool {
        self.slots > 1
    }
}

/// Ports and parameter targets declared by one module kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModuleSchema {
    /// Kind identifier (e.g. `"filter"`).
    pub kind: &'static str,
    /// Declared ports.
    pub ports: &'static [PortSpec],
    /// Automatable controls that accept `cv` directly.
    pub params: &'static [&'static str],
}

impl ModuleSchema {
    /// Looks up a port by name.
    pub fn port(&self, name: &str) -> Option<&'static PortSpec> {
        self.ports.iter().find(|p| p.name == name)
    }

    /// Returns `true` if `name` is a declared parameter target.
    pub fn has_param(&self, name: &str) -> bool {
        self.params.contains(&name)
    }

    /// Output ports, in declaration order.
    pub fn sources(&self) -> impl Iterator<Item = &'static PortSpec> {
        self.ports
            .iter()
            .filter(|p| p.direction == Direction::Source)
    }

    /// Input ports, in declaration order.
    pub fn sinks(&self) -> impl Iterator<Item = &'static PortSpec> {
        self.ports.iter().filter(|p| p.direction == Direction::Sink)
    }
}
