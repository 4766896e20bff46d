//! Port addressing: textual addresses and their resolved form.
//!
//! Connections are written as text at the boundary and resolved against the
//! module schemas before they enter a [`ConnectionSet`](crate::ConnectionSet):
//!
//! | text                        | resolves to                      |
//! |-----------------------------|----------------------------------|
//! | `osc-1/audio_out`           | [`PortRef::Port`]                |
//! | `mixer-1/inputs/3`          | [`PortRef::Slot`] (index 2)      |
//! | `filt-1/frequency`          | [`PortRef::Param`]               |
//! | `destination`               | [`PortRef::Sink`]                |
//!
//! Slot indices are 1-based in text and 0-based in [`PortRef::Slot`]. A
//! two-segment address names a port if the schema declares one with that
//! name, otherwise a parameter target.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::graph::module::{ModuleId, ModuleLookup};

/// Textual name of the global audio sink.
pub const DESTINATION: &str = "destination";

/// Which end of a connection an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// The emitting end.
    Source,
    /// The receiving end.
    Target,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Source => f.write_str("source"),
            Side::Target => f.write_str("target"),
        }
    }
}

/// Errors from parsing a textual address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Blank input.
    #[error("address is empty")]
    Empty,
    /// Wrong number of `/`-separated segments, or an empty segment.
    #[error(
        "malformed address '{0}' (expected module/port, module/port/slot, module/parameter, or destination)"
    )]
    Malformed(String),
    /// Third segment is not a non-negative integer.
    #[error("invalid slot index '{slot}' in address '{address}'")]
    InvalidSlot {
        /// Whole address as written.
        address: String,
        /// The offending segment.
        slot: String,
    },
}

/// A parsed but unresolved address.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Address {
    /// The `destination` sentinel.
    Destination,
    /// `module/name`: a port or a parameter target, decided by the schema.
    Named {
        /// Owning module.
        module: ModuleId,
        /// Port or parameter name.
        name: String,
    },
    /// `module/port/slot`, with a 1-based slot.
    Slotted {
        /// Owning module.
        module: ModuleId,
        /// Port name.
        port: String,
        /// 1-based slot index as written.
        slot: usize,
    },
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AddressError::Empty);
        }
        if text == DESTINATION {
            return Ok(Address::Destination);
        }

        let parts: Vec<&str> = text.split('/').collect();
        if parts.iter().any(|p| p.trim().is_empty()) {
            return Err(AddressError::Malformed(text.to_owned()));
        }
        match parts.as_slice() {
            [module, name] => Ok(Address::Named {
                module: ModuleId::from(module.trim()),
                name: name.trim().to_owned(),
            }),
            [module, port, slot] => {
                let slot_text = slot.trim();
                let slot = slot_text
                    .parse::<usize>()
                    .map_err(|_| AddressError::InvalidSlot {
                        address: text.to_owned(),
                        slot: slot_text.to_owned(),
                    })?;
                Ok(Address::Slotted {
                    module: ModuleId::from(module.trim()),
                    port: port.trim().to_owned(),
                    slot,
                })
            }
            _ => Err(AddressError::Malformed(text.to_owned())),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Destination => f.write_str(DESTINATION),
            Address::Named { module, name } => write!(f, "{module}/{name}"),
            Address::Slotted { module, port, slot } => write!(f, "{module}/{port}/{slot}"),
        }
    }
}

/// A schema-resolved endpoint of a connection.
///
/// This is the closed set of target shapes the compiler dispatches over.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PortRef {
    /// A single-slot port.
    Port {
        /// Owning module.
        module: ModuleId,
        /// Port name.
        port: String,
    },
    /// One slot of a multi-slot sink.
    Slot {
        /// Owning module.
        module: ModuleId,
        /// Port name.
        port: String,
        /// 0-based slot index.
        index: usize,
    },
    /// A parameter target.
    Param {
        /// Owning module.
        module: ModuleId,
        /// Parameter name.
        param: String,
    },
    /// The global audio sink.
    Sink,
}

impl PortRef {
    /// Shorthand for [`PortRef::Port`].
    pub fn port(module: impl Into<ModuleId>, port: impl Into<String>) -> Self {
        PortRef::Port {
            module: module.into(),
            port: port.into(),
        }
    }

    /// Shorthand for [`PortRef::Slot`] with a 0-based index.
    pub fn slot(module: impl Into<ModuleId>, port: impl Into<String>, index: usize) -> Self {
        PortRef::Slot {
            module: module.into(),
            port: port.into(),
            index,
        }
    }

    /// Shorthand for [`PortRef::Param`].
    pub fn param(module: impl Into<ModuleId>, param: impl Into<String>) -> Self {
        PortRef::Param {
            module: module.into(),
            param: param.into(),
        }
    }

    /// Owning module, or `None` for the sink.
    pub fn owner(&self) -> Option<&ModuleId> {
        match self {
            PortRef::Port { module, .. }
            | PortRef::Slot { module, .. }
            | PortRef::Param { module, .. } => Some(module),
            PortRef::Sink => None,
        }
    }

    /// Returns `true` if this endpoint belongs to `module`.
    pub fn is_owned_by(&self, module: &ModuleId) -> bool {
        self.owner() == Some(module)
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortRef::Port { module, port } => write!(f, "{module}/{port}"),
            PortRef::Slot {
                module,
                port,
                index,
            } => write!(f, "{module}/{port}/{}", index.saturating_add(1)),
            PortRef::Param { module, param } => write!(f, "{module}/{param}"),
            PortRef::Sink => f.write_str(DESTINATION),
        }
    }
}

/// Failure to turn an address into a concrete endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No module with this id.
    #[error("unknown module '{0}'")]
    UnknownModule(ModuleId),
    /// Module exists but declares no such port.
    #[error("module '{module}' has no port '{port}'")]
    UnknownPort {
        /// Module id.
        module: ModuleId,
        /// Requested port.
        port: String,
    },
    /// Module exists but declares no such parameter.
    #[error("module '{module}' has no parameter '{param}'")]
    UnknownParam {
        /// Module id.
        module: ModuleId,
        /// Requested parameter.
        param: String,
    },
    /// Name matches neither a port nor a parameter.
    #[error("module '{module}' has no port or parameter named '{name}'")]
    UnknownTarget {
        /// Module id.
        module: ModuleId,
        /// Requested name.
        name: String,
    },
    /// 1-based slot outside `[1, slots]`.
    #[error("slot {slot} of '{module}/{port}' is out of range 1..={slots}")]
    SlotOutOfRange {
        /// Module id.
        module: ModuleId,
        /// Port name.
        port: String,
        /// Requested 1-based slot.
        slot: usize,
        /// Declared slot count.
        slots: usize,
    },
    /// A multi-slot port addressed without a slot index.
    #[error("port '{module}/{port}' has {slots} slots; address one as {module}/{port}/N")]
    SlotRequired {
        /// Module id.
        module: ModuleId,
        /// Port name.
        port: String,
        /// Declared slot count.
        slots: usize,
    },
    /// A slot reference on a port that has only one slot.
    #[error("port '{module}/{port}' is not a multi-slot port")]
    NotMultiSlot {
        /// Module id.
        module: ModuleId,
        /// Port name.
        port: String,
    },
    /// An endpoint shape that cannot emit signal (parameter, slot, sink).
    #[error("'{0}' cannot emit signal")]
    NotEmitting(String),
}

/// Resolves a parsed address against the modules known to `modules`.
///
/// A slotted address on a single-slot port resolves to the plain port when
/// the slot is `1`, so `filt-1/audio_in/1` and `filt-1/audio_in` denote the
/// same endpoint.
pub fn resolve<L: ModuleLookup + ?Sized>(
    address: &Address,
    modules: &L,
) -> Result<PortRef, ResolveError> {
    match address {
        Address::Destination => Ok(PortRef::Sink),
        Address::Named { module, name } => {
            let schema = modules
                .schema_of(module)
                .ok_or_else(|| ResolveError::UnknownModule(module.clone()))?;
            if let Some(spec) = schema.port(name) {
                if spec.is_multi_slot() {
                    return Err(ResolveError::SlotRequired {
                        module: module.clone(),
                        port: name.clone(),
                        slots: spec.slots,
                    });
                }
                Ok(PortRef::port(module.clone(), name.clone()))
            } else if schema.has_param(name) {
                Ok(PortRef::param(module.clone(), name.clone()))
            } else {
                Err(ResolveError::UnknownTarget {
                    module: module.clone(),
                    name: name.clone(),
                })
            }
        }
        Address::Slotted { module, port, slot } => {
            let schema = modules
                .schema_of(module)
                .ok_or_else(|| ResolveError::UnknownModule(module.clone()))?;
            let spec = schema.port(port).ok_or_else(|| ResolveError::UnknownPort {
                module: module.clone(),
                port: port.clone(),
            })?;
            if *slot == 0 || *slot > spec.slots {
                return Err(ResolveError::SlotOutOfRange {
                    module: module.clone(),
                    port: port.clone(),
                    slot: *slot,
                    slots: spec.slots,
                });
            }
            if spec.is_multi_slot() {
                Ok(PortRef::slot(module.clone(), port.clone(), slot - 1))
            } else {
                Ok(PortRef::port(module.clone(), port.clone()))
            }
        }
    }
}

/// Parses and resolves `text` in one step. [`AddressFault`] keeps the parse
/// and resolution layers apart.
pub fn resolve_str<L: ModuleLookup + ?Sized>(
    text: &str,
    modules: &L,
) -> Result<PortRef, AddressFault> {
    let address: Address = text.parse()?;
    Ok(resolve(&address, modules)?)
}

/// Either layer of address failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressFault {
    /// The text could not be parsed.
    #[error(transparent)]
    Parse(#[from] AddressError),
    /// The address parsed but names nothing that exists.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::module::ModuleInstance;
    use crate::schema::{ModuleSchema, PortSpec};
    use crate::signal::SignalKind;

    static FILTER: ModuleSchema = ModuleSchema {
        kind: "filter",
        ports: &[
            PortSpec::sink("audio_in", SignalKind::Audio),
            PortSpec::source("audio_out", SignalKind::Audio),
        ],
        params: &["frequency", "q"],
    };

    static MIXER: ModuleSchema = ModuleSchema {
        kind: "mixer",
        ports: &[
            PortSpec::bank("inputs", SignalKind::Audio, 8),
            PortSpec::source("audio_out", SignalKind::Audio),
        ],
        params: &["volume"],
    };

    fn modules() -> Vec<ModuleInstance> {
        vec![
            ModuleInstance::new("filt-1".into(), &FILTER),
            ModuleInstance::new("mixer-1".into(), &MIXER),
        ]
    }

    // --- parsing ---

    #[test]
    fn parses_every_shape() {
        assert_eq!("destination".parse::<Address>(), Ok(Address::Destination));
        assert_eq!(
            "filt-1/audio_in".parse::<Address>(),
            Ok(Address::Named {
                module: "filt-1".into(),
                name: "audio_in".into()
            })
        );
        assert_eq!(
            " mixer-1/inputs/3 ".parse::<Address>(),
            Ok(Address::Slotted {
                module: "mixer-1".into(),
                port: "inputs".into(),
                slot: 3
            })
        );
    }

    #[test]
    fn rejects_malformed_text() {
        assert_eq!("".parse::<Address>(), Err(AddressError::Empty));
        assert!(matches!(
            "osc-1".parse::<Address>(),
            Err(AddressError::Malformed(_))
        ));
        assert!(matches!(
            "a/b/c/d".parse::<Address>(),
            Err(AddressError::Malformed(_))
        ));
        assert!(matches!(
            "a//b".parse::<Address>(),
            Err(AddressError::Malformed(_))
        ));
        assert!(matches!(
            "mixer-1/inputs/two".parse::<Address>(),
            Err(AddressError::InvalidSlot { .. })
        ));
    }

    #[test]
    fn display_round_trips() {
        for text in ["destination", "filt-1/frequency", "mixer-1/inputs/4"] {
            let parsed: Address = text.parse().unwrap();
            assert_eq!(parsed.to_string(), text);
        }
    }

    // --- resolution ---

    #[test]
    fn named_prefers_port_then_param() {
        let m = modules();
        assert_eq!(
            resolve_str("filt-1/audio_in", &m),
            Ok(PortRef::port("filt-1", "audio_in"))
        );
        assert_eq!(
            resolve_str("filt-1/frequency", &m),
            Ok(PortRef::param("filt-1", "frequency"))
        );
        assert_eq!(resolve_str("destination", &m), Ok(PortRef::Sink));
    }

    #[test]
    fn slot_indices_are_one_based_at_the_boundary() {
        let m = modules();
        assert_eq!(
            resolve_str("mixer-1/inputs/1", &m),
            Ok(PortRef::slot("mixer-1", "inputs", 0))
        );
        assert_eq!(
            resolve_str("mixer-1/inputs/8", &m),
            Ok(PortRef::slot("mixer-1", "inputs", 7))
        );
        assert_eq!(PortRef::slot("mixer-1", "inputs", 7).to_string(), "mixer-1/inputs/8");
    }

    #[test]
    fn slot_out_of_range() {
        let m = modules();
        for slot in [0, 9] {
            let err = resolve_str(&format!("mixer-1/inputs/{slot}"), &m).unwrap_err();
            assert_eq!(
                err,
                AddressFault::Resolve(ResolveError::SlotOutOfRange {
                    module: "mixer-1".into(),
                    port: "inputs".into(),
                    slot,
                    slots: 8,
                })
            );
        }
    }

    #[test]
    fn multi_slot_port_needs_a_slot() {
        let m = modules();
        assert!(matches!(
            resolve_str("mixer-1/inputs", &m),
            Err(AddressFault::Resolve(ResolveError::SlotRequired { slots: 8, .. }))
        ));
    }

    #[test]
    fn slot_one_on_single_port_is_the_port() {
        let m = modules();
        assert_eq!(
            resolve_str("filt-1/audio_in/1", &m),
            Ok(PortRef::port("filt-1", "audio_in"))
        );
        assert!(resolve_str("filt-1/audio_in/2", &m).is_err());
    }

    #[test]
    fn unknown_names() {
        let m = modules();
        assert_eq!(
            resolve_str("osc-9/audio_out", &m),
            Err(AddressFault::Resolve(ResolveError::UnknownModule(
                "osc-9".into()
            )))
        );
        assert!(matches!(
            resolve_str("filt-1/resonance", &m),
            Err(AddressFault::Resolve(ResolveError::UnknownTarget { .. }))
        ));
        assert!(matches!(
            resolve_str("filt-1/frequency/1", &m),
            Err(AddressFault::Resolve(ResolveError::UnknownPort { .. }))
        ));
    }

    #[test]
    fn owner_of_each_shape() {
        assert_eq!(PortRef::port("a", "x").owner(), Some(&ModuleId::from("a")));
        assert_eq!(PortRef::param("b", "x").owner(), Some(&ModuleId::from("b")));
        assert_eq!(PortRef::Sink.owner(), None);
    }
}
