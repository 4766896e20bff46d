//! Add-time validation of proposed connections.
//!
//! Four rules, applied in order, stopping at the first failure:
//!
//! 1. [`direction_rule`]: the source is an output port; the target is an
//!    input port (or slot), a parameter target, or the destination.
//! 2. [`signal_rule`]: the source's signal kind may drive the target.
//! 3. [`duplicate_rule`]: no identical `(source, target)` pair exists, and an
//!    occupied bank slot takes no second source.
//! 4. [`self_loop_rule`]: source and target belong to different modules.
//!
//! Validation never mutates anything. [`validate`] returns the connection that
//! would be added; [`can_connect`] is its boolean form.

use core::fmt;

use thiserror::Error;

use crate::address::{PortRef, ResolveError, Side};
use crate::graph::connection::{Connection, ConnectionSet};
use crate::graph::module::{ModuleId, ModuleLookup};
use crate::schema::PortSpec;
use crate::signal::{Direction, SignalKind};

/// What a connection target accepts, as far as signal kinds go.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// An input port (or one slot of one) of the given kind.
    Port(SignalKind),
    /// A parameter target: `cv` only.
    Parameter,
    /// The destination: `audio` only.
    Destination,
}

impl TargetKind {
    /// Returns `true` if a source of kind `signal` may feed this target.
    pub const fn accepts(self, signal: SignalKind) -> bool {
        match self {
            TargetKind::Port(sink) => signal.can_drive(sink),
            TargetKind::Parameter => matches!(signal, SignalKind::Cv),
            TargetKind::Destination => matches!(signal, SignalKind::Audio),
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::Port(kind) => write!(f, "{kind} input"),
            TargetKind::Parameter => f.write_str("parameter target"),
            TargetKind::Destination => f.write_str("destination"),
        }
    }
}

/// Why an endpoint failed the direction rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectionFault {
    /// The reference names nothing that exists.
    #[error("does not resolve: {0}")]
    Unresolved(ResolveError),
    /// Used as a source but is not an output port.
    #[error("is not an output port")]
    NotASource,
    /// Used as a target but is an output port.
    #[error("is not an input, parameter, or destination")]
    NotASink,
}

/// The validator rule a rejected connection failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Rule 1.
    Direction,
    /// Rule 2.
    Signal,
    /// Rule 3.
    Duplicate,
    /// Rule 4.
    SelfLoop,
}

/// A proposed connection refused by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Rule 1 failed on one side.
    #[error("{side} '{reference}' {fault}")]
    Direction {
        /// Which end failed.
        side: Side,
        /// The endpoint as written.
        reference: String,
        /// What is wrong with it.
        fault: DirectionFault,
    },
    /// Rule 2 failed.
    #[error("{signal} output cannot drive a {target}")]
    Incompatible {
        /// Signal kind of the source port.
        signal: SignalKind,
        /// What the target accepts.
        target: TargetKind,
    },
    /// Rule 3 failed.
    #[error("{from} → {to} is already connected")]
    Duplicate {
        /// Source endpoint.
        from: PortRef,
        /// Target endpoint.
        to: PortRef,
    },
    /// Rule 4 failed.
    #[error("module '{0}' cannot feed itself")]
    SelfLoop(ModuleId),
}

impl Rejection {
    /// Which rule produced this rejection.
    pub fn rule(&self) -> Rule {
        match self {
            Rejection::Direction { .. } => Rule::Direction,
            Rejection::Incompatible { .. } => Rule::Signal,
            Rejection::Duplicate { .. } => Rule::Duplicate,
            Rejection::SelfLoop(_) => Rule::SelfLoop,
        }
    }

    /// Builds a direction rejection for an endpoint that did not resolve.
    pub fn unresolved(side: Side, reference: impl Into<String>, error: ResolveError) -> Self {
        Rejection::Direction {
            side,
            reference: reference.into(),
            fault: DirectionFault::Unresolved(error),
        }
    }
}

/// Looks up the port spec behind a `Port` or `Slot` reference.
fn port_spec<L: ModuleLookup + ?Sized>(
    module: &ModuleId,
    port: &str,
    modules: &L,
) -> Result<&'static PortSpec, ResolveError> {
    let schema = modules
        .schema_of(module)
        .ok_or_else(|| ResolveError::UnknownModule(module.clone()))?;
    schema.port(port).ok_or_else(|| ResolveError::UnknownPort {
        module: module.clone(),
        port: port.to_owned(),
    })
}

/// Resolves a source reference to its signal kind.
fn source_signal<L: ModuleLookup + ?Sized>(
    source: &PortRef,
    modules: &L,
) -> Result<SignalKind, DirectionFault> {
    match source {
        PortRef::Port { module, port } => {
            let spec = port_spec(module, port, modules).map_err(DirectionFault::Unresolved)?;
            if spec.direction == Direction::Source {
                Ok(spec.signal)
            } else {
                Err(DirectionFault::NotASource)
            }
        }
        PortRef::Slot { .. } | PortRef::Param { .. } | PortRef::Sink => {
            Err(DirectionFault::NotASource)
        }
    }
}

/// Resolves a target reference to what it accepts.
fn target_kind<L: ModuleLookup + ?Sized>(
    target: &PortRef,
    modules: &L,
) -> Result<TargetKind, DirectionFault> {
    match target {
        PortRef::Port { module, port } => {
            let spec = port_spec(module, port, modules).map_err(DirectionFault::Unresolved)?;
            if spec.direction != Direction::Sink {
                return Err(DirectionFault::NotASink);
            }
            if spec.is_multi_slot() {
                return Err(DirectionFault::Unresolved(ResolveError::SlotRequired {
                    module: module.clone(),
                    port: port.clone(),
                    slots: spec.slots,
                }));
            }
            Ok(TargetKind::Port(spec.signal))
        }
        PortRef::Slot {
            module,
            port,
            index,
        } => {
            let spec = port_spec(module, port, modules).map_err(DirectionFault::Unresolved)?;
            if spec.direction != Direction::Sink {
                return Err(DirectionFault::NotASink);
            }
            if !spec.is_multi_slot() {
                return Err(DirectionFault::Unresolved(ResolveError::NotMultiSlot {
                    module: module.clone(),
                    port: port.clone(),
                }));
            }
            if *index >= spec.slots {
                return Err(DirectionFault::Unresolved(ResolveError::SlotOutOfRange {
                    module: module.clone(),
                    port: port.clone(),
                    slot: index.saturating_add(1),
                    slots: spec.slots,
                }));
            }
            Ok(TargetKind::Port(spec.signal))
        }
        PortRef::Param { module, param } => {
            let schema = modules.schema_of(module).ok_or_else(|| {
                DirectionFault::Unresolved(ResolveError::UnknownModule(module.clone()))
            })?;
            if schema.has_param(param) {
                Ok(TargetKind::Parameter)
            } else {
                Err(DirectionFault::Unresolved(ResolveError::UnknownParam {
                    module: module.clone(),
                    param: param.clone(),
                }))
            }
        }
        PortRef::Sink => Ok(TargetKind::Destination),
    }
}

/// Rule 1. On success returns the source's signal kind and what the target
/// accepts, which [`signal_rule`] consumes.
pub fn direction_rule<L: ModuleLookup + ?Sized>(
    source: &PortRef,
    target: &PortRef,
    modules: &L,
) -> Result<(SignalKind, TargetKind), Rejection> {
    let signal = source_signal(source, modules).map_err(|fault| Rejection::Direction {
        side: Side::Source,
        reference: source.to_string(),
        fault,
    })?;
    let kind = target_kind(target, modules).map_err(|fault| Rejection::Direction {
        side: Side::Target,
        reference: target.to_string(),
        fault,
    })?;
    Ok((signal, kind))
}

/// Rule 2.
pub fn signal_rule(signal: SignalKind, target: TargetKind) -> Result<(), Rejection> {
    if target.accepts(signal) {
        Ok(())
    } else {
        Err(Rejection::Incompatible { signal, target })
    }
}

/// Rule 3. Each slot of a bank holds at most one connection, whatever its
/// source; other slots of the same bank stay free.
pub fn duplicate_rule(
    source: &PortRef,
    target: &PortRef,
    existing: &ConnectionSet,
) -> Result<(), Rejection> {
    if existing.contains(source, target) {
        return Err(Rejection::Duplicate {
            from: source.clone(),
            to: target.clone(),
        });
    }
    if let PortRef::Slot { .. } = target
        && let Some(occupant) = existing.iter().find(|c| &c.target == target)
    {
        return Err(Rejection::Duplicate {
            from: occupant.source.clone(),
            to: target.clone(),
        });
    }
    Ok(())
}

/// Rule 4. The destination has no owner and never triggers this rule.
pub fn self_loop_rule(source: &PortRef, target: &PortRef) -> Result<(), Rejection> {
    match (source.owner(), target.owner()) {
        (Some(a), Some(b)) if a == b => Err(Rejection::SelfLoop(a.clone())),
        _ => Ok(()),
    }
}

/// Runs all four rules and returns the connection that would be added.
pub fn validate<L: ModuleLookup + ?Sized>(
    source: &PortRef,
    target: &PortRef,
    existing: &ConnectionSet,
    modules: &L,
) -> Result<Connection, Rejection> {
    let (signal, kind) = direction_rule(source, target, modules)?;
    signal_rule(signal, kind)?;
    duplicate_rule(source, target, existing)?;
    self_loop_rule(source, target)?;
    Ok(Connection::new(source.clone(), target.clone(), signal))
}

/// Boolean form of [`validate`].
pub fn can_connect<L: ModuleLookup + ?Sized>(
    source: &PortRef,
    target: &PortRef,
    existing: &ConnectionSet,
    modules: &L,
) -> bool {
    validate(source, target, existing, modules).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::module::ModuleInstance;
    use crate::schema::ModuleSchema;

    static OSC: ModuleSchema = ModuleSchema {
        kind: "oscillator",
        ports: &[PortSpec::source("audio_out", SignalKind::Audio)],
        params: &["frequency"],
    };
    static FILTER: ModuleSchema = ModuleSchema {
        kind: "filter",
        ports: &[
            PortSpec::sink("audio_in", SignalKind::Audio),
            PortSpec::source("audio_out", SignalKind::Audio),
        ],
        params: &["frequency"],
    };
    static LFO: ModuleSchema = ModuleSchema {
        kind: "lfo",
        ports: &[PortSpec::source("cv_out", SignalKind::Cv)],
        params: &["rate"],
    };
    static ENV: ModuleSchema = ModuleSchema {
        kind: "envelope",
        ports: &[
            PortSpec::sink("gate_in", SignalKind::Gate),
            PortSpec::source("cv_out", SignalKind::Cv),
        ],
        params: &["attack"],
    };
    static CLOCK: ModuleSchema = ModuleSchema {
        kind: "clock",
        ports: &[PortSpec::source("gate_out", SignalKind::Gate)],
        params: &[],
    };
    static MIXER: ModuleSchema = ModuleSchema {
        kind: "mixer",
        ports: &[
            PortSpec::bank("inputs", SignalKind::Audio, 4),
            PortSpec::source("audio_out", SignalKind::Audio),
        ],
        params: &["volume"],
    };

    fn modules() -> Vec<ModuleInstance> {
        vec![
            ModuleInstance::new("osc-1".into(), &OSC),
            ModuleInstance::new("filt-1".into(), &FILTER),
            ModuleInstance::new("lfo-1".into(), &LFO),
            ModuleInstance::new("env-1".into(), &ENV),
            ModuleInstance::new("clock-1".into(), &CLOCK),
            ModuleInstance::new("mixer-1".into(), &MIXER),
        ]
    }

    fn rule_of(source: PortRef, target: PortRef, existing: &ConnectionSet) -> Option<Rule> {
        validate(&source, &target, existing, &modules())
            .err()
            .map(|r| r.rule())
    }

    fn out(module: &str, port: &str) -> PortRef {
        PortRef::port(module, port)
    }

    #[test]
    fn accepts_each_target_shape() {
        let set = ConnectionSet::new();
        assert_eq!(
            rule_of(out("osc-1", "audio_out"), out("filt-1", "audio_in"), &set),
            None
        );
        assert_eq!(rule_of(out("filt-1", "audio_out"), PortRef::Sink, &set), None);
        assert_eq!(
            rule_of(
                out("lfo-1", "cv_out"),
                PortRef::param("filt-1", "frequency"),
                &set
            ),
            None
        );
        assert_eq!(
            rule_of(
                out("osc-1", "audio_out"),
                PortRef::slot("mixer-1", "inputs", 3),
                &set
            ),
            None
        );
    }

    #[test]
    fn direction_rule_failures() {
        let set = ConnectionSet::new();
        // Input used as a source.
        let err = validate(
            &out("filt-1", "audio_in"),
            &PortRef::Sink,
            &set,
            &modules(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Rejection::Direction {
                side: Side::Source,
                fault: DirectionFault::NotASource,
                ..
            }
        ));
        // Output used as a target.
        let err = validate(
            &out("osc-1", "audio_out"),
            &out("filt-1", "audio_out"),
            &set,
            &modules(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Rejection::Direction {
                side: Side::Target,
                fault: DirectionFault::NotASink,
                ..
            }
        ));
        // Sink and params never emit.
        assert_eq!(
            rule_of(PortRef::Sink, out("filt-1", "audio_in"), &set),
            Some(Rule::Direction)
        );
        assert_eq!(
            rule_of(PortRef::param("filt-1", "frequency"), PortRef::Sink, &set),
            Some(Rule::Direction)
        );
    }

    #[test]
    fn unresolved_endpoints_fail_direction() {
        let set = ConnectionSet::new();
        let err = validate(
            &out("ghost", "audio_out"),
            &PortRef::Sink,
            &set,
            &modules(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            Rejection::unresolved(
                Side::Source,
                "ghost/audio_out",
                ResolveError::UnknownModule("ghost".into())
            )
        );
        assert_eq!(
            rule_of(
                out("osc-1", "audio_out"),
                PortRef::slot("mixer-1", "inputs", 4),
                &set
            ),
            Some(Rule::Direction)
        );
        assert_eq!(
            rule_of(
                out("lfo-1", "cv_out"),
                PortRef::param("filt-1", "cutoff"),
                &set
            ),
            Some(Rule::Direction)
        );
    }

    #[test]
    fn huge_slot_index_is_out_of_range() {
        let set = ConnectionSet::new();
        let err = validate(
            &out("osc-1", "audio_out"),
            &PortRef::slot("mixer-1", "inputs", usize::MAX),
            &set,
            &modules(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Rejection::Direction {
                side: Side::Target,
                fault: DirectionFault::Unresolved(ResolveError::SlotOutOfRange { .. }),
                ..
            }
        ));
    }

    #[test]
    fn signal_rule_is_asymmetric() {
        let set = ConnectionSet::new();
        let param = || PortRef::param("filt-1", "frequency");
        // cv may drive gate
        assert_eq!(
            rule_of(out("lfo-1", "cv_out"), out("env-1", "gate_in"), &set),
            None
        );
        // gate may drive gate
        assert_eq!(
            rule_of(out("clock-1", "gate_out"), out("env-1", "gate_in"), &set),
            None
        );
        // audio may not drive gate
        assert_eq!(
            rule_of(out("osc-1", "audio_out"), out("env-1", "gate_in"), &set),
            Some(Rule::Signal)
        );
        // gate may not drive a parameter
        assert_eq!(
            rule_of(out("clock-1", "gate_out"), param(), &set),
            Some(Rule::Signal)
        );
        // cv may not reach the destination
        assert_eq!(
            rule_of(out("lfo-1", "cv_out"), PortRef::Sink, &set),
            Some(Rule::Signal)
        );
        // audio may not drive a parameter
        assert_eq!(
            rule_of(out("osc-1", "audio_out"), param(), &set),
            Some(Rule::Signal)
        );
    }

    #[test]
    fn duplicate_rule_is_per_slot() {
        let m = modules();
        let mut set = ConnectionSet::new();
        set.add(
            out("osc-1", "audio_out"),
            PortRef::slot("mixer-1", "inputs", 0),
            &m,
        )
        .unwrap();
        assert_eq!(
            rule_of(
                out("osc-1", "audio_out"),
                PortRef::slot("mixer-1", "inputs", 0),
                &set
            ),
            Some(Rule::Duplicate)
        );
        assert_eq!(
            rule_of(
                out("osc-1", "audio_out"),
                PortRef::slot("mixer-1", "inputs", 1),
                &set
            ),
            None
        );
    }

    #[test]
    fn occupied_slot_refuses_another_source() {
        let m = modules();
        let mut set = ConnectionSet::new();
        set.add(
            out("osc-1", "audio_out"),
            PortRef::slot("mixer-1", "inputs", 0),
            &m,
        )
        .unwrap();

        let err = validate(
            &out("filt-1", "audio_out"),
            &PortRef::slot("mixer-1", "inputs", 0),
            &set,
            &m,
        )
        .unwrap_err();
        assert_eq!(
            err,
            Rejection::Duplicate {
                from: out("osc-1", "audio_out"),
                to: PortRef::slot("mixer-1", "inputs", 0),
            }
        );
        assert_eq!(
            rule_of(
                out("filt-1", "audio_out"),
                PortRef::slot("mixer-1", "inputs", 2),
                &set
            ),
            None
        );
        // Plain inputs still take any number of sources.
        set.add(out("osc-1", "audio_out"), out("filt-1", "audio_in"), &m)
            .unwrap();
        assert_eq!(
            rule_of(out("mixer-1", "audio_out"), out("filt-1", "audio_in"), &set),
            None
        );
    }

    #[test]
    fn self_loop_rule() {
        let set = ConnectionSet::new();
        let err = validate(
            &out("filt-1", "audio_out"),
            &out("filt-1", "audio_in"),
            &set,
            &modules(),
        )
        .unwrap_err();
        assert_eq!(err, Rejection::SelfLoop("filt-1".into()));
        assert_eq!(
            rule_of(out("env-1", "cv_out"), out("env-1", "gate_in"), &set),
            Some(Rule::SelfLoop)
        );
    }

    #[test]
    fn rules_short_circuit_in_order() {
        // Wrong direction and self-loop at once: direction wins.
        let set = ConnectionSet::new();
        assert_eq!(
            rule_of(out("filt-1", "audio_in"), out("filt-1", "audio_out"), &set),
            Some(Rule::Direction)
        );
        // Incompatible and self-loop: signal wins.
        assert_eq!(
            rule_of(
                out("mixer-1", "audio_out"),
                PortRef::param("mixer-1", "volume"),
                &set
            ),
            Some(Rule::Signal)
        );
    }

    #[test]
    fn rejection_messages_name_the_endpoint() {
        let set = ConnectionSet::new();
        let err = validate(
            &out("osc-1", "audio_out"),
            &out("env-1", "gate_in"),
            &set,
            &modules(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "audio output cannot drive a gate input");

        let err = validate(&out("nope", "out"), &PortRef::Sink, &set, &modules()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "source 'nope/out' does not resolve: unknown module 'nope'"
        );
    }
}
