//! Graph compiler: rebuilds live engine wiring from a [`ConnectionSet`].
//!
//! Each compile runs two phases and keeps no state between runs:
//!
//! 1. **Teardown**: `disconnect()` every object registered in the binding.
//! 2. **Replay**: walk the connections in insertion order, resolve both ends
//!    against the binding, and issue one `connect` per connection.
//!
//! A full rebuild is always performed. Replay failures are isolated per
//! connection: the failing connection is skipped, logged, and reported in the
//! [`CompileReport`], and the remaining connections are still wired.

use thiserror::Error;

use crate::address::{PortRef, ResolveError, Side};
use crate::binding::{EngineBinding, EngineError, EngineModule, SourceHandle, TargetHandle};
use crate::graph::connection::{Connection, ConnectionSet};
use crate::graph::module::ModuleId;

/// Why one connection could not be wired.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureCause {
    /// An endpoint has no counterpart in the binding.
    #[error("{side} does not resolve: {error}")]
    Unresolved {
        /// Which end.
        side: Side,
        /// What was missing.
        error: ResolveError,
    },
    /// The engine refused the `connect` call.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// A connection skipped during replay.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("connection #{index} ({connection}) skipped: {cause}")]
pub struct CompileFailure {
    /// Position in the connection set.
    pub index: usize,
    /// The connection as stored.
    pub connection: Connection,
    /// What went wrong.
    pub cause: FailureCause,
}

/// Outcome of one compile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileReport {
    /// Objects disconnected during teardown.
    pub torn_down: usize,
    /// Connections wired during replay.
    pub wired: usize,
    /// Connections skipped during replay, in replay order.
    pub failures: Vec<CompileFailure>,
}

impl CompileReport {
    /// Returns `true` if every connection was wired.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Resolves the emitting end of a connection against the binding.
pub fn resolve_source<B: EngineBinding + ?Sized>(
    source: &PortRef,
    binding: &B,
) -> Result<SourceHandle, ResolveError> {
    let PortRef::Port { module, port } = source else {
        return Err(ResolveError::NotEmitting(source.to_string()));
    };
    let object = engine_object(binding, module)?;
    if !object.has_output(port) {
        return Err(ResolveError::UnknownPort {
            module: module.clone(),
            port: port.clone(),
        });
    }
    Ok(SourceHandle {
        module: module.clone(),
        port: port.clone(),
    })
}

fn engine_object<'b, B: EngineBinding + ?Sized>(
    binding: &'b B,
    module: &ModuleId,
) -> Result<&'b dyn EngineModule, ResolveError> {
    binding
        .module(module)
        .ok_or_else(|| ResolveError::UnknownModule(module.clone()))
}

/// Resolves the receiving end of a connection against the binding.
///
/// Slot indices are already 0-based here.
pub fn resolve_target<B: EngineBinding + ?Sized>(
    target: &PortRef,
    binding: &B,
) -> Result<TargetHandle, ResolveError> {
    match target {
        PortRef::Port { module, port } => {
            engine_object(binding, module)?
                .input(port)
                .ok_or_else(|| ResolveError::UnknownPort {
                    module: module.clone(),
                    port: port.clone(),
                })
        }
        PortRef::Slot {
            module,
            port,
            index,
        } => {
            let object = engine_object(binding, module)?;
            let slots = object.slot_count(port);
            if slots == 0 {
                return Err(ResolveError::UnknownPort {
                    module: module.clone(),
                    port: port.clone(),
                });
            }
            object
                .slot(port, *index)
                .ok_or_else(|| ResolveError::SlotOutOfRange {
                    module: module.clone(),
                    port: port.clone(),
                    slot: index.saturating_add(1),
                    slots,
                })
        }
        PortRef::Param { module, param } => {
            engine_object(binding, module)?
                .param(param)
                .ok_or_else(|| ResolveError::UnknownParam {
                    module: module.clone(),
                    param: param.clone(),
                })
        }
        PortRef::Sink => Ok(binding.destination()),
    }
}

/// Disconnects every object in the binding. Returns how many were reset.
pub fn teardown<B: EngineBinding + ?Sized>(binding: &mut B) -> usize {
    let ids = binding.module_ids();
    let mut count = 0;
    for id in &ids {
        if let Some(object) = binding.module_mut(id) {
            object.disconnect();
            count += 1;
        }
    }
    tracing::debug!(objects = count, "compile: teardown complete");
    count
}

/// Wires one connection.
fn wire<B: EngineBinding + ?Sized>(
    connection: &Connection,
    binding: &mut B,
) -> Result<(SourceHandle, TargetHandle), FailureCause> {
    let source = resolve_source(&connection.source, &*binding).map_err(|error| {
        FailureCause::Unresolved {
            side: Side::Source,
            error,
        }
    })?;
    let target = resolve_target(&connection.target, &*binding).map_err(|error| {
        FailureCause::Unresolved {
            side: Side::Target,
            error,
        }
    })?;
    let object = binding
        .module_mut(&source.module)
        .ok_or_else(|| FailureCause::Unresolved {
            side: Side::Source,
            error: ResolveError::UnknownModule(source.module.clone()),
        })?;
    object.connect(&source.port, &target)?;
    Ok((source, target))
}

/// Replays `connections` in insertion order onto a torn-down binding.
pub fn replay<B: EngineBinding + ?Sized>(
    connections: &ConnectionSet,
    binding: &mut B,
) -> (usize, Vec<CompileFailure>) {
    let mut wired = 0;
    let mut failures = Vec::new();
    for (index, connection) in connections.iter().enumerate() {
        match wire(connection, binding) {
            Ok((source, target)) => {
                wired += 1;
                tracing::debug!(
                    index,
                    %source,
                    %target,
                    signal = %connection.signal,
                    "compile: wired"
                );
            }
            Err(cause) => {
                tracing::warn!(
                    index,
                    source = %connection.source,
                    target = %connection.target,
                    signal = %connection.signal,
                    error = %cause,
                    "compile: skipping connection"
                );
                failures.push(CompileFailure {
                    index,
                    connection: connection.clone(),
                    cause,
                });
            }
        }
    }
    (wired, failures)
}

/// Makes the binding's live wiring match `connections` exactly.
pub fn compile<B: EngineBinding + ?Sized>(
    connections: &ConnectionSet,
    binding: &mut B,
) -> CompileReport {
    let span = tracing::debug_span!("compile", connections = connections.len());
    let _guard = span.enter();

    let torn_down = teardown(binding);
    let (wired, failures) = replay(connections, binding);

    tracing::debug!(wired, failed = failures.len(), "compile: replay complete");
    CompileReport {
        torn_down,
        wired,
        failures,
    }
}
