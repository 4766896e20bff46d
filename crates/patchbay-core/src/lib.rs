//! Patchbay Core - typed signal routing for modular patches
//!
//! This crate owns the part of a modular patcher that sits between the user's
//! gestures and the live audio engine: what may be connected to what, and how
//! the engine is rewired after every edit.
//!
//! # Core Abstractions
//!
//! ## Schema
//!
//! - [`SignalKind`] - `audio`, `cv` and `gate`, with the drive table
//! - [`PortSpec`] / [`ModuleSchema`] - static per-kind port and parameter tables
//!
//! ## Topology
//!
//! - [`PortRef`] - tagged endpoint: port, slot, parameter, or the destination
//! - [`ConnectionSet`] - insertion-ordered, validated connections
//! - [`Rejection`] - which of the four validator rules refused a connection
//! - [`Patch`] - modules + connections behind a textual-address API
//!
//! ## Engine
//!
//! - [`EngineBinding`] / [`EngineModule`] - the boundary to live objects
//! - [`compile`](graph::compiler::compile) - teardown then full replay
//! - [`RecordingBinding`] - in-memory binding for tests and dry runs
//! - [`SharedPatch`] - patch and binding behind one mutex
//!
//! # Addresses
//!
//! Endpoints are written as `module/port`, `module/port/slot` (1-based),
//! `module/parameter`, or `destination`. See [`address`].
//!
//! # Known limitations
//!
//! Cycles are not detected. Feedback through parameter targets (an LFO whose
//! rate is modulated by a module it feeds) is accepted and wired as is.

pub mod address;
pub mod binding;
pub mod graph;
pub mod observer;
pub mod schema;
pub mod signal;

pub use address::{Address, AddressError, AddressFault, PortRef, ResolveError, Side};
pub use binding::{
    EngineBinding, EngineError, EngineModule, LiveEdge, RecordingBinding, RecordingModule,
    SourceHandle, TargetHandle,
};
pub use graph::{
    CompileFailure, CompileReport, Connection, ConnectionRecord, ConnectionSet, FailureCause,
    ModuleDeclaration, ModuleId, ModuleInstance, ModuleLookup, Patch, PatchError, PatchSnapshot,
    Rejection, Rule, SharedPatch,
};
pub use observer::{TopologyEvent, TopologyLog, TopologyObserver, TopologyUpdate};
pub use schema::{ModuleSchema, PortSpec};
pub use signal::{Direction, SignalKind};
