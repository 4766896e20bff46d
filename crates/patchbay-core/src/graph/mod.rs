//! Patch topology and the graph compiler.
//!
//! The pieces, leaf-first:
//!
//! - [`module`]: module ids and instances.
//! - [`validate`]: the four add-time rules.
//! - [`connection`]: [`Connection`] and the ordered [`ConnectionSet`].
//! - [`compiler`]: teardown and replay onto an
//!   [`EngineBinding`](crate::binding::EngineBinding).
//! - [`patch`]: [`Patch`], which ties modules, connections and observers
//!   together behind a textual-address API.
//! - [`shared`]: [`SharedPatch`], the same behind one mutex.
//! - [`snapshot`]: the serializable export view.
//!
//! # Example
//!
//! ```rust
//! use patchbay_core::binding::RecordingBinding;
//! use patchbay_core::graph::Patch;
//! use patchbay_core::schema::{ModuleSchema, PortSpec};
//! use patchbay_core::signal::SignalKind;
//!
//! static OSC: ModuleSchema = ModuleSchema {
//!     kind: "oscillator",
//!     ports: &[PortSpec::source("audio_out", SignalKind::Audio)],
//!     params: &["frequency"],
//! };
//!
//! let mut patch = Patch::new();
//! patch.add_module("osc-1", &OSC).unwrap();
//! patch.propose_connection("osc-1/audio_out", "destination").unwrap();
//!
//! let mut binding = RecordingBinding::from_patch(&patch);
//! let report = patch.compile(&mut binding);
//! assert!(report.is_clean());
//! assert_eq!(binding.live_edges().len(), 1);
//! ```

pub mod compiler;
pub mod connection;
pub mod module;
pub mod patch;
pub mod shared;
pub mod snapshot;
pub mod validate;

pub use compiler::{CompileFailure, CompileReport, FailureCause};
pub use connection::{Connection, ConnectionSet};
pub use module::{ModuleId, ModuleInstance, ModuleLookup};
pub use patch::{Patch, PatchError};
pub use shared::SharedPatch;
pub use snapshot::{ConnectionRecord, ModuleDeclaration, PatchSnapshot};
pub use validate::{DirectionFault, Rejection, Rule, TargetKind, can_connect};
