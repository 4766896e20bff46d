//! In-memory engine binding that records live edges.

use std::collections::{BTreeMap, BTreeSet};

use super::{EngineBinding, EngineError, EngineModule, SourceHandle, TargetHandle};
use crate::graph::Patch;
use crate::graph::module::{ModuleId, ModuleInstance};

/// One live connection inside a [`RecordingBinding`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LiveEdge {
    /// Emitting output.
    pub from: SourceHandle,
    /// Receiving handle.
    pub to: TargetHandle,
}

/// Per-slot input gain owned by a bank.
#[derive(Clone, Debug)]
struct SlotGain {
    handle: TargetHandle,
    resets: usize,
}

/// A processing object that remembers what it is connected to.
#[derive(Clone, Debug)]
pub struct RecordingModule {
    id: ModuleId,
    outputs: Vec<String>,
    inputs: Vec<String>,
    banks: BTreeMap<String, Vec<SlotGain>>,
    params: Vec<String>,
    live: Vec<LiveEdge>,
    ready: bool,
    connects: usize,
    disconnects: usize,
}

impl RecordingModule {
    /// Creates an object with no ports.
    pub fn new(id: impl Into<ModuleId>) -> Self {
        Self {
            id: id.into(),
            outputs: Vec::new(),
            inputs: Vec::new(),
            banks: BTreeMap::new(),
            params: Vec::new(),
            live: Vec::new(),
            ready: true,
            connects: 0,
            disconnects: 0,
        }
    }

    /// Creates an object exposing exactly what `instance`'s schema declares.
    pub fn from_instance(instance: &ModuleInstance) -> Self {
        let mut module = Self::new(instance.id().clone());
        for spec in instance.schema().sources() {
            module = module.with_output(spec.name);
        }
        for spec in instance.schema().sinks() {
            module = if spec.is_multi_slot() {
                module.with_bank(spec.name, spec.slots)
            } else {
                module.with_input(spec.name)
            };
        }
        for &param in instance.params() {
            module = module.with_param(param);
        }
        module
    }

    /// Adds an output.
    pub fn with_output(mut self, port: impl Into<String>) -> Self {
        self.outputs.push(port.into());
        self
    }

    /// Adds a plain input.
    pub fn with_input(mut self, port: impl Into<String>) -> Self {
        self.inputs.push(port.into());
        self
    }

    /// Adds a bank of `slots` per-slot inputs.
    pub fn with_bank(mut self, port: impl Into<String>, slots: usize) -> Self {
        let port = port.into();
        let gains = (0..slots)
            .map(|index| SlotGain {
                handle: TargetHandle::Slot {
                    module: self.id.clone(),
                    port: port.clone(),
                    index,
                },
                resets: 0,
            })
            .collect();
        self.banks.insert(port, gains);
        self
    }

    /// Adds an automatable parameter.
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.params.push(param.into());
        self
    }

    /// While not ready, every `connect` fails with [`EngineError::NotReady`].
    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// Object id.
    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    /// Live edges emitted by this object, in connection order.
    pub fn live(&self) -> &[LiveEdge] {
        &self.live
    }

    /// Total successful `connect` calls.
    pub fn connect_calls(&self) -> usize {
        self.connects
    }

    /// Total `disconnect` calls.
    pub fn disconnect_calls(&self) -> usize {
        self.disconnects
    }

    /// How many times each slot gain of bank `port` has been reset.
    pub fn slot_resets(&self, port: &str) -> Vec<usize> {
        self.banks
            .get(port)
            .map(|gains| gains.iter().map(|g| g.resets).collect())
            .unwrap_or_default()
    }
}

impl EngineModule for RecordingModule {
    fn has_output(&self, port: &str) -> bool {
        self.outputs.iter().any(|p| p == port)
    }

    fn input(&self, port: &str) -> Option<TargetHandle> {
        self.inputs
            .iter()
            .any(|p| p == port)
            .then(|| TargetHandle::Input {
                module: self.id.clone(),
                port: port.to_owned(),
            })
    }

    fn slot_count(&self, port: &str) -> usize {
        self.banks.get(port).map_or(0, Vec::len)
    }

    fn slot(&self, port: &str, index: usize) -> Option<TargetHandle> {
        self.banks
            .get(port)
            .and_then(|gains| gains.get(index))
            .map(|g| g.handle.clone())
    }

    fn param(&self, name: &str) -> Option<TargetHandle> {
        self.params
            .iter()
            .any(|p| p == name)
            .then(|| TargetHandle::Param {
                module: self.id.clone(),
                param: name.to_owned(),
            })
    }

    fn connect(&mut self, port: &str, target: &TargetHandle) -> Result<(), EngineError> {
        if !self.ready {
            return Err(EngineError::NotReady(self.id.clone()));
        }
        if !self.has_output(port) {
            return Err(EngineError::Refused {
                module: self.id.clone(),
                reason: format!("no output named '{port}'"),
            });
        }
        self.live.push(LiveEdge {
            from: SourceHandle {
                module: self.id.clone(),
                port: port.to_owned(),
            },
            to: target.clone(),
        });
        self.connects += 1;
        Ok(())
    }

    fn disconnect(&mut self) {
        self.live.clear();
        for gain in self.banks.values_mut().flatten() {
            gain.resets += 1;
        }
        self.disconnects += 1;
    }
}

/// Engine binding backed by [`RecordingModule`]s.
#[derive(Clone, Debug, Default)]
pub struct RecordingBinding {
    modules: BTreeMap<ModuleId, RecordingModule>,
}

impl RecordingBinding {
    /// Creates an empty binding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates one recording object per module in `patch`.
    pub fn from_patch(patch: &Patch) -> Self {
        let mut binding = Self::new();
        binding.sync(patch);
        binding
    }

    /// Registers an object, returning the one it replaced.
    pub fn insert(&mut self, module: RecordingModule) -> Option<RecordingModule> {
        self.modules.insert(module.id().clone(), module)
    }

    /// Unregisters an object.
    pub fn remove(&mut self, id: &ModuleId) -> Option<RecordingModule> {
        self.modules.remove(id)
    }

    /// Creates objects for modules new to `patch` and drops objects whose
    /// module is gone. Existing objects keep their state.
    pub fn sync(&mut self, patch: &Patch) {
        self.modules
            .retain(|id, _| patch.module(id).is_some());
        for instance in patch.modules() {
            self.modules
                .entry(instance.id().clone())
                .or_insert_with(|| RecordingModule::from_instance(instance));
        }
    }

    /// Looks up an object.
    pub fn get(&self, id: &ModuleId) -> Option<&RecordingModule> {
        self.modules.get(id)
    }

    /// Looks up an object mutably.
    pub fn get_mut(&mut self, id: &ModuleId) -> Option<&mut RecordingModule> {
        self.modules.get_mut(id)
    }

    /// Number of registered objects.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns `true` if no objects are registered.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Every live edge, grouped by emitting module in id order.
    pub fn live_edges(&self) -> Vec<LiveEdge> {
        self.modules
            .values()
            .flat_map(|m| m.live().iter().cloned())
            .collect()
    }

    /// Every live edge as a set, for order-insensitive comparisons.
    pub fn edge_set(&self) -> BTreeSet<LiveEdge> {
        self.modules
            .values()
            .flat_map(|m| m.live().iter().cloned())
            .collect()
    }

    /// Sum of successful `connect` calls across all objects.
    pub fn connect_calls(&self) -> usize {
        self.modules.values().map(RecordingModule::connect_calls).sum()
    }

    /// Sum of `disconnect` calls across all objects.
    pub fn disconnect_calls(&self) -> usize {
        self.modules
            .values()
            .map(RecordingModule::disconnect_calls)
            .sum()
    }
}

impl EngineBinding for RecordingBinding {
    fn module_ids(&self) -> Vec<ModuleId> {
        self.modules.keys().cloned().collect()
    }

    fn module(&self, id: &ModuleId) -> Option<&dyn EngineModule> {
        self.modules.get(id).map(|m| m as &dyn EngineModule)
    }

    fn module_mut(&mut self, id: &ModuleId) -> Option<&mut dyn EngineModule> {
        self.modules.get_mut(id).map(|m| m as &mut dyn EngineModule)
    }

    fn module_added(&mut self, instance: &ModuleInstance) {
        self.modules
            .entry(instance.id().clone())
            .or_insert_with(|| RecordingModule::from_instance(instance));
    }

    fn module_removed(&mut self, id: &ModuleId) {
        self.modules.remove(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixer() -> RecordingModule {
        RecordingModule::new("mixer-1")
            .with_bank("inputs", 3)
            .with_output("audio_out")
            .with_param("volume")
    }

    #[test]
    fn handles_follow_declarations() {
        let m = mixer();
        assert_eq!(m.slot_count("inputs"), 3);
        assert_eq!(m.slot_count("audio_out"), 0);
        assert_eq!(
            m.slot("inputs", 2),
            Some(TargetHandle::Slot {
                module: "mixer-1".into(),
                port: "inputs".into(),
                index: 2
            })
        );
        assert!(m.slot("inputs", 3).is_none());
        assert!(m.input("inputs").is_none());
        assert!(m.param("volume").is_some());
        assert!(m.param("pan").is_none());
    }

    #[test]
    fn disconnect_resets_slot_gains() {
        let mut m = mixer();
        m.connect("audio_out", &TargetHandle::Destination).unwrap();
        assert_eq!(m.live().len(), 1);

        m.disconnect();
        assert!(m.live().is_empty());
        assert_eq!(m.slot_resets("inputs"), [1, 1, 1]);
        assert_eq!(m.disconnect_calls(), 1);
    }

    #[test]
    fn connect_failures() {
        let mut m = mixer();
        assert!(matches!(
            m.connect("nope", &TargetHandle::Destination),
            Err(EngineError::Refused { .. })
        ));
        m.set_ready(false);
        assert_eq!(
            m.connect("audio_out", &TargetHandle::Destination),
            Err(EngineError::NotReady("mixer-1".into()))
        );
        assert_eq!(m.connect_calls(), 0);
    }

    #[test]
    fn binding_registry() {
        let mut binding = RecordingBinding::new();
        assert!(binding.insert(mixer()).is_none());
        assert!(binding.insert(RecordingModule::new("osc-1").with_output("audio_out")).is_none());
        assert_eq!(binding.module_ids(), vec![ModuleId::from("mixer-1"), ModuleId::from("osc-1")]);
        assert!(binding.module(&"osc-1".into()).unwrap().has_output("audio_out"));
        assert!(binding.remove(&"osc-1".into()).is_some());
        assert_eq!(binding.len(), 1);
    }
}
