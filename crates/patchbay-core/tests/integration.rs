//! Integration tests for patchbay-core.
//!
//! Exercises the full path from textual gestures through validation, the
//! connection set and the compiler to a recording binding: the voice scenario,
//! compile idempotence, per-connection failure isolation, multi-slot
//! occupancy, and the shared handle under concurrent edits.

use std::thread;

use patchbay_core::{
    EngineBinding, FailureCause, LiveEdge, ModuleSchema, Patch, PortRef, PortSpec,
    RecordingBinding, RecordingModule, ResolveError, Rule, SharedPatch, Side, SignalKind,
    SourceHandle, TargetHandle, TopologyLog,
};

static OSCILLATOR: ModuleSchema = ModuleSchema {
    kind: "oscillator",
    ports: &[
        PortSpec::sink("frequency_cv", SignalKind::Cv),
        PortSpec::source("audio_out", SignalKind::Audio),
    ],
    params: &["frequency", "detune"],
};

static FILTER: ModuleSchema = ModuleSchema {
    kind: "filter",
    ports: &[
        PortSpec::sink("audio_in", SignalKind::Audio),
        PortSpec::source("audio_out", SignalKind::Audio),
    ],
    params: &["frequency", "q"],
};

static LFO: ModuleSchema = ModuleSchema {
    kind: "lfo",
    ports: &[PortSpec::source("cv_out", SignalKind::Cv)],
    params: &["rate"],
};

static MIXER: ModuleSchema = ModuleSchema {
    kind: "mixer",
    ports: &[
        PortSpec::bank("inputs", SignalKind::Audio, 8),
        PortSpec::source("audio_out", SignalKind::Audio),
    ],
    params: &["volume"],
};

fn voice() -> Patch {
    let mut patch = Patch::new();
    patch.add_module("osc-1", &OSCILLATOR).unwrap();
    patch.add_module("filt-1", &FILTER).unwrap();
    patch.add_module("lfo-1", &LFO).unwrap();
    patch
}

fn edge(from: (&str, &str), to: TargetHandle) -> LiveEdge {
    LiveEdge {
        from: SourceHandle {
            module: from.0.into(),
            port: from.1.into(),
        },
        to,
    }
}

// ============================================================================
// 1. Voice scenario
// ============================================================================

#[test]
fn voice_compiles_to_three_calls_then_two() {
    let mut patch = voice();
    patch
        .propose_connection("osc-1/audio_out", "filt-1/audio_in")
        .unwrap();
    patch
        .propose_connection("filt-1/audio_out", "destination")
        .unwrap();
    patch
        .propose_connection("lfo-1/cv_out", "filt-1/frequency")
        .unwrap();

    let mut binding = RecordingBinding::from_patch(&patch);
    let report = patch.compile(&mut binding);
    assert!(report.is_clean());
    assert_eq!(report.wired, 3);
    assert_eq!(binding.connect_calls(), 3);
    assert_eq!(binding.disconnect_calls(), 3);

    let edges = binding.edge_set();
    assert!(edges.contains(&edge(
        ("osc-1", "audio_out"),
        TargetHandle::Input {
            module: "filt-1".into(),
            port: "audio_in".into()
        }
    )));
    assert!(edges.contains(&edge(("filt-1", "audio_out"), TargetHandle::Destination)));
    assert!(edges.contains(&edge(
        ("lfo-1", "cv_out"),
        TargetHandle::Param {
            module: "filt-1".into(),
            param: "frequency".into()
        }
    )));

    assert!(patch
        .remove_connection("osc-1/audio_out", "filt-1/audio_in")
        .unwrap());
    let report = patch.compile(&mut binding);
    assert_eq!(report.wired, 2);
    assert_eq!(binding.live_edges().len(), 2);
    assert_eq!(binding.connect_calls(), 5);
}

// ============================================================================
// 2. Idempotence
// ============================================================================

#[test]
fn compiling_twice_yields_the_same_edges() {
    let mut patch = voice();
    patch
        .propose_connection("osc-1/audio_out", "filt-1/audio_in")
        .unwrap();
    patch
        .propose_connection("lfo-1/cv_out", "osc-1/frequency_cv")
        .unwrap();
    patch
        .propose_connection("filt-1/audio_out", "destination")
        .unwrap();

    let mut binding = RecordingBinding::from_patch(&patch);
    patch.compile(&mut binding);
    let first = binding.live_edges();
    patch.compile(&mut binding);
    assert_eq!(binding.live_edges(), first);
    assert_eq!(first.len(), 3);
}

#[test]
fn empty_patch_compiles_to_nothing() {
    let mut patch = voice();
    let mut binding = RecordingBinding::from_patch(&patch);
    let report = patch.compile(&mut binding);
    assert_eq!(report.wired, 0);
    assert_eq!(report.torn_down, 3);
    assert!(binding.live_edges().is_empty());
}

// ============================================================================
// 3. Partial-failure isolation
// ============================================================================

#[test]
fn one_missing_object_skips_exactly_one_connection() {
    let mut patch = voice();
    patch
        .propose_connection("osc-1/audio_out", "filt-1/audio_in")
        .unwrap();
    patch
        .propose_connection("lfo-1/cv_out", "filt-1/q")
        .unwrap();
    patch
        .propose_connection("filt-1/audio_out", "destination")
        .unwrap();

    let mut binding = RecordingBinding::from_patch(&patch);
    binding.remove(&"lfo-1".into());
    let log = TopologyLog::new();
    patch.add_observer(log.clone());

    let report = patch.compile(&mut binding);
    assert_eq!(report.wired, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].index, 1);
    assert_eq!(
        report.failures[0].cause,
        FailureCause::Unresolved {
            side: Side::Source,
            error: ResolveError::UnknownModule("lfo-1".into())
        }
    );
    assert_eq!(log.last().unwrap().failures, report.failures);
}

#[test]
fn missing_parameter_on_live_object_is_a_target_failure() {
    let mut patch = voice();
    patch
        .propose_connection("lfo-1/cv_out", "filt-1/frequency")
        .unwrap();
    let mut binding = RecordingBinding::from_patch(&patch);
    binding.insert(
        RecordingModule::new("filt-1")
            .with_input("audio_in")
            .with_output("audio_out"),
    );

    let report = patch.compile(&mut binding);
    assert!(matches!(
        report.failures[0].cause,
        FailureCause::Unresolved {
            side: Side::Target,
            error: ResolveError::UnknownParam { .. }
        }
    ));
}

// ============================================================================
// 4. Multi-slot independence
// ============================================================================

#[test]
fn slots_are_independent_endpoints() {
    let mut patch = Patch::new();
    patch.add_module("osc-1", &OSCILLATOR).unwrap();
    patch.add_module("osc-2", &OSCILLATOR).unwrap();
    patch.add_module("osc-3", &OSCILLATOR).unwrap();
    patch.add_module("mixer-1", &MIXER).unwrap();

    patch
        .propose_connection("osc-1/audio_out", "mixer-1/inputs/1")
        .unwrap();
    patch
        .propose_connection("osc-2/audio_out", "mixer-1/inputs/2")
        .unwrap();
    // An occupied slot refuses any other source; the rest of the bank is free.
    let err = patch
        .propose_connection("osc-3/audio_out", "mixer-1/inputs/1")
        .unwrap_err();
    assert_eq!(err.rejection().map(|r| r.rule()), Some(Rule::Duplicate));
    let err = patch
        .propose_connection("osc-1/audio_out", "mixer-1/inputs/1")
        .unwrap_err();
    assert_eq!(err.rejection().map(|r| r.rule()), Some(Rule::Duplicate));
    patch
        .propose_connection("osc-3/audio_out", "mixer-1/inputs/3")
        .unwrap();

    // Plain address to a bank must pick a slot.
    let err = patch
        .propose_connection("osc-1/audio_out", "mixer-1/inputs")
        .unwrap_err();
    assert_eq!(err.rejection().map(|r| r.rule()), Some(Rule::Direction));
    let err = patch
        .propose_connection("osc-1/audio_out", "mixer-1/inputs/9")
        .unwrap_err();
    assert_eq!(err.rejection().map(|r| r.rule()), Some(Rule::Direction));

    assert_eq!(
        patch.list()[1].target,
        PortRef::slot("mixer-1", "inputs", 1)
    );

    let mut binding = RecordingBinding::from_patch(&patch);
    let report = patch.compile(&mut binding);
    assert!(report.is_clean());
    let slot = |index| TargetHandle::Slot {
        module: "mixer-1".into(),
        port: "inputs".into(),
        index,
    };
    let edges = binding.edge_set();
    assert!(edges.contains(&edge(("osc-1", "audio_out"), slot(0))));
    assert!(edges.contains(&edge(("osc-2", "audio_out"), slot(1))));
    assert!(edges.contains(&edge(("osc-3", "audio_out"), slot(2))));
    assert_eq!(edges.len(), 3);
    assert_eq!(
        binding.get(&"mixer-1".into()).unwrap().slot_resets("inputs"),
        [1; 8]
    );
}

#[test]
fn out_of_range_slot_index_is_rejected_not_panicking() {
    let mut patch = Patch::new();
    patch.add_module("osc-1", &OSCILLATOR).unwrap();
    patch.add_module("mixer-1", &MIXER).unwrap();

    let err = patch
        .connect(
            PortRef::port("osc-1", "audio_out"),
            PortRef::slot("mixer-1", "inputs", usize::MAX),
        )
        .unwrap_err();
    assert_eq!(err.rejection().map(|r| r.rule()), Some(Rule::Direction));
    assert!(err.to_string().contains("out of range"), "got: {err}");
    assert!(patch.list().is_empty());
}

// ============================================================================
// 5. Module removal
// ============================================================================

#[test]
fn removing_a_module_unwires_it_on_next_compile() {
    let mut patch = voice();
    patch
        .propose_connection("osc-1/audio_out", "filt-1/audio_in")
        .unwrap();
    patch
        .propose_connection("filt-1/audio_out", "destination")
        .unwrap();
    let mut binding = RecordingBinding::from_patch(&patch);
    patch.compile(&mut binding);

    assert_eq!(patch.remove_module(&"filt-1".into()), Ok(2));
    binding.sync(&patch);
    let report = patch.compile(&mut binding);
    assert!(report.is_clean());
    assert!(binding.live_edges().is_empty());
    assert!(binding.module(&"filt-1".into()).is_none());
}

// ============================================================================
// 6. Shared handle
// ============================================================================

#[test]
fn concurrent_edits_through_shared_patch() {
    let shared = SharedPatch::new(Patch::new(), RecordingBinding::new());
    shared.add_module("mixer-1", &MIXER).unwrap();
    for i in 1..=4 {
        shared.add_module(format!("osc-{i}"), &OSCILLATOR).unwrap();
    }
    shared
        .propose_connection("mixer-1/audio_out", "destination")
        .unwrap();

    let handles: Vec<_> = (1..=4)
        .map(|i| {
            let shared = shared.clone();
            thread::spawn(move || {
                let source = format!("osc-{i}/audio_out");
                let target = format!("mixer-1/inputs/{i}");
                shared.propose_connection(&source, &target).unwrap();
                let seen = shared.list().len();
                assert!((2..=5).contains(&seen));
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(shared.list().len(), 5);
    let report = shared.last_report();
    assert_eq!(report.wired, 5);
    assert_eq!(shared.with_binding(|b| b.live_edges().len()), 5);
    assert_eq!(shared.snapshot().connections.len(), 5);
}
