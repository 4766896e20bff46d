//! Port tables for the built-in module kinds.

use patchbay_core::{ModuleSchema, PortSpec, SignalKind};

/// Slots on the built-in mixer's `inputs` bank.
pub const MIXER_CHANNELS: usize = 8;

/// Band-limited oscillator.
pub static OSCILLATOR: ModuleSchema = ModuleSchema {
    kind: "oscillator",
    ports: &[
        PortSpec::sink("frequency_cv", SignalKind::Cv),
        PortSpec::sink("sync_in", SignalKind::Gate),
        PortSpec::source("audio_out", SignalKind::Audio),
    ],
    params: &["frequency", "detune", "level"],
};

/// White/pink noise source.
pub static NOISE: ModuleSchema = ModuleSchema {
    kind: "noise",
    ports: &[PortSpec::source("audio_out", SignalKind::Audio)],
    params: &["level"],
};

/// Resonant multi-mode filter.
pub static FILTER: ModuleSchema = ModuleSchema {
    kind: "filter",
    ports: &[
        PortSpec::sink("audio_in", SignalKind::Audio),
        PortSpec::sink("cutoff_cv", SignalKind::Cv),
        PortSpec::source("audio_out", SignalKind::Audio),
    ],
    params: &["frequency", "q", "gain"],
};

/// ADSR envelope generator.
pub static ENVELOPE: ModuleSchema = ModuleSchema {
    kind: "envelope",
    ports: &[
        PortSpec::sink("gate_in", SignalKind::Gate),
        PortSpec::source("cv_out", SignalKind::Cv),
    ],
    params: &["attack", "decay", "sustain", "release"],
};

/// Low-frequency oscillator.
pub static LFO: ModuleSchema = ModuleSchema {
    kind: "lfo",
    ports: &[
        PortSpec::sink("reset_in", SignalKind::Gate),
        PortSpec::source("cv_out", SignalKind::Cv),
    ],
    params: &["rate", "depth"],
};

/// Voltage-controlled amplifier.
pub static AMPLIFIER: ModuleSchema = ModuleSchema {
    kind: "amplifier",
    ports: &[
        PortSpec::sink("audio_in", SignalKind::Audio),
        PortSpec::sink("gain_cv", SignalKind::Cv),
        PortSpec::source("audio_out", SignalKind::Audio),
    ],
    params: &["gain"],
};

/// Algorithmic reverb.
pub static REVERB: ModuleSchema = ModuleSchema {
    kind: "reverb",
    ports: &[
        PortSpec::sink("audio_in", SignalKind::Audio),
        PortSpec::source("audio_out", SignalKind::Audio),
    ],
    params: &["decay", "damping", "mix"],
};

/// Feedback delay.
pub static DELAY: ModuleSchema = ModuleSchema {
    kind: "delay",
    ports: &[
        PortSpec::sink("audio_in", SignalKind::Audio),
        PortSpec::source("audio_out", SignalKind::Audio),
    ],
    params: &["time", "feedback", "mix"],
};

/// Three-band equalizer.
pub static EQUALIZER: ModuleSchema = ModuleSchema {
    kind: "equalizer",
    ports: &[
        PortSpec::sink("audio_in", SignalKind::Audio),
        PortSpec::source("audio_out", SignalKind::Audio),
    ],
    params: &["low_gain", "mid_gain", "high_gain"],
};

/// Multi-channel mixer with one gain per input slot.
pub static MIXER: ModuleSchema = ModuleSchema {
    kind: "mixer",
    ports: &[
        PortSpec::bank("inputs", SignalKind::Audio, MIXER_CHANNELS),
        PortSpec::source("audio_out", SignalKind::Audio),
    ],
    params: &["volume"],
};

/// Gate clock.
pub static CLOCK: ModuleSchema = ModuleSchema {
    kind: "clock",
    ports: &[PortSpec::source("gate_out", SignalKind::Gate)],
    params: &["tempo"],
};
