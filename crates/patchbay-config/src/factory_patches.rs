//! Factory patches bundled with the patchbay library.
//!
//! These patches are always available without external files. They exercise
//! every target shape (plain inputs, mixer slots, parameter targets and the
//! destination) and serve as starting points for users.

use crate::PatchConfig;

/// Array of factory patch names for external access.
pub static FACTORY_PATCH_NAMES: &[&str] = &[
    "init",
    "basic_subtractive",
    "mixer_bank",
    "gated_voice",
    "ambient",
];

/// TOML content for factory patches.
static FACTORY_PATCHES_TOML: &[(&str, &str)] = &[
    ("init", INIT_PATCH),
    ("basic_subtractive", BASIC_SUBTRACTIVE_PATCH),
    ("mixer_bank", MIXER_BANK_PATCH),
    ("gated_voice", GATED_VOICE_PATCH),
    ("ambient", AMBIENT_PATCH),
];

/// Initialization patch - one oscillator straight out.
const INIT_PATCH: &str = r#"
name = "Init"
description = "Single oscillator straight to the output"

[[modules]]
id = "osc-1"
kind = "oscillator"

[[connections]]
source = "osc-1/audio_out"
target = "destination"
"#;

/// Oscillator, filter and VCA with an LFO sweeping the cutoff.
const BASIC_SUBTRACTIVE_PATCH: &str = r#"
name = "Basic Subtractive"
description = "Oscillator through a filter and amplifier, LFO on cutoff"

[[modules]]
id = "osc-1"
kind = "oscillator"

[[modules]]
id = "filt-1"
kind = "filter"

[[modules]]
id = "amp-1"
kind = "amplifier"

[[modules]]
id = "lfo-1"
kind = "lfo"

[[connections]]
source = "osc-1/audio_out"
target = "filt-1/audio_in"

[[connections]]
source = "filt-1/audio_out"
target = "amp-1/audio_in"

[[connections]]
source = "amp-1/audio_out"
target = "destination"

[[connections]]
source = "lfo-1/cv_out"
target = "filt-1/frequency"
"#;

/// Three sources on separate mixer channels.
const MIXER_BANK_PATCH: &str = r#"
name = "Mixer Bank"
description = "Two oscillators and a noise source summed on an eight-channel mixer"

[[modules]]
id = "osc-1"
kind = "oscillator"

[[modules]]
id = "osc-2"
kind = "oscillator"

[[modules]]
id = "noise-1"
kind = "noise"

[[modules]]
id = "mix-1"
kind = "mixer"

[[connections]]
source = "osc-1/audio_out"
target = "mix-1/inputs/1"

[[connections]]
source = "osc-2/audio_out"
target = "mix-1/inputs/2"

[[connections]]
source = "noise-1/audio_out"
target = "mix-1/inputs/3"

[[connections]]
source = "mix-1/audio_out"
target = "destination"
"#;

/// Clock-triggered envelope on a VCA.
const GATED_VOICE_PATCH: &str = r#"
name = "Gated Voice"
description = "Clock-triggered envelope shaping an amplifier, clock also hard-syncs the oscillator"

[[modules]]
id = "clock-1"
kind = "clock"

[[modules]]
id = "env-1"
kind = "envelope"

[[modules]]
id = "osc-1"
kind = "oscillator"

[[modules]]
id = "amp-1"
kind = "amplifier"

[[connections]]
source = "clock-1/gate_out"
target = "env-1/gate_in"

[[connections]]
source = "clock-1/gate_out"
target = "osc-1/sync_in"

[[connections]]
source = "env-1/cv_out"
target = "amp-1/gain_cv"

[[connections]]
source = "osc-1/audio_out"
target = "amp-1/audio_in"

[[connections]]
source = "amp-1/audio_out"
target = "destination"
"#;

/// Slow pad through delay and reverb.
const AMBIENT_PATCH: &str = r#"
name = "Ambient"
description = "Detuned pad through a swept filter, delay and reverb"

[[modules]]
id = "osc-1"
kind = "oscillator"

[[modules]]
id = "osc-2"
kind = "oscillator"

[[modules]]
id = "mix-1"
kind = "mixer"

[[modules]]
id = "filt-1"
kind = "filter"

[[modules]]
id = "lfo-1"
kind = "lfo"

[[modules]]
id = "delay-1"
kind = "delay"

[[modules]]
id = "verb-1"
kind = "reverb"

[[connections]]
source = "osc-1/audio_out"
target = "mix-1/inputs/1"

[[connections]]
source = "osc-2/audio_out"
target = "mix-1/inputs/2"

[[connections]]
source = "mix-1/audio_out"
target = "filt-1/audio_in"

[[connections]]
source = "filt-1/audio_out"
target = "delay-1/audio_in"

[[connections]]
source = "delay-1/audio_out"
target = "verb-1/audio_in"

[[connections]]
source = "verb-1/audio_out"
target = "destination"

[[connections]]
source = "lfo-1/cv_out"
target = "filt-1/cutoff_cv"

[[connections]]
source = "lfo-1/cv_out"
target = "osc-2/detune"
"#;

/// Get all factory patches.
///
/// # Example
///
/// ```rust
/// use patchbay_config::factory_patches;
///
/// for patch in factory_patches() {
///     println!("  - {}: {}", patch.name, patch.description.as_deref().unwrap_or(""));
/// }
/// ```
pub fn factory_patches() -> Vec<PatchConfig> {
    FACTORY_PATCHES_TOML
        .iter()
        .filter_map(|(_, toml)| PatchConfig::from_toml(toml).ok())
        .collect()
}

/// Get a factory patch by name.
///
/// Matches the internal identifier or the patch's display name,
/// case-insensitively.
///
/// # Example
///
/// ```rust
/// use patchbay_config::get_factory_patch;
///
/// let patch = get_factory_patch("Mixer Bank").unwrap();
/// assert_eq!(patch.modules.len(), 4);
/// ```
pub fn get_factory_patch(name: &str) -> Option<PatchConfig> {
    let name_lower = name.to_lowercase();

    for (patch_name, toml) in FACTORY_PATCHES_TOML {
        if patch_name.to_lowercase() == name_lower {
            return PatchConfig::from_toml(toml).ok();
        }
    }

    factory_patches()
        .into_iter()
        .find(|p| p.name.to_lowercase() == name_lower)
}

/// Get the internal identifiers of all factory patches.
pub fn factory_patch_names() -> Vec<&'static str> {
    FACTORY_PATCHES_TOML.iter().map(|(name, _)| *name).collect()
}

/// Check if a name refers to a factory patch (case-insensitive).
pub fn is_factory_patch(name: &str) -> bool {
    get_factory_patch(name).is_some()
}
