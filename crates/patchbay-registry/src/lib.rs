//! Module registry for patchbay.
//!
//! This crate catalogues the module kinds a patch can instantiate. Each kind
//! has a [`ModuleDescriptor`] for building user interfaces and a static
//! [`ModuleSchema`] declaring its ports and parameter targets.
//!
//! # Features
//!
//! - **Module Discovery**: List all available kinds with metadata
//! - **Schema Lookup**: Port and parameter tables by kind
//! - **Category System**: Kinds organized by role (sources, filters, etc.)
//!
//! # Example
//!
//! ```rust
//! use patchbay_core::Patch;
//! use patchbay_registry::{ModuleCategory, ModuleRegistry};
//!
//! let registry = ModuleRegistry::new();
//!
//! for module in registry.all_modules() {
//!     println!("{}: {}", module.name, module.description);
//! }
//!
//! let mut patch = Patch::new();
//! patch.add_module("osc-1", registry.schema("oscillator")).unwrap();
//! patch.add_module("filt-1", registry.schema("filter")).unwrap();
//! patch.propose_connection("osc-1/audio_out", "filt-1/audio_in").unwrap();
//!
//! for module in registry.modules_in_category(ModuleCategory::Modulation) {
//!     println!("Modulator: {}", module.name);
//! }
//! ```

pub mod schemas;

use patchbay_core::ModuleSchema;

pub use schemas::MIXER_CHANNELS;

/// Category of module kind for organization and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleCategory {
    /// Signal generators (oscillators, noise)
    Source,
    /// Spectral shaping (filters, equalizers)
    Filter,
    /// Control-signal generators (envelopes, LFOs, clocks)
    Modulation,
    /// Time-based effects (delay, reverb)
    TimeBased,
    /// Level and routing (amplifiers, mixers)
    Utility,
}

impl ModuleCategory {
    /// Every category, in display order.
    pub const ALL: [ModuleCategory; 5] = [
        ModuleCategory::Source,
        ModuleCategory::Filter,
        ModuleCategory::Modulation,
        ModuleCategory::TimeBased,
        ModuleCategory::Utility,
    ];

    /// Returns a human-readable name for the category.
    pub const fn name(&self) -> &'static str {
        match self {
            ModuleCategory::Source => "Source",
            ModuleCategory::Filter => "Filter",
            ModuleCategory::Modulation => "Modulation",
            ModuleCategory::TimeBased => "Time-Based",
            ModuleCategory::Utility => "Utility",
        }
    }

    /// Returns a description of the category.
    pub const fn description(&self) -> &'static str {
        match self {
            ModuleCategory::Source => "Oscillators, noise, and other signal generators",
            ModuleCategory::Filter => "Filters, equalizers, and other spectral shapers",
            ModuleCategory::Modulation => "Envelopes, LFOs, clocks, and other control sources",
            ModuleCategory::TimeBased => "Delay, reverb, and other time-based effects",
            ModuleCategory::Utility => "Amplifiers, mixers, and routing utilities",
        }
    }
}

/// Describes a module kind in the registry.
#[derive(Debug, Clone)]
pub struct ModuleDescriptor {
    /// Unique kind identifier (lowercase, no spaces).
    pub kind: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Brief description of the module.
    pub description: &'static str,
    /// Category for organization.
    pub category: ModuleCategory,
}

/// Internal entry in the registry.
struct RegistryEntry {
    descriptor: ModuleDescriptor,
    schema: &'static ModuleSchema,
}

/// Registry of all available module kinds.
///
/// All built-in kinds are registered by [`ModuleRegistry::new`].
pub struct ModuleRegistry {
    entries: Vec<RegistryEntry>,
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleRegistry {
    /// Create a new registry with all built-in kinds registered.
    pub fn new() -> Self {
        let mut registry = Self {
            entries: Vec::with_capacity(11),
        };
        registry.register_builtin_modules();
        registry
    }

    /// Register all built-in kinds.
    fn register_builtin_modules(&mut self) {
        // Sources
        self.register(
            ModuleDescriptor {
                kind: "oscillator",
                name: "Oscillator",
                description: "Band-limited oscillator with pitch CV and hard sync",
                category: ModuleCategory::Source,
            },
            &schemas::OSCILLATOR,
        );
        self.register(
            ModuleDescriptor {
                kind: "noise",
                name: "Noise",
                description: "White noise generator",
                category: ModuleCategory::Source,
            },
            &schemas::NOISE,
        );

        // Filters
        self.register(
            ModuleDescriptor {
                kind: "filter",
                name: "Filter",
                description: "Resonant state-variable filter with cutoff CV",
                category: ModuleCategory::Filter,
            },
            &schemas::FILTER,
        );
        self.register(
            ModuleDescriptor {
                kind: "equalizer",
                name: "Equalizer",
                description: "Three-band equalizer",
                category: ModuleCategory::Filter,
            },
            &schemas::EQUALIZER,
        );

        // Modulation
        self.register(
            ModuleDescriptor {
                kind: "envelope",
                name: "Envelope",
                description: "ADSR envelope triggered by a gate",
                category: ModuleCategory::Modulation,
            },
            &schemas::ENVELOPE,
        );
        self.register(
            ModuleDescriptor {
                kind: "lfo",
                name: "LFO",
                description: "Low-frequency oscillator with gate reset",
                category: ModuleCategory::Modulation,
            },
            &schemas::LFO,
        );
        self.register(
            ModuleDescriptor {
                kind: "clock",
                name: "Clock",
                description: "Tempo-driven gate clock",
                category: ModuleCategory::Modulation,
            },
            &schemas::CLOCK,
        );

        // Time-based
        self.register(
            ModuleDescriptor {
                kind: "delay",
                name: "Delay",
                description: "Feedback delay line",
                category: ModuleCategory::TimeBased,
            },
            &schemas::DELAY,
        );
        self.register(
            ModuleDescriptor {
                kind: "reverb",
                name: "Reverb",
                description: "Algorithmic room reverb",
                category: ModuleCategory::TimeBased,
            },
            &schemas::REVERB,
        );

        // Utility
        self.register(
            ModuleDescriptor {
                kind: "amplifier",
                name: "Amplifier",
                description: "Voltage-controlled amplifier",
                category: ModuleCategory::Utility,
            },
            &schemas::AMPLIFIER,
        );
        self.register(
            ModuleDescriptor {
                kind: "mixer",
                name: "Mixer",
                description: "Four-channel mixer with per-input gain",
                category: ModuleCategory::Utility,
            },
            &schemas::MIXER,
        );
    }

    /// Register a kind with the registry.
    fn register(&mut self, descriptor: ModuleDescriptor, schema: &'static ModuleSchema) {
        debug_assert_eq!(descriptor.kind, schema.kind);
        self.entries.push(RegistryEntry { descriptor, schema });
    }

    /// Returns descriptors for all registered kinds.
    pub fn all_modules(&self) -> Vec<&ModuleDescriptor> {
        self.entries.iter().map(|e| &e.descriptor).collect()
    }

    /// Returns descriptors for kinds in a specific category.
    pub fn modules_in_category(&self, category: ModuleCategory) -> Vec<&ModuleDescriptor> {
        self.entries
            .iter()
            .filter(|e| e.descriptor.category == category)
            .map(|e| &e.descriptor)
            .collect()
    }

    /// Get a descriptor by kind.
    pub fn get(&self, kind: &str) -> Option<&ModuleDescriptor> {
        self.entry(kind).map(|e| &e.descriptor)
    }

    /// Schema of `kind`, or `None` if the kind is not registered.
    ///
    /// Use this for kinds read from files or typed by a user.
    pub fn try_schema(&self, kind: &str) -> Option<&'static ModuleSchema> {
        self.entry(kind).map(|e| e.schema)
    }

    /// Schema of `kind`.
    ///
    /// # Panics
    ///
    /// Panics if `kind` is not registered. Asking for a kind the program never
    /// registered is a bug; see [`try_schema`](Self::try_schema) for input
    /// that may be wrong.
    pub fn schema(&self, kind: &str) -> &'static ModuleSchema {
        match self.try_schema(kind) {
            Some(schema) => schema,
            None => panic!("unknown module kind '{kind}'"),
        }
    }

    /// Registered kind identifiers in registration order.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.descriptor.kind).collect()
    }

    /// Returns the number of registered kinds.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no kinds are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, kind: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|e| e.descriptor.kind == kind)
    }
}
