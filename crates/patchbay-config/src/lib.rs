//! Patch files and factory patches for patchbay.
//!
//! This crate stores a [`Patch`](patchbay_core::Patch) as TOML: the module
//! instances it holds and its connections in insertion order. Building a patch
//! file replays every connection through the validator, so a file can never
//! smuggle in a connection the interactive path would refuse.
//!
//! # Features
//!
//! - **Patch Files**: Load and save patches as TOML
//! - **Validation**: Collect every problem in a patch file at once
//! - **Factory Patches**: Built-in patches covering every target shape
//!
//! # Example
//!
//! ```rust,no_run
//! use patchbay_config::{ModuleRegistry, PatchConfig};
//!
//! let config = PatchConfig::new("My Patch")
//!     .with_description("Oscillator into a mixer")
//!     .with_module("osc-1", "oscillator")
//!     .with_module("mix-1", "mixer")
//!     .with_connection("osc-1/audio_out", "mix-1/inputs/1")
//!     .with_connection("mix-1/audio_out", "destination");
//!
//! let patch = config.build(&ModuleRegistry::new()).unwrap();
//! assert_eq!(patch.list().len(), 2);
//!
//! config.save("patches/my_patch.toml").unwrap();
//! ```

mod error;
mod patch_config;

/// Patch file validation.
pub mod validation;

/// Factory patches bundled with the library.
pub mod factory_patches;

pub use error::ConfigError;
pub use factory_patches::{
    FACTORY_PATCH_NAMES, factory_patch_names, factory_patches, get_factory_patch,
    is_factory_patch,
};
pub use patch_config::{ConnectionConfig, ModuleConfig, PatchConfig};
pub use validation::{ConfigIssue, validate_config};

/// Re-export commonly used types from patchbay-registry
pub use patchbay_registry::{ModuleCategory, ModuleDescriptor, ModuleRegistry};
