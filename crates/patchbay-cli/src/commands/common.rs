//! Shared CLI helpers used across multiple commands.

use std::path::PathBuf;

use clap::Args;
use patchbay_config::{ConfigError, PatchConfig, get_factory_patch};

/// Where a command reads its patch from.
#[derive(Args)]
pub struct PatchSource {
    /// Patch file (TOML)
    #[arg(
        value_name = "FILE",
        required_unless_present = "factory",
        conflicts_with = "factory"
    )]
    file: Option<PathBuf>,

    /// Use a factory patch instead of a file
    #[arg(long, value_name = "NAME")]
    factory: Option<String>,
}

impl PatchSource {
    /// Load the patch file or factory patch.
    pub fn load(&self) -> anyhow::Result<PatchConfig> {
        if let Some(name) = &self.factory {
            return get_factory_patch(name).ok_or_else(|| {
                anyhow::anyhow!(
                    "{}. Use 'patchbay factory' to see available patches.",
                    ConfigError::PatchNotFound(name.clone())
                )
            });
        }

        match &self.file {
            Some(path) => Ok(PatchConfig::load(path)?),
            None => anyhow::bail!("no patch given; pass a FILE or --factory NAME"),
        }
    }
}
