//! Patch snapshot export.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use patchbay_config::ModuleRegistry;

use super::common::PatchSource;

/// Snapshot encoding.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum ExportFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// TOML
    Toml,
}

#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    source: PatchSource,

    /// Output format
    #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
    format: ExportFormat,

    /// Write to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

pub fn run(args: ExportArgs) -> anyhow::Result<()> {
    let config = args.source.load()?;
    let patch = config.build(&ModuleRegistry::new())?;
    let snapshot = patch.snapshot();

    let text = match args.format {
        ExportFormat::Json => serde_json::to_string_pretty(&snapshot)?,
        ExportFormat::Toml => toml::to_string_pretty(&snapshot)?,
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, &text)?;
            tracing::info!(path = %path.display(), "snapshot written");
        }
        None => println!("{text}"),
    }

    Ok(())
}
