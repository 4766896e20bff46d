//! Patchbay CLI - Command-line interface for patchbay signal routing.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "patchbay")]
#[command(author, version, about = "Patchbay signal routing CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available module kinds and their ports
    Modules(commands::modules::ModulesArgs),

    /// Build a patch and dry-run compile it
    Check(commands::check::CheckArgs),

    /// Print a patch snapshot as JSON or TOML
    Export(commands::export::ExportArgs),

    /// List factory patches
    Factory(commands::factory::FactoryArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Modules(args) => commands::modules::run(args),
        Commands::Check(args) => commands::check::run(args),
        Commands::Export(args) => commands::export::run(args),
        Commands::Factory(args) => commands::factory::run(args),
    }
}
