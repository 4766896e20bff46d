//! Build a patch and dry-run compile it against a recording binding.

use clap::Args;
use patchbay_config::{ModuleRegistry, validate_config};
use patchbay_core::{ModuleId, RecordingBinding};

use super::common::PatchSource;

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    source: PatchSource,

    /// Treat a module's engine object as not ready (repeatable)
    #[arg(long = "not-ready", value_name = "ID")]
    not_ready: Vec<String>,
}

pub fn run(args: CheckArgs) -> anyhow::Result<()> {
    let config = args.source.load()?;
    let registry = ModuleRegistry::new();

    let issues = validate_config(&config, &registry);
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("  error: {issue}");
        }
        anyhow::bail!(
            "patch '{}' has {} issue(s)",
            config.name,
            issues.len()
        );
    }

    let mut patch = config.build(&registry)?;
    let mut binding = RecordingBinding::from_patch(&patch);
    for id in &args.not_ready {
        let module = binding
            .get_mut(&ModuleId::new(id.as_str()))
            .ok_or_else(|| anyhow::anyhow!("Unknown module id: {}", id))?;
        module.set_ready(false);
    }

    let report = patch.compile(&mut binding);

    println!("Patch: {}", config.name);
    println!("{}", "=".repeat(7 + config.name.len()));
    if let Some(desc) = &config.description {
        println!();
        println!("{desc}");
    }

    println!();
    println!("Modules ({}):", patch.modules().len());
    for module in patch.modules() {
        println!("  {:12} {}", module.id().as_str(), module.kind());
    }

    println!();
    println!("Connections ({}):", patch.list().len());
    for (i, connection) in patch.list().iter().enumerate() {
        println!("  {}. {}", i + 1, connection);
    }

    let edges = binding.live_edges();
    println!();
    println!("Live edges ({}):", edges.len());
    for edge in &edges {
        println!("  {} -> {}", edge.from, edge.to);
    }

    if !report.is_clean() {
        println!();
        println!("Skipped ({}):", report.failures.len());
        for failure in &report.failures {
            println!("  {failure}");
        }
    }

    println!();
    println!(
        "Compiled: {} wired, {} skipped",
        report.wired,
        report.failures.len()
    );

    Ok(())
}
