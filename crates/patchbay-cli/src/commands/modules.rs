//! Module kind listing and information command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use patchbay_core::{Direction, ModuleSchema, PortSpec};
use patchbay_registry::{ModuleCategory, ModuleRegistry};

#[derive(Args)]
pub struct ModulesArgs {
    /// Show ports and parameters for a specific kind
    #[arg(value_name = "KIND")]
    kind: Option<String>,
}

pub fn run(args: ModulesArgs) -> anyhow::Result<()> {
    let registry = ModuleRegistry::new();

    match &args.kind {
        Some(kind) => show_kind(&registry, kind),
        None => {
            list_kinds(&registry);
            Ok(())
        }
    }
}

fn list_kinds(registry: &ModuleRegistry) {
    println!("Available Modules");
    println!("=================");

    for category in ModuleCategory::ALL {
        let modules = registry.modules_in_category(category);
        if modules.is_empty() {
            continue;
        }
        println!();
        println!("{} - {}", category.name(), category.description());
        for module in modules {
            println!("  {:12} - {}", module.kind, module.description);
        }
    }

    println!();
    println!("Use 'patchbay modules <kind>' for ports and parameters.");
}

fn show_kind(registry: &ModuleRegistry, kind: &str) -> anyhow::Result<()> {
    let kind = kind.to_lowercase();
    let (descriptor, schema) = registry
        .get(&kind)
        .zip(registry.try_schema(&kind))
        .ok_or_else(|| anyhow::anyhow!("Unknown module kind: {}", kind))?;

    println!("{} ({})", descriptor.name, descriptor.kind);
    println!("{}", "=".repeat(descriptor.name.len() + descriptor.kind.len() + 3));
    println!();
    println!("{}", descriptor.description);
    println!();

    println!("Ports:");
    println!();
    println!("  {:12}  {:9}  {:6}  {}", "Name", "Direction", "Signal", "Slots");
    println!("  {:12}  {:9}  {:6}  {}", "----", "---------", "------", "-----");
    for port in schema.ports {
        println!(
            "  {:12}  {:9}  {:6}  {}",
            port.name,
            port.direction.to_string(),
            port.signal.to_string(),
            port.slots
        );
    }

    println!();
    if schema.params.is_empty() {
        println!("Parameters: (none)");
    } else {
        println!("Parameters: {}", schema.params.join(", "));
    }

    println!();
    println!("Example addresses:");
    for address in example_addresses(schema) {
        println!("  {address}");
    }

    Ok(())
}

/// One address per port and parameter, using `<kind>-1` as the instance id.
fn example_addresses(schema: &ModuleSchema) -> Vec<String> {
    let id = format!("{}-1", schema.kind);
    let port_address = |port: &PortSpec| match (port.direction, port.is_multi_slot()) {
        (Direction::Sink, true) => format!("{id}/{}/1..{}", port.name, port.slots),
        _ => format!("{id}/{}", port.name),
    };

    schema
        .ports
        .iter()
        .map(port_address)
        .chain(schema.params.iter().map(|param| format!("{id}/{param}")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_addresses_cover_slots_and_params() {
        let registry = ModuleRegistry::new();
        let addresses = example_addresses(registry.schema("mixer"));
        assert!(addresses.contains(&"mixer-1/inputs/1..8".to_string()));
        assert!(addresses.contains(&"mixer-1/audio_out".to_string()));
        assert!(addresses.contains(&"mixer-1/volume".to_string()));
    }
}
