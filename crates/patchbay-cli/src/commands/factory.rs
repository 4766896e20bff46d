//! Factory patch listing.

use clap::Args;
use patchbay_config::{factory_patch_names, get_factory_patch};

#[derive(Args)]
pub struct FactoryArgs {
    /// Print the TOML of one factory patch
    #[arg(value_name = "NAME")]
    name: Option<String>,
}

pub fn run(args: FactoryArgs) -> anyhow::Result<()> {
    if let Some(name) = &args.name {
        let patch = get_factory_patch(name)
            .ok_or_else(|| anyhow::anyhow!("Factory patch '{}' not found.", name))?;
        print!("{}", patch.to_toml()?);
        return Ok(());
    }

    println!("Factory Patches:");
    println!("================");
    for id in factory_patch_names() {
        if let Some(patch) = get_factory_patch(id) {
            let desc = patch.description.as_deref().unwrap_or("");
            println!("  {:20} - {}", id, desc);
        }
    }
    println!();
    println!("Use 'patchbay check --factory <name>' to compile one.");

    Ok(())
}
