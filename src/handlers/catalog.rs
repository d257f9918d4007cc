use crate::error::Result;
use crate::platform::api::types::CloudProvider;
use crate::wizard::catalog;
use colored::Colorize;

/// `relay-ctl catalog [--provider p]`
pub fn handle_catalog(provider: Option<CloudProvider>) -> Result<()> {
    let providers: Vec<CloudProvider> = match provider {
        Some(p) => vec![p],
        None => CloudProvider::all().to_vec(),
    };

    for provider in providers {
        println!(
            "\n{} {}",
            provider.display_name().bold(),
            format!("({})", provider).dimmed()
        );
        for infra in catalog::infrastructure_types(&provider) {
            let regions: Vec<&str> = catalog::regions_for(&provider, infra.id)
                .iter()
                .map(|r| r.id)
                .collect();
            println!("  {} {}  {}", "▸".cyan(), infra.id.cyan(), infra.description.dimmed());
            println!("      regions:   {}", regions.join(", "));
            if infra.requires_sizing {
                let sizes: Vec<&str> = infra.machine_types.iter().map(|m| m.id).collect();
                println!("      instances: {}", sizes.join(", "));
            }
        }
    }
    Ok(())
}
