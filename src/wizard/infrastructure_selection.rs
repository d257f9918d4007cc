//! Infrastructure, region and machine type selection steps
//!
//! Step 2 picks the infrastructure type from the provider's catalog; step 3
//! picks a region it supports and, for instance-based types, a machine type.

use super::catalog::{self, CloudRegion, InfrastructureType, MachineType};
use super::render::{PromptResult, display_step_header, wizard_render_config};
use super::step::WizardStep;
use crate::platform::api::types::CloudProvider;
use colored::Colorize;
use inquire::Select;
use std::fmt;

/// Wrapper for displaying infrastructure options in the selection menu
struct InfrastructureOption {
    infra: &'static InfrastructureType,
}

impl fmt::Display for InfrastructureOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sizing = if self.infra.requires_sizing {
            "instance-based"
        } else {
            "serverless"
        };
        write!(
            f,
            "{}  {}",
            self.infra.name.cyan(),
            format!("{} · {}", self.infra.description, sizing).dimmed()
        )
    }
}

/// Wrapper for displaying region options in the selection menu
struct RegionOption {
    region: &'static CloudRegion,
}

impl fmt::Display for RegionOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {}",
            self.region.id.cyan(),
            format!("{}  ({})", self.region.name, self.region.location).dimmed()
        )
    }
}

/// Wrapper for displaying machine type options in the selection menu
struct MachineTypeOption {
    machine: &'static MachineType,
}

impl fmt::Display for MachineTypeOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let specs = format!("{} vCPU · {}", self.machine.cpu, self.machine.memory);
        write!(f, "{}  {}", self.machine.id.cyan(), specs.dimmed())
    }
}

/// Select the infrastructure type for a provider
pub fn select_infrastructure_type(
    provider: &CloudProvider,
    current: Option<&str>,
) -> PromptResult<&'static InfrastructureType> {
    display_step_header(WizardStep::Infrastructure);

    let types = catalog::infrastructure_types(provider);
    let starting_cursor = current
        .and_then(|c| types.iter().position(|i| i.id == c))
        .unwrap_or(0);
    let options: Vec<InfrastructureOption> =
        types.iter().map(|infra| InfrastructureOption { infra }).collect();

    let selection = Select::new("Select infrastructure:", options)
        .with_render_config(wizard_render_config())
        .with_starting_cursor(starting_cursor)
        .with_help_message("↑↓ to move, Enter to select, Esc to go back")
        .prompt();

    match selection {
        Ok(selected) => {
            println!("\n{} Selected: {}", "✓".green(), selected.infra.name);
            PromptResult::Selected(selected.infra)
        }
        Err(e) => PromptResult::from_error(e),
    }
}

/// Select a region supported by the infrastructure type
pub fn select_region(
    provider: &CloudProvider,
    infra: &InfrastructureType,
    current: Option<&str>,
) -> PromptResult<String> {
    display_step_header(WizardStep::RegionSizing);

    let regions = catalog::regions_for(provider, infra.id);
    if regions.is_empty() {
        println!(
            "\n{} No regions available for {}.",
            "⚠".yellow(),
            infra.name
        );
        return PromptResult::Back;
    }

    let preferred = current.unwrap_or_else(|| catalog::default_region(provider));
    let default_index = regions
        .iter()
        .position(|r| r.id == preferred)
        .unwrap_or(0);
    let options: Vec<RegionOption> = regions
        .into_iter()
        .map(|region| RegionOption { region })
        .collect();

    let selection = Select::new("Select region:", options)
        .with_render_config(wizard_render_config())
        .with_starting_cursor(default_index)
        .with_help_message("Use ↑/↓ to navigate, Enter to select, Esc to go back")
        .prompt();

    match selection {
        Ok(selected) => {
            println!(
                "\n{} Selected region: {} ({})",
                "✓".green(),
                selected.region.name.cyan(),
                selected.region.id
            );
            PromptResult::Selected(selected.region.id.to_string())
        }
        Err(e) => PromptResult::from_error(e),
    }
}

/// Select a machine type for an instance-based infrastructure type
pub fn select_machine_type(
    provider: &CloudProvider,
    infra: &InfrastructureType,
    current: Option<&str>,
) -> PromptResult<String> {
    let preferred = current.or_else(|| catalog::default_instance_type(provider, infra.id));
    let default_index = preferred
        .and_then(|p| infra.machine_types.iter().position(|m| m.id == p))
        .unwrap_or(0);
    let options: Vec<MachineTypeOption> = infra
        .machine_types
        .iter()
        .map(|machine| MachineTypeOption { machine })
        .collect();

    let selection = Select::new("Select instance type:", options)
        .with_render_config(wizard_render_config())
        .with_starting_cursor(default_index)
        .with_help_message("Use ↑/↓ to navigate, Enter to select, Esc to go back")
        .prompt();

    match selection {
        Ok(selected) => {
            println!(
                "\n{} Selected instance type: {}",
                "✓".green(),
                selected.machine.id.cyan()
            );
            PromptResult::Selected(selected.machine.id.to_string())
        }
        Err(e) => PromptResult::from_error(e),
    }
}
