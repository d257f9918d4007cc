//! Provider selection step for the relay deployment wizard

use super::catalog;
use super::render::{PromptResult, display_step_header, wizard_render_config};
use super::step::WizardStep;
use crate::platform::api::types::CloudProvider;
use colored::Colorize;
use inquire::Select;
use std::fmt;

/// Wrapper for displaying provider options in the selection menu
struct ProviderOption {
    provider: CloudProvider,
}

impl fmt::Display for ProviderOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {}",
            self.provider.display_name(),
            summarize_infrastructure(&self.provider).dimmed()
        )
    }
}

/// Short list of the infrastructure types a provider offers
fn summarize_infrastructure(provider: &CloudProvider) -> String {
    catalog::infrastructure_types(provider)
        .iter()
        .map(|i| i.name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Display provider selection and prompt the operator to choose
pub fn select_provider(current: Option<CloudProvider>) -> PromptResult<CloudProvider> {
    display_step_header(WizardStep::Provider);

    let options: Vec<ProviderOption> = CloudProvider::all()
        .iter()
        .map(|p| ProviderOption { provider: *p })
        .collect();
    let starting_cursor = current
        .and_then(|c| CloudProvider::all().iter().position(|p| *p == c))
        .unwrap_or(0);

    let selection = Select::new("Select a provider:", options)
        .with_render_config(wizard_render_config())
        .with_starting_cursor(starting_cursor)
        .with_help_message("↑↓ to move, Enter to select, Ctrl-C to quit")
        .prompt();

    match selection {
        Ok(selected) => {
            println!(
                "\n{} Selected: {}",
                "✓".green(),
                selected.provider.display_name()
            );
            PromptResult::Selected(selected.provider)
        }
        Err(e) => PromptResult::from_error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_infrastructure() {
        assert_eq!(summarize_infrastructure(&CloudProvider::Aws), "EC2, ECS, Lambda");
        assert_eq!(
            summarize_infrastructure(&CloudProvider::Gcp),
            "Compute Engine, GKE, Cloud Run"
        );
    }
}
