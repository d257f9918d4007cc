//! Sizing and relay identity forms for the deployment wizard

use super::render::{PromptResult, display_step_header};
use super::step::WizardStep;
use super::validation::{self, MAX_INSTANCES, MIN_INSTANCES};
use crate::platform::api::types::DeploymentConfig;
use colored::Colorize;
use inquire::validator::Validation;
use inquire::{Confirm, Text};

/// Instance sizing collected on step 3
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizingInput {
    pub instance_count: u32,
    pub auto_scaling_min: Option<u32>,
    pub auto_scaling_max: Option<u32>,
}

/// Parse an instance count or scaling bound typed by the operator
pub fn parse_count(input: &str) -> Result<u32, String> {
    let value: u32 = input
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a whole number", input.trim()))?;
    if (MIN_INSTANCES..=MAX_INSTANCES).contains(&value) {
        Ok(value)
    } else {
        Err(format!(
            "must be between {} and {}",
            MIN_INSTANCES, MAX_INSTANCES
        ))
    }
}

fn count_prompt(message: &str, default: u32, help: &str) -> PromptResult<u32> {
    let default = default.to_string();
    let answer = Text::new(message)
        .with_default(&default)
        .with_help_message(help)
        .with_validator(|input: &str| {
            Ok(match parse_count(input) {
                Ok(_) => Validation::Valid,
                Err(reason) => Validation::Invalid(reason.into()),
            })
        })
        .prompt();

    match answer {
        Ok(value) => match parse_count(&value) {
            Ok(count) => PromptResult::Selected(count),
            Err(_) => PromptResult::Back,
        },
        Err(e) => PromptResult::from_error(e),
    }
}

/// Collect instance count and optional auto-scaling bounds
pub fn collect_sizing(current: &DeploymentConfig) -> PromptResult<SizingInput> {
    let instance_count = match count_prompt(
        "Instance count:",
        current.instance_count.unwrap_or(1),
        "Number of relay instances (1-10)",
    ) {
        PromptResult::Selected(v) => v,
        PromptResult::Back => return PromptResult::Back,
        PromptResult::Cancelled => return PromptResult::Cancelled,
    };

    let wants_scaling = match Confirm::new("Enable auto-scaling?")
        .with_default(current.auto_scaling_min.is_some() || current.auto_scaling_max.is_some())
        .with_help_message("Scale the relay between a minimum and maximum instance count")
        .prompt()
    {
        Ok(v) => v,
        Err(e) => return PromptResult::from_error(e),
    };

    if !wants_scaling {
        return PromptResult::Selected(SizingInput {
            instance_count,
            auto_scaling_min: None,
            auto_scaling_max: None,
        });
    }

    loop {
        let min = match count_prompt(
            "Minimum instances:",
            current.auto_scaling_min.unwrap_or(instance_count),
            "Lower auto-scaling bound",
        ) {
            PromptResult::Selected(v) => v,
            PromptResult::Back => return PromptResult::Back,
            PromptResult::Cancelled => return PromptResult::Cancelled,
        };
        let max = match count_prompt(
            "Maximum instances:",
            current.auto_scaling_max.unwrap_or(MAX_INSTANCES.min(min * 2)),
            "Upper auto-scaling bound",
        ) {
            PromptResult::Selected(v) => v,
            PromptResult::Back => return PromptResult::Back,
            PromptResult::Cancelled => return PromptResult::Cancelled,
        };

        if min <= max {
            return PromptResult::Selected(SizingInput {
                instance_count,
                auto_scaling_min: Some(min),
                auto_scaling_max: Some(max),
            });
        }
        println!(
            "{} Minimum ({}) must not exceed maximum ({}).",
            "⚠".yellow(),
            min,
            max
        );
    }
}

/// Show the network policy and collect the relay name
///
/// Returns `None` when the operator keeps the derived default name.
pub fn collect_relay_name(current: &DeploymentConfig) -> PromptResult<Option<String>> {
    display_step_header(WizardStep::Network);

    println!(
        "  {} Network: {}",
        "│".dimmed(),
        "private subnet, outbound-only egress to the queue provider".cyan()
    );
    println!();

    let derived = validation::effective_relay_name(&DeploymentConfig {
        relay_name: None,
        ..current.clone()
    })
    .unwrap_or_default();
    let default = current.relay_name.clone().unwrap_or_else(|| derived.clone());

    let answer = Text::new("Relay name:")
        .with_default(&default)
        .with_help_message("Lowercase letters, digits and hyphens (3-63 characters)")
        .with_validator(|input: &str| {
            Ok(match validation::validate_relay_name(input.trim()) {
                Ok(()) => Validation::Valid,
                Err(reason) => Validation::Invalid(reason.into()),
            })
        })
        .prompt();

    match answer {
        Ok(name) => {
            let name = name.trim().to_string();
            if name == derived {
                PromptResult::Selected(None)
            } else {
                PromptResult::Selected(Some(name))
            }
        }
        Err(e) => PromptResult::from_error(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(" 3 "), Ok(3));
        assert!(parse_count("0").is_err());
        assert!(parse_count("11").is_err());
        assert!(parse_count("two").unwrap_err().contains("whole number"));
    }
}
