//! Shared rendering utilities for wizard prompts

use super::confirmation::ConfirmationGate;
use super::step::{TOTAL_STEPS, WizardStep};
use crate::platform::api::types::{DeploymentRun, DeploymentStatus, ResourceEstimate};
use colored::Colorize;
use inquire::InquireError;
use inquire::ui::{Color, IndexPrefix, RenderConfig, StyleSheet, Styled};
use std::io::Write;

/// Outcome of a single wizard prompt
#[derive(Debug, Clone, PartialEq)]
pub enum PromptResult<T> {
    /// Operator answered
    Selected(T),
    /// Esc: go back one step
    Back,
    /// Ctrl-C: leave the wizard
    Cancelled,
}

impl<T> PromptResult<T> {
    /// Map an inquire error to Back/Cancelled
    pub fn from_error(error: InquireError) -> Self {
        match error {
            InquireError::OperationCanceled => PromptResult::Back,
            InquireError::OperationInterrupted => PromptResult::Cancelled,
            other => {
                log::debug!("Prompt failed: {}", other);
                PromptResult::Cancelled
            }
        }
    }
}

/// Get the standard render config for wizard prompts
pub fn wizard_render_config() -> RenderConfig<'static> {
    RenderConfig::default()
        .with_highlighted_option_prefix(Styled::new("▸ ").with_fg(Color::LightCyan))
        .with_option_index_prefix(IndexPrefix::Simple)
        .with_selected_option(Some(StyleSheet::new().with_fg(Color::LightCyan)))
        .with_scroll_up_prefix(Styled::new("▲ "))
        .with_scroll_down_prefix(Styled::new("▼ "))
}

/// Display a wizard step header box
pub fn display_step_header(step: WizardStep) {
    let term_width = term_size::dimensions().map(|(w, _)| w).unwrap_or(80);
    let box_width = term_width.clamp(24, 70);
    let inner_width = box_width - 4;

    println!();
    let header = format!("─ Step {}/{} · {} ", step.index(), TOTAL_STEPS, step.title());
    println!(
        "{}{}{}",
        "┌".bright_cyan(),
        header.bright_cyan(),
        "─"
            .repeat(inner_width.saturating_sub(header.chars().count()))
            .bright_cyan()
    );

    for line in textwrap::wrap(step.description(), inner_width - 2) {
        println!("{}  {}", "│".dimmed(), line.white());
    }

    println!("{}{}", "└".dimmed(), "─".repeat(box_width - 1).dimmed());
    println!();
}

/// Format a status indicator (checkmark or X)
pub fn status_indicator(ok: bool) -> String {
    if ok {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}

/// Create a simple progress bar
pub fn progress_bar(percent: u8) -> String {
    let filled = (percent.min(100) as usize * 20) / 100;
    let empty = 20 - filled;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

/// Colored deployment status label
pub fn format_status(status: DeploymentStatus) -> String {
    match status {
        DeploymentStatus::Initializing => status.as_str().dimmed().to_string(),
        DeploymentStatus::InProgress => status.as_str().cyan().to_string(),
        DeploymentStatus::Completed => status.as_str().green().to_string(),
        DeploymentStatus::Failed => status.as_str().red().to_string(),
        DeploymentStatus::Canceled => status.as_str().yellow().to_string(),
    }
}

/// Print the estimate block shown on the review step
pub fn display_estimate(estimate: &ResourceEstimate) {
    println!("  {}", "Estimate".bold());
    println!(
        "    Monthly cost:     {}",
        format!("${:.2}", estimate.estimated_cost_monthly).cyan()
    );
    println!(
        "    Deployment time:  ~{} min",
        estimate.estimated_deployment_time_minutes
    );
    println!("    Resources:        {}", estimate.resource_count);
    for (kind, count) in &estimate.breakdown {
        println!("      {} {}", format!("{:>3}", count).dimmed(), kind);
    }
}

/// Print the confirmation summary and the advisory cost warning
pub fn display_confirmation(gate: &ConfirmationGate) {
    println!();
    println!("  {}", "Deployment summary".bold());
    let width = gate
        .summary()
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0);
    for (label, value) in gate.summary() {
        println!("    {:<width$}  {}", label, value.cyan(), width = width);
    }
    if let Some(warning) = gate.cost_warning() {
        println!();
        println!("  {} {}", "⚠".yellow(), warning.yellow());
    }
    println!();
}

/// Redraw the single live progress line for a run
pub fn display_progress(run: &DeploymentRun) {
    let message = run
        .current_step_message
        .as_deref()
        .unwrap_or("Waiting for status...");
    let poll_note = run
        .last_poll_error
        .as_deref()
        .map(|e| format!("  (status check failed: {})", e))
        .unwrap_or_default();
    print!(
        "\r  {} {} {} {}{}",
        progress_bar(run.progress_percent),
        format!("{:>3}%", run.progress_percent).cyan(),
        format_status(run.status),
        message.dimmed(),
        poll_note.yellow()
    );
    std::io::stdout().flush().ok();
}

/// Print the terminal outcome of a run
pub fn display_outcome(run: &DeploymentRun) {
    println!();
    match run.status {
        DeploymentStatus::Completed => {
            println!("{} Relay provisioned successfully!", status_indicator(true));
            if let Some(relay_id) = &run.relay_id {
                println!("  Relay ID: {}", relay_id.cyan());
            }
        }
        DeploymentStatus::Failed => {
            println!(
                "{} Deployment failed: {}",
                status_indicator(false),
                run.error.as_deref().unwrap_or("unknown error")
            );
        }
        DeploymentStatus::Canceled => {
            println!("{} Deployment canceled.", "○".yellow());
        }
        DeploymentStatus::Initializing | DeploymentStatus::InProgress => {
            println!(
                "{} Deployment {} is still {}",
                "…".dimmed(),
                run.deployment_id,
                format_status(run.status)
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0), "[░░░░░░░░░░░░░░░░░░░░]");
        assert_eq!(progress_bar(50), "[██████████░░░░░░░░░░]");
        assert_eq!(progress_bar(100), "[████████████████████]");
        assert_eq!(progress_bar(250), "[████████████████████]");
    }

    #[test]
    fn test_prompt_result_from_error() {
        assert_eq!(
            PromptResult::<()>::from_error(InquireError::OperationCanceled),
            PromptResult::Back
        );
        assert_eq!(
            PromptResult::<()>::from_error(InquireError::OperationInterrupted),
            PromptResult::Cancelled
        );
    }
}
