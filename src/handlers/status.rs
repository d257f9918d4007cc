use super::follow::{FollowOutcome, follow_deployment};
use crate::config::types::Config;
use crate::error::Result;
use crate::platform::api::types::{DeploymentRun, DeploymentStatus};
use crate::platform::api::{PlatformApiClient, RelayBackend};
use crate::wizard::{
    CancelError, DeploymentOrchestrator, PollSettings, WizardError, display_outcome, format_status,
    progress_bar,
};
use colored::Colorize;
use std::sync::Arc;

/// Print a single run snapshot
fn print_run(run: &DeploymentRun, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(run)?);
        return Ok(());
    }

    println!("Deployment {}", run.deployment_id.cyan());
    println!("  Status:   {}", format_status(run.status));
    println!(
        "  Progress: {} {}%",
        progress_bar(run.progress_percent),
        run.progress_percent
    );
    if let Some(message) = &run.current_step_message {
        println!("  Step:     {}", message);
    }
    if let Some(relay_id) = &run.relay_id {
        println!("  Relay:    {}", relay_id);
    }
    if let Some(error) = &run.error {
        println!("  Error:    {}", error.red());
    }
    Ok(())
}

/// `relay-ctl status <id> [--watch]`
pub async fn handle_status(
    config: &Config,
    deployment_id: &str,
    watch: bool,
    json: bool,
) -> Result<()> {
    let client = Arc::new(PlatformApiClient::new(&config.api)?);
    let run = client.get_deployment_status(deployment_id).await?;

    if !watch || run.is_terminal() {
        return print_run(&run, json);
    }

    let orchestrator = DeploymentOrchestrator::new(client, PollSettings::from(&config.deployment));
    let handle = orchestrator.watch_from(DeploymentRun {
        deployment_id: deployment_id.to_string(),
        ..run
    });

    if json {
        // one JSON document: the final snapshot
        let run = tokio::select! {
            run = handle.wait() => run,
            _ = tokio::signal::ctrl_c() => handle.snapshot(),
        };
        print_run(&run, true)?;
        return finished(&run);
    }

    println!(
        "Watching deployment {} {}",
        deployment_id.cyan(),
        "(Ctrl-C cancels, twice stops watching)".dimmed()
    );

    match follow_deployment(&handle).await {
        FollowOutcome::Finished(run) => {
            display_outcome(&run);
            finished(&run)
        }
        FollowOutcome::Detached(_) => {
            handle.dispose();
            println!("\nStopped watching {}.", deployment_id);
            Ok(())
        }
    }
}

/// A failed run makes the command fail
fn finished(run: &DeploymentRun) -> Result<()> {
    match WizardError::from_run(run) {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

/// `relay-ctl cancel <id>`
pub async fn handle_cancel(config: &Config, deployment_id: &str, json: bool) -> Result<()> {
    let client = PlatformApiClient::new(&config.api)?;
    let run = client.get_deployment_status(deployment_id).await?;

    if run.status != DeploymentStatus::InProgress {
        println!(
            "{} {}",
            "○".yellow(),
            CancelError::NotCancelable(run.status)
        );
        return print_run(&run, json);
    }

    let ack = client.cancel_deployment(deployment_id).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&ack)?);
    } else {
        println!(
            "{} Cancellation requested for {}: {}",
            "✓".green(),
            deployment_id.cyan(),
            format_status(ack.status)
        );
    }
    Ok(())
}
