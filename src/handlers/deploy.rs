//! `relay-ctl deploy`: the interactive six-step wizard
//!
//! Every decision is made by `WizardController`; this module only prompts,
//! prints and forwards answers as session actions.

use super::follow::{FollowOutcome, follow_deployment};
use crate::config::types::Config;
use crate::error::Result;
use crate::platform::api::PlatformApiClient;
use crate::platform::api::types::DeploymentStatus;
use crate::wizard::catalog;
use crate::wizard::{
    ConfigField, ConfigPatch, PromptResult, WizardController, WizardError, WizardSession,
    WizardStep, collect_relay_name, collect_sizing, display_confirmation, display_estimate,
    display_outcome, display_step_header, select_infrastructure_type, select_machine_type,
    select_provider, select_region, wizard_render_config,
};
use colored::Colorize;
use inquire::{Confirm, InquireError, Select};
use std::sync::Arc;

/// What the wizard loop does after a step
enum Flow {
    Continue,
    Quit,
    Done,
}

pub async fn handle_deploy(config: &Config) -> Result<()> {
    let client = Arc::new(PlatformApiClient::new(&config.api)?);
    println!(
        "\n{} {}",
        "Relay deployment".bold(),
        format!("({})", client.api_url()).dimmed()
    );
    let mut controller = WizardController::new(client, &config.deployment);

    loop {
        let session = controller.session();
        let flow = match session.current_step() {
            WizardStep::Provider => provider_step(&mut controller, &session)?,
            WizardStep::Infrastructure => infrastructure_step(&mut controller, &session)?,
            WizardStep::RegionSizing => region_sizing_step(&mut controller, &session)?,
            WizardStep::Network => network_step(&mut controller, &session)?,
            WizardStep::Review => review_step(&mut controller).await?,
            WizardStep::Deploy => deploy_step(&mut controller).await?,
        };

        match flow {
            Flow::Continue => {}
            Flow::Quit => {
                println!("\n{}", "Wizard cancelled.".dimmed());
                return Ok(());
            }
            Flow::Done => return Ok(()),
        }
    }
}

/// Move forward, printing the reason inline when the step is not satisfied
fn advance(controller: &mut WizardController) -> Flow {
    if let Err(e) = controller.next_step() {
        println!("{} {}", "⚠".yellow(), e);
    }
    Flow::Continue
}

fn go_back(controller: &mut WizardController) -> Result<Flow> {
    if controller.current_step() == WizardStep::Provider {
        return Ok(Flow::Quit);
    }
    controller.previous_step()?;
    Ok(Flow::Continue)
}

fn provider_step(controller: &mut WizardController, session: &WizardSession) -> Result<Flow> {
    let current = session.form_data().provider;
    match select_provider(current) {
        PromptResult::Selected(provider) => {
            let mut patch = ConfigPatch::new().provider(provider);
            if current != Some(provider) {
                patch = patch
                    .field(ConfigField::InfrastructureType(None))
                    .field(ConfigField::Region(None))
                    .clear_sizing();
            }
            controller.set_field(patch)?;
            Ok(advance(controller))
        }
        PromptResult::Back | PromptResult::Cancelled => Ok(Flow::Quit),
    }
}

fn infrastructure_step(controller: &mut WizardController, session: &WizardSession) -> Result<Flow> {
    let form = session.form_data();
    let Some(provider) = form.provider else {
        return go_back(controller);
    };

    match select_infrastructure_type(&provider, form.infrastructure_type.as_deref()) {
        PromptResult::Selected(infra) => {
            let mut patch = ConfigPatch::new().infrastructure_type(infra.id);
            if form
                .region
                .as_deref()
                .is_some_and(|r| !infra.regions.contains(&r))
            {
                patch = patch.field(ConfigField::Region(None));
            }
            let instance_type_offered = form
                .instance_type
                .as_deref()
                .is_some_and(|t| infra.machine_types.iter().any(|m| m.id == t));
            if !infra.requires_sizing {
                patch = patch.clear_sizing();
            } else if !instance_type_offered {
                patch = patch.field(ConfigField::InstanceType(None));
            }
            controller.set_field(patch)?;
            Ok(advance(controller))
        }
        PromptResult::Back => go_back(controller),
        PromptResult::Cancelled => Ok(Flow::Quit),
    }
}

fn region_sizing_step(controller: &mut WizardController, session: &WizardSession) -> Result<Flow> {
    let form = session.form_data();
    let infra = match (form.provider, form.infrastructure_type.as_deref()) {
        (Some(provider), Some(id)) => {
            catalog::find_infrastructure(&provider, id).map(|i| (provider, i))
        }
        _ => None,
    };
    let Some((provider, infra)) = infra else {
        return go_back(controller);
    };

    let region = match select_region(&provider, infra, form.region.as_deref()) {
        PromptResult::Selected(region) => region,
        PromptResult::Back => return go_back(controller),
        PromptResult::Cancelled => return Ok(Flow::Quit),
    };

    let patch = if infra.requires_sizing {
        let current = form.instance_type.as_deref();
        let instance_type = match select_machine_type(&provider, infra, current) {
            PromptResult::Selected(t) => t,
            PromptResult::Back => return Ok(Flow::Continue),
            PromptResult::Cancelled => return Ok(Flow::Quit),
        };
        let sizing = match collect_sizing(form) {
            PromptResult::Selected(s) => s,
            PromptResult::Back => return Ok(Flow::Continue),
            PromptResult::Cancelled => return Ok(Flow::Quit),
        };
        ConfigPatch::new()
            .region(region)
            .instance_type(instance_type)
            .instance_count(sizing.instance_count)
            .auto_scaling(sizing.auto_scaling_min, sizing.auto_scaling_max)
    } else {
        ConfigPatch::new().region(region).clear_sizing()
    };

    controller.set_field(patch)?;
    Ok(advance(controller))
}

fn network_step(controller: &mut WizardController, session: &WizardSession) -> Result<Flow> {
    match collect_relay_name(session.form_data()) {
        PromptResult::Selected(name) => {
            controller.set_field(ConfigPatch::new().relay_name(name))?;
            Ok(advance(controller))
        }
        PromptResult::Back => go_back(controller),
        PromptResult::Cancelled => Ok(Flow::Quit),
    }
}

async fn review_step(controller: &mut WizardController) -> Result<Flow> {
    display_step_header(WizardStep::Review);

    if controller.session().estimate().is_none() {
        println!("  {}", "Requesting cost estimate...".dimmed());
    }
    let estimate = match controller.request_estimate().await {
        Ok(estimate) => estimate,
        Err(e) => {
            println!("{} {}", "✗".red(), e);
            return review_menu(controller, true);
        }
    };
    display_estimate(&estimate);

    let gate = controller.open_confirmation()?;
    display_confirmation(gate);

    loop {
        let answer = Confirm::new("Provision this relay?")
            .with_render_config(wizard_render_config())
            .with_default(false)
            .with_help_message("This creates cloud resources and starts billing")
            .prompt();

        match answer {
            Ok(true) => match controller.confirm_deployment().await {
                Ok(deployment_id) => {
                    println!("  Deployment started: {}", deployment_id.dimmed());
                    return Ok(Flow::Continue);
                }
                Err(e) => {
                    // gate is open again; the operator may retry or decline
                    println!("{} {}", "✗".red(), e);
                }
            },
            Ok(false) => {
                controller.cancel_confirmation();
                return review_menu(controller, false);
            }
            Err(InquireError::OperationCanceled) => {
                controller.cancel_confirmation();
                return go_back(controller);
            }
            Err(_) => return Ok(Flow::Quit),
        }
    }
}

/// Choices offered on the review step when not confirming
fn review_menu(controller: &mut WizardController, estimate_failed: bool) -> Result<Flow> {
    const RETRY: &str = "Retry estimate";
    const REVIEW: &str = "Review again";
    const BACK: &str = "Back to previous step";
    const JUMP: &str = "Jump to step...";
    const QUIT: &str = "Quit wizard";

    let first = if estimate_failed { RETRY } else { REVIEW };
    let choice = Select::new("What next?", vec![first, BACK, JUMP, QUIT])
        .with_render_config(wizard_render_config())
        .prompt();

    match choice {
        Ok(RETRY) | Ok(REVIEW) => Ok(Flow::Continue),
        Ok(BACK) => go_back(controller),
        Ok(JUMP) => jump_menu(controller),
        Ok(_) => Ok(Flow::Quit),
        Err(InquireError::OperationCanceled) => Ok(Flow::Continue),
        Err(_) => Ok(Flow::Quit),
    }
}

fn jump_menu(controller: &mut WizardController) -> Result<Flow> {
    let reachable = controller.session().max_reachable_step();
    let steps: Vec<WizardStep> = WizardStep::all()
        .into_iter()
        .filter(|s| s.index() <= reachable)
        .collect();

    match Select::new("Jump to:", steps)
        .with_render_config(wizard_render_config())
        .prompt()
    {
        Ok(step) => {
            if let Err(e) = controller.jump_to_step(step.index()) {
                println!("{} {}", "⚠".yellow(), e);
            }
            Ok(Flow::Continue)
        }
        Err(_) => Ok(Flow::Continue),
    }
}

async fn deploy_step(controller: &mut WizardController) -> Result<Flow> {
    display_step_header(WizardStep::Deploy);

    let outcome = match controller.deployment() {
        Some(handle) => {
            println!(
                "  {}",
                "Ctrl-C cancels the deployment; press it twice to stop watching.".dimmed()
            );
            follow_deployment(handle).await
        }
        None => {
            controller.reset();
            return Ok(Flow::Continue);
        }
    };

    let run = match outcome {
        FollowOutcome::Finished(run) => run,
        FollowOutcome::Detached(run) => {
            controller.detach();
            println!(
                "\n{} Stopped watching deployment {}. Follow it with: relay-ctl status {} --watch",
                "○".dimmed(),
                run.deployment_id.cyan(),
                run.deployment_id
            );
            return Ok(Flow::Done);
        }
    };
    display_outcome(&run);

    let start_over = Confirm::new("Start a new deployment?")
        .with_render_config(wizard_render_config())
        .with_default(false)
        .prompt()
        .unwrap_or(false);
    if start_over {
        controller.reset();
        return Ok(Flow::Continue);
    }

    match run.status {
        DeploymentStatus::Failed => Err(WizardError::from_run(&run)
            .unwrap_or_else(|| WizardError::DeploymentFailed(String::new()))
            .into()),
        _ => Ok(Flow::Done),
    }
}
