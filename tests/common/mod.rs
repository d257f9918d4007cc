//! Shared helpers for the wizard integration tests

#![allow(dead_code)]

use relay_ctl::platform::api::{CloudProvider, DeploymentRun, DeploymentStatus, RelayBackend};
use relay_ctl::wizard::testing::{self, ScriptedBackend};
use relay_ctl::wizard::{ConfigPatch, WizardController, WizardStep};
use std::sync::Arc;

/// Backend that answers every status poll from `runs`, in order
pub fn scripted(runs: Vec<DeploymentRun>) -> ScriptedBackend {
    ScriptedBackend::new().with_polls(runs.into_iter().map(Ok).collect())
}

pub fn run(status: DeploymentStatus, progress: u8) -> DeploymentRun {
    testing::run("d1", status, progress)
}

pub fn controller(backend: &Arc<ScriptedBackend>) -> WizardController {
    let backend: Arc<dyn RelayBackend> = backend.clone();
    WizardController::new(backend, &Default::default())
}

/// Fill steps 1-4 with aws / ec2 / us-east-1 / t3.medium x2 and stop on review
pub fn walk_to_review(wizard: &mut WizardController) {
    wizard
        .set_field(ConfigPatch::new().provider(CloudProvider::Aws))
        .unwrap();
    wizard.next_step().unwrap();
    wizard
        .set_field(ConfigPatch::new().infrastructure_type("ec2"))
        .unwrap();
    wizard.next_step().unwrap();
    wizard
        .set_field(
            ConfigPatch::new()
                .region("us-east-1")
                .instance_type("t3.medium")
                .instance_count(2),
        )
        .unwrap();
    wizard.next_step().unwrap();
    assert_eq!(wizard.next_step().unwrap(), WizardStep::Review);
}
