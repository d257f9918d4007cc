//! Composition root of the deployment wizard
//!
//! `WizardController` owns one wizard run: the session value, its estimator,
//! the confirmation gate and the running deployment. Renderers drive it with
//! navigation and orchestration calls and observe it through
//! [`subscribe`](WizardController::subscribe) and
//! [`subscribe_deployment`](WizardController::subscribe_deployment).

use super::confirmation::ConfirmationGate;
use super::deployment::{DeploymentHandle, DeploymentOrchestrator, PollSettings};
use super::error::{CancelError, StartError, WizardError};
use super::estimator::ResourceEstimator;
use super::session::{ConfigPatch, WizardAction, WizardSession};
use super::step::WizardStep;
use super::validation;
use crate::config::types::DeploymentSettings;
use crate::platform::api::RelayBackend;
use crate::platform::api::types::{DeploymentRun, ResourceEstimate};
use std::sync::Arc;
use tokio::sync::watch;

pub struct WizardController {
    session: watch::Sender<WizardSession>,
    estimator: ResourceEstimator,
    orchestrator: DeploymentOrchestrator,
    cost_warning_threshold: f64,
    gate: Option<ConfirmationGate>,
    deployment: Option<DeploymentHandle>,
}

impl WizardController {
    pub fn new(backend: Arc<dyn RelayBackend>, settings: &DeploymentSettings) -> Self {
        let (session, _) = watch::channel(WizardSession::new());
        Self {
            session,
            estimator: ResourceEstimator::new(Arc::clone(&backend), settings.estimate_timeout()),
            orchestrator: DeploymentOrchestrator::new(backend, PollSettings::from(settings)),
            cost_warning_threshold: settings.cost_warning_threshold,
            gate: None,
            deployment: None,
        }
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    pub fn session(&self) -> WizardSession {
        self.session.borrow().clone()
    }

    pub fn current_step(&self) -> WizardStep {
        self.session.borrow().current_step()
    }

    /// Receive a new session snapshot on every state change
    pub fn subscribe(&self) -> watch::Receiver<WizardSession> {
        self.session.subscribe()
    }

    pub fn deployment(&self) -> Option<&DeploymentHandle> {
        self.deployment.as_ref()
    }

    pub fn deployment_run(&self) -> Option<DeploymentRun> {
        self.deployment.as_ref().map(DeploymentHandle::snapshot)
    }

    /// Receive run snapshots of the running deployment
    pub fn subscribe_deployment(&self) -> Option<watch::Receiver<DeploymentRun>> {
        self.deployment.as_ref().map(DeploymentHandle::subscribe)
    }

    /// Most recent transient poll failure, or the terminal failure of the run
    pub fn deployment_error(&self) -> Option<WizardError> {
        let run = self.deployment_run()?;
        WizardError::from_run(&run).or_else(|| run.last_poll_error.map(WizardError::Poll))
    }

    pub fn confirmation(&self) -> Option<&ConfirmationGate> {
        self.gate.as_ref()
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    fn dispatch(&mut self, action: WizardAction) -> bool {
        let changed = self.session.send_if_modified(|session| {
            let next = session.clone().reduce(action);
            if next == *session {
                return false;
            }
            if next.current_step() != session.current_step() {
                log::debug!(
                    "Wizard step {} -> {}",
                    session.current_step().index(),
                    next.current_step().index()
                );
            }
            *session = next;
            true
        });
        if changed && self.current_step() != WizardStep::Review {
            self.gate = None;
        }
        changed
    }

    fn committed_error(&self) -> Option<WizardError> {
        let session = self.session.borrow();
        session.deployment_id().map(|_| WizardError::ValidationBlocked {
            step: session.current_step().index(),
            reason: "a deployment has already been started; reset the wizard to change it"
                .to_string(),
        })
    }

    /// Merge field values into the form
    ///
    /// Changing a field invalidates the step that owns it, every later step
    /// and any estimate.
    pub fn set_field(&mut self, patch: ConfigPatch) -> Result<(), WizardError> {
        if let Some(err) = self.committed_error() {
            return Err(err);
        }
        if self.dispatch(WizardAction::SetField(patch)) {
            self.gate = None;
        }
        Ok(())
    }

    pub fn next_step(&mut self) -> Result<WizardStep, WizardError> {
        let blocked = {
            let session = self.session.borrow();
            session
                .blocked_reason()
                .map(|reason| (session.current_step().index(), reason))
        };
        if let Some((step, reason)) = blocked {
            return Err(WizardError::ValidationBlocked { step, reason });
        }
        self.dispatch(WizardAction::NextStep);
        Ok(self.current_step())
    }

    pub fn previous_step(&mut self) -> Result<WizardStep, WizardError> {
        if let Some(err) = self.committed_error() {
            return Err(err);
        }
        self.dispatch(WizardAction::PreviousStep);
        self.gate = None;
        Ok(self.current_step())
    }

    pub fn jump_to_step(&mut self, index: u8) -> Result<WizardStep, WizardError> {
        if let Some(err) = self.committed_error() {
            return Err(err);
        }
        let reachable = self.session.borrow().max_reachable_step();
        if WizardStep::from_index(index).is_none() || index > reachable {
            return Err(WizardError::ValidationBlocked {
                step: index,
                reason: format!("only steps 1-{} can be reached", reachable),
            });
        }
        self.dispatch(WizardAction::JumpToStep(index));
        self.gate = None;
        Ok(self.current_step())
    }

    /// Start over, stopping any poller without canceling server-side work
    pub fn reset(&mut self) {
        if let Some(handle) = self.deployment.take() {
            handle.dispose();
        }
        self.gate = None;
        self.dispatch(WizardAction::Reset);
    }

    /// Stop following the running deployment, keeping the session as is
    pub fn detach(&mut self) {
        if let Some(handle) = self.deployment.take() {
            handle.dispose();
        }
    }

    // =========================================================================
    // Estimate, confirmation and deployment
    // =========================================================================

    /// Fetch an estimate for the current form, reusing one already held
    pub async fn request_estimate(&mut self) -> Result<ResourceEstimate, WizardError> {
        if let Some(err) = self.committed_error() {
            return Err(err);
        }
        let config = {
            let session = self.session.borrow();
            if let Some(estimate) = session.estimate() {
                return Ok(estimate.clone());
            }
            session.form_data().clone()
        };

        let estimate = self.estimator.estimate(&config).await?;
        self.dispatch(WizardAction::EstimateReady {
            config,
            estimate: estimate.clone(),
        });
        Ok(estimate)
    }

    /// Open the confirmation gate from the review step
    pub fn open_confirmation(&mut self) -> Result<&ConfirmationGate, WizardError> {
        if let Some(err) = self.committed_error() {
            return Err(err);
        }
        let gate = {
            let session = self.session.borrow();
            if session.current_step() != WizardStep::Review {
                return Err(WizardError::ValidationBlocked {
                    step: session.current_step().index(),
                    reason: "confirmation is only available from the review step".to_string(),
                });
            }
            let estimate = session
                .estimate()
                .cloned()
                .ok_or_else(|| WizardError::ValidationBlocked {
                    step: WizardStep::Review.index(),
                    reason: "fetch a resource estimate first".to_string(),
                })?;
            ConfirmationGate::new(
                session.form_data().clone(),
                estimate,
                self.cost_warning_threshold,
            )
        };
        Ok(self.gate.insert(gate))
    }

    /// Dismiss the gate and stay on review; refused while submitting
    pub fn cancel_confirmation(&mut self) -> bool {
        let dismissed = self.gate.as_mut().is_some_and(ConfirmationGate::cancel);
        if dismissed {
            self.gate = None;
        }
        dismissed
    }

    /// Submit the confirmed configuration and start polling
    ///
    /// On failure the session stays on review and the gate reopens for retry.
    pub async fn confirm_deployment(&mut self) -> Result<String, WizardError> {
        if let Some(id) = self.session.borrow().deployment_id() {
            return Err(StartError::AlreadyStarted(id.to_string()).into());
        }
        let gate = self.gate.as_mut().ok_or(StartError::NotConfirmed)?;
        let mut config = gate.begin_submit()?;
        if config.relay_name.is_none() {
            config.relay_name = validation::effective_relay_name(&config);
        }

        let result = self.orchestrator.start(&config).await;
        match result {
            Ok(handle) => {
                let deployment_id = handle.deployment_id().to_string();
                if let Some(gate) = self.gate.as_mut() {
                    gate.submit_succeeded();
                }
                self.dispatch(WizardAction::DeploymentStarted(deployment_id.clone()));
                self.gate = None;
                self.deployment = Some(handle);
                Ok(deployment_id)
            }
            Err(e) => {
                if let Some(gate) = self.gate.as_mut() {
                    gate.submit_failed();
                }
                Err(e.into())
            }
        }
    }

    /// Ask the backend to cancel the running deployment
    pub async fn cancel_deployment(&self) -> Result<DeploymentRun, WizardError> {
        let handle = self.deployment.as_ref().ok_or(CancelError::NoDeployment)?;
        Ok(handle.cancel().await?)
    }

    /// Wait for the running deployment to reach a terminal state
    pub async fn wait_for_deployment(&self) -> Option<DeploymentRun> {
        match &self.deployment {
            Some(handle) => Some(handle.wait().await),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::testing::{ScriptedBackend, scenario_config};

    fn controller(backend: ScriptedBackend) -> WizardController {
        WizardController::new(Arc::new(backend), &DeploymentSettings::default())
    }

    fn walk_to_review(controller: &mut WizardController) {
        controller
            .set_field(ConfigPatch::from_config(&scenario_config()))
            .unwrap();
        for _ in 0..4 {
            controller.next_step().unwrap();
        }
        assert_eq!(controller.current_step(), WizardStep::Review);
    }

    #[test]
    fn test_next_step_reports_blocking_reason() {
        let mut controller = controller(ScriptedBackend::new());
        match controller.next_step() {
            Err(WizardError::ValidationBlocked { step, reason }) => {
                assert_eq!(step, 1);
                assert!(reason.contains("provider"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_confirmation_requires_estimate() {
        let mut controller = controller(ScriptedBackend::new());
        walk_to_review(&mut controller);
        assert!(controller.open_confirmation().is_err());

        controller.request_estimate().await.unwrap();
        let gate = controller.open_confirmation().unwrap();
        assert!(gate.cost_warning().is_none());
    }

    #[tokio::test]
    async fn test_confirm_without_gate_is_refused() {
        let mut controller = controller(ScriptedBackend::new());
        walk_to_review(&mut controller);
        controller.request_estimate().await.unwrap();
        assert_eq!(
            controller.confirm_deployment().await.unwrap_err(),
            WizardError::Start(StartError::NotConfirmed)
        );
    }

    #[tokio::test]
    async fn test_edit_closes_gate_and_drops_estimate() {
        let mut controller = controller(ScriptedBackend::new());
        walk_to_review(&mut controller);
        controller.request_estimate().await.unwrap();
        controller.open_confirmation().unwrap();

        controller
            .set_field(ConfigPatch::new().instance_count(4))
            .unwrap();
        assert!(controller.confirmation().is_none());
        assert!(controller.session().estimate().is_none());
        assert_eq!(controller.current_step(), WizardStep::RegionSizing);
    }

    #[tokio::test]
    async fn test_cancel_confirmation_returns_to_review() {
        let mut controller = controller(ScriptedBackend::new());
        walk_to_review(&mut controller);
        controller.request_estimate().await.unwrap();
        controller.open_confirmation().unwrap();

        assert!(controller.cancel_confirmation());
        assert!(controller.confirmation().is_none());
        assert_eq!(controller.current_step(), WizardStep::Review);
        assert!(controller.deployment().is_none());
    }

    #[tokio::test]
    async fn test_estimate_reused_for_unchanged_form() {
        let backend = Arc::new(ScriptedBackend::new());
        let mut controller =
            WizardController::new(backend.clone(), &DeploymentSettings::default());
        walk_to_review(&mut controller);

        controller.request_estimate().await.unwrap();
        controller.request_estimate().await.unwrap();
        assert_eq!(ScriptedBackend::calls(&backend.estimate_calls), 1);
    }

    #[tokio::test]
    async fn test_cancel_without_deployment() {
        let controller = controller(ScriptedBackend::new());
        assert_eq!(
            controller.cancel_deployment().await.unwrap_err(),
            WizardError::Cancel(CancelError::NoDeployment)
        );
    }

    #[test]
    fn test_session_snapshots_published() {
        let mut controller = controller(ScriptedBackend::new());
        let mut rx = controller.subscribe();
        controller
            .set_field(ConfigPatch::new().provider(crate::platform::api::CloudProvider::Gcp))
            .unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(
            rx.borrow_and_update().form_data().provider,
            Some(crate::platform::api::CloudProvider::Gcp)
        );

        controller.next_step().unwrap();
        assert_eq!(rx.borrow().current_step(), WizardStep::Infrastructure);
    }
}
