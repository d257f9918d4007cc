//! Wizard session state and its transition function
//!
//! `WizardSession` is an immutable value. Every transition goes through
//! [`WizardSession::reduce`], a pure function from `(session, action)` to the
//! next session, so the whole navigation model can be tested without I/O.

use super::step::{TOTAL_STEPS, WizardStep};
use super::validation;
use crate::platform::api::types::{CloudProvider, DeploymentConfig, ResourceEstimate};
use std::collections::BTreeSet;

/// A single field update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigField {
    Provider(Option<CloudProvider>),
    InfrastructureType(Option<String>),
    Region(Option<String>),
    InstanceType(Option<String>),
    InstanceCount(Option<u32>),
    AutoScalingMin(Option<u32>),
    AutoScalingMax(Option<u32>),
    RelayName(Option<String>),
}

impl ConfigField {
    /// The step that collects this field
    pub fn owner(&self) -> WizardStep {
        match self {
            ConfigField::Provider(_) => WizardStep::Provider,
            ConfigField::InfrastructureType(_) => WizardStep::Infrastructure,
            ConfigField::Region(_)
            | ConfigField::InstanceType(_)
            | ConfigField::InstanceCount(_)
            | ConfigField::AutoScalingMin(_)
            | ConfigField::AutoScalingMax(_) => WizardStep::RegionSizing,
            ConfigField::RelayName(_) => WizardStep::Network,
        }
    }

    /// Write the value into `config`, returning whether anything changed
    fn apply_to(self, config: &mut DeploymentConfig) -> bool {
        fn set<T: PartialEq>(slot: &mut Option<T>, value: Option<T>) -> bool {
            if *slot == value {
                false
            } else {
                *slot = value;
                true
            }
        }

        match self {
            ConfigField::Provider(v) => set(&mut config.provider, v),
            ConfigField::InfrastructureType(v) => set(&mut config.infrastructure_type, v),
            ConfigField::Region(v) => set(&mut config.region, v),
            ConfigField::InstanceType(v) => set(&mut config.instance_type, v),
            ConfigField::InstanceCount(v) => set(&mut config.instance_count, v),
            ConfigField::AutoScalingMin(v) => set(&mut config.auto_scaling_min, v),
            ConfigField::AutoScalingMax(v) => set(&mut config.auto_scaling_max, v),
            ConfigField::RelayName(v) => set(&mut config.relay_name, v),
        }
    }
}

/// A batch of field updates merged into the form data at once
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPatch {
    fields: Vec<ConfigField>,
}

impl ConfigPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: ConfigField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn provider(self, provider: CloudProvider) -> Self {
        self.field(ConfigField::Provider(Some(provider)))
    }

    pub fn infrastructure_type(self, id: impl Into<String>) -> Self {
        self.field(ConfigField::InfrastructureType(Some(id.into())))
    }

    pub fn region(self, region: impl Into<String>) -> Self {
        self.field(ConfigField::Region(Some(region.into())))
    }

    pub fn instance_type(self, instance_type: impl Into<String>) -> Self {
        self.field(ConfigField::InstanceType(Some(instance_type.into())))
    }

    pub fn instance_count(self, count: u32) -> Self {
        self.field(ConfigField::InstanceCount(Some(count)))
    }

    pub fn auto_scaling(self, min: Option<u32>, max: Option<u32>) -> Self {
        self.field(ConfigField::AutoScalingMin(min))
            .field(ConfigField::AutoScalingMax(max))
    }

    pub fn relay_name(self, name: Option<String>) -> Self {
        self.field(ConfigField::RelayName(name))
    }

    /// Clear the sizing fields, e.g. when switching to a serverless type
    pub fn clear_sizing(self) -> Self {
        self.field(ConfigField::InstanceType(None))
            .field(ConfigField::InstanceCount(None))
            .field(ConfigField::AutoScalingMin(None))
            .field(ConfigField::AutoScalingMax(None))
    }

    /// Patch that reproduces every set field of `config`
    pub fn from_config(config: &DeploymentConfig) -> Self {
        Self {
            fields: vec![
                ConfigField::Provider(config.provider),
                ConfigField::InfrastructureType(config.infrastructure_type.clone()),
                ConfigField::Region(config.region.clone()),
                ConfigField::InstanceType(config.instance_type.clone()),
                ConfigField::InstanceCount(config.instance_count),
                ConfigField::AutoScalingMin(config.auto_scaling_min),
                ConfigField::AutoScalingMax(config.auto_scaling_max),
                ConfigField::RelayName(config.relay_name.clone()),
            ],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Session transitions
#[derive(Debug, Clone, PartialEq)]
pub enum WizardAction {
    SetField(ConfigPatch),
    NextStep,
    PreviousStep,
    JumpToStep(u8),
    /// Estimate produced for `config`; dropped if the form has moved on
    EstimateReady {
        config: DeploymentConfig,
        estimate: ResourceEstimate,
    },
    ClearEstimate,
    /// Server accepted the deployment; the only way into the deploy step
    DeploymentStarted(String),
    Reset,
}

/// Accumulated state of one wizard run
#[derive(Debug, Clone, PartialEq)]
pub struct WizardSession {
    current_step: WizardStep,
    completed_steps: BTreeSet<WizardStep>,
    form_data: DeploymentConfig,
    estimate: Option<ResourceEstimate>,
    deployment_id: Option<String>,
}

impl Default for WizardSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardSession {
    pub fn new() -> Self {
        Self {
            current_step: WizardStep::Provider,
            completed_steps: BTreeSet::new(),
            form_data: DeploymentConfig::default(),
            estimate: None,
            deployment_id: None,
        }
    }

    pub fn current_step(&self) -> WizardStep {
        self.current_step
    }

    pub fn total_steps(&self) -> u8 {
        TOTAL_STEPS
    }

    pub fn completed_steps(&self) -> &BTreeSet<WizardStep> {
        &self.completed_steps
    }

    pub fn is_completed(&self, step: WizardStep) -> bool {
        self.completed_steps.contains(&step)
    }

    pub fn form_data(&self) -> &DeploymentConfig {
        &self.form_data
    }

    /// Estimate for the current form data, if one has been fetched
    pub fn estimate(&self) -> Option<&ResourceEstimate> {
        self.estimate.as_ref()
    }

    pub fn deployment_id(&self) -> Option<&str> {
        self.deployment_id.as_deref()
    }

    /// A deployment exists; configuration is frozen until reset
    pub fn is_committed(&self) -> bool {
        self.deployment_id.is_some()
    }

    /// Highest step index reachable by `JumpToStep`
    pub fn max_reachable_step(&self) -> u8 {
        self.completed_steps
            .iter()
            .next_back()
            .map(|s| s.index())
            .unwrap_or(0)
            .max(self.current_step.index())
    }

    /// Why the current step cannot be left forward, if it cannot
    pub fn blocked_reason(&self) -> Option<String> {
        if self.is_committed() {
            return Some("a deployment has already been started".to_string());
        }
        if self.current_step == WizardStep::Review {
            return match validation::check_step(
                WizardStep::Review,
                &self.form_data,
                self.estimate.as_ref(),
            ) {
                Ok(()) => Some("confirm the deployment to continue".to_string()),
                Err(reason) => Some(reason),
            };
        }
        validation::check_step(self.current_step, &self.form_data, self.estimate.as_ref()).err()
    }

    /// Whether `NextStep` would move the pointer
    pub fn can_advance(&self) -> bool {
        self.blocked_reason().is_none()
    }

    /// Apply an action, producing the next session
    pub fn reduce(self, action: WizardAction) -> Self {
        match action {
            WizardAction::Reset => Self::new(),
            _ if self.is_committed() => self,
            WizardAction::SetField(patch) => self.set_fields(patch),
            WizardAction::NextStep => self.next_step(),
            WizardAction::PreviousStep => self.previous_step(),
            WizardAction::JumpToStep(index) => self.jump_to_step(index),
            WizardAction::EstimateReady { config, estimate } => {
                if config == self.form_data {
                    Self {
                        estimate: Some(estimate),
                        ..self
                    }
                } else {
                    self
                }
            }
            WizardAction::ClearEstimate => Self {
                estimate: None,
                ..self
            },
            WizardAction::DeploymentStarted(id) => self.deployment_started(id),
        }
    }

    fn set_fields(mut self, patch: ConfigPatch) -> Self {
        let mut earliest_changed: Option<WizardStep> = None;
        for field in patch.fields {
            let owner = field.owner();
            if field.apply_to(&mut self.form_data) {
                earliest_changed = Some(earliest_changed.map_or(owner, |e| e.min(owner)));
            }
        }

        if let Some(owner) = earliest_changed {
            self.completed_steps.retain(|s| *s < owner);
            self.current_step = self.current_step.min(owner);
            self.estimate = None;
        }
        self
    }

    fn next_step(mut self) -> Self {
        if !self.can_advance() {
            return self;
        }
        if let Some(next) = self.current_step.next() {
            self.completed_steps.insert(self.current_step);
            self.current_step = next;
        }
        self
    }

    fn previous_step(mut self) -> Self {
        if let Some(previous) = self.current_step.previous() {
            self.current_step = previous;
        }
        self
    }

    fn jump_to_step(mut self, index: u8) -> Self {
        if index > self.max_reachable_step() {
            return self;
        }
        if let Some(step) = WizardStep::from_index(index) {
            self.current_step = step;
        }
        self
    }

    fn deployment_started(mut self, id: String) -> Self {
        if self.current_step != WizardStep::Review || self.estimate.is_none() || id.is_empty() {
            return self;
        }
        self.completed_steps.insert(WizardStep::Review);
        self.current_step = WizardStep::Deploy;
        self.deployment_id = Some(id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimate() -> ResourceEstimate {
        ResourceEstimate {
            estimated_cost_monthly: 85.5,
            estimated_deployment_time_minutes: 15,
            resource_count: 12,
            breakdown: Default::default(),
        }
    }

    fn scenario_patch() -> ConfigPatch {
        ConfigPatch::new()
            .provider(CloudProvider::Aws)
            .infrastructure_type("ec2")
            .region("us-east-1")
            .instance_type("t3.medium")
            .instance_count(2)
    }

    /// Session sitting on the review step with an estimate
    fn at_review() -> WizardSession {
        let session = WizardSession::new()
            .reduce(WizardAction::SetField(scenario_patch()))
            .reduce(WizardAction::NextStep)
            .reduce(WizardAction::NextStep)
            .reduce(WizardAction::NextStep)
            .reduce(WizardAction::NextStep);
        let config = session.form_data().clone();
        session.reduce(WizardAction::EstimateReady {
            config,
            estimate: estimate(),
        })
    }

    #[test]
    fn test_next_step_blocked_without_provider() {
        let session = WizardSession::new().reduce(WizardAction::NextStep);
        assert_eq!(session.current_step(), WizardStep::Provider);
        assert!(session.completed_steps().is_empty());
    }

    #[test]
    fn test_set_field_does_not_move_forward() {
        let session = WizardSession::new().reduce(WizardAction::SetField(scenario_patch()));
        assert_eq!(session.current_step(), WizardStep::Provider);
        assert_eq!(session.form_data().instance_count, Some(2));
    }

    #[test]
    fn test_walk_to_review() {
        let session = at_review();
        assert_eq!(session.current_step(), WizardStep::Review);
        assert_eq!(session.completed_steps().len(), 4);
        assert!(session.estimate().is_some());
    }

    #[test]
    fn test_next_step_at_review_needs_confirmation() {
        let session = at_review().reduce(WizardAction::NextStep);
        assert_eq!(session.current_step(), WizardStep::Review);
        assert!(session.deployment_id().is_none());
    }

    #[test]
    fn test_previous_step_noop_at_first_step() {
        let session = WizardSession::new().reduce(WizardAction::PreviousStep);
        assert_eq!(session.current_step(), WizardStep::Provider);
    }

    #[test]
    fn test_jump_bounds() {
        let session = at_review();
        let back = session.clone().reduce(WizardAction::JumpToStep(2));
        assert_eq!(back.current_step(), WizardStep::Infrastructure);

        let forward = back.clone().reduce(WizardAction::JumpToStep(4));
        assert_eq!(forward.current_step(), WizardStep::Network);

        // review itself was never completed, so it is reached by NextStep again
        let too_far = back.clone().reduce(WizardAction::JumpToStep(5));
        assert_eq!(too_far.current_step(), WizardStep::Infrastructure);
        let walked = forward.reduce(WizardAction::NextStep);
        assert_eq!(walked.current_step(), WizardStep::Review);

        let invalid = session.reduce(WizardAction::JumpToStep(0));
        assert_eq!(invalid.current_step(), WizardStep::Review);
    }

    #[test]
    fn test_backward_edit_invalidates_later_steps_and_estimate() {
        let session = at_review().reduce(WizardAction::SetField(
            ConfigPatch::new().infrastructure_type("ecs"),
        ));
        assert_eq!(session.current_step(), WizardStep::Infrastructure);
        assert!(session.estimate().is_none());
        assert!(session.is_completed(WizardStep::Provider));
        assert!(!session.is_completed(WizardStep::Infrastructure));
        assert!(!session.is_completed(WizardStep::Network));
        assert_eq!(session.max_reachable_step(), 2);
    }

    #[test]
    fn test_unchanged_value_is_not_an_edit() {
        let session = at_review();
        let same = session
            .clone()
            .reduce(WizardAction::SetField(ConfigPatch::new().region("us-east-1")));
        assert_eq!(same, session);
    }

    #[test]
    fn test_stale_estimate_is_dropped() {
        let session = WizardSession::new().reduce(WizardAction::SetField(scenario_patch()));
        let stale_config = session.form_data().clone();
        let session = session
            .reduce(WizardAction::SetField(ConfigPatch::new().instance_count(3)))
            .reduce(WizardAction::EstimateReady {
                config: stale_config,
                estimate: estimate(),
            });
        assert!(session.estimate().is_none());
    }

    #[test]
    fn test_deployment_started_enters_deploy_once() {
        let session = at_review().reduce(WizardAction::DeploymentStarted("d1".to_string()));
        assert_eq!(session.current_step(), WizardStep::Deploy);
        assert_eq!(session.deployment_id(), Some("d1"));
        assert!(session.is_completed(WizardStep::Review));

        let again = session.reduce(WizardAction::DeploymentStarted("d2".to_string()));
        assert_eq!(again.deployment_id(), Some("d1"));
    }

    #[test]
    fn test_deployment_started_requires_estimate() {
        let session = at_review()
            .reduce(WizardAction::ClearEstimate)
            .reduce(WizardAction::DeploymentStarted("d1".to_string()));
        assert!(session.deployment_id().is_none());
        assert_eq!(session.current_step(), WizardStep::Review);
    }

    #[test]
    fn test_committed_session_refuses_navigation_and_edits() {
        let session = at_review().reduce(WizardAction::DeploymentStarted("d1".to_string()));
        let after = session
            .clone()
            .reduce(WizardAction::PreviousStep)
            .reduce(WizardAction::JumpToStep(1))
            .reduce(WizardAction::SetField(ConfigPatch::new().instance_count(5)));
        assert_eq!(after, session);
    }

    #[test]
    fn test_reset_starts_over() {
        let session = at_review()
            .reduce(WizardAction::DeploymentStarted("d1".to_string()))
            .reduce(WizardAction::Reset);
        assert_eq!(session, WizardSession::new());
    }

    #[test]
    fn test_patch_from_config_reproduces_form() {
        let config = at_review().form_data().clone();
        let session =
            WizardSession::new().reduce(WizardAction::SetField(ConfigPatch::from_config(&config)));
        assert_eq!(session.form_data(), &config);
    }
}
