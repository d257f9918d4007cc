//! Confirmation checkpoint before provisioning
//!
//! The gate is opened from the review step with the configuration and its
//! estimate. It resolves exactly once, either confirmed (a deployment was
//! started) or canceled (back to review, no side effect). While the start
//! request is in flight the gate cannot be submitted again or dismissed.

use super::error::StartError;
use super::validation;
use crate::platform::api::types::{DeploymentConfig, ResourceEstimate};

/// Monthly cost above which the gate shows an advisory warning
pub const DEFAULT_COST_WARNING_THRESHOLD: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Confirmed,
    Canceled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Waiting for the operator
    Open,
    /// Start request in flight
    Submitting,
    Resolved(GateOutcome),
}

#[derive(Debug, Clone)]
pub struct ConfirmationGate {
    config: DeploymentConfig,
    estimate: ResourceEstimate,
    cost_warning_threshold: f64,
    state: GateState,
}

impl ConfirmationGate {
    pub fn new(
        config: DeploymentConfig,
        estimate: ResourceEstimate,
        cost_warning_threshold: f64,
    ) -> Self {
        Self {
            config,
            estimate,
            cost_warning_threshold,
            state: GateState::Open,
        }
    }

    pub fn config(&self) -> &DeploymentConfig {
        &self.config
    }

    pub fn estimate(&self) -> &ResourceEstimate {
        &self.estimate
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn outcome(&self) -> Option<GateOutcome> {
        match self.state {
            GateState::Resolved(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Label/value rows shown to the operator before confirming
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        let config = &self.config;
        let mut rows = vec![
            (
                "Provider",
                config
                    .provider
                    .map(|p| p.display_name().to_string())
                    .unwrap_or_default(),
            ),
            (
                "Infrastructure",
                config.infrastructure_type.clone().unwrap_or_default(),
            ),
            ("Region", config.region.clone().unwrap_or_default()),
        ];
        if let Some(instance_type) = &config.instance_type {
            rows.push((
                "Instances",
                format!("{} x {}", config.instance_count.unwrap_or(1), instance_type),
            ));
        }
        if config.auto_scaling_min.is_some() || config.auto_scaling_max.is_some() {
            rows.push((
                "Auto-scaling",
                format!(
                    "{} - {}",
                    config.auto_scaling_min.map_or("-".to_string(), |v| v.to_string()),
                    config.auto_scaling_max.map_or("-".to_string(), |v| v.to_string()),
                ),
            ));
        }
        rows.push((
            "Relay name",
            validation::effective_relay_name(config).unwrap_or_default(),
        ));
        rows.push((
            "Monthly cost",
            format!("${:.2}", self.estimate.estimated_cost_monthly),
        ));
        rows.push((
            "Deployment time",
            format!("~{} min", self.estimate.estimated_deployment_time_minutes),
        ));
        rows.push(("Resources", self.estimate.resource_count.to_string()));
        rows
    }

    /// Advisory warning; never blocks confirmation
    pub fn cost_warning(&self) -> Option<String> {
        (self.estimate.estimated_cost_monthly > self.cost_warning_threshold).then(|| {
            format!(
                "Estimated monthly cost ${:.2} exceeds ${:.2}",
                self.estimate.estimated_cost_monthly, self.cost_warning_threshold
            )
        })
    }

    /// Operator confirmed; returns the configuration to submit
    pub fn begin_submit(&mut self) -> Result<DeploymentConfig, StartError> {
        match self.state {
            GateState::Open => {
                self.state = GateState::Submitting;
                Ok(self.config.clone())
            }
            GateState::Submitting => Err(StartError::InFlight),
            GateState::Resolved(_) => Err(StartError::NotConfirmed),
        }
    }

    /// Start request failed; the gate can be confirmed or dismissed again
    pub fn submit_failed(&mut self) {
        if self.state == GateState::Submitting {
            self.state = GateState::Open;
        }
    }

    pub fn submit_succeeded(&mut self) {
        if self.state == GateState::Submitting {
            self.state = GateState::Resolved(GateOutcome::Confirmed);
        }
    }

    /// Dismiss the gate; refused while a start request is in flight
    pub fn cancel(&mut self) -> bool {
        if self.state == GateState::Open {
            self.state = GateState::Resolved(GateOutcome::Canceled);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::testing::{scenario_config, scenario_estimate};

    fn gate() -> ConfirmationGate {
        ConfirmationGate::new(
            scenario_config(),
            scenario_estimate(),
            DEFAULT_COST_WARNING_THRESHOLD,
        )
    }

    #[test]
    fn test_cost_warning_is_advisory() {
        let mut estimate = scenario_estimate();
        assert!(gate().cost_warning().is_none());

        estimate.estimated_cost_monthly = 250.0;
        let mut gate = ConfirmationGate::new(scenario_config(), estimate, 200.0);
        assert!(gate.cost_warning().unwrap().contains("$250.00"));
        assert!(gate.begin_submit().is_ok());
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let mut estimate = scenario_estimate();
        estimate.estimated_cost_monthly = 200.0;
        let gate = ConfirmationGate::new(scenario_config(), estimate, 200.0);
        assert!(gate.cost_warning().is_none());
    }

    #[test]
    fn test_double_submit_refused() {
        let mut gate = gate();
        assert_eq!(gate.begin_submit().unwrap(), scenario_config());
        assert_eq!(gate.begin_submit().unwrap_err(), StartError::InFlight);
        assert!(!gate.cancel());
    }

    #[test]
    fn test_failed_submit_can_be_retried_or_dismissed() {
        let mut gate = gate();
        gate.begin_submit().unwrap();
        gate.submit_failed();
        assert_eq!(gate.state(), GateState::Open);
        assert!(gate.begin_submit().is_ok());
        gate.submit_failed();
        assert!(gate.cancel());
        assert_eq!(gate.outcome(), Some(GateOutcome::Canceled));
    }

    #[test]
    fn test_resolves_exactly_once() {
        let mut gate = gate();
        gate.begin_submit().unwrap();
        gate.submit_succeeded();
        assert_eq!(gate.outcome(), Some(GateOutcome::Confirmed));
        assert!(!gate.cancel());
        assert_eq!(gate.begin_submit().unwrap_err(), StartError::NotConfirmed);
    }

    #[test]
    fn test_summary_includes_default_relay_name() {
        let rows = gate().summary();
        assert!(rows.contains(&("Relay name", "relay-aws-us-east-1".to_string())));
        assert!(rows.contains(&("Instances", "2 x t3.medium".to_string())));
        assert!(rows.contains(&("Monthly cost", "$85.50".to_string())));
    }
}
