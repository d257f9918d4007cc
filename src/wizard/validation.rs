//! Step validation for the deployment wizard
//!
//! Pure predicates over the accumulated configuration. A step's validator
//! decides whether the operator may move past it; nothing here has side
//! effects.

use super::catalog;
use super::step::WizardStep;
use crate::platform::api::types::{DeploymentConfig, ResourceEstimate};
use regex::Regex;
use std::sync::LazyLock;

/// Allowed instance count and auto-scaling bound range
pub const MIN_INSTANCES: u32 = 1;
pub const MAX_INSTANCES: u32 = 10;

static RELAY_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]{1,61}[a-z0-9]$").unwrap());

/// Check whether `step` is satisfied, explaining why not
///
/// `estimate` is the estimate held for the current configuration, if any.
pub fn check_step(
    step: WizardStep,
    config: &DeploymentConfig,
    estimate: Option<&ResourceEstimate>,
) -> Result<(), String> {
    match step {
        WizardStep::Provider => check_provider(config),
        WizardStep::Infrastructure => check_infrastructure(config),
        WizardStep::RegionSizing => check_region_sizing(config),
        WizardStep::Network => check_network(config),
        WizardStep::Review => match estimate {
            Some(_) => Ok(()),
            None => Err("a resource estimate is required before review can be confirmed".into()),
        },
        WizardStep::Deploy => Err("deployment requires explicit confirmation".into()),
    }
}

/// Whether the wizard may advance past `step`
pub fn can_proceed(
    step: WizardStep,
    config: &DeploymentConfig,
    estimate: Option<&ResourceEstimate>,
) -> bool {
    check_step(step, config, estimate).is_ok()
}

/// Whether every data step (1-4) passes, i.e. the configuration can be estimated
pub fn check_complete(config: &DeploymentConfig) -> Result<(), String> {
    check_provider(config)?;
    check_infrastructure(config)?;
    check_region_sizing(config)?;
    check_network(config)
}

/// Validate an operator-chosen relay name
pub fn validate_relay_name(name: &str) -> Result<(), String> {
    if RELAY_NAME_REGEX.is_match(name) {
        Ok(())
    } else {
        Err(format!(
            "relay name '{}' must be 3-63 characters of lowercase letters, digits and hyphens, \
             starting and ending with a letter or digit",
            name
        ))
    }
}

/// Relay name sent to the backend: the chosen name or `relay-<provider>-<region>`
pub fn effective_relay_name(config: &DeploymentConfig) -> Option<String> {
    if let Some(name) = &config.relay_name {
        return Some(name.clone());
    }
    let provider = config.provider?;
    let region = config.region.as_deref()?;
    Some(format!("relay-{}-{}", provider, region.to_lowercase()))
}

fn check_provider(config: &DeploymentConfig) -> Result<(), String> {
    config
        .provider
        .map(|_| ())
        .ok_or_else(|| "select a cloud provider".to_string())
}

fn check_infrastructure(config: &DeploymentConfig) -> Result<(), String> {
    let provider = config
        .provider
        .ok_or_else(|| "select a cloud provider first".to_string())?;
    let infra = config
        .infrastructure_type
        .as_deref()
        .ok_or_else(|| "select an infrastructure type".to_string())?;
    match catalog::find_infrastructure(&provider, infra) {
        Some(_) => Ok(()),
        None => Err(format!("'{}' is not offered on {}", infra, provider)),
    }
}

fn check_region_sizing(config: &DeploymentConfig) -> Result<(), String> {
    check_infrastructure(config)?;
    let (Some(provider), Some(infra_id)) = (config.provider, config.infrastructure_type.as_deref())
    else {
        return Err("select an infrastructure type first".into());
    };
    let Some(infra) = catalog::find_infrastructure(&provider, infra_id) else {
        return Err(format!("'{}' is not offered on {}", infra_id, provider));
    };

    let region = config
        .region
        .as_deref()
        .ok_or_else(|| "select a region".to_string())?;
    if !infra.regions.contains(&region) {
        return Err(format!("{} is not available in region '{}'", infra.name, region));
    }

    if infra.requires_sizing {
        let instance_type = config
            .instance_type
            .as_deref()
            .ok_or_else(|| "select an instance type".to_string())?;
        if !infra.machine_types.iter().any(|m| m.id == instance_type) {
            return Err(format!(
                "instance type '{}' is not available for {}",
                instance_type, infra.name
            ));
        }
        let count = config
            .instance_count
            .ok_or_else(|| "choose an instance count".to_string())?;
        check_bound("instance count", count)?;
    }

    if let Some(min) = config.auto_scaling_min {
        check_bound("auto-scaling minimum", min)?;
    }
    if let Some(max) = config.auto_scaling_max {
        check_bound("auto-scaling maximum", max)?;
    }
    if let (Some(min), Some(max)) = (config.auto_scaling_min, config.auto_scaling_max)
        && min > max
    {
        return Err(format!(
            "auto-scaling minimum ({}) exceeds maximum ({})",
            min, max
        ));
    }

    Ok(())
}

fn check_network(config: &DeploymentConfig) -> Result<(), String> {
    match &config.relay_name {
        Some(name) => validate_relay_name(name),
        None => Ok(()),
    }
}

fn check_bound(label: &str, value: u32) -> Result<(), String> {
    if (MIN_INSTANCES..=MAX_INSTANCES).contains(&value) {
        Ok(())
    } else {
        Err(format!(
            "{} must be between {} and {} (got {})",
            label, MIN_INSTANCES, MAX_INSTANCES, value
        ))
    }
}
