use crate::config::types::Config;
use crate::error::{RelayCtlError, Result};
use crate::platform::api::PlatformApiClient;
use crate::platform::api::types::DeploymentConfig;
use crate::wizard::{
    ConfirmationGate, ResourceEstimator, WizardError, display_confirmation, display_estimate,
    validation,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Read a deployment configuration from a TOML or JSON file
pub fn load_deployment_config(path: &Path) -> Result<DeploymentConfig> {
    let content = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let config = if is_json {
        serde_json::from_str(&content)
            .map_err(|e| RelayCtlError::InvalidInput(format!("{}: {}", path.display(), e)))?
    } else {
        toml::from_str(&content)
            .map_err(|e| RelayCtlError::InvalidInput(format!("{}: {}", path.display(), e)))?
    };
    Ok(config)
}

/// `relay-ctl estimate --file <config>`
pub async fn handle_estimate(config: &Config, file: &Path, json: bool) -> Result<()> {
    let deployment = load_deployment_config(file)?;
    validation::check_complete(&deployment).map_err(RelayCtlError::InvalidInput)?;

    let client = Arc::new(PlatformApiClient::new(&config.api)?);
    let estimator = ResourceEstimator::new(client, config.deployment.estimate_timeout());
    let estimate = estimator
        .estimate(&deployment)
        .await
        .map_err(WizardError::from)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&estimate)?);
        return Ok(());
    }

    println!();
    display_estimate(&estimate);
    let gate = ConfirmationGate::new(
        deployment,
        estimate,
        config.deployment.cost_warning_threshold,
    );
    display_confirmation(&gate);
    Ok(())
}
