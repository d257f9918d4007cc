//! Single-flight resource estimation
//!
//! At most one estimate request is outstanding per estimator. A caller asking
//! for the same configuration joins the in-flight request; a caller asking for
//! a different configuration is refused until it resolves. Dropping every
//! waiter abandons the request.

use super::error::EstimationError;
use super::validation;
use crate::platform::api::RelayBackend;
use crate::platform::api::types::{DeploymentConfig, ResourceEstimate};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

type EstimateResult = Result<ResourceEstimate, EstimationError>;

struct InFlight {
    generation: u64,
    config: DeploymentConfig,
    request: Shared<BoxFuture<'static, EstimateResult>>,
    waiters: usize,
}

#[derive(Default)]
struct Slot {
    next_generation: u64,
    current: Option<InFlight>,
}

pub struct ResourceEstimator {
    backend: Arc<dyn RelayBackend>,
    timeout: Duration,
    slot: Mutex<Slot>,
}

/// Releases one waiter's claim on the in-flight request
struct WaiterGuard<'a> {
    slot: &'a Mutex<Slot>,
    generation: u64,
}

impl Drop for WaiterGuard<'_> {
    fn drop(&mut self) {
        let mut slot = self.slot.lock();
        let finished = match slot.current.as_mut() {
            Some(in_flight) if in_flight.generation == self.generation => {
                in_flight.waiters -= 1;
                in_flight.waiters == 0
            }
            _ => false,
        };
        if finished {
            slot.current = None;
        }
    }
}

impl ResourceEstimator {
    pub fn new(backend: Arc<dyn RelayBackend>, timeout: Duration) -> Self {
        Self {
            backend,
            timeout,
            slot: Mutex::new(Slot::default()),
        }
    }

    /// Whether a request is outstanding
    pub fn is_in_flight(&self) -> bool {
        self.slot.lock().current.is_some()
    }

    /// Estimate cost and time for a complete configuration
    pub async fn estimate(&self, config: &DeploymentConfig) -> EstimateResult {
        validation::check_complete(config).map_err(EstimationError::Incomplete)?;

        let (generation, request) = {
            let mut slot = self.slot.lock();
            match slot.current.as_mut() {
                Some(in_flight) if in_flight.config == *config => {
                    log::debug!("Joining in-flight estimate request");
                    in_flight.waiters += 1;
                    (in_flight.generation, in_flight.request.clone())
                }
                Some(_) => return Err(EstimationError::InFlight),
                None => {
                    let generation = slot.next_generation;
                    slot.next_generation += 1;
                    let request = self.request(config.clone());
                    slot.current = Some(InFlight {
                        generation,
                        config: config.clone(),
                        request: request.clone(),
                        waiters: 1,
                    });
                    (generation, request)
                }
            }
        };

        let _guard = WaiterGuard {
            slot: &self.slot,
            generation,
        };
        request.await
    }

    fn request(&self, config: DeploymentConfig) -> Shared<BoxFuture<'static, EstimateResult>> {
        let backend = Arc::clone(&self.backend);
        let timeout = self.timeout;
        async move {
            log::info!(
                "Requesting resource estimate for {}/{} in {}",
                config.provider.map(|p| p.as_str()).unwrap_or("-"),
                config.infrastructure_type.as_deref().unwrap_or("-"),
                config.region.as_deref().unwrap_or("-"),
            );
            match tokio::time::timeout(timeout, backend.estimate_resources(&config)).await {
                Ok(Ok(estimate)) => match check_estimate(&estimate) {
                    Ok(()) => Ok(estimate),
                    Err(reason) => {
                        log::warn!("Rejecting estimate from backend: {}", reason);
                        Err(EstimationError::Backend(format!("invalid estimate: {}", reason)))
                    }
                },
                Ok(Err(e)) => {
                    log::warn!("Estimate request failed: {}", e);
                    Err(EstimationError::Backend(e.to_string()))
                }
                Err(_) => {
                    log::warn!("Estimate request timed out after {:?}", timeout);
                    Err(EstimationError::TimedOut(timeout))
                }
            }
        }
        .boxed()
        .shared()
    }
}

/// Cost must be a non-negative amount and provisioning take at least a minute
fn check_estimate(estimate: &ResourceEstimate) -> Result<(), String> {
    let cost = estimate.estimated_cost_monthly;
    if !cost.is_finite() || cost < 0.0 {
        return Err(format!("monthly cost {} is not a non-negative amount", cost));
    }
    if estimate.estimated_deployment_time_minutes == 0 {
        return Err("deployment time must be at least one minute".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::testing::{ScriptedBackend, scenario_config, scenario_estimate};

    fn estimator(backend: &Arc<ScriptedBackend>, timeout: Duration) -> ResourceEstimator {
        ResourceEstimator::new(backend.clone(), timeout)
    }

    #[tokio::test]
    async fn test_estimate_success() {
        let backend = Arc::new(ScriptedBackend::new());
        let estimator = estimator(&backend, Duration::from_secs(20));

        let estimate = estimator.estimate(&scenario_config()).await.unwrap();
        assert_eq!(estimate, scenario_estimate());
        assert!(!estimator.is_in_flight());
    }

    #[tokio::test]
    async fn test_incomplete_config_is_not_sent() {
        let backend = Arc::new(ScriptedBackend::new());
        let estimator = estimator(&backend, Duration::from_secs(20));

        let err = estimator
            .estimate(&DeploymentConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, EstimationError::Incomplete(_)));
        assert_eq!(ScriptedBackend::calls(&backend.estimate_calls), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_config_joins_in_flight_request() {
        let backend = Arc::new(ScriptedBackend {
            estimate_delay: Duration::from_secs(2),
            ..ScriptedBackend::new()
        });
        let estimator = estimator(&backend, Duration::from_secs(20));
        let config = scenario_config();

        let (a, b) = tokio::join!(estimator.estimate(&config), estimator.estimate(&config));
        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(ScriptedBackend::calls(&backend.estimate_calls), 1);
        assert!(!estimator.is_in_flight());
    }

    #[tokio::test(start_paused = true)]
    async fn test_different_config_refused_while_in_flight() {
        let backend = Arc::new(ScriptedBackend {
            estimate_delay: Duration::from_secs(2),
            ..ScriptedBackend::new()
        });
        let estimator = estimator(&backend, Duration::from_secs(20));
        let mut other = scenario_config();
        other.instance_count = Some(3);

        let first = scenario_config();
        let (a, b) = tokio::join!(
            estimator.estimate(&first),
            estimator.estimate(&other)
        );
        assert!(a.is_ok());
        assert_eq!(b.unwrap_err(), EstimationError::InFlight);

        // slot is free again once the first request resolved
        assert!(estimator.estimate(&other).await.is_ok());
        assert_eq!(ScriptedBackend::calls(&backend.estimate_calls), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout() {
        let backend = Arc::new(ScriptedBackend {
            estimate_delay: Duration::from_secs(60),
            ..ScriptedBackend::new()
        });
        let estimator = estimator(&backend, Duration::from_secs(20));

        let err = estimator.estimate(&scenario_config()).await.unwrap_err();
        assert_eq!(err, EstimationError::TimedOut(Duration::from_secs(20)));
        assert!(!estimator.is_in_flight());
    }

    #[tokio::test]
    async fn test_backend_error_is_converted() {
        let backend = Arc::new(ScriptedBackend {
            estimate_error: Some("pricing unavailable".to_string()),
            ..ScriptedBackend::new()
        });
        let estimator = estimator(&backend, Duration::from_secs(20));

        match estimator.estimate(&scenario_config()).await {
            Err(EstimationError::Backend(message)) => assert!(message.contains("pricing unavailable")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_out_of_range_estimates_are_rejected() {
        let invalid = [
            ResourceEstimate {
                estimated_cost_monthly: -1.0,
                ..scenario_estimate()
            },
            ResourceEstimate {
                estimated_cost_monthly: f64::NAN,
                ..scenario_estimate()
            },
            ResourceEstimate {
                estimated_deployment_time_minutes: 0,
                ..scenario_estimate()
            },
        ];

        for estimate in invalid {
            let backend = Arc::new(ScriptedBackend {
                estimate: Some(estimate),
                ..ScriptedBackend::new()
            });
            let estimator = estimator(&backend, Duration::from_secs(20));

            match estimator.estimate(&scenario_config()).await {
                Err(EstimationError::Backend(message)) => {
                    assert!(message.starts_with("invalid estimate"))
                }
                other => panic!("unexpected result: {:?}", other),
            }
            assert!(!estimator.is_in_flight());
        }
    }

    #[tokio::test]
    async fn test_free_estimate_is_accepted() {
        let backend = Arc::new(ScriptedBackend {
            estimate: Some(ResourceEstimate {
                estimated_cost_monthly: 0.0,
                resource_count: 0,
                ..scenario_estimate()
            }),
            ..ScriptedBackend::new()
        });
        let estimator = estimator(&backend, Duration::from_secs(20));

        let estimate = estimator.estimate(&scenario_config()).await.unwrap();
        assert_eq!(estimate.estimated_cost_monthly, 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_request_frees_slot() {
        let backend = Arc::new(ScriptedBackend {
            estimate_delay: Duration::from_secs(10),
            ..ScriptedBackend::new()
        });
        let estimator = estimator(&backend, Duration::from_secs(20));

        let abandoned = tokio::time::timeout(
            Duration::from_secs(1),
            estimator.estimate(&scenario_config()),
        )
        .await;
        assert!(abandoned.is_err());
        assert!(!estimator.is_in_flight());
    }
}
