//! Deployment start, status polling and cancellation
//!
//! `DeploymentOrchestrator::start` creates the server-side job and returns a
//! [`DeploymentHandle`] that owns the polling task. Run snapshots are
//! published through a `tokio::sync::watch` channel. Every mutation of the
//! run goes through [`apply`], which ignores updates once the run is terminal.
//! Dropping the handle aborts polling.

use super::error::{CancelError, StartError};
use crate::config::types::DeploymentSettings;
use crate::platform::api::RelayBackend;
use crate::platform::api::types::{DeploymentConfig, DeploymentRun, DeploymentStatus};
use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Polling cadence and failure tolerance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    /// Consecutive failed polls before the run is declared lost
    pub max_consecutive_failures: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_consecutive_failures: 5,
        }
    }
}

impl From<&DeploymentSettings> for PollSettings {
    fn from(settings: &DeploymentSettings) -> Self {
        Self {
            interval: settings.poll_interval(),
            max_consecutive_failures: settings.max_consecutive_poll_failures.max(1),
        }
    }
}

/// An update to a run snapshot
#[derive(Debug, Clone)]
pub(crate) enum RunUpdate {
    Polled(DeploymentRun),
    PollFailed { message: String, lost: bool },
    CancelAcknowledged(DeploymentStatus),
}

/// Apply an update unless the run is already terminal
///
/// Returns whether the snapshot changed.
pub(crate) fn apply(state: &watch::Sender<DeploymentRun>, update: RunUpdate) -> bool {
    state.send_if_modified(|run| {
        if run.is_terminal() {
            return false;
        }
        match update {
            RunUpdate::Polled(polled) => {
                run.status = polled.status;
                run.progress_percent = match polled.status {
                    DeploymentStatus::Completed => 100,
                    _ => polled.progress_percent.min(100),
                };
                run.current_step_message = polled.current_step_message;
                run.error = match polled.status {
                    DeploymentStatus::Failed => Some(polled.error.unwrap_or_else(|| {
                        "deployment failed without an error message".to_string()
                    })),
                    _ => None,
                };
                if polled.relay_id.is_some() {
                    run.relay_id = polled.relay_id;
                }
                run.last_poll_error = None;
            }
            RunUpdate::PollFailed { message, lost } => {
                if lost {
                    run.status = DeploymentStatus::Failed;
                    run.error = Some(format!(
                        "lost contact with the provisioning backend: {}",
                        message
                    ));
                }
                run.last_poll_error = Some(message);
            }
            RunUpdate::CancelAcknowledged(status) => {
                if !status.is_terminal() {
                    return false;
                }
                run.status = status;
                if status == DeploymentStatus::Canceled {
                    run.current_step_message = Some("Deployment canceled".to_string());
                }
            }
        }
        run.last_updated = Some(Utc::now());
        true
    })
}

/// Starts deployments and attaches pollers to them
pub struct DeploymentOrchestrator {
    backend: Arc<dyn RelayBackend>,
    settings: PollSettings,
    starting: AtomicBool,
}

/// Clears the start-in-flight flag when the start request resolves
struct StartGuard<'a>(&'a AtomicBool);

impl Drop for StartGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl DeploymentOrchestrator {
    pub fn new(backend: Arc<dyn RelayBackend>, settings: PollSettings) -> Self {
        Self {
            backend,
            settings,
            starting: AtomicBool::new(false),
        }
    }

    pub fn settings(&self) -> PollSettings {
        self.settings
    }

    /// Whether a start request is currently in flight
    pub fn is_starting(&self) -> bool {
        self.starting.load(Ordering::SeqCst)
    }

    /// Create the deployment job and begin polling it
    ///
    /// Must be called from within a tokio runtime.
    pub async fn start(&self, config: &DeploymentConfig) -> Result<DeploymentHandle, StartError> {
        if self
            .starting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(StartError::InFlight);
        }
        let _guard = StartGuard(&self.starting);

        log::info!(
            "Starting relay deployment on {}/{}",
            config.provider.map(|p| p.as_str()).unwrap_or("-"),
            config.infrastructure_type.as_deref().unwrap_or("-"),
        );
        let response = self.backend.start_deployment(config).await.map_err(|e| {
            log::warn!("Start deployment request failed: {}", e);
            StartError::Backend(e.to_string())
        })?;

        let deployment_id = response.deployment_id.trim().to_string();
        if deployment_id.is_empty() {
            return Err(StartError::Backend(
                "backend returned an empty deployment id".to_string(),
            ));
        }
        log::info!("Deployment {} created", deployment_id);
        Ok(self.watch(deployment_id))
    }

    /// Follow an existing deployment until it reaches a terminal state
    pub fn watch(&self, deployment_id: impl Into<String>) -> DeploymentHandle {
        let (tx, _) = watch::channel(DeploymentRun::initializing(deployment_id));
        self.spawn_poller(tx)
    }

    /// Follow a deployment whose status was already fetched
    ///
    /// The handle starts from `run`, so an in-progress deployment can be
    /// canceled before the first poll lands.
    pub fn watch_from(&self, run: DeploymentRun) -> DeploymentHandle {
        let (tx, _) = watch::channel(DeploymentRun::initializing(run.deployment_id.clone()));
        apply(&tx, RunUpdate::Polled(run));
        self.spawn_poller(tx)
    }

    fn spawn_poller(&self, tx: watch::Sender<DeploymentRun>) -> DeploymentHandle {
        let deployment_id = tx.borrow().deployment_id.clone();
        let state = Arc::new(tx);
        let task = tokio::spawn(poll_until_terminal(
            Arc::clone(&self.backend),
            Arc::clone(&state),
            self.settings,
        ));

        DeploymentHandle {
            deployment_id,
            state,
            backend: Arc::clone(&self.backend),
            task,
        }
    }
}

/// Poll the status endpoint until the run becomes terminal
///
/// Polls are strictly sequential. An in-flight poll is abandoned as soon as
/// the run turns terminal by another path (a cancel acknowledgment).
async fn poll_until_terminal(
    backend: Arc<dyn RelayBackend>,
    state: Arc<watch::Sender<DeploymentRun>>,
    settings: PollSettings,
) {
    let deployment_id = state.borrow().deployment_id.clone();
    let mut terminal = state.subscribe();
    let mut consecutive_failures = 0u32;

    loop {
        tokio::select! {
            _ = sleep(settings.interval) => {}
            _ = terminal.wait_for(|run| run.is_terminal()) => break,
        }

        let result = tokio::select! {
            result = backend.get_deployment_status(&deployment_id) => result,
            _ = terminal.wait_for(|run| run.is_terminal()) => break,
        };

        let failure = match result {
            Ok(polled)
                if !polled.deployment_id.is_empty() && polled.deployment_id != deployment_id =>
            {
                Some(format!(
                    "status response was for deployment {}",
                    polled.deployment_id
                ))
            }
            Ok(polled) => {
                consecutive_failures = 0;
                log::debug!(
                    "Deployment {}: {} ({}%)",
                    deployment_id,
                    polled.status,
                    polled.progress_percent
                );
                apply(&state, RunUpdate::Polled(polled));
                None
            }
            Err(e) => Some(e.to_string()),
        };

        if let Some(message) = failure {
            consecutive_failures += 1;
            let lost = consecutive_failures >= settings.max_consecutive_failures;
            if lost {
                log::error!(
                    "Giving up on deployment {} after {} failed status polls: {}",
                    deployment_id,
                    consecutive_failures,
                    message
                );
            } else {
                log::warn!(
                    "Status poll for {} failed ({}/{}): {}",
                    deployment_id,
                    consecutive_failures,
                    settings.max_consecutive_failures,
                    message
                );
            }
            apply(&state, RunUpdate::PollFailed { message, lost });
        }

        let run = state.borrow().clone();
        if run.is_terminal() {
            match run.status {
                DeploymentStatus::Failed => log::error!(
                    "Deployment {} failed: {}",
                    deployment_id,
                    run.error.as_deref().unwrap_or("unknown error")
                ),
                status => log::info!("Deployment {} {}", deployment_id, status),
            }
            break;
        }
    }
}

/// Owner of a running deployment's polling task
///
/// Dropping the handle (or calling [`dispose`](Self::dispose)) aborts the
/// poller; no snapshot changes are published afterwards.
pub struct DeploymentHandle {
    deployment_id: String,
    state: Arc<watch::Sender<DeploymentRun>>,
    backend: Arc<dyn RelayBackend>,
    task: JoinHandle<()>,
}

impl std::fmt::Debug for DeploymentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeploymentHandle")
            .field("deployment_id", &self.deployment_id)
            .field("run", &*self.state.borrow())
            .finish()
    }
}

impl DeploymentHandle {
    pub fn deployment_id(&self) -> &str {
        &self.deployment_id
    }

    /// Current run snapshot
    pub fn snapshot(&self) -> DeploymentRun {
        self.state.borrow().clone()
    }

    /// Receive every snapshot change
    pub fn subscribe(&self) -> watch::Receiver<DeploymentRun> {
        self.state.subscribe()
    }

    pub fn is_terminal(&self) -> bool {
        self.state.borrow().is_terminal()
    }

    /// Request cancellation; only meaningful while in progress
    ///
    /// A terminal status in the acknowledgment ends the run immediately. On
    /// failure polling continues unaffected.
    pub async fn cancel(&self) -> Result<DeploymentRun, CancelError> {
        let status = self.state.borrow().status;
        if status != DeploymentStatus::InProgress {
            log::debug!(
                "Ignoring cancel for deployment {} while {}",
                self.deployment_id,
                status
            );
            return Err(CancelError::NotCancelable(status));
        }

        log::info!("Requesting cancellation of deployment {}", self.deployment_id);
        match self.backend.cancel_deployment(&self.deployment_id).await {
            Ok(ack) => {
                apply(&self.state, RunUpdate::CancelAcknowledged(ack.status));
                Ok(self.snapshot())
            }
            Err(e) => {
                log::warn!("Cancel request for {} failed: {}", self.deployment_id, e);
                Err(CancelError::Backend(e.to_string()))
            }
        }
    }

    /// Wait until the run is terminal and return the final snapshot
    pub async fn wait(&self) -> DeploymentRun {
        let mut rx = self.state.subscribe();
        match rx.wait_for(|run| run.is_terminal()).await {
            Ok(run) => run.clone(),
            Err(_) => self.snapshot(),
        }
    }

    /// Stop polling without touching the server-side job
    pub fn dispose(self) {
        log::debug!("Disposing poller for deployment {}", self.deployment_id);
    }
}

impl Drop for DeploymentHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
