use crate::platform::api::types::DeploymentRun;
use crate::wizard::{CancelError, DeploymentHandle, display_progress};
use colored::Colorize;
use futures_util::future::{FutureExt, LocalBoxFuture};

/// How following a deployment ended
#[derive(Debug)]
pub enum FollowOutcome {
    /// Run reached a terminal status
    Finished(DeploymentRun),
    /// Operator stopped watching; server-side work continues
    Detached(DeploymentRun),
}

/// Render live progress until the run is terminal
///
/// The first Ctrl-C requests cancellation, racing the in-flight poll. The
/// cancel request runs alongside progress rendering, and a second Ctrl-C
/// detaches without canceling server-side work.
pub async fn follow_deployment(handle: &DeploymentHandle) -> FollowOutcome {
    let mut rx = handle.subscribe();
    let mut cancel: Option<LocalBoxFuture<'_, Result<DeploymentRun, CancelError>>> = None;
    let mut cancel_requested = false;

    loop {
        let run = rx.borrow_and_update().clone();
        display_progress(&run);
        if run.is_terminal() {
            return FollowOutcome::Finished(run);
        }

        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    return FollowOutcome::Detached(handle.snapshot());
                }
            }
            Some(result) = pending_cancel(&mut cancel), if cancel.is_some() => {
                cancel = None;
                if let Err(e) = result {
                    println!(
                        "\n  {} {} {}",
                        "⚠".yellow(),
                        e,
                        "(press Ctrl-C again to stop watching)".dimmed()
                    );
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                if cancel_requested {
                    return FollowOutcome::Detached(handle.snapshot());
                }
                cancel_requested = true;
                println!("  {} Requesting cancellation...", "○".yellow());
                cancel = Some(handle.cancel().boxed_local());
            }
        }
    }
}

async fn pending_cancel<F: Future + Unpin>(cancel: &mut Option<F>) -> Option<F::Output> {
    match cancel.as_mut() {
        Some(request) => Some(request.await),
        None => None,
    }
}
