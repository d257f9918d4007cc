//! Relay deployment provisioning wizard
//!
//! The core (`validation`, `session`, `estimator`, `confirmation`,
//! `deployment`, `controller`) is free of terminal I/O. The prompt and render
//! modules are the interactive front end used by `relay-ctl deploy`.

pub mod catalog;
mod config_form;
pub mod confirmation;
pub mod controller;
pub mod deployment;
pub mod error;
pub mod estimator;
mod infrastructure_selection;
mod provider_selection;
mod render;
pub mod session;
pub mod step;
pub mod testing;
pub mod validation;

pub use config_form::{SizingInput, collect_relay_name, collect_sizing, parse_count};
pub use confirmation::{ConfirmationGate, DEFAULT_COST_WARNING_THRESHOLD, GateOutcome, GateState};
pub use controller::WizardController;
pub use deployment::{DeploymentHandle, DeploymentOrchestrator, PollSettings};
pub use error::{CancelError, EstimationError, StartError, WizardError};
pub use estimator::ResourceEstimator;
pub use infrastructure_selection::{select_infrastructure_type, select_machine_type, select_region};
pub use provider_selection::select_provider;
pub use render::{
    PromptResult, display_confirmation, display_estimate, display_outcome, display_progress,
    display_step_header, format_status, progress_bar, status_indicator, wizard_render_config,
};
pub use session::{ConfigField, ConfigPatch, WizardAction, WizardSession};
pub use step::{TOTAL_STEPS, WizardStep};
pub use validation::can_proceed;
