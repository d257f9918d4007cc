// Handler modules
pub mod catalog;
pub mod deploy;
pub mod estimate;
pub mod follow;
pub mod relays;
pub mod status;

// Re-export all handler functions
pub use catalog::handle_catalog;
pub use deploy::handle_deploy;
pub use estimate::{handle_estimate, load_deployment_config};
pub use follow::{FollowOutcome, follow_deployment};
pub use relays::handle_relays;
pub use status::{handle_cancel, handle_status};
