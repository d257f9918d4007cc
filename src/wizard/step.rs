//! The six steps of the relay deployment wizard

use std::fmt;

/// Number of steps in the deployment workflow
pub const TOTAL_STEPS: u8 = 6;

/// Wizard step, ordered as presented to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WizardStep {
    Provider = 1,
    Infrastructure = 2,
    RegionSizing = 3,
    Network = 4,
    Review = 5,
    Deploy = 6,
}

impl WizardStep {
    /// All steps in order
    pub fn all() -> [WizardStep; TOTAL_STEPS as usize] {
        [
            WizardStep::Provider,
            WizardStep::Infrastructure,
            WizardStep::RegionSizing,
            WizardStep::Network,
            WizardStep::Review,
            WizardStep::Deploy,
        ]
    }

    /// Step for a 1-based index
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(WizardStep::Provider),
            2 => Some(WizardStep::Infrastructure),
            3 => Some(WizardStep::RegionSizing),
            4 => Some(WizardStep::Network),
            5 => Some(WizardStep::Review),
            6 => Some(WizardStep::Deploy),
            _ => None,
        }
    }

    /// 1-based index
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        Self::from_index(self.index().saturating_sub(1))
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::Provider => "Cloud Provider",
            WizardStep::Infrastructure => "Infrastructure",
            WizardStep::RegionSizing => "Region & Sizing",
            WizardStep::Network => "Network & Identity",
            WizardStep::Review => "Review",
            WizardStep::Deploy => "Deploy",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            WizardStep::Provider => "Choose where the relay will run",
            WizardStep::Infrastructure => "Choose how the relay is hosted",
            WizardStep::RegionSizing => "Choose a region and instance sizing",
            WizardStep::Network => "Default network policy and relay name",
            WizardStep::Review => "Review the configuration and its estimated cost",
            WizardStep::Deploy => "Provision the relay and follow progress",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step {}/{}: {}", self.index(), TOTAL_STEPS, self.title())
    }
}
