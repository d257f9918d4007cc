//! Provider catalog for the relay deployment wizard
//!
//! Static description of the infrastructure a relay can run on: per provider,
//! the infrastructure types, the regions each type supports and, for
//! instance-based types, the allowed machine sizes.

use crate::platform::api::types::CloudProvider;

/// A cloud region/location option
#[derive(Debug, Clone)]
pub struct CloudRegion {
    /// Region ID (e.g., "us-east-1", "westeurope")
    pub id: &'static str,
    /// Human-readable name (e.g., "N. Virginia")
    pub name: &'static str,
    /// Geographic location (e.g., "US East")
    pub location: &'static str,
}

/// A machine/instance type option
#[derive(Debug, Clone)]
pub struct MachineType {
    /// Machine type ID (e.g., "t3.medium", "e2-standard-2")
    pub id: &'static str,
    /// Number of vCPUs (as string to handle fractional)
    pub cpu: &'static str,
    /// Memory amount (e.g., "4 GB")
    pub memory: &'static str,
}

/// A kind of infrastructure the relay can be provisioned on
#[derive(Debug, Clone)]
pub struct InfrastructureType {
    /// Catalog id sent to the backend (e.g., "ec2")
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// One-line description
    pub description: &'static str,
    /// Whether instance type and count must be chosen
    pub requires_sizing: bool,
    /// Supported region ids
    pub regions: &'static [&'static str],
    /// Allowed machine types; empty when sizing is not required
    pub machine_types: &'static [MachineType],
}

// =============================================================================
// AWS
// =============================================================================

pub static AWS_REGIONS: &[CloudRegion] = &[
    CloudRegion { id: "us-east-1", name: "N. Virginia", location: "US East" },
    CloudRegion { id: "us-east-2", name: "Ohio", location: "US East" },
    CloudRegion { id: "us-west-2", name: "Oregon", location: "US West" },
    CloudRegion { id: "eu-west-1", name: "Ireland", location: "Europe" },
    CloudRegion { id: "eu-central-1", name: "Frankfurt", location: "Germany" },
    CloudRegion { id: "ap-southeast-1", name: "Singapore", location: "Southeast Asia" },
];

pub static AWS_INSTANCE_TYPES: &[MachineType] = &[
    MachineType { id: "t3.small", cpu: "2", memory: "2 GB" },
    MachineType { id: "t3.medium", cpu: "2", memory: "4 GB" },
    MachineType { id: "t3.large", cpu: "2", memory: "8 GB" },
    MachineType { id: "m5.large", cpu: "2", memory: "8 GB" },
    MachineType { id: "m5.xlarge", cpu: "4", memory: "16 GB" },
];

pub static AWS_INFRASTRUCTURE: &[InfrastructureType] = &[
    InfrastructureType {
        id: "ec2",
        name: "EC2",
        description: "Relay runs on dedicated EC2 instances",
        requires_sizing: true,
        regions: &["us-east-1", "us-east-2", "us-west-2", "eu-west-1", "eu-central-1", "ap-southeast-1"],
        machine_types: AWS_INSTANCE_TYPES,
    },
    InfrastructureType {
        id: "ecs",
        name: "ECS",
        description: "Relay runs as an ECS service on EC2 capacity",
        requires_sizing: true,
        regions: &["us-east-1", "us-east-2", "us-west-2", "eu-west-1", "eu-central-1"],
        machine_types: AWS_INSTANCE_TYPES,
    },
    InfrastructureType {
        id: "lambda",
        name: "Lambda",
        description: "Serverless relay triggered by queue events",
        requires_sizing: false,
        regions: &["us-east-1", "us-west-2", "eu-west-1"],
        machine_types: &[],
    },
];

// =============================================================================
// Azure
// =============================================================================

pub static AZURE_REGIONS: &[CloudRegion] = &[
    CloudRegion { id: "eastus", name: "East US", location: "Virginia" },
    CloudRegion { id: "westus2", name: "West US 2", location: "Washington" },
    CloudRegion { id: "westeurope", name: "West Europe", location: "Netherlands" },
    CloudRegion { id: "northeurope", name: "North Europe", location: "Ireland" },
    CloudRegion { id: "southeastasia", name: "Southeast Asia", location: "Singapore" },
];

pub static AZURE_VM_SIZES: &[MachineType] = &[
    MachineType { id: "Standard_B1ms", cpu: "1", memory: "2 GB" },
    MachineType { id: "Standard_B2s", cpu: "2", memory: "4 GB" },
    MachineType { id: "Standard_D2s_v5", cpu: "2", memory: "8 GB" },
    MachineType { id: "Standard_D4s_v5", cpu: "4", memory: "16 GB" },
];

pub static AZURE_INFRASTRUCTURE: &[InfrastructureType] = &[
    InfrastructureType {
        id: "vm",
        name: "Virtual Machines",
        description: "Relay runs on Azure virtual machines",
        requires_sizing: true,
        regions: &["eastus", "westus2", "westeurope", "northeurope", "southeastasia"],
        machine_types: AZURE_VM_SIZES,
    },
    InfrastructureType {
        id: "aci",
        name: "Container Instances",
        description: "Relay runs as Azure container groups",
        requires_sizing: true,
        regions: &["eastus", "westus2", "westeurope"],
        machine_types: AZURE_VM_SIZES,
    },
    InfrastructureType {
        id: "functions",
        name: "Functions",
        description: "Serverless relay on the Azure Functions consumption plan",
        requires_sizing: false,
        regions: &["eastus", "westeurope"],
        machine_types: &[],
    },
];

// =============================================================================
// GCP (Google Cloud Platform)
// =============================================================================

pub static GCP_REGIONS: &[CloudRegion] = &[
    CloudRegion { id: "us-central1", name: "Iowa", location: "US Central" },
    CloudRegion { id: "us-east1", name: "South Carolina", location: "US East" },
    CloudRegion { id: "us-west1", name: "Oregon", location: "US West" },
    CloudRegion { id: "europe-west1", name: "Belgium", location: "Europe" },
    CloudRegion { id: "europe-west3", name: "Frankfurt", location: "Germany" },
    CloudRegion { id: "asia-southeast1", name: "Singapore", location: "Southeast Asia" },
];

pub static GCP_MACHINE_TYPES: &[MachineType] = &[
    MachineType { id: "e2-small", cpu: "0.5", memory: "2 GB" },
    MachineType { id: "e2-medium", cpu: "1", memory: "4 GB" },
    MachineType { id: "e2-standard-2", cpu: "2", memory: "8 GB" },
    MachineType { id: "n2-standard-2", cpu: "2", memory: "8 GB" },
    MachineType { id: "n2-standard-4", cpu: "4", memory: "16 GB" },
];

pub static GCP_INFRASTRUCTURE: &[InfrastructureType] = &[
    InfrastructureType {
        id: "compute",
        name: "Compute Engine",
        description: "Relay runs on Compute Engine VMs",
        requires_sizing: true,
        regions: &["us-central1", "us-east1", "us-west1", "europe-west1", "europe-west3", "asia-southeast1"],
        machine_types: GCP_MACHINE_TYPES,
    },
    InfrastructureType {
        id: "gke",
        name: "GKE",
        description: "Relay runs as a workload on a GKE node pool",
        requires_sizing: true,
        regions: &["us-central1", "us-east1", "europe-west1"],
        machine_types: GCP_MACHINE_TYPES,
    },
    InfrastructureType {
        id: "cloud-run",
        name: "Cloud Run",
        description: "Serverless relay on Cloud Run",
        requires_sizing: false,
        regions: &["us-central1", "us-east1", "europe-west1", "asia-southeast1"],
        machine_types: &[],
    },
];

// =============================================================================
// Helper Functions
// =============================================================================

/// Get infrastructure types offered by a cloud provider
pub fn infrastructure_types(provider: &CloudProvider) -> &'static [InfrastructureType] {
    match provider {
        CloudProvider::Aws => AWS_INFRASTRUCTURE,
        CloudProvider::Azure => AZURE_INFRASTRUCTURE,
        CloudProvider::Gcp => GCP_INFRASTRUCTURE,
    }
}

/// Look up an infrastructure type in a provider's catalog
pub fn find_infrastructure(
    provider: &CloudProvider,
    infrastructure_id: &str,
) -> Option<&'static InfrastructureType> {
    infrastructure_types(provider)
        .iter()
        .find(|i| i.id == infrastructure_id)
}

/// Get all regions known for a cloud provider
pub fn provider_regions(provider: &CloudProvider) -> &'static [CloudRegion] {
    match provider {
        CloudProvider::Aws => AWS_REGIONS,
        CloudProvider::Azure => AZURE_REGIONS,
        CloudProvider::Gcp => GCP_REGIONS,
    }
}

/// Regions supported by an infrastructure type, in catalog order
pub fn regions_for(provider: &CloudProvider, infrastructure_id: &str) -> Vec<&'static CloudRegion> {
    let Some(infra) = find_infrastructure(provider, infrastructure_id) else {
        return Vec::new();
    };
    provider_regions(provider)
        .iter()
        .filter(|r| infra.regions.contains(&r.id))
        .collect()
}

/// Get default region for a provider
pub fn default_region(provider: &CloudProvider) -> &'static str {
    match provider {
        CloudProvider::Aws => "us-east-1",
        CloudProvider::Azure => "eastus",
        CloudProvider::Gcp => "us-central1",
    }
}

/// Get default machine type for an instance-based infrastructure type
pub fn default_instance_type(
    provider: &CloudProvider,
    infrastructure_id: &str,
) -> Option<&'static str> {
    let infra = find_infrastructure(provider, infrastructure_id)?;
    if !infra.requires_sizing {
        return None;
    }
    let preferred = match provider {
        CloudProvider::Aws => "t3.medium",
        CloudProvider::Azure => "Standard_B2s",
        CloudProvider::Gcp => "e2-medium",
    };
    infra
        .machine_types
        .iter()
        .find(|m| m.id == preferred)
        .or_else(|| infra.machine_types.first())
        .map(|m| m.id)
}
