//! Cluster specification model
//!
//! The [`ClusterSpec`] is the read-only input to parameter derivation. It is
//! constructed and validated entirely outside this crate (loader, API server,
//! defaulting passes); derivation never mutates it and assumes structural
//! validity.
//!
//! String fields where an empty value means "not set" (`vnet_cidr`,
//! `subnet_ipv6`) follow the upstream wire format; fields that are genuinely
//! optional objects use `Option`.

mod types;

pub use types::{
    CustomNodesDns, EvictionPolicy, FeatureFlags, ImageRef, KeyVaultSecrets, NetworkMode, OsType,
    Placement, ScaleSetPriority, VaultCertificate, WindowsImageSource,
};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{DEFAULT_CONTAINERD_RUNTIME_HANDLER, DEFAULT_WINDOWS_DOCKER_VERSION, DEFAULT_WINDOWS_SKU};

/// Full description of a cluster to derive deployment parameters for
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSpec {
    /// Target region for all resources
    pub location: String,

    /// Cloud environment the cluster deploys into
    #[serde(default)]
    pub cloud: CloudProfile,

    /// Control-plane pool, when this deployment manages one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master: Option<MasterPool>,

    /// Agent pools, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub agent_pools: Vec<AgentPool>,

    /// Linux node configuration (admin user, SSH keys, secrets)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linux_profile: Option<LinuxProfile>,

    /// Windows node configuration; present iff the cluster has Windows nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub windows_profile: Option<WindowsProfile>,

    /// Extensions to install, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension_profiles: Vec<ExtensionProfile>,

    /// Enabled feature flags
    #[serde(default)]
    pub feature_flags: FeatureFlags,
}

impl ClusterSpec {
    /// Returns true if the spec declares Windows support
    pub fn has_windows(&self) -> bool {
        self.windows_profile.is_some()
    }

    /// Name of the target cloud environment
    ///
    /// A custom cloud name wins outright; otherwise the environment is
    /// recognized from the location prefix, falling back to the public cloud.
    pub fn target_environment(&self) -> &str {
        if !self.cloud.name.is_empty() {
            return &self.cloud.name;
        }
        let location = self.location.to_lowercase();
        if location.starts_with("china") {
            "AzureChinaCloud"
        } else if location.starts_with("germany") {
            "AzureGermanCloud"
        } else if location.starts_with("usgov") || location.starts_with("usdod") {
            "AzureUSGovernmentCloud"
        } else {
            "AzurePublicCloud"
        }
    }
}

/// Cloud environment configuration
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CloudProfile {
    /// Custom cloud name; empty for the public cloud
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// DNS suffix for VM fully-qualified domain names in this cloud
    pub fqdn_endpoint_suffix: String,
}

/// Control-plane pool configuration
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MasterPool {
    /// DNS prefix for the control-plane endpoint
    pub dns_prefix: String,

    /// VM size for control-plane nodes
    pub vm_size: String,

    /// OS distro key, resolved through the image table
    pub distro: String,

    /// First static IP assigned to a control-plane node
    pub first_consecutive_static_ip: String,

    /// Placement mode for control-plane nodes
    #[serde(default)]
    pub placement: Placement,

    /// Managed subnet CIDR for control-plane nodes
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subnet: String,

    /// Managed subnet CIDR for agent nodes
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub agent_subnet: String,

    /// Managed IPv6 subnet CIDR; only meaningful under dual-stack
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subnet_ipv6: String,

    /// Caller-provided VNET subnet ID; non-empty switches to custom-VNET mode
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub vnet_subnet_id: String,

    /// Caller-provided VNET subnet ID for agent nodes
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub agent_vnet_subnet_id: String,

    /// CIDR of the caller-provided VNET, when known
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub vnet_cidr: String,

    /// Explicit image reference; augments the distro-based lookup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<ImageRef>,

    /// Availability zones; non-empty makes the pool zonal
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub availability_zones: Vec<String>,
}

impl MasterPool {
    /// Returns true if the pool attaches to a caller-provided VNET
    pub fn is_custom_vnet(&self) -> bool {
        !self.vnet_subnet_id.is_empty()
    }

    /// Returns true if control-plane nodes run in a scale set
    pub fn is_scale_set(&self) -> bool {
        self.placement == Placement::ScaleSet
    }

    /// Returns true if the pool declares at least one availability zone
    pub fn has_availability_zones(&self) -> bool {
        !self.availability_zones.is_empty()
    }

    /// Resolve the pool's networking decision
    pub fn network_mode(&self) -> NetworkMode<'_> {
        if self.is_custom_vnet() {
            NetworkMode::CustomVnet {
                subnet_id: &self.vnet_subnet_id,
                agent_subnet_id: &self.agent_vnet_subnet_id,
                vnet_cidr: &self.vnet_cidr,
            }
        } else {
            NetworkMode::ManagedSubnet {
                subnet: &self.subnet,
                agent_subnet: &self.agent_subnet,
                subnet_ipv6: &self.subnet_ipv6,
            }
        }
    }
}

/// Agent pool configuration
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentPool {
    /// Pool name; unique across the spec, used as the parameter-name prefix
    pub name: String,

    /// Number of nodes in the pool
    pub count: u32,

    /// VM size for pool nodes
    pub vm_size: String,

    /// Operating system of pool nodes
    #[serde(default)]
    pub os_type: OsType,

    /// OS distro key; ignored for Windows pools
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub distro: String,

    /// Placement mode
    #[serde(default)]
    pub placement: Placement,

    /// Scheduling priority; only meaningful for scale sets
    #[serde(default)]
    pub scale_set_priority: ScaleSetPriority,

    /// Eviction policy for spot nodes
    #[serde(default)]
    pub scale_set_eviction_policy: EvictionPolicy,

    /// Managed subnet CIDR
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub subnet: String,

    /// Caller-provided VNET subnet ID; non-empty switches to custom-VNET mode
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub vnet_subnet_id: String,

    /// Ports exposed publicly; non-empty implies a public endpoint
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<u16>,

    /// DNS prefix for the pool's public endpoint; required when ports are set
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dns_prefix: String,

    /// Explicit image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<ImageRef>,

    /// Availability zones; non-empty makes the pool zonal
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub availability_zones: Vec<String>,
}

impl AgentPool {
    /// Returns true if the pool attaches to a caller-provided VNET
    pub fn is_custom_vnet(&self) -> bool {
        !self.vnet_subnet_id.is_empty()
    }

    /// Returns true if the pool declares at least one availability zone
    pub fn has_availability_zones(&self) -> bool {
        !self.availability_zones.is_empty()
    }

    /// Returns true if the pool is a scale set running at spot priority
    ///
    /// Availability-set pools are never spot, whatever their priority field
    /// says.
    pub fn is_spot_scale_set(&self) -> bool {
        self.placement == Placement::ScaleSet
            && self.scale_set_priority == ScaleSetPriority::Spot
    }

    /// Resolve the pool's networking decision
    pub fn network_mode(&self) -> NetworkMode<'_> {
        if self.is_custom_vnet() {
            NetworkMode::CustomVnet {
                subnet_id: &self.vnet_subnet_id,
                agent_subnet_id: "",
                vnet_cidr: "",
            }
        } else {
            NetworkMode::ManagedSubnet {
                subnet: &self.subnet,
                agent_subnet: "",
                subnet_ipv6: "",
            }
        }
    }
}

/// Linux node configuration
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinuxProfile {
    /// Admin username on Linux nodes
    pub admin_username: String,

    /// SSH public keys; the first one is injected into node configuration
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ssh_public_keys: Vec<String>,

    /// Custom DNS for Linux nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_nodes_dns: Option<CustomNodesDns>,

    /// Key-vault certificate bundles to install, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secrets: Vec<KeyVaultSecrets>,
}

/// Windows node configuration
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WindowsProfile {
    /// Admin username on Windows nodes
    pub admin_username: String,

    /// Admin password; may legitimately be empty when set by other means
    #[serde(default)]
    pub admin_password: String,

    /// URL of a custom VHD to source the Windows image from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_source_url: Option<String>,

    /// Explicit image reference, used when no custom VHD is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<ImageRef>,

    /// Marketplace image publisher
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub publisher: String,

    /// Marketplace image offer
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub offer: String,

    /// Marketplace image SKU; the crate default applies when empty
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sku: String,

    /// Marketplace image version
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image_version: String,

    /// Docker version to install; the crate default applies when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker_version: Option<String>,

    /// Default containerd runtime handler; the crate default applies when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_runtime_handler: Option<String>,

    /// Kubernetes versions to expose as hyperv runtime handlers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hyperv_runtime_handlers: Vec<String>,

    /// Key-vault certificate bundles to install, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub secrets: Vec<KeyVaultSecrets>,
}

impl WindowsProfile {
    /// Resolve the image source decision, in priority order
    ///
    /// A custom VHD URL beats an explicit image reference, which beats the
    /// marketplace fields. Only the winning source contributes parameters.
    pub fn image_source(&self) -> WindowsImageSource<'_> {
        if let Some(url) = self.image_source_url.as_deref().filter(|u| !u.is_empty()) {
            WindowsImageSource::CustomUrl(url)
        } else if let Some(image_ref) = &self.image_ref {
            WindowsImageSource::Reference(image_ref)
        } else {
            WindowsImageSource::Marketplace {
                publisher: &self.publisher,
                offer: &self.offer,
                sku: if self.sku.is_empty() { DEFAULT_WINDOWS_SKU } else { &self.sku },
                version: &self.image_version,
            }
        }
    }

    /// Docker version to install, with the crate default applied
    pub fn docker_version(&self) -> &str {
        self.docker_version
            .as_deref()
            .unwrap_or(DEFAULT_WINDOWS_DOCKER_VERSION)
    }

    /// Default containerd runtime handler, with the crate default applied
    pub fn default_runtime_handler(&self) -> &str {
        self.default_runtime_handler
            .as_deref()
            .unwrap_or(DEFAULT_CONTAINERD_RUNTIME_HANDLER)
    }

    /// Hyperv runtime handlers rendered as a comma-joined list
    pub fn hyperv_runtime_handlers(&self) -> String {
        self.hyperv_runtime_handlers.join(",")
    }
}

/// Declared cluster extension
///
/// Parameters are either inline or pulled from a key vault at deployment
/// time; the two are mutually exclusive per extension.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionProfile {
    /// Extension name, used as the parameter-name prefix
    pub name: String,

    /// Inline parameter payload
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parameters: String,

    /// Key-vault reference to pull the parameter payload from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters_key_vault_ref: Option<KeyVaultRef>,
}

/// Reference to a secret version in a key vault
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KeyVaultRef {
    /// Resource ID of the vault
    pub vault_id: String,
    /// Secret name within the vault
    pub secret_name: String,
    /// Secret version; empty selects the latest
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub secret_version: String,
}

// =============================================================================
// Tests
// =============================================================================
