//! Supporting types for the cluster specification

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Operating system of an agent pool
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OsType {
    /// Linux nodes (default)
    #[default]
    Linux,
    /// Windows nodes
    Windows,
}

impl std::fmt::Display for OsType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linux => write!(f, "linux"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

/// Placement mode for a node pool
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub enum Placement {
    /// Individual VMs in an availability set
    AvailabilitySet,
    /// Virtual machine scale set (default)
    #[default]
    ScaleSet,
}

/// Scheduling priority for scale-set pools
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScaleSetPriority {
    /// On-demand capacity (default)
    #[default]
    Regular,
    /// Preemptible spot capacity
    Spot,
}

impl std::fmt::Display for ScaleSetPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Regular => write!(f, "Regular"),
            Self::Spot => write!(f, "Spot"),
        }
    }
}

/// What happens to a spot VM when it is evicted
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvictionPolicy {
    /// Delete the VM and its disks (default)
    #[default]
    Delete,
    /// Stop-deallocate the VM, keeping its disks
    Deallocate,
}

impl std::fmt::Display for EvictionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Delete => write!(f, "Delete"),
            Self::Deallocate => write!(f, "Deallocate"),
        }
    }
}

/// Reference to a pre-built VM image in a resource group
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    /// Image name
    pub name: String,
    /// Resource group containing the image
    pub resource_group: String,
}

/// A key-vault-backed bundle of certificates to install on nodes
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KeyVaultSecrets {
    /// Resource ID of the source vault
    pub source_vault_id: String,
    /// Certificates to install, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vault_certificates: Vec<VaultCertificate>,
}

/// A single certificate within a [`KeyVaultSecrets`] bundle
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VaultCertificate {
    /// Vault URL of the certificate
    pub certificate_url: String,
    /// Certificate store name; only meaningful on Windows nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_store: Option<String>,
}

/// Custom DNS configuration for Linux nodes
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomNodesDns {
    /// Address of the DNS server nodes should use
    pub dns_server: String,
}

/// Named feature flags enabled on the cluster
///
/// Flags are free-form names; this core only interprets the ones it gates on
/// (see [`crate::FEATURE_IPV6_DUAL_STACK`]).
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(transparent)]
pub struct FeatureFlags(BTreeSet<String>);

impl FeatureFlags {
    /// Construct from an iterator of enabled flag names
    pub fn from_enabled<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(flags.into_iter().map(Into::into).collect())
    }

    /// Returns true if the named feature is enabled
    pub fn is_enabled(&self, name: &str) -> bool {
        self.0.contains(name)
    }
}

/// Resolved networking decision for a pool
///
/// A pool either brings its own VNET subnet or gets a managed subnet carved
/// out for it; the two are mutually exclusive and every pool is exactly one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NetworkMode<'a> {
    /// Pool attaches to a caller-provided VNET subnet
    CustomVnet {
        /// Resource ID of the subnet for this pool's nodes
        subnet_id: &'a str,
        /// Resource ID of the subnet for agent nodes (master pool only)
        agent_subnet_id: &'a str,
        /// CIDR of the whole VNET, when known
        vnet_cidr: &'a str,
    },
    /// Pool uses a managed subnet
    ManagedSubnet {
        /// CIDR of this pool's subnet
        subnet: &'a str,
        /// CIDR of the agent subnet (master pool only)
        agent_subnet: &'a str,
        /// IPv6 subnet CIDR, populated under dual-stack
        subnet_ipv6: &'a str,
    },
}

/// Resolved Windows image source, in priority order
///
/// Exactly one source wins: a custom VHD URL beats an image reference, which
/// beats the marketplace fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WindowsImageSource<'a> {
    /// Download a VHD from this URL
    CustomUrl(&'a str),
    /// Use a pre-built image by reference
    Reference(&'a ImageRef),
    /// Resolve from the marketplace
    Marketplace {
        /// Image publisher
        publisher: &'a str,
        /// Image offer
        offer: &'a str,
        /// Image SKU, with the crate default applied when unset
        sku: &'a str,
        /// Image version
        version: &'a str,
    },
}

// =============================================================================
// Tests
// =============================================================================
