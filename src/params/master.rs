//! Control-plane parameter derivation
//!
//! Emits the parameters tied to the cluster as a whole (location, target
//! environment, tool version) and to the single control-plane pool: OS image
//! coordinates, networking, placement, and Linux credentials/secrets.
//! Emission order follows the original template contract and is part of the
//! output's determinism guarantee.

use crate::images::ImageResolutionTable;
use crate::spec::{ClusterSpec, NetworkMode};
use crate::{Error, Result, FEATURE_IPV6_DUAL_STACK};

use super::sink::ParameterSink;

pub(super) fn derive(
    spec: &ClusterSpec,
    images: &ImageResolutionTable,
    sink: &mut ParameterSink,
    engine_version: &str,
) -> Result<()> {
    sink.put("aksEngineVersion", engine_version)?;
    sink.put("location", spec.location.as_str())?;

    // Distro-based image coordinates come first; an explicit image reference
    // augments them rather than replacing them.
    if let Some(master) = &spec.master {
        let image = images.lookup(&master.distro)?;
        sink.put("osImageOffer", image.offer.as_str())?;
        sink.put("osImageSKU", image.sku.as_str())?;
        sink.put("osImagePublisher", image.publisher.as_str())?;
        sink.put("osImageVersion", image.version.as_str())?;
        if let Some(image_ref) = &master.image_ref {
            sink.put("osImageName", image_ref.name.as_str())?;
            sink.put("osImageResourceGroup", image_ref.resource_group.as_str())?;
        }
    }

    sink.put("fqdnEndpointSuffix", spec.cloud.fqdn_endpoint_suffix.as_str())?;
    sink.put("targetEnvironment", spec.target_environment())?;

    if let Some(linux) = &spec.linux_profile {
        sink.put("linuxAdminUsername", linux.admin_username.as_str())?;
        if let Some(dns) = &linux.custom_nodes_dns {
            // An empty server address means "not actually configured"; the
            // parameter is suppressed rather than emitted blank.
            if !dns.dns_server.is_empty() {
                sink.put("dnsServer", dns.dns_server.as_str())?;
            }
        }
    }

    if let Some(master) = &spec.master {
        // Basis for storage account and endpoint naming downstream.
        sink.put("masterEndpointDNSNamePrefix", master.dns_prefix.as_str())?;
        match master.network_mode() {
            NetworkMode::CustomVnet { subnet_id, agent_subnet_id, vnet_cidr } => {
                sink.put("masterVnetSubnetID", subnet_id)?;
                if master.is_scale_set() {
                    sink.put("agentVnetSubnetID", agent_subnet_id)?;
                }
                if !vnet_cidr.is_empty() {
                    sink.put("vnetCidr", vnet_cidr)?;
                }
            }
            NetworkMode::ManagedSubnet { subnet, agent_subnet, subnet_ipv6 } => {
                sink.put("masterSubnet", subnet)?;
                sink.put("agentSubnet", agent_subnet)?;
                if spec.feature_flags.is_enabled(FEATURE_IPV6_DUAL_STACK) {
                    sink.put("masterSubnetIPv6", subnet_ipv6)?;
                }
            }
        }
        sink.put("firstConsecutiveStaticIP", master.first_consecutive_static_ip.as_str())?;
        sink.put("masterVMSize", master.vm_size.as_str())?;
        if master.has_availability_zones() {
            sink.put("availabilityZones", master.availability_zones.as_slice())?;
        }
    }

    if let Some(linux) = &spec.linux_profile {
        let first_key = linux
            .ssh_public_keys
            .first()
            .ok_or_else(|| Error::missing_field("linuxProfile.sshPublicKeys[0]"))?;
        sink.put("sshRSAPublicKey", first_key.as_str())?;
        // Indices are positional: downstream parameter names are tied to the
        // declaration order of bundles and certificates.
        for (i, secret) in linux.secrets.iter().enumerate() {
            sink.put(format!("linuxKeyVaultID{i}"), secret.source_vault_id.as_str())?;
            for (j, cert) in secret.vault_certificates.iter().enumerate() {
                sink.put(
                    format!("linuxKeyVaultID{i}CertificateURL{j}"),
                    cert.certificate_url.as_str(),
                )?;
            }
        }
    }

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
