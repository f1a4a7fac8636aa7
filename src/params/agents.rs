//! Agent pool parameter derivation
//!
//! Runs once per pool in declaration order, prefixing every parameter name
//! with the pool name. Pool names must be unique: the second pool with a
//! repeated name collides in the sink and aborts the run, so a silently
//! overwritten pool configuration can never reach the template engine.

use crate::images::ImageResolutionTable;
use crate::spec::{AgentPool, NetworkMode, OsType};
use crate::Result;

use super::sink::ParameterSink;

pub(super) fn derive(
    pools: &[AgentPool],
    images: &ImageResolutionTable,
    sink: &mut ParameterSink,
) -> Result<()> {
    for pool in pools {
        derive_pool(pool, images, sink)?;
    }
    Ok(())
}

fn derive_pool(
    pool: &AgentPool,
    images: &ImageResolutionTable,
    sink: &mut ParameterSink,
) -> Result<()> {
    let name = &pool.name;

    sink.put(format!("{name}Count"), pool.count)?;
    sink.put(format!("{name}VMSize"), pool.vm_size.as_str())?;

    if pool.has_availability_zones() {
        sink.put(format!("{name}AvailabilityZones"), pool.availability_zones.as_slice())?;
    }

    match pool.network_mode() {
        NetworkMode::CustomVnet { subnet_id, .. } => {
            sink.put(format!("{name}VnetSubnetID"), subnet_id)?;
        }
        NetworkMode::ManagedSubnet { subnet, .. } => {
            sink.put(format!("{name}Subnet"), subnet)?;
        }
    }

    // Open ports imply a public endpoint, which needs a DNS name.
    if !pool.ports.is_empty() {
        sink.put(format!("{name}EndpointDNSNamePrefix"), pool.dns_prefix.as_str())?;
    }

    if pool.is_spot_scale_set() {
        sink.put(format!("{name}ScaleSetPriority"), pool.scale_set_priority.to_string())?;
        sink.put(
            format!("{name}ScaleSetEvictionPolicy"),
            pool.scale_set_eviction_policy.to_string(),
        )?;
    }

    if let Some(image_ref) = &pool.image_ref {
        sink.put(format!("{name}osImageName"), image_ref.name.as_str())?;
        sink.put(format!("{name}osImageResourceGroup"), image_ref.resource_group.as_str())?;
    }

    // Windows pools resolve their image through the Windows profile, never
    // through the distro table.
    if pool.os_type != OsType::Windows {
        let image = images.lookup(&pool.distro)?;
        sink.put(format!("{name}osImageOffer"), image.offer.as_str())?;
        sink.put(format!("{name}osImageSKU"), image.sku.as_str())?;
        sink.put(format!("{name}osImagePublisher"), image.publisher.as_str())?;
        sink.put(format!("{name}osImageVersion"), image.version.as_str())?;
    }

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
