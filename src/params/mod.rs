//! Parameter derivation
//!
//! This module turns a [`ClusterSpec`] into the flat, ordered parameter map a
//! template-instantiation engine consumes. The top-level entry point is
//! [`derive_parameters`], which runs each deriver in a fixed sequence against
//! one shared sink:
//!
//! 1. master - cluster-wide and control-plane parameters
//! 2. agents - one pass per agent pool, names prefixed by pool name
//! 3. windows - Windows credentials, image source, and secrets
//! 4. extensions - per-extension literal or key-vault-backed payloads
//! 5. the caller's [`OrchestratorParams`] implementation, which may overwrite
//!
//! The sequence is part of the contract, not an optimization: the
//! orchestrator stage runs last precisely so it can override earlier entries,
//! and insertion order determines output order.
//!
//! Derivation is a pure function of its inputs. Nothing is cached across
//! calls, no I/O happens, and every failure surfaces synchronously as an
//! [`enum@crate::Error`].

mod agents;
mod extensions;
mod master;
mod orchestrator;
mod sink;
mod windows;

pub use orchestrator::{NoOrchestratorParams, OrchestratorParams};
pub use sink::{ParamValue, ParameterMap, ParameterSink};

use tracing::debug;

use crate::images::ImageResolutionTable;
use crate::spec::ClusterSpec;
use crate::Result;

/// Derive the full deployment parameter map for a cluster spec
///
/// The spec is assumed valid (loading and validation happen upstream); the
/// image table must cover every distro the spec names. Two calls with the
/// same inputs produce identical ordered mappings.
pub fn derive_parameters(
    spec: &ClusterSpec,
    images: &ImageResolutionTable,
    orchestrator: &dyn OrchestratorParams,
    generator_code: &str,
    engine_version: &str,
) -> Result<ParameterMap> {
    let mut sink = ParameterSink::new();

    master::derive(spec, images, &mut sink, engine_version)?;
    debug!(parameters = sink.len(), "derived master parameters");

    agents::derive(&spec.agent_pools, images, &mut sink)?;
    debug!(pools = spec.agent_pools.len(), parameters = sink.len(), "derived agent pool parameters");

    if let Some(windows_profile) = &spec.windows_profile {
        windows::derive(windows_profile, &mut sink)?;
        debug!(parameters = sink.len(), "derived windows parameters");
    }

    extensions::derive(&spec.extension_profiles, &mut sink)?;

    orchestrator.assign(spec, &mut sink, images, generator_code)?;
    debug!(parameters = sink.len(), generator_code, "derivation complete");

    Ok(sink.finalize())
}

// =============================================================================
// Tests
// =============================================================================
