//! Orchestrator-specific parameter boundary
//!
//! The generic derivers cover everything common to any workload orchestrator;
//! orchestrator-specific parameters (version pinning, feature-gated knobs)
//! come from a pluggable implementation of [`OrchestratorParams`] supplied by
//! the caller. It runs last and may add or overwrite entries through
//! [`ParameterSink::upsert`], but never remove them.

#[cfg(test)]
use mockall::automock;

use crate::images::ImageResolutionTable;
use crate::spec::ClusterSpec;
use crate::Result;

use super::sink::ParameterSink;

/// Trait for supplying orchestrator-specific parameters
///
/// Implementations receive the partially-built sink after all generic
/// derivers have run, plus the same inputs the generic derivation saw. The
/// generator code identifies which downstream template flavor is targeted.
#[cfg_attr(test, automock)]
pub trait OrchestratorParams {
    /// Add or overwrite orchestrator-specific entries in the sink
    fn assign(
        &self,
        spec: &ClusterSpec,
        sink: &mut ParameterSink,
        images: &ImageResolutionTable,
        generator_code: &str,
    ) -> Result<()>;
}

/// No-op implementation for callers that want only the generic parameters
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOrchestratorParams;

impl OrchestratorParams for NoOrchestratorParams {
    fn assign(
        &self,
        _spec: &ClusterSpec,
        _sink: &mut ParameterSink,
        _images: &ImageResolutionTable,
        _generator_code: &str,
    ) -> Result<()> {
        Ok(())
    }
}
