//! Trellis - deterministic cluster-to-parameter derivation
//!
//! Trellis turns a fully-populated, in-memory cluster description into the
//! flat, ordered mapping of named deployment parameters that a downstream
//! template-instantiation engine consumes. It encodes the interacting
//! configuration rules (custom-VNET vs managed-subnet networking, per-OS
//! image resolution, availability zones, spot scale sets, Windows vs Linux
//! secret handling, key-vault-backed vs literal secrets) in one place, so
//! they are applied consistently across every pool in the cluster.
//!
//! # Architecture
//!
//! Derivation is a pure function: `(ClusterSpec, ImageResolutionTable,
//! OrchestratorParams, generator code, version) -> ParameterMap`. The spec is
//! loaded and validated elsewhere; the image table is injected by the caller;
//! orchestrator-specific parameters come from a pluggable trait
//! implementation that runs last and may override generic entries.
//!
//! # Modules
//!
//! - [`spec`] - the read-only cluster specification model
//! - [`images`] - the injected distro-to-image lookup table
//! - [`params`] - the parameter sink and the derivation passes
//! - [`error`] - error types
//!
//! # Usage
//!
//! ```
//! use trellis::images::{ImageResolutionTable, OsImageConfig};
//! use trellis::params::{derive_parameters, NoOrchestratorParams};
//! use trellis::spec::ClusterSpec;
//!
//! let spec = ClusterSpec { location: "westus2".into(), ..Default::default() };
//! let images = ImageResolutionTable::new().with(
//!     "ubuntu-18.04",
//!     OsImageConfig {
//!         offer: "UbuntuServer".into(),
//!         sku: "18.04-LTS".into(),
//!         publisher: "Canonical".into(),
//!         version: "latest".into(),
//!     },
//! );
//! let params = derive_parameters(&spec, &images, &NoOrchestratorParams, "vlabs", "0.1.0")?;
//! assert!(params.contains("location"));
//! # Ok::<(), trellis::Error>(())
//! ```

#![deny(missing_docs)]

pub mod error;
pub mod images;
pub mod params;
pub mod spec;

pub use error::Error;
pub use params::derive_parameters;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

// =============================================================================
// Default Configuration Constants
// =============================================================================

/// Feature flag enabling IPv6 dual-stack networking
pub const FEATURE_IPV6_DUAL_STACK: &str = "EnableIPv6DualStack";

/// Marketplace SKU used when a Windows profile leaves the SKU unset
pub const DEFAULT_WINDOWS_SKU: &str = "2019-Datacenter-Core-smalldisk";

/// Docker version installed on Windows nodes when unset
pub const DEFAULT_WINDOWS_DOCKER_VERSION: &str = "19.03.14";

/// Containerd runtime handler used on Windows nodes when unset
pub const DEFAULT_CONTAINERD_RUNTIME_HANDLER: &str = "process";
