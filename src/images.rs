//! Image resolution table
//!
//! Read-only lookup from OS distro key to marketplace VM image coordinates,
//! injected by the caller. Keeping the table an explicit collaborator (rather
//! than a global captured from the cloud config) lets tests substitute small
//! fake tables and keeps derivation a pure function of its arguments.
//!
//! The table must be complete for every distro a spec can name: a missing
//! entry aborts derivation instead of emitting blank image parameters.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Marketplace coordinates of a VM image
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OsImageConfig {
    /// Image offer
    pub offer: String,
    /// Image SKU
    pub sku: String,
    /// Image publisher
    pub publisher: String,
    /// Image version
    pub version: String,
}

/// Distro-keyed table of VM image coordinates for one cloud environment
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(transparent)]
pub struct ImageResolutionTable {
    images: BTreeMap<String, OsImageConfig>,
}

impl ImageResolutionTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry for the given distro, builder style
    pub fn with(mut self, distro: impl Into<String>, config: OsImageConfig) -> Self {
        self.images.insert(distro.into(), config);
        self
    }

    /// Look up image coordinates for a distro
    ///
    /// Absence is a hard error, propagated to the caller; Windows pools with
    /// a custom image source never reach this table (policy, not a fallback).
    pub fn lookup(&self, distro: &str) -> Result<&OsImageConfig> {
        self.images
            .get(distro)
            .ok_or_else(|| Error::unknown_image(distro))
    }
}

// =============================================================================
// Tests
// =============================================================================
