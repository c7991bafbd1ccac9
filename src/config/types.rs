//! Configuration types for sbom-catalog.

use super::defaults::DEFAULT_CHANNEL_CAPACITY;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Top-level configuration
// ============================================================================

/// Configuration that can be loaded from a config file and overridden by CLI flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CatalogConfig {
    /// How archives are decoded and indexed
    pub archive: ArchiveConfig,
    /// Lazy enumeration settings
    pub enumeration: EnumerationConfig,
}

impl CatalogConfig {
    /// Create a new `CatalogConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a `CatalogConfig` builder.
    pub fn builder() -> CatalogConfigBuilder {
        CatalogConfigBuilder::default()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for constructing `CatalogConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct CatalogConfigBuilder {
    config: CatalogConfig,
}

impl CatalogConfigBuilder {
    /// Set the archive compression.
    pub const fn compression(mut self, compression: Compression) -> Self {
        self.config.archive.compression = compression;
        self
    }

    /// Set the filesystem id stamped on resolved coordinates.
    pub fn filesystem_id(mut self, id: impl Into<String>) -> Self {
        self.config.archive.filesystem_id = id.into();
        self
    }

    /// Cap the size of any single entry's content.
    pub const fn max_entry_bytes(mut self, limit: Option<u64>) -> Self {
        self.config.archive.max_entry_bytes = limit;
        self
    }

    /// Set the enumeration handoff queue size.
    pub const fn channel_capacity(mut self, capacity: usize) -> Self {
        self.config.enumeration.channel_capacity = capacity;
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> CatalogConfig {
        self.config
    }
}

// ============================================================================
// Archive configuration
// ============================================================================

/// Archive decoding settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Stream compression; `auto` sniffs the gzip magic bytes
    pub compression: Compression,
    /// Filesystem (layer) id stamped on every location; empty for a single filesystem
    #[serde(skip_serializing_if = "String::is_empty")]
    pub filesystem_id: String,
    /// Reject entries whose content exceeds this many bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_entry_bytes: Option<u64>,
}

/// Compression applied to an archive stream.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// Detect gzip by its magic bytes
    #[default]
    Auto,
    Gzip,
    /// Plain tar
    None,
}

impl Compression {
    /// Get the compression name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Gzip => "gzip",
            Self::None => "none",
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Compression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "gzip" | "gz" => Ok(Self::Gzip),
            "none" | "tar" => Ok(Self::None),
            other => Err(format!(
                "unknown compression '{other}'. Valid options: auto, gzip, none"
            )),
        }
    }
}

// ============================================================================
// Enumeration configuration
// ============================================================================

/// Settings for lazily produced location streams.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EnumerationConfig {
    /// Locations buffered between the producer and the consumer
    pub channel_capacity: usize,
}

impl Default for EnumerationConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}
