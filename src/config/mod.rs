//! Configuration module for sbom-catalog.
//!
//! This module provides:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - YAML config file loading and discovery
//!
//! # Quick Start
//!
//! ```rust
//! use sbom_catalog::config::{CatalogConfig, Compression, Validatable};
//!
//! let config = CatalogConfig::builder()
//!     .compression(Compression::Gzip)
//!     .channel_capacity(16)
//!     .build();
//! assert!(config.is_valid());
//! ```
//!
//! # Configuration File
//!
//! Place a `.sbom-catalog.yaml` file in your project root or `~/.config/sbom-catalog/`:
//!
//! ```yaml
//! archive:
//!   compression: auto
//!   max_entry_bytes: 536870912
//! enumeration:
//!   channel_capacity: 64
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::DEFAULT_CHANNEL_CAPACITY;
pub use types::{ArchiveConfig, CatalogConfig, CatalogConfigBuilder, Compression, EnumerationConfig};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    ConfigFileError,
};

/// Generate a JSON Schema for the `CatalogConfig` configuration format.
///
/// Editors can use it to validate and autocomplete `.sbom-catalog.yaml` files.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = schemars::schema_for!(CatalogConfig);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}
