//! Configuration validation for sbom-catalog.

use super::types::{ArchiveConfig, CatalogConfig, EnumerationConfig};
use crate::error::{CatalogError, Result};

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for CatalogConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.archive.validate());
        errors.extend(self.enumeration.validate());
        errors
    }
}

impl Validatable for ArchiveConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.max_entry_bytes == Some(0) {
            errors.push(ConfigError {
                field: "archive.max_entry_bytes".to_string(),
                message: "Entry size limit must be greater than 0 when set".to_string(),
            });
        }
        errors
    }
}

impl Validatable for EnumerationConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.channel_capacity == 0 {
            errors.push(ConfigError {
                field: "enumeration.channel_capacity".to_string(),
                message: "Channel capacity must be at least 1".to_string(),
            });
        }
        errors
    }
}

impl CatalogConfig {
    /// Return the configuration if it is valid, otherwise a config error listing every problem.
    pub fn validated(self) -> Result<Self> {
        let errors = self.validate();
        if errors.is_empty() {
            return Ok(self);
        }
        let joined = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(CatalogError::config(joined))
    }
}
