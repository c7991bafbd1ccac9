//! Unified error types for sbom-catalog.
//!
//! Lookup misses are typed [`ResolverErrorKind::NotFound`] values, never
//! panics, so batch queries can skip individual misses. Archive decode and
//! glob syntax failures are hard errors surfaced to the immediate caller.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sbom-catalog operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CatalogError {
    /// Errors raised while answering resolver queries
    #[error("Resolver query failed: {context}")]
    Resolver {
        context: String,
        #[source]
        source: ResolverErrorKind,
    },

    /// Errors raised while indexing an archive stream
    #[error("Archive indexing failed: {context}")]
    Archive {
        context: String,
        #[source]
        source: ArchiveErrorKind,
    },

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific resolver error kinds
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResolverErrorKind {
    #[error("No indexed entry or content for path: {0}")]
    NotFound(String),

    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Specific archive error kinds
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ArchiveErrorKind {
    #[error("Malformed archive stream: {0}")]
    Decode(String),

    #[error("Entry {path} is {size} bytes, exceeding the limit of {limit}")]
    EntryTooLarge { path: String, size: u64, limit: u64 },
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for sbom-catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl CatalogError {
    /// Create a resolver error with context
    pub fn resolver(context: impl Into<String>, source: ResolverErrorKind) -> Self {
        Self::Resolver {
            context: context.into(),
            source,
        }
    }

    /// Create a not-found error for a path
    pub fn not_found(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::resolver(
            format!("lookup of {path}"),
            ResolverErrorKind::NotFound(path),
        )
    }

    /// Create an invalid-pattern error
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::resolver(
            "compiling glob",
            ResolverErrorKind::InvalidPattern {
                pattern: pattern.into(),
                reason: reason.into(),
            },
        )
    }

    /// Create an archive error with context
    pub fn archive(context: impl Into<String>, source: ArchiveErrorKind) -> Self {
        Self::Archive {
            context: context.into(),
            source,
        }
    }

    /// Create a decode error for a malformed archive
    pub fn decode(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::archive(context, ArchiveErrorKind::Decode(message.into()))
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// True for lookup misses, which callers treat as absence.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Resolver {
                source: ResolverErrorKind::NotFound(_),
                ..
            }
        )
    }

    /// True for malformed glob syntax.
    #[must_use]
    pub const fn is_invalid_pattern(&self) -> bool {
        matches!(
            self,
            Self::Resolver {
                source: ResolverErrorKind::InvalidPattern { .. },
                ..
            }
        )
    }

    /// True for a malformed archive stream.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(
            self,
            Self::Archive {
                source: ArchiveErrorKind::Decode(_),
                ..
            }
        )
    }

    /// True when an entry exceeded the configured size limit.
    #[must_use]
    pub const fn is_entry_too_large(&self) -> bool {
        matches!(
            self,
            Self::Archive {
                source: ArchiveErrorKind::EntryTooLarge { .. },
                ..
            }
        )
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Validation(format!("JSON encoding: {err}"))
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings chain rather than replace, so a failure deep inside an
/// archive build reads as "entry 3: usr/bin/rg: reading content".
///
/// # Example
///
/// ```
/// use sbom_catalog::error::{CatalogError, ErrorContext, Result};
///
/// let failed: Result<()> = Err(CatalogError::decode("reading header", "bad checksum"));
/// let err = failed.context("entry 3").unwrap_err();
/// assert!(err.to_string().contains("entry 3: reading header"));
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure (lazy evaluation).
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<CatalogError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: CatalogError, new_ctx: &str) -> CatalogError {
    match err {
        CatalogError::Resolver {
            context: existing,
            source,
        } => CatalogError::Resolver {
            context: chain_context(new_ctx, &existing),
            source,
        },
        CatalogError::Archive {
            context: existing,
            source,
        } => CatalogError::Archive {
            context: chain_context(new_ctx, &existing),
            source,
        },
        CatalogError::Io {
            path,
            message,
            source,
        } => CatalogError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        CatalogError::Config(msg) => CatalogError::Config(chain_context(new_ctx, &msg)),
        CatalogError::Validation(msg) => CatalogError::Validation(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to a not-found error for the given path.
    fn or_not_found(self, path: impl Into<String>) -> Result<T>;
}

impl<T> OptionContext<T> for Option<T> {
    fn or_not_found(self, path: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| CatalogError::not_found(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CatalogError::not_found("etc/os-release");
        let display = err.to_string();
        assert!(
            display.contains("etc/os-release"),
            "Error message should mention the path: {}",
            display
        );

        let err = CatalogError::invalid_pattern("[a", "unclosed character class");
        assert!(err.to_string().contains("glob"));
    }

    #[test]
    fn test_kind_predicates() {
        assert!(CatalogError::not_found("x").is_not_found());
        assert!(!CatalogError::not_found("x").is_invalid_pattern());
        assert!(CatalogError::invalid_pattern("[", "bad").is_invalid_pattern());
        assert!(CatalogError::decode("reading header", "bad checksum").is_decode());
        let too_large = CatalogError::archive(
            "checking size of big",
            ArchiveErrorKind::EntryTooLarge {
                path: "big".to_string(),
                size: 9,
                limit: 4,
            },
        );
        assert!(too_large.is_entry_too_large());
        assert!(!too_large.is_decode());
        assert!(!CatalogError::decode("reading header", "bad checksum").is_entry_too_large());
        assert!(!CatalogError::validation("x").is_not_found());
    }

    #[test]
    fn test_error_chain() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = CatalogError::io("/path/to/image.tar", io_err);

        assert!(err.to_string().contains("/path/to/image.tar"));
    }

    #[test]
    fn test_context_chaining() {
        let initial_err: Result<()> = Err(CatalogError::decode("initial context", "truncated"));

        let err_with_context = initial_err.context("outer context");

        match err_with_context {
            Err(CatalogError::Archive { context, .. }) => {
                assert!(
                    context.contains("outer context"),
                    "Should contain outer context: {}",
                    context
                );
                assert!(
                    context.contains("initial context"),
                    "Should contain initial context: {}",
                    context
                );
            }
            _ => panic!("Expected Archive error"),
        }
    }

    #[test]
    fn test_context_preserves_not_found() {
        let err: Result<()> = Err(CatalogError::not_found("a/b.txt"));
        let err = err.context("fetching contents").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;

        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called, "Closure should not be called for Ok result");

        let err_result: Result<i32> = Err(CatalogError::validation("error"));
        let _ = err_result.with_context(|| {
            called = true;
            "should be called"
        });
        assert!(called, "Closure should be called for Err result");
    }

    #[test]
    fn test_option_context() {
        let none_value: Option<i32> = None;
        let result = none_value.or_not_found("missing.txt");
        assert!(result.unwrap_err().is_not_found());

        assert_eq!(Some(7).or_not_found("x").unwrap(), 7);
    }

    #[test]
    fn test_chain_context_helper() {
        assert_eq!(chain_context("new", ""), "new");
        assert_eq!(chain_context("new", "existing"), "new: existing");
        assert_eq!(
            chain_context("outer", "middle: inner"),
            "outer: middle: inner"
        );
    }
}
