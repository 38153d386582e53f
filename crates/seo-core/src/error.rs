//! Error types for SEO core
//!
//! Provides error handling for:
//! - Command validation and lookup failures (client faults)
//! - Authorization failures
//! - Storage failures (server faults)
//! - Propagation and regeneration failures (never surfaced to callers)
//! - Configuration loading

use seo_settings::PersistenceError;
use std::path::PathBuf;

/// Command handling error
///
/// Every variant aborts the handler before any later step runs.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Malformed or sentinel input
    #[error("validation failed for {field}: {reason}")]
    Validation {
        /// Offending command field
        field: &'static str,
        /// Human-readable reason
        reason: String,
    },

    /// Referenced entity does not exist or id is malformed
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind
        entity: &'static str,
        /// Identifier as received
        id: String,
    },

    /// No authenticated actor
    #[error("authentication required")]
    Unauthenticated,

    /// Actor may not act on the target
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// Storage collaborator failure
    #[error("persistence failed: {0}")]
    Persistence(#[from] PersistenceError),
}

impl CommandError {
    /// Create not-found error
    #[inline]
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Create validation error
    #[inline]
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Check if the caller is at fault
    #[inline]
    #[must_use]
    pub fn is_client_fault(&self) -> bool {
        !self.is_server_fault()
    }

    /// Check if the failure is on the server side
    #[inline]
    #[must_use]
    pub fn is_server_fault(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

/// Access validation errors
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// No actor on the command
    #[error("unauthenticated")]
    Unauthenticated,

    /// Actor lacks rights on the target
    #[error("denied: {0}")]
    Denied(String),

    /// Target entity does not exist
    #[error("{entity} {id} not found")]
    TargetNotFound {
        /// Entity kind
        entity: &'static str,
        /// Identifier
        id: String,
    },

    /// Lookup of the target failed
    #[error("lookup failed: {0}")]
    Lookup(#[from] PersistenceError),
}

impl From<AccessError> for CommandError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Unauthenticated => Self::Unauthenticated,
            AccessError::Denied(reason) => Self::AccessDenied(reason),
            AccessError::TargetNotFound { entity, id } => Self::NotFound { entity, id },
            AccessError::Lookup(e) => Self::Persistence(e),
        }
    }
}

/// Failure to enqueue a change for regeneration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PropagationError {
    /// Queue at capacity
    #[error("propagation queue full")]
    QueueFull,

    /// Consumer gone
    #[error("propagation queue closed")]
    Closed,
}

/// Failure reported by the regeneration pipeline for one delivery
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("regeneration failed: {0}")]
pub struct PipelineError(pub String);

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// Config path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// TOML could not be parsed
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML could not be rendered
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Parsed but out of range
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
