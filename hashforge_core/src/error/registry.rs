//! Registry error types

use std::fmt;
use thiserror::Error;

/// Which catalog raised a registry error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryKind {
    /// The hash algorithm registry
    Algorithm,
    /// The digest formatter registry
    Formatter,
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryKind::Algorithm => write!(f, "algorithm"),
            RegistryKind::Formatter => write!(f, "formatter"),
        }
    }
}

/// Lookup and registration failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No entry under the requested name or identity
    #[error("No {kind} registered for '{key}'")]
    NotRegistered { kind: RegistryKind, key: String },

    /// Name or identity already taken
    #[error("Duplicate {kind} registration for '{key}'")]
    DuplicateRegistration { kind: RegistryKind, key: String },

    /// Neither an explicit choice nor a default was available
    #[error("No default {kind} configured and none was requested explicitly")]
    NoDefaultConfigured { kind: RegistryKind },
}

impl RegistryError {
    /// Create a not-registered error
    pub fn not_registered(kind: RegistryKind, key: impl fmt::Display) -> Self {
        Self::NotRegistered {
            kind,
            key: key.to_string(),
        }
    }

    /// Create a duplicate registration error
    pub fn duplicate(kind: RegistryKind, key: impl fmt::Display) -> Self {
        Self::DuplicateRegistration {
            kind,
            key: key.to_string(),
        }
    }

    /// Create a no-default error
    pub fn no_default(kind: RegistryKind) -> Self {
        Self::NoDefaultConfigured { kind }
    }
}
