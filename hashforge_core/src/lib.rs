//! hashforge core library
//!
//! An incremental block-hashing engine: a 256-bit bit counter, a block
//! accumulator, an init/update/finalize state machine, a process-wide
//! algorithm registry, digest formatters and streaming drivers with
//! progress reporting.

pub mod counter;
pub mod error;
pub mod formatting;
pub mod hashing;
pub mod progress;
pub mod security;
pub mod streaming;

// Re-export main types
pub use counter::BitCounter;
pub use error::{Error, Result};
pub use formatting::{DigestFormatter, FormatterRegistry};
pub use hashing::{
    AlgorithmDescriptor, AlgorithmRegistry, BlockTransform, Digest, EngineState, HashAlgorithm,
    HashCalculator, HashEngine, HashResult,
};
pub use progress::{NullProvider, ProgressPhase, ProgressProvider, ProgressUpdate, SharedProvider};
pub use security::SecureBuffer;
pub use streaming::{DEFAULT_CHUNK_TARGET, StreamingDriver};

use error::ValidationError;

/// Core hashing configuration
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HashConfig {
    /// Target bytes per update call, rounded up to the block size
    pub chunk_target: usize,
    /// Algorithm used when a call does not name one
    pub default_algorithm: Option<String>,
    /// Formatter used for text output when none is named
    pub default_formatter: Option<String>,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            chunk_target: DEFAULT_CHUNK_TARGET,
            default_algorithm: Some("sha256".to_string()),
            default_formatter: Some("hex".to_string()),
        }
    }
}

impl HashConfig {
    /// Create a test configuration
    pub fn test() -> Self {
        Self {
            chunk_target: 64, // one MD5/SHA-256 block, exercises many updates
            default_algorithm: Some("md5".to_string()),
            default_formatter: Some("hex".to_string()),
        }
    }

    /// Check that the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.chunk_target == 0 {
            return Err(ValidationError::invalid_configuration(
                "chunk_target must be greater than zero",
            )
            .into());
        }
        if let Some(name) = &self.default_algorithm
            && name.trim().is_empty()
        {
            return Err(ValidationError::invalid_parameter(
                "default_algorithm",
                "must not be empty",
            )
            .into());
        }
        if let Some(name) = &self.default_formatter
            && name.trim().is_empty()
        {
            return Err(ValidationError::invalid_parameter(
                "default_formatter",
                "must not be empty",
            )
            .into());
        }
        Ok(())
    }

    /// Install the configured defaults into the global registries.
    ///
    /// Names must already be registered. A default that is already set to
    /// the same entry is accepted, so repeated calls are harmless.
    pub fn apply_defaults(&self) -> Result<()> {
        self.validate()?;

        if let Some(name) = &self.default_algorithm {
            let registry = AlgorithmRegistry::global();
            let wanted = registry.lookup_by_name(name)?;
            match registry.default_algorithm() {
                Some(current) if current.name() == wanted.name() => {}
                _ => registry.set_default(name)?,
            }
        }

        if let Some(name) = &self.default_formatter {
            let registry = FormatterRegistry::global();
            let wanted = registry.lookup(name)?;
            match registry.default_formatter() {
                Some(current) if current.name() == wanted.name() => {}
                _ => registry.set_default(name)?,
            }
        }

        Ok(())
    }
}
