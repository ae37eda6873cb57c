//! Hash calculation functionality
//!
//! This module contains the block engine, the algorithm registry, the
//! built-in algorithms and the [`HashCalculator`] facade that ties them to
//! the streaming drivers.

use crate::progress::ProgressProvider;
use crate::streaming::StreamingDriver;
use crate::{HashConfig, Result};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use std::time::{Duration, Instant};

pub(crate) mod accumulator;
pub mod algorithms;
mod digest;
mod engine;
mod registry;
mod traits;

pub use accumulator::BlockAccumulator;
pub use digest::Digest;
pub use engine::{EngineState, HashEngine};
pub use registry::{AlgorithmDescriptor, AlgorithmFactory, AlgorithmRegistry};
pub use traits::{BlockTransform, HashAlgorithm};

/// Result of hash calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashResult {
    pub algorithm: String,
    pub digest: Digest,
    pub input_size: u64,
    pub duration: Duration,
}

impl HashResult {
    pub(crate) fn from_engine(engine: &HashEngine, input_size: u64, started: Instant) -> Self {
        Self {
            algorithm: engine.algorithm_name().to_string(),
            digest: engine.digest_as_bytes(),
            input_size,
            duration: started.elapsed(),
        }
    }

    /// Lowercase hex of the digest
    pub fn hex(&self) -> String {
        self.digest.to_hex()
    }
}

/// Hash calculator resolving algorithms through a registry
///
/// Every call creates a fresh engine, so one calculator can be shared across
/// threads.
#[derive(Debug, Clone)]
pub struct HashCalculator<'r> {
    registry: &'r AlgorithmRegistry,
    driver: StreamingDriver,
    default_algorithm: Option<String>,
}

impl HashCalculator<'static> {
    /// Calculator over the global registry with default settings
    pub fn new() -> Self {
        Self::with_registry(AlgorithmRegistry::global())
    }

    /// Calculator over the global registry using a validated configuration
    pub fn with_config(config: &HashConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            registry: AlgorithmRegistry::global(),
            driver: StreamingDriver::new(config.chunk_target),
            default_algorithm: config.default_algorithm.clone(),
        })
    }
}

impl Default for HashCalculator<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> HashCalculator<'r> {
    /// Calculator over a specific registry
    pub fn with_registry(registry: &'r AlgorithmRegistry) -> Self {
        Self {
            registry,
            driver: StreamingDriver::default(),
            default_algorithm: None,
        }
    }

    /// Algorithm used when a call passes `None`, ahead of the registry default
    pub fn with_default_algorithm(mut self, name: impl Into<String>) -> Self {
        self.default_algorithm = Some(name.into());
        self
    }

    pub fn with_chunk_target(mut self, chunk_target: usize) -> Self {
        self.driver = StreamingDriver::new(chunk_target);
        self
    }

    pub fn registry(&self) -> &'r AlgorithmRegistry {
        self.registry
    }

    /// Fresh engine for the requested algorithm.
    ///
    /// Resolution order: explicit name, the calculator's default, the
    /// registry default.
    pub fn engine_for(&self, algorithm: Option<&str>) -> Result<HashEngine> {
        let choice = algorithm.or(self.default_algorithm.as_deref());
        Ok(self.registry.resolve(choice)?.create_engine())
    }

    /// Calculate hash for byte data
    pub fn calculate_bytes(&self, algorithm: Option<&str>, data: &[u8]) -> Result<HashResult> {
        let mut engine = self.engine_for(algorithm)?;
        self.driver.hash_bytes(&mut engine, data, None)
    }

    /// Calculate hash for a string's UTF-8 bytes
    pub fn calculate_str(&self, algorithm: Option<&str>, text: &str) -> Result<HashResult> {
        let mut engine = self.engine_for(algorithm)?;
        self.driver.hash_str(&mut engine, text, None)
    }

    /// Calculate hash for a reader with progress reporting
    pub fn calculate_reader<R: Read>(
        &self,
        algorithm: Option<&str>,
        reader: R,
        total: Option<u64>,
        progress: Option<&dyn ProgressProvider>,
    ) -> Result<HashResult> {
        let mut engine = self.engine_for(algorithm)?;
        self.driver.hash_reader(&mut engine, reader, total, progress)
    }

    /// Calculate hash for a file, reading it in aligned chunks
    pub fn calculate_file(
        &self,
        algorithm: Option<&str>,
        path: &Path,
        progress: Option<&dyn ProgressProvider>,
    ) -> Result<HashResult> {
        let mut engine = self.engine_for(algorithm)?;
        self.driver.hash_file(&mut engine, path, progress)
    }

    /// Calculate hash for a file using tokio file I/O
    pub async fn calculate_file_async(
        &self,
        algorithm: Option<&str>,
        path: &Path,
        progress: Option<&dyn ProgressProvider>,
    ) -> Result<HashResult> {
        let mut engine = self.engine_for(algorithm)?;
        self.driver
            .hash_file_async(&mut engine, path, progress)
            .await
    }

    /// Calculate several digests of one file, one pass per algorithm
    pub fn calculate_multiple(
        &self,
        algorithms: &[&str],
        path: &Path,
        progress: Option<&dyn ProgressProvider>,
    ) -> Result<Vec<HashResult>> {
        algorithms
            .iter()
            .map(|&name| self.calculate_file(Some(name), path, progress))
            .collect()
    }

    /// Check if an algorithm is supported
    pub fn supports_algorithm(&self, name: &str) -> bool {
        self.registry.contains(name)
    }
}
