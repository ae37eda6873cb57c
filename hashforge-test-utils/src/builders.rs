//! Builders for on-disk test inputs

use hashforge_core::Result;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Creates files with deterministic content inside a temporary directory
///
/// The directory and everything in it is removed when the builder drops.
pub struct TestFileBuilder {
    dir: TempDir,
    generated_files: Vec<PathBuf>,
}

impl TestFileBuilder {
    /// Create a builder over a fresh temporary directory
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
            generated_files: Vec::new(),
        })
    }

    pub fn base_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file with the given contents
    pub fn with_content(&mut self, name: &str, content: &[u8]) -> Result<PathBuf> {
        let file_path = self.dir.path().join(name);
        std::fs::write(&file_path, content)?;
        self.generated_files.push(file_path.clone());
        Ok(file_path)
    }

    /// Generate a deterministic file with specific size and seed
    pub fn deterministic(&mut self, name: &str, size: usize, seed: u64) -> Result<PathBuf> {
        let content = deterministic_bytes(size, seed);
        self.with_content(name, &content)
    }

    /// Paths of every file written so far
    pub fn generated_files(&self) -> &[PathBuf] {
        &self.generated_files
    }
}

/// Pseudo-random bytes from a linear congruential generator
pub fn deterministic_bytes(size: usize, seed: u64) -> Vec<u8> {
    let mut state = seed ^ 0x9e37_79b9_7f4a_7c15;
    (0..size)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (state >> 56) as u8
        })
        .collect()
}
