//! Test utilities for hashforge
//!
//! This crate provides progress recorders, misbehaving readers, file
//! builders and reference digests for testing the hashing engine.

pub mod builders;
pub mod chunking;
pub mod mocks;
pub mod reference;

// Re-export commonly used types
pub use builders::TestFileBuilder;
pub use chunking::{split_at_points, split_evenly};
pub use mocks::{FailingAsyncReader, FailingReader, RecordingProgress, TrickleReader};
pub use reference::{KNOWN_VECTORS, KnownVector, reference_hex};
