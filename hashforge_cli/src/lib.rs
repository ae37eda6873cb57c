//! hashforge command line interface
//!
//! The binary in `main.rs` is a thin layer over these modules, which are
//! exposed so integration tests can drive them directly.

pub mod config;
pub mod output;
pub mod progress;
pub mod terminal;
