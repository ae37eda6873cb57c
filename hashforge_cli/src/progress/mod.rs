//! Progress reporting module for the CLI
//!
//! The core drivers report into a [`ChannelAdapter`](hashforge_core::progress::ChannelAdapter);
//! a separate task drains the channel and draws an `indicatif` bar.

pub mod renderer;
pub mod utils;

pub use renderer::{ProgressRenderer, create_progress_infrastructure, render_progress};
pub use utils::{format_bytes, format_throughput};
