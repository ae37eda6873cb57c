//! Mock implementations for testing

mod progress;
mod readers;

pub use progress::RecordingProgress;
pub use readers::{FailingAsyncReader, FailingReader, TrickleReader};
