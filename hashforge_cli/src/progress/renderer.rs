//! Progress rendering for the CLI

use hashforge_core::progress::{ChannelAdapter, ProgressPhase, ProgressUpdate};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const CHANNEL_CAPACITY: usize = 100;

/// Create a provider/renderer pair for one input
///
/// Call [`ChannelAdapter::complete`] once hashing is done, then await the
/// handle so the bar is cleared before results are printed.
pub fn create_progress_infrastructure(label: &str) -> (Arc<ChannelAdapter>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let provider = Arc::new(ChannelAdapter::new(tx));
    let handle = tokio::spawn(render_progress(rx, label.to_string()));
    (provider, handle)
}

/// Render progress updates from a channel until it closes
pub async fn render_progress(mut rx: mpsc::Receiver<ProgressUpdate>, label: String) {
    let mut renderer = ProgressRenderer::new(label);

    while let Some(update) = rx.recv().await {
        renderer.handle_update(update);
    }

    renderer.finish();
}

/// Draws one bar per driver call
pub struct ProgressRenderer {
    label: String,
    bar: Option<ProgressBar>,
}

impl ProgressRenderer {
    pub fn new(label: String) -> Self {
        Self { label, bar: None }
    }

    /// Handle a progress update
    pub fn handle_update(&mut self, update: ProgressUpdate) {
        match update.phase {
            ProgressPhase::Started => {
                self.finish();
                self.bar = Some(self.create_bar(update.total));
            }
            ProgressPhase::Processing => {
                if let Some(bar) = &self.bar {
                    bar.set_position(update.current.max(0) as u64);
                }
            }
            ProgressPhase::Finished => self.finish(),
        }
    }

    /// Clear the active bar, if any
    pub fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    fn create_bar(&self, total: i64) -> ProgressBar {
        // A negative total means the size is unknown
        let bar = match u64::try_from(total) {
            Ok(len) => {
                let bar = ProgressBar::new(len);
                bar.set_style(
                    ProgressStyle::default_bar()
                        .template("{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {percent}% | {bytes}/{total_bytes} | {bytes_per_sec} | ETA: {eta}")
                        .unwrap_or_else(|_| ProgressStyle::default_bar())
                        .progress_chars("#>-"),
                );
                bar
            }
            Err(_) => {
                let bar = ProgressBar::new_spinner();
                bar.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner:.green} {msg} {bytes} ({bytes_per_sec})")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                bar.enable_steady_tick(Duration::from_millis(100));
                bar
            }
        };
        bar.set_message(self.label.clone());
        bar
    }
}
