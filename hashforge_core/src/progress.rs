//! Progress reporting abstractions
//!
//! The drivers report progress through [`ProgressProvider`] without knowing
//! anything about how it is displayed. Every driver call produces exactly one
//! [`ProgressPhase::Started`], zero or more [`ProgressPhase::Processing`], and
//! exactly one [`ProgressPhase::Finished`], including when the call fails.

use std::sync::{Arc, Mutex, PoisonError};

/// Position of a report within one driver call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressPhase {
    Started,
    Processing,
    Finished,
}

/// A single progress report
///
/// `total` is -1 when the input size is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub total: i64,
    pub current: i64,
    pub phase: ProgressPhase,
}

impl ProgressUpdate {
    /// Completion ratio in percent, when the total is known
    pub fn percentage(&self) -> Option<f64> {
        if self.total > 0 {
            Some(self.current as f64 / self.total as f64 * 100.0)
        } else if self.total == 0 {
            Some(100.0)
        } else {
            None
        }
    }
}

/// Core trait for progress reporting
///
/// Implementations must not panic; they are called from inside the read
/// loop and from drop glue.
pub trait ProgressProvider: Send + Sync {
    fn report(&self, total: i64, current: i64, phase: ProgressPhase);
}

impl<F> ProgressProvider for F
where
    F: Fn(i64, i64, ProgressPhase) + Send + Sync,
{
    fn report(&self, total: i64, current: i64, phase: ProgressPhase) {
        self(total, current, phase)
    }
}

/// Null implementation for when no progress is needed
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProvider;

impl ProgressProvider for NullProvider {
    fn report(&self, _total: i64, _current: i64, _phase: ProgressPhase) {}
}

/// Arc-wrapped provider for sharing across tasks
#[derive(Clone)]
pub struct SharedProvider {
    inner: Arc<dyn ProgressProvider>,
}

impl SharedProvider {
    pub fn new(provider: Arc<dyn ProgressProvider>) -> Self {
        Self { inner: provider }
    }
}

impl ProgressProvider for SharedProvider {
    fn report(&self, total: i64, current: i64, phase: ProgressPhase) {
        self.inner.report(total, current, phase);
    }
}

/// Writes each report to the `log` facade at trace level
#[derive(Debug, Clone)]
pub struct LogProvider {
    label: String,
}

impl LogProvider {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl ProgressProvider for LogProvider {
    fn report(&self, total: i64, current: i64, phase: ProgressPhase) {
        match phase {
            ProgressPhase::Processing => {
                log::trace!("{}: {current}/{total} bytes", self.label)
            }
            _ => log::debug!("{}: {phase:?} ({current}/{total} bytes)", self.label),
        }
    }
}

/// Forwards reports into a tokio channel
///
/// Sends never block; updates are dropped when the channel is full or the
/// receiver is gone. Call [`complete`](Self::complete) to close the channel
/// from the sending side.
pub struct ChannelAdapter {
    tx: Mutex<Option<tokio::sync::mpsc::Sender<ProgressUpdate>>>,
}

impl ChannelAdapter {
    pub fn new(tx: tokio::sync::mpsc::Sender<ProgressUpdate>) -> Self {
        Self {
            tx: Mutex::new(Some(tx)),
        }
    }

    /// Drop the sender so the receiver sees the channel close
    pub fn complete(&self) {
        let mut guard = self.tx.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
    }
}

impl ProgressProvider for ChannelAdapter {
    fn report(&self, total: i64, current: i64, phase: ProgressPhase) {
        let guard = self.tx.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(tx) = guard.as_ref() {
            let _ = tx.try_send(ProgressUpdate {
                total,
                current,
                phase,
            });
        }
    }
}

/// Guarantees the Started/Finished pairing for one driver call
///
/// Reports `Started` on construction and `Finished` when dropped, so early
/// returns through `?` still close the sequence.
pub(crate) struct ProgressGuard<'a> {
    provider: Option<&'a dyn ProgressProvider>,
    total: i64,
    current: i64,
}

impl<'a> ProgressGuard<'a> {
    pub(crate) fn start(provider: Option<&'a dyn ProgressProvider>, total: i64) -> Self {
        if let Some(p) = provider {
            p.report(total, 0, ProgressPhase::Started);
        }
        Self {
            provider,
            total,
            current: 0,
        }
    }

    /// Report the running byte count
    pub(crate) fn advance(&mut self, current: u64) {
        self.current = clamp_i64(current);
        if let Some(p) = self.provider {
            p.report(self.total, self.current, ProgressPhase::Processing);
        }
    }
}

impl Drop for ProgressGuard<'_> {
    fn drop(&mut self) {
        if let Some(p) = self.provider {
            p.report(self.total, self.current, ProgressPhase::Finished);
        }
    }
}

/// Convert a byte count to the signed progress scale
pub(crate) fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test provider that captures progress updates
    #[derive(Default)]
    struct TestProvider {
        updates: Mutex<Vec<ProgressUpdate>>,
    }

    impl TestProvider {
        fn phases(&self) -> Vec<ProgressPhase> {
            self.updates.lock().unwrap().iter().map(|u| u.phase).collect()
        }
    }

    impl ProgressProvider for TestProvider {
        fn report(&self, total: i64, current: i64, phase: ProgressPhase) {
            self.updates.lock().unwrap().push(ProgressUpdate {
                total,
                current,
                phase,
            });
        }
    }

    #[test]
    fn test_null_provider() {
        let provider = NullProvider;
        provider.report(10, 5, ProgressPhase::Processing);
    }

    #[test]
    fn test_closure_provider() {
        let seen = Mutex::new(Vec::new());
        let provider = |total: i64, current: i64, phase: ProgressPhase| {
            seen.lock().unwrap().push((total, current, phase));
        };
        provider.report(4, 2, ProgressPhase::Processing);
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &[(4, 2, ProgressPhase::Processing)]
        );
    }

    #[test]
    fn test_guard_reports_finished_on_drop() {
        let provider = TestProvider::default();
        {
            let mut guard = ProgressGuard::start(Some(&provider), 100);
            guard.advance(40);
            guard.advance(100);
        }
        assert_eq!(
            provider.phases(),
            vec![
                ProgressPhase::Started,
                ProgressPhase::Processing,
                ProgressPhase::Processing,
                ProgressPhase::Finished
            ]
        );
        let last = *provider.updates.lock().unwrap().last().unwrap();
        assert_eq!(last.current, 100);
    }

    #[test]
    fn test_guard_finishes_on_early_return() {
        fn fails(provider: &dyn ProgressProvider) -> Result<(), ()> {
            let mut guard = ProgressGuard::start(Some(provider), -1);
            guard.advance(8);
            Err(())
        }

        let provider = TestProvider::default();
        assert!(fails(&provider).is_err());
        assert_eq!(provider.phases().last(), Some(&ProgressPhase::Finished));
        assert_eq!(provider.updates.lock().unwrap()[0].total, -1);
    }

    #[test]
    fn test_shared_provider() {
        let inner = Arc::new(TestProvider::default());
        let shared = SharedProvider::new(inner.clone());
        shared.clone().report(1, 1, ProgressPhase::Finished);
        assert_eq!(inner.phases(), vec![ProgressPhase::Finished]);
    }

    #[tokio::test]
    async fn test_channel_adapter() {
        let (tx, mut rx) = tokio::sync::mpsc::channel(8);
        let adapter = ChannelAdapter::new(tx);

        adapter.report(10, 0, ProgressPhase::Started);
        adapter.complete();
        adapter.report(10, 10, ProgressPhase::Finished);

        let first = rx.recv().await.unwrap();
        assert_eq!(first.phase, ProgressPhase::Started);
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn test_log_provider_accepts_every_phase() {
        let provider = LogProvider::new("input.bin");
        provider.report(-1, 0, ProgressPhase::Started);
        provider.report(-1, 512, ProgressPhase::Processing);
        provider.report(-1, 512, ProgressPhase::Finished);
    }

    #[test]
    fn test_percentage() {
        let update = ProgressUpdate {
            total: 200,
            current: 50,
            phase: ProgressPhase::Processing,
        };
        assert_eq!(update.percentage(), Some(25.0));

        let unknown = ProgressUpdate { total: -1, ..update };
        assert_eq!(unknown.percentage(), None);
    }
}
