//! Progress provider that records every report

use hashforge_core::{ProgressPhase, ProgressProvider, ProgressUpdate};
use std::sync::{Arc, Mutex};

/// Captures progress updates for later assertions
///
/// Clones share the same log, so a clone can be handed to a driver while the
/// test keeps the original.
#[derive(Debug, Clone, Default)]
pub struct RecordingProgress {
    updates: Arc<Mutex<Vec<ProgressUpdate>>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<ProgressUpdate> {
        self.updates.lock().unwrap().clone()
    }

    pub fn phases(&self) -> Vec<ProgressPhase> {
        self.updates().iter().map(|u| u.phase).collect()
    }

    pub fn count(&self, phase: ProgressPhase) -> usize {
        self.updates().iter().filter(|u| u.phase == phase).count()
    }

    /// Check the Started, Processing*, Finished shape
    pub fn is_well_formed(&self) -> bool {
        let phases = self.phases();
        let (Some(first), Some(last)) = (phases.first(), phases.last()) else {
            return false;
        };
        phases.len() >= 2
            && *first == ProgressPhase::Started
            && *last == ProgressPhase::Finished
            && phases[1..phases.len() - 1]
                .iter()
                .all(|p| *p == ProgressPhase::Processing)
    }

    pub fn clear(&self) {
        self.updates.lock().unwrap().clear();
    }
}

impl ProgressProvider for RecordingProgress {
    fn report(&self, total: i64, current: i64, phase: ProgressPhase) {
        self.updates.lock().unwrap().push(ProgressUpdate {
            total,
            current,
            phase,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_sequence() {
        let recorder = RecordingProgress::new();
        assert!(!recorder.is_well_formed());

        recorder.report(3, 0, ProgressPhase::Started);
        recorder.report(3, 3, ProgressPhase::Processing);
        recorder.report(3, 3, ProgressPhase::Finished);
        assert!(recorder.is_well_formed());
        assert_eq!(recorder.count(ProgressPhase::Processing), 1);
    }

    #[test]
    fn test_clones_share_log() {
        let recorder = RecordingProgress::new();
        recorder.clone().report(1, 0, ProgressPhase::Started);
        assert_eq!(recorder.updates().len(), 1);
    }
}
