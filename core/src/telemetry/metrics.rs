use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Counters for one antenna system.
pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub received: usize,
    pub evaluated: usize,
    pub fired: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_received(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.received += 1;
        }
    }

    pub fn record_evaluation(&self, fired: bool) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.evaluated += 1;
            if fired {
                metrics.fired += 1;
            }
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_evaluations_and_hits() {
        let recorder = MetricsRecorder::new();
        recorder.record_received();
        recorder.record_evaluation(true);
        recorder.record_evaluation(false);
        assert_eq!(
            recorder.snapshot(),
            MetricsSnapshot {
                received: 1,
                evaluated: 2,
                fired: 1
            }
        );
    }
}
