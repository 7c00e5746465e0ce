use serde::Serialize;
use std::sync::Mutex;

/// Counters accumulated across the life of one refresh controller.
pub struct MetricsRecorder {
    inner: Mutex<Counters>,
}

struct Counters {
    refreshes: usize,
    decode_failures: usize,
    rows_normalized: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub refreshes: usize,
    pub decode_failures: usize,
    pub rows_normalized: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Counters {
                refreshes: 0,
                decode_failures: 0,
                rows_normalized: 0,
            }),
        }
    }

    pub fn record_refresh(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.refreshes += 1;
        }
    }

    pub fn record_decode_failure(&self) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.decode_failures += 1;
        }
    }

    pub fn record_rows(&self, count: usize) {
        if let Ok(mut counters) = self.inner.lock() {
            counters.rows_normalized += count;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(counters) = self.inner.lock() {
            MetricsSnapshot {
                refreshes: counters.refreshes,
                decode_failures: counters.decode_failures,
                rows_normalized: counters.rows_normalized,
            }
        } else {
            MetricsSnapshot {
                refreshes: 0,
                decode_failures: 0,
                rows_normalized: 0,
            }
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
