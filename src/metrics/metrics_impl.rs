use crate::metrics::cell::MetricsCell;
use crate::metrics::traits::{CoreMetricsRecorder, LfuMetricsReadRecorder, LfuMetricsRecorder};

/// Live counters owned by an [`LfuCache`](crate::policy::lfu::LfuCache).
#[derive(Debug, Default, Clone)]
pub struct LfuMetrics {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub put_calls: u64,
    pub put_new: u64,
    pub put_updates: u64,
    pub put_rejected: u64,
    pub evict_calls: u64,
    pub evicted_entries: u64,
    pub frequency_calls: MetricsCell,
    pub frequency_found: MetricsCell,
    pub peek_calls: MetricsCell,
    pub peek_found: MetricsCell,
    pub iter_calls: MetricsCell,
}

impl CoreMetricsRecorder for LfuMetrics {
    fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }

    fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }

    fn record_put_call(&mut self) {
        self.put_calls += 1;
    }

    fn record_put_new(&mut self) {
        self.put_new += 1;
    }

    fn record_put_update(&mut self) {
        self.put_updates += 1;
    }

    fn record_evict_call(&mut self) {
        self.evict_calls += 1;
    }

    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }
}

impl LfuMetricsRecorder for LfuMetrics {
    fn record_put_rejected(&mut self) {
        self.put_rejected += 1;
    }
}

impl LfuMetricsReadRecorder for LfuMetrics {
    fn record_frequency_call(&self) {
        self.frequency_calls.incr();
    }

    fn record_frequency_found(&self) {
        self.frequency_found.incr();
    }

    fn record_peek_call(&self) {
        self.peek_calls.incr();
    }

    fn record_peek_found(&self) {
        self.peek_found.incr();
    }

    fn record_iter_call(&self) {
        self.iter_calls.incr();
    }
}
