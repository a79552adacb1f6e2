/// Point-in-time copy of [`LfuMetrics`](super::metrics_impl::LfuMetrics) plus gauges.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LfuMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,

    pub put_calls: u64,
    pub put_new: u64,
    pub put_updates: u64,
    pub put_rejected: u64,

    pub evict_calls: u64,
    pub evicted_entries: u64,

    pub frequency_calls: u64,
    pub frequency_found: u64,
    pub peek_calls: u64,
    pub peek_found: u64,
    pub iter_calls: u64,

    // gauges captured at snapshot time
    pub cache_len: usize,
    pub capacity: usize,
    pub bucket_count: usize,
}

impl LfuMetricsSnapshot {
    /// Fraction of `get` calls that hit, or `0.0` before the first call.
    pub fn hit_rate(&self) -> f64 {
        if self.get_calls == 0 {
            0.0
        } else {
            self.get_hits as f64 / self.get_calls as f64
        }
    }
}
