//! # Metrics Trait Hierarchy
//!
//! ```text
//!              ┌─────────────────────────────┐
//!              │     CoreMetricsRecorder     │
//!              │  get_hit/get_miss/put       │
//!              │  evict                      │
//!              └──────────────┬──────────────┘
//!                             │
//!                             ▼
//!              ┌─────────────────────────────┐     ┌──────────────────────────┐
//!              │     LfuMetricsRecorder      │     │  LfuMetricsReadRecorder  │
//!              │  put_rejected               │     │  (&self: frequency/peek/ │
//!              └─────────────────────────────┘     │   iter)                  │
//!                                                  └──────────────────────────┘
//!
//!   Consumption (decoupled from recording):
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │    │ MetricsExporter<S>           │
//!   │ (bench/test)                 │    │ (production monitoring)      │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```

/// Common counters for any cache.
pub trait CoreMetricsRecorder {
    fn record_get_hit(&mut self);
    fn record_get_miss(&mut self);
    fn record_put_call(&mut self);
    fn record_put_new(&mut self);
    fn record_put_update(&mut self);
    fn record_evict_call(&mut self);
    fn record_evicted_entry(&mut self);
}

/// LFU-specific counters recorded from `&mut self` methods.
pub trait LfuMetricsRecorder: CoreMetricsRecorder {
    /// A new key was dropped because the cache has zero capacity.
    fn record_put_rejected(&mut self);
}

/// LFU counters recorded from `&self` methods (interior mutability).
pub trait LfuMetricsReadRecorder {
    fn record_frequency_call(&self);
    fn record_frequency_found(&self);
    fn record_peek_call(&self);
    fn record_peek_found(&self);
    fn record_iter_call(&self);
}

/// Produce a point-in-time snapshot of the counters.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Export/publish metrics to production monitoring backends.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
