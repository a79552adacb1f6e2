use std::io::Write;
use std::sync::{Mutex, PoisonError};

use crate::metrics::snapshot::LfuMetricsSnapshot;
use crate::metrics::traits::MetricsExporter;

/// Prometheus text exporter for LFU metrics snapshots.
///
/// Writes the Prometheus text exposition format to any writer, so the output
/// can be served by a scrape endpoint or forwarded to a collector.
///
/// ```
/// use lfukit::metrics::exporter::PrometheusTextExporter;
/// use lfukit::metrics::snapshot::LfuMetricsSnapshot;
/// use lfukit::metrics::traits::MetricsExporter;
///
/// let exporter = PrometheusTextExporter::new("lfu", Vec::new());
/// exporter.export(&LfuMetricsSnapshot { get_hits: 3, ..Default::default() });
/// let text = String::from_utf8(exporter.into_inner()).unwrap();
/// assert!(text.contains("lfu_get_hits_total 3"));
/// ```
#[derive(Debug)]
pub struct PrometheusTextExporter<W: Write + Send> {
    prefix: String,
    writer: Mutex<W>,
}

impl<W: Write + Send> PrometheusTextExporter<W> {
    pub fn new(prefix: impl Into<String>, writer: W) -> Self {
        Self {
            prefix: prefix.into(),
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the exporter and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_sample(&self, kind: &str, name: &str, value: u64) {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(writer, "# TYPE {} {}", name, kind);
        let _ = writeln!(writer, "{} {}", name, value);
    }

    fn write_counter(&self, suffix: &str, value: u64) {
        self.write_sample("counter", &self.metric_name(suffix), value);
    }

    fn write_gauge(&self, suffix: &str, value: usize) {
        self.write_sample("gauge", &self.metric_name(suffix), value as u64);
    }

    fn metric_name(&self, suffix: &str) -> String {
        if self.prefix.is_empty() {
            suffix.to_string()
        } else {
            format!("{}_{}", self.prefix, suffix)
        }
    }
}

impl<W: Write + Send> MetricsExporter<LfuMetricsSnapshot> for PrometheusTextExporter<W> {
    fn export(&self, snapshot: &LfuMetricsSnapshot) {
        self.write_counter("get_calls_total", snapshot.get_calls);
        self.write_counter("get_hits_total", snapshot.get_hits);
        self.write_counter("get_misses_total", snapshot.get_misses);
        self.write_counter("put_calls_total", snapshot.put_calls);
        self.write_counter("put_new_total", snapshot.put_new);
        self.write_counter("put_updates_total", snapshot.put_updates);
        self.write_counter("put_rejected_total", snapshot.put_rejected);
        self.write_counter("evict_calls_total", snapshot.evict_calls);
        self.write_counter("evicted_entries_total", snapshot.evicted_entries);
        self.write_counter("frequency_calls_total", snapshot.frequency_calls);
        self.write_counter("frequency_found_total", snapshot.frequency_found);
        self.write_counter("peek_calls_total", snapshot.peek_calls);
        self.write_counter("peek_found_total", snapshot.peek_found);
        self.write_counter("iter_calls_total", snapshot.iter_calls);
        self.write_gauge("cache_len", snapshot.cache_len);
        self.write_gauge("capacity", snapshot.capacity);
        self.write_gauge("bucket_count", snapshot.bucket_count);
    }
}
