//! Global atomic counters for FarmScope observability.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single
//! `tracing::info!` event (e.g. when a CLI command finishes).

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

/// Lightweight atomic counters with no allocation or locking.
pub struct Metrics {
    aggregations_computed: AtomicU64,
    cache_hits: AtomicU64,
    records_rejected: AtomicU64,
    snapshots_loaded: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            aggregations_computed: AtomicU64::new(0),
            cache_hits: AtomicU64::new(0),
            records_rejected: AtomicU64::new(0),
            snapshots_loaded: AtomicU64::new(0),
        }
    }

    pub fn inc_aggregations(&self) {
        self.aggregations_computed.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "aggregations_computed", "counter incremented");
    }

    pub fn inc_cache_hits(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "cache_hits", "counter incremented");
    }

    pub fn add_records_rejected(&self, count: u64) {
        self.records_rejected.fetch_add(count, Ordering::Relaxed);
        tracing::trace!(metric = "records_rejected", count, "counter incremented");
    }

    pub fn inc_snapshots_loaded(&self) {
        self.snapshots_loaded.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "snapshots_loaded", "counter incremented");
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            aggregations_computed = self.aggregations_computed(),
            cache_hits = self.cache_hits(),
            records_rejected = self.records_rejected(),
            snapshots_loaded = self.snapshots_loaded(),
        );
    }

    pub fn aggregations_computed(&self) -> u64 {
        self.aggregations_computed.load(Ordering::Relaxed)
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn records_rejected(&self) -> u64 {
        self.records_rejected.load(Ordering::Relaxed)
    }

    pub fn snapshots_loaded(&self) -> u64 {
        self.snapshots_loaded.load(Ordering::Relaxed)
    }

    /// Reset all counters to zero (useful in tests).
    pub fn reset(&self) {
        self.aggregations_computed.store(0, Ordering::Relaxed);
        self.cache_hits.store(0, Ordering::Relaxed);
        self.records_rejected.store(0, Ordering::Relaxed);
        self.snapshots_loaded.store(0, Ordering::Relaxed);
    }
}
