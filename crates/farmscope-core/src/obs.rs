//! Structured observability hooks for snapshot and aggregation lifecycle events.
//!
//! Events are emitted at `info!` level, except rejected records (`warn!`) and
//! cache hits (`debug!`). Filter with `RUST_LOG`.

use tracing::{debug, info, warn};

use crate::domain::{RecordFault, SnapshotVersion};
use crate::filter::FilterCriteria;

/// RAII guard that enters a snapshot-scoped tracing span.
///
/// ```ignore
/// let _span = SnapshotSpan::enter(snapshot.version());
/// // every event below carries snapshot = <short version>
/// ```
pub struct SnapshotSpan {
    _span: tracing::span::EnteredSpan,
}

impl SnapshotSpan {
    pub fn enter(version: &SnapshotVersion) -> Self {
        let span = tracing::info_span!("farmscope.snapshot", snapshot = %version.short());
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: a snapshot was built from provider records.
pub fn emit_snapshot_loaded(version: &SnapshotVersion, accepted: usize, rejected: usize) {
    info!(
        event = "snapshot.loaded",
        snapshot = %version.short(),
        accepted = accepted,
        rejected = rejected,
    );
}

/// Emit event: the controller swapped to a new snapshot.
pub fn emit_snapshot_swapped(previous: &SnapshotVersion, current: &SnapshotVersion, farms: usize) {
    info!(
        event = "snapshot.swapped",
        previous = %previous.short(),
        current = %current.short(),
        farms = farms,
    );
}

/// Emit event: a record was excluded from a snapshot (warning level).
pub fn emit_record_rejected(fault: &RecordFault) {
    warn!(
        event = "record.rejected",
        index = fault.index,
        farm_id = %fault.farm_id,
        error = %fault.error,
    );
}

/// Emit event: an aggregate was computed (cache miss).
pub fn emit_aggregate_computed(criteria: &FilterCriteria, total_farms: usize, empty: bool) {
    info!(
        event = "aggregate.computed",
        region = %criteria.region,
        search = %criteria.search_text,
        total_farms = total_farms,
        empty = empty,
    );
}

/// Emit event: an aggregate was served from the cache.
pub fn emit_aggregate_cache_hit(criteria: &FilterCriteria) {
    debug!(
        event = "aggregate.cache_hit",
        region = %criteria.region,
        search = %criteria.search_text,
    );
}

/// Emit event: regional rollup computed for a snapshot.
pub fn emit_rollup_computed(version: &SnapshotVersion, regions_with_data: usize) {
    info!(
        event = "rollup.computed",
        snapshot = %version.short(),
        regions_with_data = regions_with_data,
    );
}
