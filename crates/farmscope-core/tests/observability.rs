//! Observability tests for snapshot and aggregation tracing.
//!
//! These tests verify that structured tracing events are emitted for the
//! snapshot lifecycle and for aggregate computation.

use farmscope_core::{
    emit_aggregate_cache_hit, emit_aggregate_computed, emit_record_rejected, emit_rollup_computed,
    emit_snapshot_loaded, emit_snapshot_swapped, EngineConfig, EngineError, FarmSnapshot,
    FilterCriteria, PortfolioController, RecordFault, Region, SnapshotSpan,
};
use tracing_test::traced_test;

#[traced_test]
#[test]
fn test_emit_snapshot_loaded_logs_counts() {
    let snapshot = FarmSnapshot::empty();
    emit_snapshot_loaded(snapshot.version(), 12, 3);
    assert!(logs_contain("snapshot.loaded"));
    assert!(logs_contain("rejected=3"));
}

#[traced_test]
#[test]
fn test_emit_snapshot_swapped_logs_short_versions() {
    let snapshot = FarmSnapshot::empty();
    emit_snapshot_swapped(snapshot.version(), snapshot.version(), 0);
    assert!(logs_contain("snapshot.swapped"));
    assert!(logs_contain(snapshot.version().short()));
}

#[traced_test]
#[test]
fn test_emit_record_rejected_logs_warning() {
    let fault = RecordFault {
        index: 4,
        farm_id: "FARM-042".to_string(),
        error: EngineError::UnknownRegion {
            farm_id: "FARM-042".to_string(),
            value: "Atlantis".to_string(),
        },
    };
    emit_record_rejected(&fault);
    assert!(logs_contain("record.rejected"));
    assert!(logs_contain("FARM-042"));
    assert!(logs_contain("WARN"));
}

#[traced_test]
#[test]
fn test_emit_aggregate_events() {
    let criteria = FilterCriteria::all().with_region(Region::SouthWest);
    emit_aggregate_computed(&criteria, 7, false);
    emit_aggregate_cache_hit(&criteria);
    assert!(logs_contain("aggregate.computed"));
    assert!(logs_contain("aggregate.cache_hit"));
    assert!(logs_contain("South West"));
}

#[traced_test]
#[test]
fn test_emit_rollup_computed() {
    emit_rollup_computed(FarmSnapshot::empty().version(), 0);
    assert!(logs_contain("rollup.computed"));
}

#[traced_test]
#[test]
fn test_snapshot_span_enter_creates_span() {
    let snapshot = FarmSnapshot::empty();
    let span = SnapshotSpan::enter(snapshot.version());
    tracing::info!("inside snapshot span");
    drop(span);
    assert!(logs_contain("farmscope.snapshot"));
}

#[traced_test]
#[test]
fn test_controller_logs_miss_then_hit() {
    let controller = PortfolioController::new(FarmSnapshot::empty(), EngineConfig::default());
    let criteria = FilterCriteria::all();
    controller.aggregate(&criteria);
    controller.aggregate(&criteria);
    assert!(logs_contain("aggregate.computed"));
    assert!(logs_contain("aggregate.cache_hit"));
}
