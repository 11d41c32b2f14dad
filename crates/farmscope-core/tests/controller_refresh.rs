use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use farmscope_core::{
    EngineConfig, EngineError, FarmRecord, FarmRecordProvider, FarmSnapshot, FilterCriteria,
    JsonFileProvider, PortfolioController, Region, Result, StaticProvider,
};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/portfolio.json");

/// Provider that always fails, counting how often it was asked.
struct UnreachableProvider {
    calls: AtomicUsize,
}

#[async_trait]
impl FarmRecordProvider for UnreachableProvider {
    async fn fetch_records(&self) -> Result<Vec<FarmRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(EngineError::Provider("farm registry unreachable".to_string()))
    }
}

async fn loaded_controller() -> PortfolioController {
    let controller = PortfolioController::new(
        FarmSnapshot::empty(),
        EngineConfig::default().with_row_limit(4),
    );
    let outcome = controller
        .refresh(&JsonFileProvider::new(FIXTURE))
        .await
        .unwrap();
    assert!(outcome.changed);
    assert_eq!(outcome.accepted, 6);
    controller
}

#[tokio::test]
async fn refresh_swaps_in_fixture() {
    let controller = loaded_controller().await;
    assert_eq!(controller.snapshot().len(), 6);
    assert_eq!(controller.aggregate(&FilterCriteria::all()).total_farms, 6);
}

#[tokio::test]
async fn refresh_with_identical_content_is_unchanged() {
    let controller = loaded_controller().await;
    controller.aggregate(&FilterCriteria::all());

    let outcome = controller
        .refresh(&JsonFileProvider::new(FIXTURE))
        .await
        .unwrap();
    assert!(!outcome.changed);
    assert_eq!(outcome.version, controller.version());
    assert_eq!(controller.cache_stats().entries, 1);
}

#[tokio::test]
async fn provider_failure_keeps_active_snapshot() {
    let controller = loaded_controller().await;
    let before = controller.version();
    let provider = UnreachableProvider {
        calls: AtomicUsize::new(0),
    };

    let err = controller.refresh(&provider).await.unwrap_err();
    assert!(matches!(err, EngineError::Provider(_)));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    assert_eq!(controller.version(), before);
}

#[tokio::test]
async fn refresh_reports_faults_and_keeps_good_records() {
    let controller = loaded_controller().await;
    let mut records: Vec<FarmRecord> = controller
        .snapshot()
        .farms()
        .iter()
        .map(FarmRecord::from)
        .collect();
    records[2]
        .verification_status
        .insert("water".to_string(), "DIAMOND".to_string());

    let outcome = controller
        .refresh(&StaticProvider::new(records))
        .await
        .unwrap();
    assert!(outcome.changed);
    assert_eq!(outcome.accepted, 5);
    assert_eq!(outcome.faults.len(), 1);
    assert_eq!(outcome.faults[0].farm_id, "FARM-003");
    assert!(controller.farm_profile("FARM-003").is_err());
}

#[tokio::test]
async fn swap_invalidates_cached_aggregates() {
    let controller = loaded_controller().await;
    let wales = FilterCriteria::all().with_region(Region::Wales);
    assert_eq!(controller.aggregate(&wales).total_farms, 2);

    let scotland_only: Vec<FarmRecord> = controller
        .snapshot()
        .farms()
        .iter()
        .filter(|f| f.region == Region::Scotland)
        .map(FarmRecord::from)
        .collect();
    controller
        .refresh(&StaticProvider::new(scotland_only))
        .await
        .unwrap();

    assert_eq!(controller.aggregate(&wales).total_farms, 0);
    assert!(controller.aggregate(&wales).avg_metrics.is_none());
}

#[tokio::test]
async fn readers_keep_their_snapshot_across_a_swap() {
    let controller = loaded_controller().await;
    let held = controller.snapshot();

    controller.replace_snapshot(FarmSnapshot::empty());
    assert_eq!(held.len(), 6);
    assert!(controller.snapshot().is_empty());
}

#[tokio::test]
async fn farm_rows_honour_row_limit() {
    let controller = loaded_controller().await;
    let page = controller.farm_rows(&FilterCriteria::all());
    assert_eq!(page.rows.len(), 4);
    assert_eq!(page.total_matched, 6);
    assert!(page.truncated);

    let page = controller.farm_rows(&FilterCriteria::all().with_search("valley"));
    assert_eq!(page.rows.len(), 1);
    assert!(!page.truncated);
}

#[tokio::test]
async fn rollup_is_shared_across_filters() {
    let controller = loaded_controller().await;
    let first = controller.regional_rollup();
    controller.aggregate(&FilterCriteria::all().with_region(Region::Midlands));
    let second = controller.regional_rollup();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(first.iter().all(|entry| entry.has_data()));
}

#[tokio::test]
async fn controller_is_shareable_across_tasks() {
    let controller = Arc::new(loaded_controller().await);
    let mut handles = Vec::new();
    for region in Region::ALL {
        let controller = Arc::clone(&controller);
        handles.push(tokio::spawn(async move {
            controller
                .aggregate(&FilterCriteria::all().with_region(region))
                .total_farms
        }));
    }

    let mut total = 0;
    for handle in handles {
        total += handle.await.unwrap();
    }
    assert_eq!(total, 6);
}
