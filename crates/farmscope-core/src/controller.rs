//! Portfolio controller: the single owner of the active snapshot.
//!
//! Readers clone the current `Arc<FarmSnapshot>` once per call, so every
//! answer is computed against exactly one snapshot version. Refresh builds a
//! complete new snapshot off to the side and swaps it in whole.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use serde::Serialize;

use crate::config::EngineConfig;
use crate::domain::{EngineError, FarmSnapshot, RecordFault, Result, SnapshotVersion};
use crate::engine::{aggregate_subset, AggregateResult};
use crate::filter::{filter_farms, FilterCriteria};
use crate::indicators::IndicatorReport;
use crate::metrics::METRICS;
use crate::obs;
use crate::provider::FarmRecordProvider;
use crate::risk::FarmRiskProfile;
use crate::rollup::{regional_rollup, RegionalRollupEntry};
use crate::rows::{farm_rows, FarmRowPage};

type CacheKey = (SnapshotVersion, FilterCriteria);

/// Bounded FIFO memo of aggregates.
#[derive(Debug)]
struct AggregateCache {
    capacity: usize,
    order: VecDeque<CacheKey>,
    entries: HashMap<CacheKey, Arc<AggregateResult>>,
    hits: u64,
    misses: u64,
}

impl AggregateCache {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity),
            entries: HashMap::with_capacity(capacity),
            hits: 0,
            misses: 0,
        }
    }

    fn get(&mut self, key: &CacheKey) -> Option<Arc<AggregateResult>> {
        let found = self.entries.get(key).cloned();
        match found {
            Some(_) => self.hits += 1,
            None => self.misses += 1,
        }
        found
    }

    fn insert(&mut self, key: CacheKey, value: Arc<AggregateResult>) {
        if self.capacity == 0 || self.entries.contains_key(&key) {
            return;
        }
        while self.order.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, value);
    }

    /// Drop every entry not computed against `current`.
    fn retain_version(&mut self, current: &SnapshotVersion) {
        self.order.retain(|(version, _)| version == current);
        self.entries.retain(|(version, _), _| version == current);
    }
}

/// Snapshot of the aggregate cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Result of [`PortfolioController::refresh`].
#[derive(Debug)]
pub struct RefreshOutcome {
    pub version: SnapshotVersion,
    pub accepted: usize,
    pub faults: Vec<RecordFault>,
    /// The new snapshot differs from the one it replaced.
    pub changed: bool,
}

/// Owns the active snapshot and memoizes derived views of it.
#[derive(Debug)]
pub struct PortfolioController {
    config: EngineConfig,
    snapshot: RwLock<Arc<FarmSnapshot>>,
    aggregates: Mutex<AggregateCache>,
    rollup: Mutex<Option<(SnapshotVersion, Arc<Vec<RegionalRollupEntry>>)>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Cache entries are inserted whole, so a poisoned lock still guards
    // consistent data.
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PortfolioController {
    pub fn new(snapshot: FarmSnapshot, config: EngineConfig) -> Self {
        Self {
            aggregates: Mutex::new(AggregateCache::new(config.cache_capacity)),
            rollup: Mutex::new(None),
            snapshot: RwLock::new(Arc::new(snapshot)),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The snapshot currently in effect.
    pub fn snapshot(&self) -> Arc<FarmSnapshot> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn version(&self) -> SnapshotVersion {
        self.snapshot().version().clone()
    }

    /// Swap in `next`. Returns `false` when it has the same version as the
    /// active snapshot, in which case nothing changes.
    pub fn replace_snapshot(&self, next: FarmSnapshot) -> bool {
        let next = Arc::new(next);
        let previous = {
            let mut active = self.snapshot.write().unwrap_or_else(PoisonError::into_inner);
            if active.version() == next.version() {
                return false;
            }
            std::mem::replace(&mut *active, Arc::clone(&next))
        };

        lock(&self.aggregates).retain_version(next.version());
        {
            let mut rollup = lock(&self.rollup);
            if rollup.as_ref().is_some_and(|(v, _)| v != next.version()) {
                *rollup = None;
            }
        }

        obs::emit_snapshot_swapped(previous.version(), next.version(), next.len());
        true
    }

    /// Fetch records from `provider`, build a snapshot and swap it in.
    ///
    /// Faulty records are reported in the outcome and skipped. A provider
    /// failure leaves the active snapshot untouched.
    pub async fn refresh(&self, provider: &dyn FarmRecordProvider) -> Result<RefreshOutcome> {
        let records = provider.fetch_records().await?;
        let load = FarmSnapshot::from_records(records)?;
        let _span = obs::SnapshotSpan::enter(load.snapshot.version());

        for fault in &load.faults {
            obs::emit_record_rejected(fault);
        }
        METRICS.add_records_rejected(load.faults.len() as u64);
        METRICS.inc_snapshots_loaded();
        obs::emit_snapshot_loaded(load.snapshot.version(), load.snapshot.len(), load.faults.len());

        let version = load.snapshot.version().clone();
        let accepted = load.snapshot.len();
        let changed = self.replace_snapshot(load.snapshot);

        Ok(RefreshOutcome {
            version,
            accepted,
            faults: load.faults,
            changed,
        })
    }

    /// Aggregate for `criteria` over the active snapshot, memoized.
    pub fn aggregate(&self, criteria: &FilterCriteria) -> Arc<AggregateResult> {
        let snapshot = self.snapshot();
        let key = (snapshot.version().clone(), criteria.clone());

        if let Some(hit) = lock(&self.aggregates).get(&key) {
            METRICS.inc_cache_hits();
            obs::emit_aggregate_cache_hit(criteria);
            return hit;
        }

        let result = Arc::new(aggregate_subset(&filter_farms(snapshot.farms(), criteria)));
        METRICS.inc_aggregations();
        obs::emit_aggregate_computed(criteria, result.total_farms, result.is_empty());

        lock(&self.aggregates).insert(key, Arc::clone(&result));
        result
    }

    /// Per-region rollup over the whole active snapshot.
    ///
    /// Independent of any filter; computed once per snapshot version.
    pub fn regional_rollup(&self) -> Arc<Vec<RegionalRollupEntry>> {
        let snapshot = self.snapshot();
        let mut cached = lock(&self.rollup);
        if let Some((version, entries)) = cached.as_ref() {
            if version == snapshot.version() {
                return Arc::clone(entries);
            }
        }

        let entries = Arc::new(regional_rollup(snapshot.farms()));
        let with_data = entries.iter().filter(|e| e.has_data()).count();
        obs::emit_rollup_computed(snapshot.version(), with_data);
        *cached = Some((snapshot.version().clone(), Arc::clone(&entries)));
        entries
    }

    /// First `row_limit` table rows for `criteria`.
    pub fn farm_rows(&self, criteria: &FilterCriteria) -> FarmRowPage {
        let snapshot = self.snapshot();
        farm_rows(&filter_farms(snapshot.farms(), criteria), self.config.row_limit)
    }

    pub fn farm_profile(&self, farm_id: &str) -> Result<FarmRiskProfile> {
        let snapshot = self.snapshot();
        snapshot
            .get(farm_id)
            .map(FarmRiskProfile::of)
            .ok_or_else(|| EngineError::FarmNotFound(farm_id.to_string()))
    }

    /// Indicator panels for `criteria`; `None` when nothing matches.
    pub fn indicators(&self, criteria: &FilterCriteria) -> Option<IndicatorReport> {
        IndicatorReport::from_aggregate(&self.aggregate(criteria))
    }

    pub fn cache_stats(&self) -> CacheStats {
        let cache = lock(&self.aggregates);
        CacheStats {
            hits: cache.hits,
            misses: cache.misses,
            entries: cache.entries.len(),
        }
    }
}

impl Default for PortfolioController {
    fn default() -> Self {
        Self::new(FarmSnapshot::empty(), EngineConfig::default())
    }
}
