//! FarmScope Core Library
//!
//! Aggregation and classification engine for portfolio-level farm
//! environmental metrics: filtering, metric averages, risk buckets,
//! verification-weighted data quality and per-region rollups.

pub mod aggregate;
pub mod config;
pub mod controller;
pub mod domain;
pub mod engine;
pub mod filter;
pub mod indicators;
pub mod metrics;
pub mod obs;
pub mod provider;
pub mod risk;
pub mod rollup;
pub mod rows;
pub mod telemetry;
pub mod verification;

pub use domain::{
    EngineError, Farm, FarmMetrics, FarmRecord, FarmSnapshot, RecordFault, Region, Result,
    RiskCategory, RiskScores, SnapshotLoad, SnapshotVersion, VerificationDomain,
    VerificationStatus, VerificationTier,
};

pub use aggregate::{aggregate_metrics, MetricsSummary, RunningMean};
pub use config::EngineConfig;
pub use controller::{CacheStats, PortfolioController, RefreshOutcome};
pub use engine::{aggregate_subset, compute_aggregate, AggregateResult};
pub use filter::{filter_farms, FarmSubset, FilterCriteria, RegionSelection, ALL_REGIONS};
pub use indicators::{
    tnfd_indicators, BiodiversityStatus, IndicatorReport, TargetStatus, TnfdIndicator,
    WaterUsageBenchmark,
};
pub use provider::{FarmRecordProvider, JsonFileProvider, StaticProvider};
pub use risk::{
    classify, risk_distribution, FarmRiskProfile, RiskBucket, RiskDistribution, HIGH_RISK_FLOOR,
    MEDIUM_RISK_FLOOR,
};
pub use rollup::{regional_rollup, RegionalRollupEntry};
pub use rows::{farm_rows, FarmRow, FarmRowPage, TierBadge};
pub use verification::{
    score_verification, verification_distribution, VerificationDistribution, VerificationScore,
};

pub use metrics::METRICS;
pub use obs::{
    emit_aggregate_cache_hit, emit_aggregate_computed, emit_record_rejected,
    emit_rollup_computed, emit_snapshot_loaded, emit_snapshot_swapped, SnapshotSpan,
};
pub use telemetry::init_tracing;

/// FarmScope version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
