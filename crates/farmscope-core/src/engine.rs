//! Composition of filter, metrics, risk and verification into one result.

use serde::{Deserialize, Serialize};

use crate::aggregate::aggregate_metrics;
use crate::domain::{EngineError, Farm, FarmMetrics, Result};
use crate::filter::{filter_farms, FarmSubset, FilterCriteria};
use crate::risk::{risk_distribution, RiskDistribution};
use crate::verification::{score_verification, VerificationDistribution};

/// Portfolio-level aggregate for one filtered subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub total_farms: usize,
    /// `None` marks an empty subset.
    pub avg_metrics: Option<FarmMetrics>,
    pub risk_distribution: RiskDistribution,
    pub verification_distribution: VerificationDistribution,
    /// `None` marks an empty subset.
    pub data_quality_percent: Option<u8>,
    pub total_milk_production: f64,
    pub total_hectares: f64,
}

impl AggregateResult {
    pub fn is_empty(&self) -> bool {
        self.total_farms == 0
    }

    /// Average metrics, or `EmptyResultSet`.
    pub fn averages(&self) -> Result<&FarmMetrics> {
        self.avg_metrics
            .as_ref()
            .ok_or(EngineError::EmptyResultSet {
                operation: "average metrics",
            })
    }

    /// Data-quality percentage, or `EmptyResultSet`.
    pub fn data_quality(&self) -> Result<u8> {
        self.data_quality_percent.ok_or(EngineError::EmptyResultSet {
            operation: "data quality score",
        })
    }
}

/// Aggregate an already-filtered subset.
pub fn aggregate_subset(subset: &FarmSubset<'_>) -> AggregateResult {
    let metrics = aggregate_metrics(subset);
    let verification = score_verification(subset);

    AggregateResult {
        total_farms: metrics.total_farms,
        avg_metrics: metrics.avg_metrics,
        risk_distribution: risk_distribution(subset),
        verification_distribution: verification.distribution,
        data_quality_percent: verification.data_quality_percent,
        total_milk_production: metrics.total_milk_production,
        total_hectares: metrics.total_hectares,
    }
}

/// Filter `farms` by `criteria` and aggregate the matching subset.
pub fn compute_aggregate(farms: &[Farm], criteria: &FilterCriteria) -> AggregateResult {
    aggregate_subset(&filter_farms(farms, criteria))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Region, RiskScores, VerificationStatus, VerificationTier};

    fn farm(id: &str, region: Region, risk: f64, tier: VerificationTier) -> Farm {
        Farm {
            id: id.to_string(),
            name: format!("Greenfield Farm {id}"),
            region,
            hectares: 100.0,
            milk_production: 1_000_000.0,
            verification_status: VerificationStatus::uniform(tier),
            metrics: FarmMetrics {
                water_usage: 120.0,
                ..FarmMetrics::default()
            },
            risk_scores: RiskScores::uniform(risk),
            last_updated: "2024-01-01T00:00:00Z".parse().unwrap(),
            schemes: Default::default(),
        }
    }

    #[test]
    fn test_compute_aggregate_combines_components() {
        let farms = vec![
            farm("1", Region::Wales, 1.0, VerificationTier::GoldVerified),
            farm("2", Region::Wales, 2.5, VerificationTier::Bronze),
            farm("3", Region::Scotland, 4.0, VerificationTier::Silver),
        ];
        let result = compute_aggregate(&farms, &FilterCriteria::all().with_region(Region::Wales));
        assert_eq!(result.total_farms, 2);
        assert_eq!(result.risk_distribution.low, 1);
        assert_eq!(result.risk_distribution.medium, 1);
        assert_eq!(result.risk_distribution.high, 0);
        assert_eq!(result.verification_distribution.total(), 8);
        assert_eq!(result.data_quality().unwrap(), 80);
        assert_eq!(result.total_hectares, 200.0);
        assert_eq!(result.averages().unwrap().water_usage, 120.0);
    }

    #[test]
    fn test_empty_subset_is_marked_empty() {
        let farms = vec![farm("1", Region::Wales, 1.0, VerificationTier::Bronze)];
        let result = compute_aggregate(&farms, &FilterCriteria::all().with_region(Region::Midlands));
        assert!(result.is_empty());
        assert_eq!(result.avg_metrics, None);
        assert_eq!(result.data_quality_percent, None);
        assert_eq!(result.risk_distribution.total(), 0);
        assert_eq!(result.verification_distribution.total(), 0);
        assert!(result.averages().is_err());
        assert!(result.data_quality().is_err());
    }
}
