//! Risk buckets derived from a farm's highest risk score.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{Farm, RiskCategory, RiskScores};

/// Scores below this are `Low`.
pub const MEDIUM_RISK_FLOOR: f64 = 2.0;
/// Scores at or above this are `High`.
pub const HIGH_RISK_FLOOR: f64 = 3.5;

/// Categorical risk level of a farm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBucket {
    /// `max_risk < 2.0`
    Low,
    /// `2.0 <= max_risk < 3.5`
    Medium,
    /// `max_risk >= 3.5`
    High,
}

impl RiskBucket {
    /// Bucket for a maximum risk score; intervals are closed-open.
    pub fn from_max_risk(max_risk: f64) -> Self {
        if max_risk >= HIGH_RISK_FLOOR {
            Self::High
        } else if max_risk >= MEDIUM_RISK_FLOOR {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for RiskBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Classify one farm by the maximum of its five risk scores.
pub fn classify(farm: &Farm) -> RiskBucket {
    RiskBucket::from_max_risk(farm.risk_scores.max())
}

/// Farm counts per risk bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskDistribution {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl RiskDistribution {
    pub fn record(&mut self, bucket: RiskBucket) {
        match bucket {
            RiskBucket::Low => self.low += 1,
            RiskBucket::Medium => self.medium += 1,
            RiskBucket::High => self.high += 1,
        }
    }

    pub fn get(&self, bucket: RiskBucket) -> usize {
        match bucket {
            RiskBucket::Low => self.low,
            RiskBucket::Medium => self.medium,
            RiskBucket::High => self.high,
        }
    }

    pub fn total(&self) -> usize {
        self.low + self.medium + self.high
    }
}

/// Count farms per bucket; the counts always sum to the number of farms.
pub fn risk_distribution<'a, I>(farms: I) -> RiskDistribution
where
    I: IntoIterator<Item = &'a Farm>,
{
    let mut distribution = RiskDistribution::default();
    for farm in farms {
        distribution.record(classify(farm));
    }
    distribution
}

/// Per-farm risk breakdown for a detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmRiskProfile {
    pub farm_id: String,
    pub farm_name: String,
    pub max_risk: f64,
    /// Category holding `max_risk`; the first in declaration order on ties.
    pub dominant_category: RiskCategory,
    pub bucket: RiskBucket,
    pub scores: RiskScores,
}

impl FarmRiskProfile {
    pub fn of(farm: &Farm) -> Self {
        let (dominant_category, max_risk) = farm.risk_scores.max_entry();
        Self {
            farm_id: farm.id.clone(),
            farm_name: farm.name.clone(),
            max_risk,
            dominant_category,
            bucket: RiskBucket::from_max_risk(max_risk),
            scores: farm.risk_scores,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(RiskBucket::from_max_risk(0.0), RiskBucket::Low);
        assert_eq!(RiskBucket::from_max_risk(1.999), RiskBucket::Low);
        assert_eq!(RiskBucket::from_max_risk(2.0), RiskBucket::Medium);
        assert_eq!(RiskBucket::from_max_risk(3.499), RiskBucket::Medium);
        assert_eq!(RiskBucket::from_max_risk(3.5), RiskBucket::High);
        assert_eq!(RiskBucket::from_max_risk(4.99), RiskBucket::High);
    }

    #[test]
    fn test_bucket_ordering_and_display() {
        assert!(RiskBucket::Low < RiskBucket::Medium);
        assert!(RiskBucket::Medium < RiskBucket::High);
        assert_eq!(RiskBucket::Medium.to_string(), "medium");
        assert_eq!(RiskBucket::High.label(), "High");
    }

    #[test]
    fn test_distribution_record_and_total() {
        let mut d = RiskDistribution::default();
        d.record(RiskBucket::Low);
        d.record(RiskBucket::High);
        d.record(RiskBucket::High);
        assert_eq!(d.get(RiskBucket::High), 2);
        assert_eq!(d.total(), 3);
    }

    #[test]
    fn test_serde_roundtrip() {
        for bucket in [RiskBucket::Low, RiskBucket::Medium, RiskBucket::High] {
            let json = serde_json::to_string(&bucket).unwrap();
            let back: RiskBucket = serde_json::from_str(&json).unwrap();
            assert_eq!(bucket, back);
        }
        assert_eq!(serde_json::to_string(&RiskBucket::Low).unwrap(), "\"low\"");
    }
}
