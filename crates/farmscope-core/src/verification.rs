//! Verification-tier distribution and the composite data-quality score.
//!
//! Each farm contributes one entry per verification domain. The data-quality
//! percentage is the mean tier weight across all entries, scaled to 100 and
//! rounded half-up. Weights are held in thousandths so the score is exact:
//! four BRONZE entries are 60, not 60.00000000000001.

use serde::{Deserialize, Serialize};

use crate::domain::{EngineError, Farm, Result, VerificationTier};

/// Entry counts per tier across every domain of every farm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationDistribution {
    pub bronze: usize,
    pub silver: usize,
    pub gold_remote: usize,
    pub gold_verified: usize,
}

impl VerificationDistribution {
    pub fn record(&mut self, tier: VerificationTier) {
        match tier {
            VerificationTier::Bronze => self.bronze += 1,
            VerificationTier::Silver => self.silver += 1,
            VerificationTier::GoldRemote => self.gold_remote += 1,
            VerificationTier::GoldVerified => self.gold_verified += 1,
        }
    }

    pub fn get(&self, tier: VerificationTier) -> usize {
        match tier {
            VerificationTier::Bronze => self.bronze,
            VerificationTier::Silver => self.silver,
            VerificationTier::GoldRemote => self.gold_remote,
            VerificationTier::GoldVerified => self.gold_verified,
        }
    }

    pub fn total(&self) -> usize {
        self.bronze + self.silver + self.gold_remote + self.gold_verified
    }

    /// Sum of tier weights in thousandths.
    fn weight_permille(&self) -> u64 {
        VerificationTier::ALL
            .into_iter()
            .map(|t| self.get(t) as u64 * u64::from(t.weight_permille()))
            .sum()
    }

    /// Weighted data-quality percentage, `None` when there are no entries.
    pub fn data_quality_percent(&self) -> Option<u8> {
        let entries = self.total() as u64;
        if entries == 0 {
            return None;
        }
        // percent = permille_sum / (entries * 1000) * 100, rounded half-up
        let divisor = entries * 10;
        let percent = (self.weight_permille() + divisor / 2) / divisor;
        Some(percent as u8)
    }
}

/// Output of the verification scorer for one subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationScore {
    /// In `[60, 100]` for a nonempty subset; `None` for an empty one.
    pub data_quality_percent: Option<u8>,
    pub distribution: VerificationDistribution,
}

impl VerificationScore {
    /// Data-quality percentage, or `EmptyResultSet` when there were no farms.
    pub fn data_quality(&self) -> Result<u8> {
        self.data_quality_percent.ok_or(EngineError::EmptyResultSet {
            operation: "data quality score",
        })
    }
}

/// Tier distribution alone.
pub fn verification_distribution<'a, I>(farms: I) -> VerificationDistribution
where
    I: IntoIterator<Item = &'a Farm>,
{
    let mut distribution = VerificationDistribution::default();
    for farm in farms {
        for (_, tier) in farm.verification_status.entries() {
            distribution.record(tier);
        }
    }
    distribution
}

/// Score a subset: distribution plus weighted data-quality percentage.
pub fn score_verification<'a, I>(farms: I) -> VerificationScore
where
    I: IntoIterator<Item = &'a Farm>,
{
    let distribution = verification_distribution(farms);
    VerificationScore {
        data_quality_percent: distribution.data_quality_percent(),
        distribution,
    }
}
