//! Row projection for the farm table.

use serde::Serialize;

use crate::domain::{Farm, Region, VerificationDomain, VerificationTier};
use crate::filter::FarmSubset;
use crate::risk::{classify, RiskBucket};

/// Tier badge for one verification domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierBadge {
    pub domain: VerificationDomain,
    pub tier: VerificationTier,
    pub label: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmRow {
    pub id: String,
    pub name: String,
    pub region: Region,
    pub hectares: f64,
    pub milk_production: f64,
    pub risk: RiskBucket,
    pub badges: [TierBadge; 4],
}

impl FarmRow {
    pub fn of(farm: &Farm) -> Self {
        Self {
            id: farm.id.clone(),
            name: farm.name.clone(),
            region: farm.region,
            hectares: farm.hectares,
            milk_production: farm.milk_production,
            risk: classify(farm),
            badges: farm
                .verification_status
                .entries()
                .map(|(domain, tier)| TierBadge {
                    domain,
                    tier,
                    label: tier.label(),
                    icon: tier.icon(),
                }),
        }
    }
}

/// First page of a filtered farm table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmRowPage {
    pub rows: Vec<FarmRow>,
    pub total_matched: usize,
    /// More farms matched than are shown.
    pub truncated: bool,
}

/// Project the first `limit` farms of `subset` into display rows.
pub fn farm_rows(subset: &FarmSubset<'_>, limit: usize) -> FarmRowPage {
    let rows: Vec<FarmRow> = subset.iter().take(limit).map(FarmRow::of).collect();
    FarmRowPage {
        truncated: subset.len() > rows.len(),
        total_matched: subset.len(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FarmMetrics, RiskScores, VerificationStatus};

    fn farm(idx: usize) -> Farm {
        Farm {
            id: format!("FARM-{idx:03}"),
            name: format!("Meadowbrook Farm {idx}"),
            region: Region::NorthEngland,
            hectares: 60.0,
            milk_production: 600_000.0,
            verification_status: VerificationStatus {
                water: VerificationTier::Bronze,
                biodiversity: VerificationTier::Silver,
                nutrients: VerificationTier::GoldRemote,
                land_use: VerificationTier::GoldVerified,
            },
            metrics: FarmMetrics::default(),
            risk_scores: RiskScores::uniform(idx as f64 * 0.5),
            last_updated: "2024-01-01T00:00:00Z".parse().unwrap(),
            schemes: Default::default(),
        }
    }

    #[test]
    fn test_rows_truncate_to_limit() {
        let farms: Vec<Farm> = (1..=12).map(farm).collect();
        let page = farm_rows(&FarmSubset::whole(&farms), 10);
        assert_eq!(page.rows.len(), 10);
        assert_eq!(page.total_matched, 12);
        assert!(page.truncated);
        assert_eq!(page.rows[0].id, "FARM-001");
    }

    #[test]
    fn test_row_carries_bucket_and_badges() {
        let farms = vec![farm(5)];
        let page = farm_rows(&FarmSubset::whole(&farms), 10);
        assert!(!page.truncated);
        let row = &page.rows[0];
        assert_eq!(row.risk, RiskBucket::Medium);
        assert_eq!(row.badges[0].domain, VerificationDomain::Water);
        assert_eq!(row.badges[0].icon, "🥉");
        assert_eq!(row.badges[3].label, "Gold (Verified)");
    }
}
