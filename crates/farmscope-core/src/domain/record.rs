//! Loosely-typed farm records as supplied by an external provider.
//!
//! Region and verification tiers arrive as plain strings. Converting a
//! [`FarmRecord`] into a [`Farm`] is where unknown values are caught, so that
//! aggregation only ever sees closed enums.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::{EngineError, Result};
use crate::domain::farm::{
    Farm, FarmMetrics, Region, RiskScores, VerificationDomain, VerificationStatus,
    VerificationTier,
};

/// Farm record before region and tier values have been checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmRecord {
    pub id: String,
    pub name: String,
    pub region: String,
    pub hectares: f64,
    pub milk_production: f64,
    pub verification_status: BTreeMap<String, String>,
    pub metrics: FarmMetrics,
    pub risk_scores: RiskScores,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub schemes: BTreeSet<String>,
}

impl From<&Farm> for FarmRecord {
    fn from(farm: &Farm) -> Self {
        Self {
            id: farm.id.clone(),
            name: farm.name.clone(),
            region: farm.region.as_str().to_string(),
            hectares: farm.hectares,
            milk_production: farm.milk_production,
            verification_status: farm
                .verification_status
                .entries()
                .into_iter()
                .map(|(d, t)| (d.as_str().to_string(), t.code().to_string()))
                .collect(),
            metrics: farm.metrics,
            risk_scores: farm.risk_scores,
            last_updated: farm.last_updated,
            schemes: farm.schemes.clone(),
        }
    }
}

impl TryFrom<FarmRecord> for Farm {
    type Error = EngineError;

    fn try_from(record: FarmRecord) -> Result<Self> {
        let region = Region::from_name(&record.region).ok_or_else(|| EngineError::UnknownRegion {
            farm_id: record.id.clone(),
            value: record.region.clone(),
        })?;

        let verification_status = parse_verification(&record.id, &record.verification_status)?;
        check_numbers(&record)?;

        Ok(Farm {
            id: record.id,
            name: record.name,
            region,
            hectares: record.hectares,
            milk_production: record.milk_production,
            verification_status,
            metrics: record.metrics,
            risk_scores: record.risk_scores,
            last_updated: record.last_updated,
            schemes: record.schemes,
        })
    }
}

fn parse_verification(
    farm_id: &str,
    raw: &BTreeMap<String, String>,
) -> Result<VerificationStatus> {
    if let Some(extra) = raw.keys().find(|k| VerificationDomain::from_key(k).is_none()) {
        return Err(EngineError::InvalidFarmRecord {
            farm_id: farm_id.to_string(),
            reason: format!("unknown verification domain {extra:?}"),
        });
    }

    let tier = |domain: VerificationDomain| -> Result<VerificationTier> {
        let value = raw
            .get(domain.as_str())
            .ok_or_else(|| EngineError::MissingVerificationDomain {
                farm_id: farm_id.to_string(),
                domain: domain.as_str().to_string(),
            })?;
        VerificationTier::from_code(value).ok_or_else(|| EngineError::UnknownVerificationTier {
            farm_id: farm_id.to_string(),
            domain: domain.as_str().to_string(),
            value: value.clone(),
        })
    };

    Ok(VerificationStatus {
        water: tier(VerificationDomain::Water)?,
        biodiversity: tier(VerificationDomain::Biodiversity)?,
        nutrients: tier(VerificationDomain::Nutrients)?,
        land_use: tier(VerificationDomain::LandUse)?,
    })
}

/// Every numeric field must be finite and nonnegative; size fields must be positive.
fn check_numbers(record: &FarmRecord) -> Result<()> {
    let invalid = |reason: String| EngineError::InvalidFarmRecord {
        farm_id: record.id.clone(),
        reason,
    };

    for (field, value) in [
        ("hectares", record.hectares),
        ("milkProduction", record.milk_production),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(invalid(format!("{field} must be a positive number, got {value}")));
        }
    }

    for (field, value) in record.metrics.entries() {
        if !value.is_finite() || value < 0.0 {
            return Err(invalid(format!("metric {field} must be finite and >= 0, got {value}")));
        }
    }

    for (category, value) in record.risk_scores.entries() {
        if !value.is_finite() || value < 0.0 {
            return Err(invalid(format!(
                "risk score {category} must be finite and >= 0, got {value}"
            )));
        }
    }

    Ok(())
}
