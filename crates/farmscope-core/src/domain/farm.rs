//! Farm records and the closed vocabularies they are built from.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed reporting region of a farm.
///
/// Declaration order is the display order used by regional rollups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Region {
    Scotland,
    #[serde(rename = "North England")]
    NorthEngland,
    Midlands,
    #[serde(rename = "South West")]
    SouthWest,
    Wales,
}

impl Region {
    /// All regions in declaration order.
    pub const ALL: [Region; 5] = [
        Region::Scotland,
        Region::NorthEngland,
        Region::Midlands,
        Region::SouthWest,
        Region::Wales,
    ];

    /// Display name, as used on the wire and in filter selections.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scotland => "Scotland",
            Self::NorthEngland => "North England",
            Self::Midlands => "Midlands",
            Self::SouthWest => "South West",
            Self::Wales => "Wales",
        }
    }

    /// Exact (case-sensitive) lookup by display name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == name)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data domain a verification tier applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VerificationDomain {
    Water,
    Biodiversity,
    Nutrients,
    LandUse,
}

impl VerificationDomain {
    pub const ALL: [VerificationDomain; 4] = [
        VerificationDomain::Water,
        VerificationDomain::Biodiversity,
        VerificationDomain::Nutrients,
        VerificationDomain::LandUse,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Water => "water",
            Self::Biodiversity => "biodiversity",
            Self::Nutrients => "nutrients",
            Self::LandUse => "landUse",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == key)
    }
}

impl fmt::Display for VerificationDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confidence tier of a farm's data for one verification domain.
///
/// Ordered from least to most trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationTier {
    /// Self-reported.
    Bronze,
    /// Self-reported with supporting evidence.
    Silver,
    /// Verified remotely (satellite, telemetry).
    GoldRemote,
    /// Verified on site by an auditor.
    GoldVerified,
}

impl VerificationTier {
    pub const ALL: [VerificationTier; 4] = [
        VerificationTier::Bronze,
        VerificationTier::Silver,
        VerificationTier::GoldRemote,
        VerificationTier::GoldVerified,
    ];

    /// Wire code, e.g. `GOLD_REMOTE`.
    pub fn code(self) -> &'static str {
        match self {
            Self::Bronze => "BRONZE",
            Self::Silver => "SILVER",
            Self::GoldRemote => "GOLD_REMOTE",
            Self::GoldVerified => "GOLD_VERIFIED",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    /// Confidence weight in thousandths; integer so scoring stays exact.
    pub fn weight_permille(self) -> u32 {
        match self {
            Self::Bronze => 600,
            Self::Silver => 800,
            Self::GoldRemote => 900,
            Self::GoldVerified => 1000,
        }
    }

    /// Confidence weight in `[0.6, 1.0]`.
    pub fn confidence(self) -> f64 {
        f64::from(self.weight_permille()) / 1000.0
    }

    /// Human-readable label for badges.
    pub fn label(self) -> &'static str {
        match self {
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::GoldRemote => "Gold (Remote)",
            Self::GoldVerified => "Gold (Verified)",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Bronze => "🥉",
            Self::Silver => "🥈",
            Self::GoldRemote => "🥇",
            Self::GoldVerified => "🏆",
        }
    }
}

impl fmt::Display for VerificationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Verification tier per domain for a single farm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationStatus {
    pub water: VerificationTier,
    pub biodiversity: VerificationTier,
    pub nutrients: VerificationTier,
    pub land_use: VerificationTier,
}

impl VerificationStatus {
    /// Every domain set to the same tier.
    pub fn uniform(tier: VerificationTier) -> Self {
        Self {
            water: tier,
            biodiversity: tier,
            nutrients: tier,
            land_use: tier,
        }
    }

    pub fn get(&self, domain: VerificationDomain) -> VerificationTier {
        match domain {
            VerificationDomain::Water => self.water,
            VerificationDomain::Biodiversity => self.biodiversity,
            VerificationDomain::Nutrients => self.nutrients,
            VerificationDomain::LandUse => self.land_use,
        }
    }

    /// `(domain, tier)` pairs in domain declaration order.
    pub fn entries(&self) -> [(VerificationDomain, VerificationTier); 4] {
        VerificationDomain::ALL.map(|d| (d, self.get(d)))
    }
}

/// The eight environmental metrics reported per farm.
///
/// Also used for portfolio averages, which share the same shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmMetrics {
    /// m³ per 1000 L of milk.
    pub water_usage: f64,
    /// Percent of water recycled.
    pub water_recycling: f64,
    pub biodiversity_index: f64,
    /// Percent of land under natural habitat.
    pub habitat_coverage: f64,
    /// Nitrogen use efficiency, percent.
    pub n_efficiency: f64,
    /// Phosphorus use efficiency, percent.
    pub p_efficiency: f64,
    /// Soil organic carbon, percent.
    pub soil_carbon: f64,
    /// Share of energy from renewables, percent.
    pub renewable_energy: f64,
}

impl FarmMetrics {
    /// `(name, value)` pairs in field order, using wire names.
    pub fn entries(&self) -> [(&'static str, f64); 8] {
        [
            ("waterUsage", self.water_usage),
            ("waterRecycling", self.water_recycling),
            ("biodiversityIndex", self.biodiversity_index),
            ("habitatCoverage", self.habitat_coverage),
            ("nEfficiency", self.n_efficiency),
            ("pEfficiency", self.p_efficiency),
            ("soilCarbon", self.soil_carbon),
            ("renewableEnergy", self.renewable_energy),
        ]
    }
}

/// Category of environmental or regulatory risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RiskCategory {
    Drought,
    Flood,
    WaterStress,
    BiodiversityLoss,
    RegulatoryCompliance,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 5] = [
        RiskCategory::Drought,
        RiskCategory::Flood,
        RiskCategory::WaterStress,
        RiskCategory::BiodiversityLoss,
        RiskCategory::RegulatoryCompliance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Drought => "drought",
            Self::Flood => "flood",
            Self::WaterStress => "waterStress",
            Self::BiodiversityLoss => "biodiversityLoss",
            Self::RegulatoryCompliance => "regulatoryCompliance",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk score per category, each in `[0, 5)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskScores {
    pub drought: f64,
    pub flood: f64,
    pub water_stress: f64,
    pub biodiversity_loss: f64,
    pub regulatory_compliance: f64,
}

impl RiskScores {
    /// Every category set to the same score.
    pub fn uniform(score: f64) -> Self {
        Self {
            drought: score,
            flood: score,
            water_stress: score,
            biodiversity_loss: score,
            regulatory_compliance: score,
        }
    }

    pub fn get(&self, category: RiskCategory) -> f64 {
        match category {
            RiskCategory::Drought => self.drought,
            RiskCategory::Flood => self.flood,
            RiskCategory::WaterStress => self.water_stress,
            RiskCategory::BiodiversityLoss => self.biodiversity_loss,
            RiskCategory::RegulatoryCompliance => self.regulatory_compliance,
        }
    }

    pub fn entries(&self) -> [(RiskCategory, f64); 5] {
        RiskCategory::ALL.map(|c| (c, self.get(c)))
    }

    /// Highest score and the first category (declaration order) holding it.
    pub fn max_entry(&self) -> (RiskCategory, f64) {
        let mut best = (RiskCategory::Drought, self.drought);
        for (category, score) in self.entries() {
            if score > best.1 {
                best = (category, score);
            }
        }
        best
    }

    pub fn max(&self) -> f64 {
        self.max_entry().1
    }
}

/// A farm as loaded into a snapshot. Never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Farm {
    pub id: String,
    pub name: String,
    pub region: Region,
    pub hectares: f64,
    /// Litres per year.
    pub milk_production: f64,
    pub verification_status: VerificationStatus,
    pub metrics: FarmMetrics,
    pub risk_scores: RiskScores,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub schemes: BTreeSet<String>,
}
