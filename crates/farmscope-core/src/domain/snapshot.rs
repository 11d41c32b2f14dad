//! Immutable, content-versioned farm collections.
//!
//! A [`FarmSnapshot`] is the only form in which the engine sees farms. It is
//! never mutated; a refresh produces a new snapshot that replaces the old one
//! wholesale.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::error::{EngineError, Result};
use crate::domain::farm::Farm;
use crate::domain::record::FarmRecord;

/// SHA-256 hex digest of a snapshot's canonical JSON.
///
/// Identical farm sequences always produce the same version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotVersion(String);

impl SnapshotVersion {
    /// Compute the version of a farm sequence.
    pub fn of(farms: &[Farm]) -> Result<Self> {
        let canonical = serde_json::to_vec(farms)?;
        Ok(Self(hex::encode(Sha256::digest(&canonical))))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 hex characters, for logs and CLI output.
    pub fn short(&self) -> &str {
        &self.0[..12.min(self.0.len())]
    }
}

impl fmt::Display for SnapshotVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A record that could not be admitted into a snapshot.
#[derive(Debug)]
pub struct RecordFault {
    /// Position of the record in the provider's sequence.
    pub index: usize,
    pub farm_id: String,
    pub error: EngineError,
}

/// Outcome of building a snapshot from raw records.
#[derive(Debug)]
pub struct SnapshotLoad {
    pub snapshot: FarmSnapshot,
    pub faults: Vec<RecordFault>,
}

/// Fixed-order, read-only farm collection with unique ids.
#[derive(Debug, Clone)]
pub struct FarmSnapshot {
    version: SnapshotVersion,
    farms: Arc<[Farm]>,
    loaded_at: DateTime<Utc>,
}

impl FarmSnapshot {
    /// Build a snapshot from typed farms. Fails on duplicate ids.
    pub fn new(farms: Vec<Farm>) -> Result<Self> {
        let mut seen = HashSet::new();
        for farm in &farms {
            if !seen.insert(farm.id.as_str()) {
                return Err(EngineError::DuplicateFarmId(farm.id.clone()));
            }
        }
        Self::sealed(farms)
    }

    pub fn empty() -> Self {
        Self {
            version: SnapshotVersion(hex::encode(Sha256::digest(b"[]"))),
            farms: Arc::from(Vec::new()),
            loaded_at: Utc::now(),
        }
    }

    /// Convert raw records, keeping every valid one.
    ///
    /// Invalid records and later duplicates of an id are reported as faults;
    /// they never prevent the remaining records from loading.
    pub fn from_records(records: Vec<FarmRecord>) -> Result<SnapshotLoad> {
        let mut farms: Vec<Farm> = Vec::with_capacity(records.len());
        let mut faults = Vec::new();
        let mut seen = HashSet::new();

        for (index, record) in records.into_iter().enumerate() {
            let farm_id = record.id.clone();
            if seen.contains(&farm_id) {
                faults.push(RecordFault {
                    index,
                    error: EngineError::DuplicateFarmId(farm_id.clone()),
                    farm_id,
                });
                continue;
            }
            match Farm::try_from(record) {
                Ok(farm) => {
                    seen.insert(farm_id);
                    farms.push(farm);
                }
                Err(error) => faults.push(RecordFault {
                    index,
                    farm_id,
                    error,
                }),
            }
        }

        Ok(SnapshotLoad {
            snapshot: Self::sealed(farms)?,
            faults,
        })
    }

    fn sealed(farms: Vec<Farm>) -> Result<Self> {
        Ok(Self {
            version: SnapshotVersion::of(&farms)?,
            farms: Arc::from(farms),
            loaded_at: Utc::now(),
        })
    }

    pub fn version(&self) -> &SnapshotVersion {
        &self.version
    }

    pub fn farms(&self) -> &[Farm] {
        &self.farms
    }

    pub fn get(&self, farm_id: &str) -> Option<&Farm> {
        self.farms.iter().find(|f| f.id == farm_id)
    }

    pub fn len(&self) -> usize {
        self.farms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.farms.is_empty()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::farm::{FarmMetrics, Region, RiskScores, VerificationStatus, VerificationTier};

    fn farm(id: &str, water_usage: f64) -> Farm {
        Farm {
            id: id.to_string(),
            name: format!("Hillside {id}"),
            region: Region::Midlands,
            hectares: 100.0,
            milk_production: 1_000_000.0,
            verification_status: VerificationStatus::uniform(VerificationTier::Silver),
            metrics: FarmMetrics {
                water_usage,
                ..FarmMetrics::default()
            },
            risk_scores: RiskScores::uniform(1.0),
            last_updated: "2024-01-01T00:00:00Z".parse().unwrap(),
            schemes: Default::default(),
        }
    }

    #[test]
    fn test_version_is_content_addressed() {
        let a = FarmSnapshot::new(vec![farm("F1", 110.0), farm("F2", 120.0)]).unwrap();
        let b = FarmSnapshot::new(vec![farm("F1", 110.0), farm("F2", 120.0)]).unwrap();
        let c = FarmSnapshot::new(vec![farm("F1", 110.0), farm("F2", 121.0)]).unwrap();
        assert_eq!(a.version(), b.version());
        assert_ne!(a.version(), c.version());
        assert_eq!(a.version().as_str().len(), 64);
        assert_eq!(a.version().short().len(), 12);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = FarmSnapshot::new(vec![farm("F1", 1.0), farm("F1", 2.0)]).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateFarmId(ref id) if id == "F1"));
    }

    #[test]
    fn test_from_records_keeps_valid_and_reports_faults() {
        let mut bad = FarmRecord::from(&farm("F2", 1.0));
        bad.verification_status
            .insert("water".to_string(), "UNVERIFIED".to_string());
        let dup = FarmRecord::from(&farm("F1", 9.0));

        let load = FarmSnapshot::from_records(vec![
            FarmRecord::from(&farm("F1", 1.0)),
            bad,
            FarmRecord::from(&farm("F3", 1.0)),
            dup,
        ])
        .unwrap();

        let ids: Vec<&str> = load.snapshot.farms().iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["F1", "F3"]);
        assert_eq!(load.faults.len(), 2);
        assert_eq!(load.faults[0].index, 1);
        assert!(matches!(
            load.faults[0].error,
            EngineError::UnknownVerificationTier { .. }
        ));
        assert_eq!(load.faults[1].farm_id, "F1");
        assert!(matches!(load.faults[1].error, EngineError::DuplicateFarmId(_)));
    }

    #[test]
    fn test_lookup_by_id() {
        let snap = FarmSnapshot::new(vec![farm("F1", 1.0)]).unwrap();
        assert!(snap.get("F1").is_some());
        assert!(snap.get("F9").is_none());
        assert_eq!(snap.len(), 1);
        assert!(!snap.is_empty());
        assert!(FarmSnapshot::empty().is_empty());
    }

    #[test]
    fn test_empty_snapshot_version_matches_empty_sequence() {
        let built = FarmSnapshot::new(Vec::new()).unwrap();
        assert_eq!(built.version(), FarmSnapshot::empty().version());
    }
}
