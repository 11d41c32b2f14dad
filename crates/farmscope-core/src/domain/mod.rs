//! Domain models for FarmScope.
//!
//! Canonical definitions for the core entities:
//! - `Farm`: one farm's metrics, risk scores and verification tiers
//! - `FarmRecord`: the loosely-typed form a provider hands over
//! - `FarmSnapshot`: an immutable, content-versioned farm collection

pub mod error;
pub mod farm;
pub mod record;
pub mod snapshot;

// Re-export main types and errors
pub use error::{EngineError, Result};
pub use farm::{
    Farm, FarmMetrics, Region, RiskCategory, RiskScores, VerificationDomain, VerificationStatus,
    VerificationTier,
};
pub use record::FarmRecord;
pub use snapshot::{FarmSnapshot, RecordFault, SnapshotLoad, SnapshotVersion};
