//! Engine error taxonomy for FarmScope.

/// FarmScope engine errors.
///
/// Every variant is scoped to one record or one call; none of them leave the
/// engine in an unusable state.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid filter criteria: unknown region {region:?}")]
    InvalidFilterCriteria { region: String },

    #[error("empty result set: {operation} requested over zero farms")]
    EmptyResultSet { operation: &'static str },

    #[error("farm {farm_id}: unknown verification tier {value:?} for domain {domain}")]
    UnknownVerificationTier {
        farm_id: String,
        domain: String,
        value: String,
    },

    #[error("farm {farm_id}: missing verification domain {domain}")]
    MissingVerificationDomain { farm_id: String, domain: String },

    #[error("farm {farm_id}: unknown region {value:?}")]
    UnknownRegion { farm_id: String, value: String },

    #[error("farm {farm_id}: invalid record: {reason}")]
    InvalidFarmRecord { farm_id: String, reason: String },

    #[error("duplicate farm id: {0}")]
    DuplicateFarmId(String),

    #[error("farm not found: {0}")]
    FarmNotFound(String),

    #[error("farm record provider error: {0}")]
    Provider(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Id of the farm record this error is scoped to, if any.
    pub fn farm_id(&self) -> Option<&str> {
        match self {
            Self::UnknownVerificationTier { farm_id, .. }
            | Self::MissingVerificationDomain { farm_id, .. }
            | Self::UnknownRegion { farm_id, .. }
            | Self::InvalidFarmRecord { farm_id, .. } => Some(farm_id),
            Self::DuplicateFarmId(id) | Self::FarmNotFound(id) => Some(id),
            _ => None,
        }
    }
}

/// Result type for FarmScope engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
