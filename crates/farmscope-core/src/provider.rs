//! Sources of farm records.
//!
//! The engine never fetches farms itself. A [`FarmRecordProvider`] hands over
//! the full record list, and the controller turns it into a new snapshot.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{EngineError, FarmRecord, Result};

/// Injectable data source for farm records.
///
/// Implement this trait to plug in a real farm-record service or a test stub.
#[async_trait]
pub trait FarmRecordProvider: Send + Sync {
    /// Fetch the complete, current record list.
    async fn fetch_records(&self) -> Result<Vec<FarmRecord>>;
}

/// Reads a JSON array of farm records from disk.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    path: PathBuf,
}

impl JsonFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FarmRecordProvider for JsonFileProvider {
    async fn fetch_records(&self) -> Result<Vec<FarmRecord>> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            EngineError::Provider(format!("read {}: {e}", self.path.display()))
        })?;
        let records: Vec<FarmRecord> = serde_json::from_slice(&bytes)?;
        debug!(path = %self.path.display(), records = records.len(), "farm records read");
        Ok(records)
    }
}

/// Serves a fixed in-memory record list.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    records: Vec<FarmRecord>,
}

impl StaticProvider {
    pub fn new(records: Vec<FarmRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl FarmRecordProvider for StaticProvider {
    async fn fetch_records(&self) -> Result<Vec<FarmRecord>> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_is_provider_error() {
        let provider = JsonFileProvider::new("/definitely/not/here/farms.json");
        let err = provider.fetch_records().await.unwrap_err();
        assert!(matches!(err, EngineError::Provider(ref msg) if msg.contains("farms.json")));
    }

    #[tokio::test]
    async fn test_malformed_file_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("farms.json");
        std::fs::write(&path, b"{ not an array").unwrap();
        let err = JsonFileProvider::new(&path).fetch_records().await.unwrap_err();
        assert!(matches!(err, EngineError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_static_provider_returns_records() {
        let provider = StaticProvider::default();
        assert!(provider.fetch_records().await.unwrap().is_empty());
    }
}
