//! Engine configuration.
//!
//! Defaults can be overridden from the environment:
//! - `FARMSCOPE_CACHE_CAPACITY`: memoized aggregates kept per controller
//! - `FARMSCOPE_ROW_LIMIT`: rows returned for the farm table
//! - `FARMSCOPE_LOG_FORMAT`: `json` for newline-delimited JSON logs

use serde::{Deserialize, Serialize};

pub const DEFAULT_CACHE_CAPACITY: usize = 64;
pub const DEFAULT_ROW_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum number of (snapshot, criteria) aggregates memoized at once.
    pub cache_capacity: usize,
    /// Rows shown in the farm table before truncation.
    pub row_limit: usize,
    /// Emit JSON log lines instead of human-readable ones.
    pub log_json: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            row_limit: DEFAULT_ROW_LIMIT,
            log_json: false,
        }
    }
}

impl EngineConfig {
    /// Defaults, overridden by any `FARMSCOPE_*` variables that parse.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parse_usize = |key: &str, fallback: usize| {
            match lookup(key).map(|v| v.trim().parse::<usize>()) {
                Some(Ok(value)) => value,
                Some(Err(_)) => {
                    tracing::warn!(key = key, "ignoring unparsable value, using default");
                    fallback
                }
                None => fallback,
            }
        };

        EngineConfig {
            cache_capacity: parse_usize("FARMSCOPE_CACHE_CAPACITY", defaults.cache_capacity),
            row_limit: parse_usize("FARMSCOPE_ROW_LIMIT", defaults.row_limit),
            log_json: lookup("FARMSCOPE_LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(defaults.log_json),
        }
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub fn with_row_limit(mut self, limit: usize) -> Self {
        self.row_limit = limit;
        self
    }

    pub fn with_log_json(mut self, json: bool) -> Self {
        self.log_json = json;
        self
    }
}
