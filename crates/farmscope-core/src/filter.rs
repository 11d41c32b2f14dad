//! Farm selection by region and free-text name search.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{EngineError, Farm, Region, Result};

/// Wire value for "no region restriction".
pub const ALL_REGIONS: &str = "all";

/// Region part of a filter: every region, or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RegionSelection {
    #[default]
    All,
    Only(Region),
}

impl RegionSelection {
    /// Parse `"all"` or an exact region display name.
    pub fn parse(value: &str) -> Result<Self> {
        if value == ALL_REGIONS {
            return Ok(Self::All);
        }
        Region::from_name(value)
            .map(Self::Only)
            .ok_or_else(|| EngineError::InvalidFilterCriteria {
                region: value.to_string(),
            })
    }

    pub fn admits(self, region: Region) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => selected == region,
        }
    }
}

impl TryFrom<String> for RegionSelection {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<RegionSelection> for String {
    fn from(selection: RegionSelection) -> Self {
        selection.to_string()
    }
}

impl fmt::Display for RegionSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_REGIONS),
            Self::Only(region) => f.write_str(region.as_str()),
        }
    }
}

/// Active dashboard filter. Both parts must match (logical AND).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub region: RegionSelection,
    /// Case-insensitive substring of the farm display name; empty matches all.
    #[serde(default)]
    pub search_text: String,
}

impl FilterCriteria {
    /// No filtering at all.
    pub fn all() -> Self {
        Self::default()
    }

    /// Build criteria from raw UI values.
    ///
    /// An unknown region is an error rather than a silent fallback to `all`.
    pub fn parse(region: &str, search_text: impl Into<String>) -> Result<Self> {
        Ok(Self {
            region: RegionSelection::parse(region)?,
            search_text: search_text.into(),
        })
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = RegionSelection::Only(region);
        self
    }

    pub fn with_search(mut self, search_text: impl Into<String>) -> Self {
        self.search_text = search_text.into();
        self
    }

    /// Whether a single farm passes this filter.
    pub fn matches(&self, farm: &Farm) -> bool {
        self.region.admits(farm.region) && name_matches(&farm.name, &self.search_text)
    }
}

fn name_matches(name: &str, search_text: &str) -> bool {
    search_text.is_empty() || name.to_lowercase().contains(&search_text.to_lowercase())
}

/// Ordered, borrowed subset of a farm collection.
#[derive(Debug, Clone, Default)]
pub struct FarmSubset<'a> {
    farms: Vec<&'a Farm>,
}

impl<'a> FarmSubset<'a> {
    /// Every farm of `farms`, in order.
    pub fn whole(farms: &'a [Farm]) -> Self {
        Self {
            farms: farms.iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.farms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.farms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Farm> + '_ {
        self.farms.iter().copied()
    }

    pub fn as_slice(&self) -> &[&'a Farm] {
        &self.farms
    }

    pub fn ids(&self) -> Vec<&'a str> {
        self.farms.iter().map(|f| f.id.as_str()).collect()
    }
}

impl<'s, 'a> IntoIterator for &'s FarmSubset<'a> {
    type Item = &'a Farm;
    type IntoIter = std::iter::Copied<std::slice::Iter<'s, &'a Farm>>;

    fn into_iter(self) -> Self::IntoIter {
        self.farms.iter().copied()
    }
}

/// Select the farms matching `criteria`, preserving their relative order.
pub fn filter_farms<'a>(farms: &'a [Farm], criteria: &FilterCriteria) -> FarmSubset<'a> {
    let needle = criteria.search_text.to_lowercase();
    let farms = farms
        .iter()
        .filter(|farm| criteria.region.admits(farm.region))
        .filter(|farm| needle.is_empty() || farm.name.to_lowercase().contains(&needle))
        .collect();
    FarmSubset { farms }
}
