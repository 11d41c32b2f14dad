//! Fixed-region averages over the whole portfolio.
//!
//! Rollups ignore filter criteria entirely: they are a function of the farm
//! collection alone, so one computation per snapshot is enough.

use serde::{Deserialize, Serialize};

use crate::aggregate::RunningMean;
use crate::domain::{Farm, Region};

/// Averages for one region; `None` averages mean the region has no farms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionalRollupEntry {
    pub region: Region,
    pub farm_count: usize,
    pub avg_water_usage: Option<f64>,
    pub avg_biodiversity_index: Option<f64>,
    pub avg_n_efficiency: Option<f64>,
}

impl RegionalRollupEntry {
    pub fn has_data(&self) -> bool {
        self.farm_count > 0
    }
}

#[derive(Default)]
struct RegionAccumulator {
    water_usage: RunningMean,
    biodiversity_index: RunningMean,
    n_efficiency: RunningMean,
}

/// One entry per region in [`Region::ALL`] order, over every farm given.
pub fn regional_rollup<'a, I>(farms: I) -> Vec<RegionalRollupEntry>
where
    I: IntoIterator<Item = &'a Farm>,
{
    let mut accumulators: [RegionAccumulator; 5] = Default::default();

    for farm in farms {
        let slot = &mut accumulators[region_slot(farm.region)];
        slot.water_usage.push(farm.metrics.water_usage);
        slot.biodiversity_index.push(farm.metrics.biodiversity_index);
        slot.n_efficiency.push(farm.metrics.n_efficiency);
    }

    Region::ALL
        .into_iter()
        .zip(accumulators)
        .map(|(region, acc)| RegionalRollupEntry {
            region,
            farm_count: acc.water_usage.count(),
            avg_water_usage: acc.water_usage.mean(),
            avg_biodiversity_index: acc.biodiversity_index.mean(),
            avg_n_efficiency: acc.n_efficiency.mean(),
        })
        .collect()
}

fn region_slot(region: Region) -> usize {
    match region {
        Region::Scotland => 0,
        Region::NorthEngland => 1,
        Region::Midlands => 2,
        Region::SouthWest => 3,
        Region::Wales => 4,
    }
}
