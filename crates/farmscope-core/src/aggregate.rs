//! Portfolio averages and totals over a farm subset.
//!
//! An empty subset has no mean. Instead of dividing by zero, the summary
//! carries `avg_metrics: None`, and [`MetricsSummary::averages`] reports
//! [`EngineError::EmptyResultSet`] to callers that need numbers.

use serde::{Deserialize, Serialize};

use crate::domain::{EngineError, Farm, FarmMetrics, Result};

/// Sum and count accumulator; yields no mean until a value arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningMean {
    sum: f64,
    count: usize,
}

impl RunningMean {
    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Result of the metrics aggregation over one subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub total_farms: usize,
    /// Arithmetic mean of each metric; `None` when the subset is empty.
    pub avg_metrics: Option<FarmMetrics>,
    pub total_milk_production: f64,
    pub total_hectares: f64,
}

impl MetricsSummary {
    pub fn is_empty(&self) -> bool {
        self.total_farms == 0
    }

    /// Average metrics, or `EmptyResultSet` when there were no farms.
    pub fn averages(&self) -> Result<&FarmMetrics> {
        self.avg_metrics
            .as_ref()
            .ok_or(EngineError::EmptyResultSet {
                operation: "average metrics",
            })
    }
}

/// Compute counts, sums and per-metric means in a single pass.
pub fn aggregate_metrics<'a, I>(farms: I) -> MetricsSummary
where
    I: IntoIterator<Item = &'a Farm>,
{
    let mut sums = FarmMetrics::default();
    let mut total_farms = 0usize;
    let mut total_milk_production = 0.0;
    let mut total_hectares = 0.0;

    for farm in farms {
        let m = &farm.metrics;
        sums.water_usage += m.water_usage;
        sums.water_recycling += m.water_recycling;
        sums.biodiversity_index += m.biodiversity_index;
        sums.habitat_coverage += m.habitat_coverage;
        sums.n_efficiency += m.n_efficiency;
        sums.p_efficiency += m.p_efficiency;
        sums.soil_carbon += m.soil_carbon;
        sums.renewable_energy += m.renewable_energy;

        total_farms += 1;
        total_milk_production += farm.milk_production;
        total_hectares += farm.hectares;
    }

    let avg_metrics = (total_farms > 0).then(|| {
        let n = total_farms as f64;
        FarmMetrics {
            water_usage: sums.water_usage / n,
            water_recycling: sums.water_recycling / n,
            biodiversity_index: sums.biodiversity_index / n,
            habitat_coverage: sums.habitat_coverage / n,
            n_efficiency: sums.n_efficiency / n,
            p_efficiency: sums.p_efficiency / n,
            soil_carbon: sums.soil_carbon / n,
            renewable_energy: sums.renewable_energy / n,
        }
    });

    MetricsSummary {
        total_farms,
        avg_metrics,
        total_milk_production,
        total_hectares,
    }
}
