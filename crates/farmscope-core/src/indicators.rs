//! TNFD-style performance indicators and benchmark statuses.
//!
//! Only indicators that can be derived from portfolio averages are produced;
//! there are no placeholder figures.

use serde::Serialize;

use crate::domain::FarmMetrics;
use crate::engine::AggregateResult;

/// Water withdrawal target, m³ per 1000 L of milk.
pub const WATER_USAGE_TARGET: f64 = 120.0;
/// Water recycling target, percent.
pub const WATER_RECYCLING_TARGET: f64 = 40.0;
/// Natural habitat coverage target, percent.
pub const HABITAT_COVERAGE_TARGET: f64 = 15.0;
/// Biodiversity index at or above which a portfolio is rated `Good`.
pub const BIODIVERSITY_GOOD_THRESHOLD: f64 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TnfdPillar {
    Land,
    Water,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}

/// One indicator compared against its target.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TnfdIndicator {
    pub id: &'static str,
    pub name: &'static str,
    pub pillar: TnfdPillar,
    pub unit: &'static str,
    pub target: f64,
    pub current: f64,
    pub direction: Direction,
    /// 100 means exactly on target; `None` when the ratio is undefined.
    pub performance_percent: Option<f64>,
}

impl TnfdIndicator {
    fn new(
        id: &'static str,
        name: &'static str,
        pillar: TnfdPillar,
        unit: &'static str,
        target: f64,
        current: f64,
        direction: Direction,
    ) -> Self {
        let (numerator, denominator) = match direction {
            Direction::HigherIsBetter => (current, target),
            Direction::LowerIsBetter => (target, current),
        };
        let performance_percent = (denominator > 0.0).then(|| numerator / denominator * 100.0);
        Self {
            id,
            name,
            pillar,
            unit,
            target,
            current,
            direction,
            performance_percent,
        }
    }

    pub fn meets_target(&self) -> bool {
        self.performance_percent.is_some_and(|p| p >= 100.0)
    }
}

/// Indicators derivable from portfolio averages.
pub fn tnfd_indicators(avg: &FarmMetrics) -> Vec<TnfdIndicator> {
    vec![
        TnfdIndicator::new(
            "habitat_coverage",
            "Natural Habitat Coverage",
            TnfdPillar::Land,
            "%",
            HABITAT_COVERAGE_TARGET,
            avg.habitat_coverage,
            Direction::HigherIsBetter,
        ),
        TnfdIndicator::new(
            "water_withdrawal",
            "Water Withdrawal",
            TnfdPillar::Water,
            "m³/1000L",
            WATER_USAGE_TARGET,
            avg.water_usage,
            Direction::LowerIsBetter,
        ),
        TnfdIndicator::new(
            "water_recycling",
            "Water Recycling Rate",
            TnfdPillar::Water,
            "%",
            WATER_RECYCLING_TARGET,
            avg.water_recycling,
            Direction::HigherIsBetter,
        ),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetStatus {
    WithinTarget,
    AboveTarget,
}

/// Average water usage against the withdrawal target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterUsageBenchmark {
    pub average: f64,
    pub target: f64,
    /// Signed distance from target as a percent of target.
    pub deviation_percent: f64,
    pub status: TargetStatus,
}

impl WaterUsageBenchmark {
    pub fn of(average: f64) -> Self {
        let status = if average > WATER_USAGE_TARGET {
            TargetStatus::AboveTarget
        } else {
            TargetStatus::WithinTarget
        };
        Self {
            average,
            target: WATER_USAGE_TARGET,
            deviation_percent: (average - WATER_USAGE_TARGET) / WATER_USAGE_TARGET * 100.0,
            status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BiodiversityStatus {
    Good,
    Improving,
}

impl BiodiversityStatus {
    pub fn of(index: f64) -> Self {
        if index >= BIODIVERSITY_GOOD_THRESHOLD {
            Self::Good
        } else {
            Self::Improving
        }
    }
}

/// Everything the indicator panels need for one aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorReport {
    pub tnfd: Vec<TnfdIndicator>,
    pub water_usage: WaterUsageBenchmark,
    pub biodiversity: BiodiversityStatus,
}

impl IndicatorReport {
    pub fn from_averages(avg: &FarmMetrics) -> Self {
        Self {
            tnfd: tnfd_indicators(avg),
            water_usage: WaterUsageBenchmark::of(avg.water_usage),
            biodiversity: BiodiversityStatus::of(avg.biodiversity_index),
        }
    }

    /// `None` for an empty aggregate.
    pub fn from_aggregate(result: &AggregateResult) -> Option<Self> {
        result.avg_metrics.as_ref().map(Self::from_averages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn averages() -> FarmMetrics {
        FarmMetrics {
            water_usage: 150.0,
            water_recycling: 30.0,
            biodiversity_index: 7.0,
            habitat_coverage: 15.0,
            ..FarmMetrics::default()
        }
    }

    #[test]
    fn test_tnfd_performance_by_direction() {
        let indicators = tnfd_indicators(&averages());
        assert_eq!(indicators.len(), 3);

        let habitat = &indicators[0];
        assert_eq!(habitat.performance_percent, Some(100.0));
        assert!(habitat.meets_target());

        let withdrawal = &indicators[1];
        assert_eq!(withdrawal.direction, Direction::LowerIsBetter);
        assert_eq!(withdrawal.performance_percent, Some(80.0));
        assert!(!withdrawal.meets_target());

        let recycling = &indicators[2];
        assert_eq!(recycling.performance_percent, Some(75.0));
    }

    #[test]
    fn test_zero_water_usage_has_undefined_performance() {
        let avg = FarmMetrics {
            water_usage: 0.0,
            ..averages()
        };
        let withdrawal = &tnfd_indicators(&avg)[1];
        assert_eq!(withdrawal.performance_percent, None);
        assert!(!withdrawal.meets_target());
    }

    #[test]
    fn test_water_usage_benchmark() {
        let above = WaterUsageBenchmark::of(150.0);
        assert_eq!(above.status, TargetStatus::AboveTarget);
        assert_eq!(above.deviation_percent, 25.0);

        let within = WaterUsageBenchmark::of(120.0);
        assert_eq!(within.status, TargetStatus::WithinTarget);
        assert_eq!(within.deviation_percent, 0.0);
    }

    #[test]
    fn test_biodiversity_status_threshold() {
        assert_eq!(BiodiversityStatus::of(7.0), BiodiversityStatus::Good);
        assert_eq!(BiodiversityStatus::of(6.99), BiodiversityStatus::Improving);
    }

    #[test]
    fn test_report_serializes() {
        let report = IndicatorReport::from_averages(&averages());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["biodiversity"], "good");
        assert_eq!(json["waterUsage"]["status"], "above_target");
        assert_eq!(json["tnfd"][1]["id"], "water_withdrawal");
    }
}
