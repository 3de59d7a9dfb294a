use super::{DistanceMatrix, Tour};
use crate::config::EngineConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeModel {
    pub unit_time_per_step: f64,
    pub fixed_time_per_stop: f64,
}

impl Default for TimeModel {
    fn default() -> Self {
        TimeModel::from(&EngineConfig::default())
    }
}

impl From<&EngineConfig> for TimeModel {
    fn from(config: &EngineConfig) -> Self {
        TimeModel {
            unit_time_per_step: config.unit_time_per_step,
            fixed_time_per_stop: config.fixed_time_per_stop,
        }
    }
}

impl TimeModel {
    pub fn estimate(&self, distance: usize, stop_count: usize) -> f64 {
        distance as f64 * self.unit_time_per_step + stop_count as f64 * self.fixed_time_per_stop
    }
}

/// Steps walked along the tour's reachable legs.
pub fn tour_distance(tour: &Tour, matrix: &DistanceMatrix) -> usize {
    tour.legs()
        .filter_map(|(from, to)| matrix.cost(from, to))
        .sum()
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteMetrics {
    pub optimized_distance: usize,
    pub unoptimized_distance: usize,
    /// Can be negative: greedy order is not always shorter than request order.
    pub distance_saved: i64,
    pub optimized_time: f64,
    pub unoptimized_time: f64,
    /// Never negative.
    pub time_saved: f64,
}

impl RouteMetrics {
    pub fn compute(
        optimized: &Tour,
        baseline: &Tour,
        matrix: &DistanceMatrix,
        model: &TimeModel,
    ) -> Self {
        let optimized_distance = tour_distance(optimized, matrix);
        let unoptimized_distance = tour_distance(baseline, matrix);
        let optimized_time = model.estimate(optimized_distance, optimized.stops().len());
        let unoptimized_time = model.estimate(unoptimized_distance, baseline.stops().len());

        RouteMetrics {
            optimized_distance,
            unoptimized_distance,
            distance_saved: unoptimized_distance as i64 - optimized_distance as i64,
            optimized_time,
            unoptimized_time,
            time_saved: (unoptimized_time - optimized_time).max(0.0),
        }
    }

    pub fn time_saved_estimate(&self) -> String {
        format_duration(self.time_saved)
    }
}

/// `"<m>m <s>s"` from whole rounded seconds.
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.round() as u64
    } else {
        0
    };
    format!("{}m {}s", total / 60, total % 60)
}
