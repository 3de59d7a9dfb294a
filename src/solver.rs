mod assemble;
mod matrix;
mod metrics;
mod sequence;

pub use assemble::assemble_path;
pub use matrix::{DistanceMatrix, Leg};
pub use metrics::{format_duration, tour_distance, RouteMetrics, TimeModel};
pub use sequence::{NearestNeighbor, RequestOrder, Tour};

use crate::common::{
    Coord, MetricsOutput, NodeId, NodeSet, Path, PickItemOutput, PickRequest, PickStepOutput,
    RouteRequest, RouteResponse, TourKind,
};
use crate::config::EngineConfig;
use crate::error::{Diagnostic, InputError, RouteError};
use crate::map::Map;
use crate::stat::Stats;

use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

/// Orders the pick stops of a node set into a tour.
pub trait Sequencer {
    fn kind(&self) -> TourKind;

    fn sequence(
        &self,
        nodes: &NodeSet,
        matrix: &DistanceMatrix,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Tour, RouteError>;
}

#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    limit_ms: u64,
    at: Instant,
}

impl Deadline {
    pub fn after(limit: Duration) -> Self {
        Deadline {
            limit_ms: limit.as_millis() as u64,
            at: Instant::now() + limit,
        }
    }

    pub fn check(&self) -> Result<(), RouteError> {
        if Instant::now() >= self.at {
            return Err(RouteError::TimedOut {
                limit_ms: self.limit_ms,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct RouteResult {
    pub nodes: NodeSet,
    pub optimized_tour: Tour,
    pub baseline_tour: Tour,
    pub optimized_path: Path,
    pub baseline_path: Path,
    pub metrics: RouteMetrics,
    pub entry: Coord,
    pub exit: Coord,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: Stats,
}

impl RouteResult {
    /// Worker-facing instructions, in optimized order.
    pub fn pick_sequence(&self) -> Vec<PickStepOutput> {
        self.optimized_tour
            .stops()
            .iter()
            .enumerate()
            .filter_map(|(step, &index)| {
                let node = self.nodes.node(index);
                let NodeId::Stop(key) = node.id else {
                    return None;
                };
                Some(PickStepOutput {
                    step: step + 1,
                    shelf_id: key.shelf_id,
                    facing: key.facing.to_string(),
                    grid_coords: node.coord,
                    items: node
                        .items
                        .iter()
                        .map(|line| PickItemOutput {
                            master_item_id: line.master_item_id.clone(),
                            quantity_to_pick: line.quantity,
                        })
                        .collect(),
                })
            })
            .collect()
    }

    pub fn response(&self) -> RouteResponse {
        RouteResponse {
            optimized_path: self.optimized_path.clone(),
            unoptimized_path: self.baseline_path.clone(),
            metrics: MetricsOutput {
                unoptimized_distance: self.metrics.unoptimized_distance as f64,
                optimized_distance: self.metrics.optimized_distance as f64,
                distance_saved: self.metrics.distance_saved as f64,
                ordered_pick_locations: self
                    .optimized_tour
                    .stops()
                    .iter()
                    .map(|&index| self.nodes.node(index).coord)
                    .collect(),
                pick_sequence_steps: self.pick_sequence(),
                time_saved_estimate: self.metrics.time_saved_estimate(),
                entry_point_for_path: self.entry,
                exit_point_for_path: self.exit,
            },
            diagnostics: self.diagnostics.iter().map(ToString::to_string).collect(),
        }
    }
}

pub struct RouteOptimizer {
    map: Map,
    config: EngineConfig,
    stats: Stats,
}

impl RouteOptimizer {
    pub fn new(map: Map, config: EngineConfig) -> Self {
        RouteOptimizer {
            map,
            config,
            stats: Stats::default(),
        }
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    #[instrument(
        skip_all,
        name = "optimize_route",
        fields(items = request.items.len()),
        level = "info"
    )]
    pub fn optimize(&mut self, request: &PickRequest) -> Result<RouteResult, RouteError> {
        let total_start_time = Instant::now();
        self.stats = Stats::default();
        let deadline = self
            .config
            .time_limit_ms
            .map(|limit| Deadline::after(Duration::from_millis(limit)));

        let (entry, exit) = self.check_bounds(request)?;

        let mut diagnostics = Vec::new();
        let nodes = NodeSet::build(&self.map, &request.items, entry, exit, &mut diagnostics)?;

        let matrix = DistanceMatrix::build(
            &self.map,
            &nodes,
            self.config.parallel,
            deadline.as_ref(),
            &mut self.stats,
        )?;

        let optimized_tour = NearestNeighbor.sequence(&nodes, &matrix, &mut diagnostics)?;
        let baseline_tour = RequestOrder.sequence(&nodes, &matrix, &mut diagnostics)?;
        if let Some(deadline) = &deadline {
            deadline.check()?;
        }

        let optimized_path = assemble_path(&optimized_tour, &nodes, &matrix, &mut diagnostics);
        let baseline_path = assemble_path(&baseline_tour, &nodes, &matrix, &mut diagnostics);

        let metrics = RouteMetrics::compute(
            &optimized_tour,
            &baseline_tour,
            &matrix,
            &TimeModel::from(&self.config),
        );

        self.stats.total_time_us = total_start_time.elapsed().as_micros() as usize;
        info!(
            "optimized {} steps, baseline {} steps, time saved {}",
            metrics.optimized_distance,
            metrics.unoptimized_distance,
            metrics.time_saved_estimate()
        );

        Ok(RouteResult {
            nodes,
            optimized_tour,
            baseline_tour,
            optimized_path,
            baseline_path,
            metrics,
            entry,
            exit,
            diagnostics,
            stats: self.stats.clone(),
        })
    }

    fn check_bounds(&self, request: &PickRequest) -> Result<(Coord, Coord), InputError> {
        let (width, height) = (self.map.width, self.map.height);

        for item in &request.items {
            if !self.map.in_bounds(item.location) {
                return Err(InputError::LocationOutOfBounds {
                    master_item_id: item.master_item_id.clone(),
                    location: item.location,
                    width,
                    height,
                });
            }
        }

        let entry = request.start.unwrap_or_else(|| self.map.default_entry());
        let exit = request.end.unwrap_or_else(|| self.map.default_exit());
        for (which, coord) in [("start", entry), ("end", exit)] {
            if !self.map.in_bounds(coord) {
                return Err(InputError::TerminalOutOfBounds {
                    which,
                    coord,
                    width,
                    height,
                });
            }
        }

        Ok((entry, exit))
    }
}

/// Validates the request, lays out the warehouse from its room size and
/// computes both tours.
pub fn plan_route(
    request: &RouteRequest,
    config: &EngineConfig,
) -> Result<RouteResult, RouteError> {
    let request = request.validate(config)?;
    let map = Map::warehouse(request.room_width, request.room_height)?;
    RouteOptimizer::new(map, config.clone()).optimize(&request)
}

/// Same as [`plan_route`] on a caller-supplied floor plan.
pub fn plan_route_on_map(
    request: &RouteRequest,
    map: Map,
    config: &EngineConfig,
) -> Result<RouteResult, RouteError> {
    let actual = (map.width, map.height);
    let validated = request.validate_for_floor_plan(actual.0, actual.1)?;
    let mut result = RouteOptimizer::new(map, config.clone()).optimize(&validated)?;

    let requested = (
        request.room_width.unwrap_or(actual.0),
        request.room_height.unwrap_or(actual.1),
    );
    if requested != actual {
        warn!("ignoring requested room {requested:?}, floor plan is {actual:?}");
        result
            .diagnostics
            .insert(0, Diagnostic::MapSizeMismatch { requested, actual });
    }
    Ok(result)
}
