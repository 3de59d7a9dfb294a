use super::{DistanceMatrix, Sequencer};
use crate::common::{NodeSet, TourKind};
use crate::error::{Diagnostic, RouteError};

use tracing::{debug, error, warn};

/// Node indices from `start` to `end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tour {
    pub kind: TourKind,
    pub nodes: Vec<usize>,
}

impl Tour {
    /// Pick stops in visiting order, terminals excluded.
    pub fn stops(&self) -> &[usize] {
        match self.nodes.len() {
            0..=2 => &[],
            len => &self.nodes[1..len - 1],
        }
    }

    pub fn legs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.nodes.windows(2).map(|leg| (leg[0], leg[1]))
    }
}

/// Greedy tour that always walks to the closest unvisited stop.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighbor;

impl Sequencer for NearestNeighbor {
    fn kind(&self) -> TourKind {
        TourKind::Optimized
    }

    fn sequence(
        &self,
        nodes: &NodeSet,
        matrix: &DistanceMatrix,
        _diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Tour, RouteError> {
        let mut unvisited: Vec<usize> = nodes.stop_indices().collect();
        let mut current = nodes.start_index();
        let mut order = vec![current];

        while !unvisited.is_empty() {
            // Strict comparison keeps the first stop on ties.
            let mut nearest: Option<(usize, usize)> = None;
            for (position, &candidate) in unvisited.iter().enumerate() {
                if let Some(cost) = matrix.cost(current, candidate) {
                    if nearest.map_or(true, |(_, best)| cost < best) {
                        nearest = Some((position, cost));
                    }
                }
            }

            let Some((position, cost)) = nearest else {
                let stops: Vec<_> = unvisited.iter().map(|&index| nodes.node(index).id).collect();
                error!(
                    "no stop reachable from {}, {} left unvisited",
                    nodes.node(current).id,
                    stops.len()
                );
                return Err(RouteError::RouteUnreachable { stops });
            };

            current = unvisited.remove(position);
            debug!("next stop {} at cost {cost}", nodes.node(current).id);
            order.push(current);
        }

        let end = nodes.end_index();
        if matrix.cost(current, end).is_none() {
            warn!("end unreachable from {}", nodes.node(current).id);
        }
        order.push(end);

        Ok(Tour {
            kind: self.kind(),
            nodes: order,
        })
    }
}

/// Stops in the order they were first requested.
///
/// A stop unreachable from the current position is skipped, not fatal.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestOrder;

impl Sequencer for RequestOrder {
    fn kind(&self) -> TourKind {
        TourKind::Baseline
    }

    fn sequence(
        &self,
        nodes: &NodeSet,
        matrix: &DistanceMatrix,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Tour, RouteError> {
        let mut current = nodes.start_index();
        let mut order = vec![current];

        for stop in nodes.stop_indices() {
            if matrix.cost(current, stop).is_none() {
                let id = nodes.node(stop).id;
                warn!("baseline skips {id}, unreachable from {}", nodes.node(current).id);
                diagnostics.push(Diagnostic::StopSkipped { stop: id });
                continue;
            }
            order.push(stop);
            current = stop;
        }

        let end = nodes.end_index();
        if matrix.cost(current, end).is_none() {
            warn!("end unreachable from {}", nodes.node(current).id);
        }
        order.push(end);

        Ok(Tour {
            kind: self.kind(),
            nodes: order,
        })
    }
}
