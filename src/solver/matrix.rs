use super::Deadline;
use crate::algorithm::a_star_search;
use crate::common::{NodeSet, Path};
use crate::error::RouteError;
use crate::map::Map;
use crate::stat::Stats;

use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leg {
    pub path: Path,
    pub cost: usize,
}

/// Shortest legs between every ordered pair of nodes, `None` when unreachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMatrix {
    size: usize,
    legs: Vec<Option<Leg>>,
}

impl DistanceMatrix {
    pub fn build(
        map: &Map,
        nodes: &NodeSet,
        parallel: bool,
        deadline: Option<&Deadline>,
        stats: &mut Stats,
    ) -> Result<Self, RouteError> {
        let started = Instant::now();
        let size = nodes.len();
        let pairs: Vec<(usize, usize)> = (0..size)
            .flat_map(|from| (0..size).map(move |to| (from, to)))
            .collect();

        // Each pair owns its own slot in the collected output.
        let compute = |&(from, to): &(usize, usize)| -> Result<(Option<Leg>, Stats), RouteError> {
            if let Some(deadline) = deadline {
                deadline.check()?;
            }

            let mut leg_stats = Stats::default();
            let from_node = nodes.node(from);
            if from == to {
                let path = vec![from_node.coord];
                return Ok((Some(Leg { path, cost: 0 }), leg_stats));
            }

            let to_node = nodes.node(to);
            let leg = a_star_search(map, from_node.coord, to_node.coord, &mut leg_stats)
                .map(|(path, cost)| Leg { path, cost });
            if leg.is_none() {
                debug!("no path from {} to {}", from_node.id, to_node.id);
            }
            Ok((leg, leg_stats))
        };

        let results: Vec<(Option<Leg>, Stats)> = if parallel {
            pairs.par_iter().map(compute).collect::<Result<_, _>>()?
        } else {
            pairs.iter().map(compute).collect::<Result<_, _>>()?
        };

        let mut legs = Vec::with_capacity(results.len());
        for (leg, leg_stats) in results {
            stats.absorb(&leg_stats);
            legs.push(leg);
        }
        stats.matrix_time_us = started.elapsed().as_micros() as usize;

        info!(
            "distance matrix over {size} nodes, {} unreachable legs",
            stats.unreachable_legs
        );
        Ok(DistanceMatrix { size, legs })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn leg(&self, from: usize, to: usize) -> Option<&Leg> {
        self.legs[from * self.size + to].as_ref()
    }

    pub fn cost(&self, from: usize, to: usize) -> Option<usize> {
        self.leg(from, to).map(|leg| leg.cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{Coord, PickRequestItem};
    use crate::layout::Facing;
    use std::time::Duration;

    fn item(shelf_id: u32, x: usize, y: usize, facing: Facing) -> PickRequestItem {
        PickRequestItem {
            master_item_id: format!("SKU-{shelf_id}"),
            quantity: 1,
            shelf_id,
            location: Coord::new(x, y),
            facing,
        }
    }

    fn nodes_for(map: &Map, items: &[PickRequestItem]) -> NodeSet {
        NodeSet::build(
            map,
            items,
            map.default_entry(),
            map.default_exit(),
            &mut Vec::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_matrix_costs_and_paths() {
        let map = Map::warehouse(7, 7).unwrap();
        let nodes = nodes_for(
            &map,
            &[item(1, 1, 1, Facing::North), item(30, 5, 5, Facing::South)],
        );
        let stats = &mut Stats::default();
        let matrix = DistanceMatrix::build(&map, &nodes, false, None, stats).unwrap();

        assert_eq!(matrix.size(), 4);
        assert_eq!(matrix.cost(0, 1), Some(4));
        assert_eq!(matrix.cost(0, 2), Some(8));
        assert_eq!(matrix.cost(1, 2), Some(12));
        assert_eq!(matrix.cost(1, 3), Some(8));
        assert_eq!(matrix.cost(2, 3), Some(4));
        assert_eq!(matrix.cost(2, 2), Some(0));

        let leg = matrix.leg(0, 1).unwrap();
        assert_eq!(leg.path.first(), Some(&Coord::new(0, 3)));
        assert_eq!(leg.path.last(), Some(&Coord::new(1, 0)));

        // Diagonal is never searched.
        assert_eq!(stats.pathfinding_calls, 12);
    }

    #[test]
    fn test_matrix_is_symmetric() {
        let map = Map::warehouse(9, 9).unwrap();
        let nodes = nodes_for(
            &map,
            &[
                item(1, 1, 1, Facing::North),
                item(2, 4, 3, Facing::South),
                item(3, 7, 5, Facing::North),
                item(4, 2, 7, Facing::South),
            ],
        );
        let matrix =
            DistanceMatrix::build(&map, &nodes, true, None, &mut Stats::default()).unwrap();

        for a in 0..matrix.size() {
            for b in 0..matrix.size() {
                assert_eq!(matrix.cost(a, b), matrix.cost(b, a), "{a} <-> {b}");
            }
        }
    }

    #[test]
    fn test_matrix_parallel_matches_sequential() {
        let map = Map::warehouse(11, 9).unwrap();
        let nodes = nodes_for(
            &map,
            &[
                item(1, 3, 1, Facing::North),
                item(2, 8, 3, Facing::South),
                item(3, 5, 7, Facing::North),
                item(4, 1, 5, Facing::East),
            ],
        );
        let sequential_stats = &mut Stats::default();
        let parallel_stats = &mut Stats::default();
        let sequential =
            DistanceMatrix::build(&map, &nodes, false, None, sequential_stats).unwrap();
        let parallel = DistanceMatrix::build(&map, &nodes, true, None, parallel_stats).unwrap();

        assert_eq!(sequential, parallel);
        assert_eq!(sequential_stats.expanded_nodes, parallel_stats.expanded_nodes);
        assert_eq!(sequential_stats.unreachable_legs, parallel_stats.unreachable_legs);
    }

    #[test]
    fn test_matrix_obstacle_stop_unreachable() {
        let map = Map::warehouse(7, 7).unwrap();
        let nodes = nodes_for(&map, &[item(5, 3, 1, Facing::East)]);
        let stats = &mut Stats::default();
        let matrix = DistanceMatrix::build(&map, &nodes, false, None, stats).unwrap();

        assert_eq!(matrix.cost(0, 1), None);
        assert_eq!(matrix.cost(1, 2), None);
        // Row 3 is a shelf row, so start to end detours through an aisle.
        assert_eq!(matrix.cost(0, 2), Some(8));
        assert_eq!(stats.unreachable_legs, 4);
    }

    #[test]
    fn test_matrix_deadline_aborts() {
        let map = Map::warehouse(7, 7).unwrap();
        let nodes = nodes_for(&map, &[item(1, 1, 1, Facing::North)]);
        let deadline = Deadline::after(Duration::ZERO);

        for parallel in [false, true] {
            let result = DistanceMatrix::build(
                &map,
                &nodes,
                parallel,
                Some(&deadline),
                &mut Stats::default(),
            );
            assert_eq!(result, Err(RouteError::TimedOut { limit_ms: 0 }));
        }
    }
}
