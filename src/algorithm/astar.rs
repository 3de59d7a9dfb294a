use super::{construct_path, heuristic};
use crate::common::{Coord, OpenNode, Path};
use crate::map::Map;
use crate::stat::Stats;

use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, instrument, trace};

/// Shortest 4-connected path from `start` to `goal`, with its step count.
///
/// Returns `None` when either endpoint is outside the map or no walkable
/// route exists. Obstacle tiles have no neighbours, so an obstacle endpoint
/// is only reachable when `start == goal`.
#[instrument(skip_all, name = "a_star", fields(start = %start, goal = %goal), level = "debug")]
pub fn a_star_search(
    map: &Map,
    start: Coord,
    goal: Coord,
    stats: &mut Stats,
) -> Option<(Path, usize)> {
    stats.pathfinding_calls += 1;

    if !map.in_bounds(start) || !map.in_bounds(goal) {
        debug!("endpoint outside the {}x{} map", map.width, map.height);
        stats.unreachable_legs += 1;
        return None;
    }

    let mut open_list = BTreeSet::new();
    let mut open_index: HashMap<Coord, OpenNode> = HashMap::new();
    let mut closed_list = HashSet::new();
    let mut trace = HashMap::new();
    let mut sequence = 0;

    let start_node = OpenNode {
        position: start,
        f_open_cost: heuristic(start, goal),
        g_cost: 0,
        sequence,
    };
    open_list.insert(start_node.clone());
    open_index.insert(start, start_node);

    while let Some(current) = open_list.pop_first() {
        trace!("expand node: {current:?}");
        open_index.remove(&current.position);

        // Update stats.
        stats.expanded_nodes += 1;

        if current.position == goal {
            return Some((construct_path(&trace, goal), current.g_cost));
        }

        closed_list.insert(current.position);

        // Assuming uniform cost.
        let tentative_g_cost = current.g_cost + 1;

        for &neighbor in map.neighbors(current.position) {
            if closed_list.contains(&neighbor) {
                continue;
            }

            let h_open_cost = heuristic(neighbor, goal);
            let node_sequence = match open_index.get(&neighbor) {
                None => {
                    sequence += 1;
                    sequence
                }
                Some(existing) if tentative_g_cost < existing.g_cost => {
                    open_list.remove(existing);
                    existing.sequence
                }
                Some(_) => continue,
            };

            let node = OpenNode {
                position: neighbor,
                f_open_cost: tentative_g_cost + h_open_cost,
                g_cost: tentative_g_cost,
                sequence: node_sequence,
            };
            open_list.insert(node.clone());
            open_index.insert(neighbor, node);
            trace.insert(neighbor, current.position);
        }
    }

    debug!("cannot find path");
    stats.unreachable_legs += 1;
    None
}
