mod astar;

pub use astar::a_star_search;

use std::collections::HashMap;

use crate::common::{Coord, Path};

type Trace = HashMap<Coord, Coord>;

fn heuristic(position: Coord, goal: Coord) -> usize {
    // Manhattan distance, admissible and consistent on a 4-connected unit-cost grid.
    position.manhattan(goal)
}

fn construct_path(trace: &Trace, mut current: Coord) -> Path {
    let mut path = vec![current];
    while let Some(&previous) = trace.get(&current) {
        path.push(previous);
        current = previous;
    }
    path.reverse();
    path
}
