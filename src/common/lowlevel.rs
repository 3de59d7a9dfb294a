use super::Coord;

use std::cmp::Ordering;

#[derive(Clone, Eq, Debug, PartialEq, Hash)]
pub(crate) struct OpenNode {
    pub(crate) position: Coord,
    pub(crate) f_open_cost: usize,
    pub(crate) g_cost: usize,
    // Order of first insertion into the open list. A relaxed node keeps its
    // first sequence, so equal-f ties always resolve the same way.
    pub(crate) sequence: usize,
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_open_cost
            .cmp(&other.f_open_cost)
            .then_with(|| self.sequence.cmp(&other.sequence))
            .then_with(|| self.position.cmp(&other.position))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
