use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub pathfinding_calls: usize,
    pub expanded_nodes: usize,
    pub unreachable_legs: usize,
    pub matrix_time_us: usize,
    pub total_time_us: usize,
}

impl Stats {
    pub(crate) fn absorb(&mut self, other: &Stats) {
        self.pathfinding_calls += other.pathfinding_calls;
        self.expanded_nodes += other.expanded_nodes;
        self.unreachable_legs += other.unreachable_legs;
    }

    pub fn print(&self) {
        info!(
            "Pathfinding calls {:?} Expanded nodes {:?} Unreachable legs {:?} Matrix time(microseconds) {:?} Total time(microseconds) {:?}",
            self.pathfinding_calls,
            self.expanded_nodes,
            self.unreachable_legs,
            self.matrix_time_us,
            self.total_time_us
        );
    }
}
