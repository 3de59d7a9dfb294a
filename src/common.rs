mod lowlevel;
mod node;
mod request;

pub(crate) use lowlevel::OpenNode;
pub use node::{Node, NodeId, NodeSet, PickLine, StopKey};
pub use request::{
    ItemInput, LocationInput, MetricsOutput, PickItemOutput, PickRequest, PickRequestItem,
    PickStepOutput, PointInput, RouteRequest, RouteResponse,
};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Grid cell or waypoint. `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Coord { x, y }
    }

    pub fn manhattan(&self, other: Coord) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(usize, usize)> for Coord {
    fn from((x, y): (usize, usize)) -> Self {
        Coord { x, y }
    }
}

/// Ordered waypoints, both endpoints included.
pub type Path = Vec<Coord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TourKind {
    Optimized,
    Baseline,
}

impl fmt::Display for TourKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TourKind::Optimized => write!(f, "optimized"),
            TourKind::Baseline => write!(f, "baseline"),
        }
    }
}
