//! Error and diagnostic types for route computation.

use std::fmt;

use thiserror::Error;

use crate::common::{Coord, NodeId, TourKind};
use crate::layout::Facing;

/// Request rejected before any pathfinding happens.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("malformed request: {0}")]
    Malformed(String),

    #[error("no items to pick")]
    EmptyPicklist,

    #[error("item #{index} has no master item id")]
    MissingItemId { index: usize },

    #[error("item #{index} ({master_item_id}) has no shelf location")]
    MissingLocation { index: usize, master_item_id: String },

    #[error("item #{index} ({master_item_id}) has no facing")]
    MissingFacing { index: usize, master_item_id: String },

    #[error("item #{index} ({master_item_id}) has unknown facing {value:?}")]
    UnknownFacing {
        index: usize,
        master_item_id: String,
        value: String,
    },

    #[error("item #{index} ({master_item_id}) has non-positive quantity")]
    InvalidQuantity { index: usize, master_item_id: String },

    #[error("room {width}x{height} is smaller than 3x3")]
    RoomTooSmall { width: usize, height: usize },

    #[error("shelf location {location} of item {master_item_id} lies outside the {width}x{height} room")]
    LocationOutOfBounds {
        master_item_id: String,
        location: Coord,
        width: usize,
        height: usize,
    },

    #[error("{which} point {coord} lies outside the {width}x{height} room")]
    TerminalOutOfBounds {
        which: &'static str,
        coord: Coord,
        width: usize,
        height: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InputError),

    #[error("no reachable next stop, unreachable stops: {}", join_ids(.stops))]
    RouteUnreachable { stops: Vec<NodeId> },

    #[error("route computation exceeded the {limit_ms} ms time limit")]
    TimedOut { limit_ms: u64 },
}

fn join_ids(ids: &[NodeId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    OutOfBounds,
    Obstacle,
    UnsupportedFacing,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::OutOfBounds => write!(f, "access point outside the room"),
            FallbackReason::Obstacle => write!(f, "access point is an obstacle"),
            FallbackReason::UnsupportedFacing => write!(f, "facing has no access rule"),
        }
    }
}

/// Non-fatal conditions met while computing a route.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    AccessPointFallback {
        stop: NodeId,
        block: Coord,
        facing: Facing,
        reason: FallbackReason,
    },
    StopSkipped {
        stop: NodeId,
    },
    LegUnreachable {
        tour: TourKind,
        from: NodeId,
        to: NodeId,
    },
    MapSizeMismatch {
        requested: (usize, usize),
        actual: (usize, usize),
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::AccessPointFallback {
                stop,
                block,
                facing,
                reason,
            } => write!(
                f,
                "stop {stop}: {reason} for facing {facing}, using shelf block {block}"
            ),
            Diagnostic::StopSkipped { stop } => {
                write!(f, "baseline tour skipped unreachable stop {stop}")
            }
            Diagnostic::LegUnreachable { tour, from, to } => {
                write!(f, "{tour} tour: no path from {from} to {to}")
            }
            Diagnostic::MapSizeMismatch { requested, actual } => write!(
                f,
                "requested room {}x{} ignored, floor plan is {}x{}",
                requested.0, requested.1, actual.0, actual.1
            ),
        }
    }
}
