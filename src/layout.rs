use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::common::Coord;
use crate::error::FallbackReason;
use crate::map::Map;

/// Side of a shelf block the picked items face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Facing {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "E")]
    East,
    #[serde(rename = "W")]
    West,
}

impl Facing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Facing::North => "N",
            Facing::South => "S",
            Facing::East => "E",
            Facing::West => "W",
        }
    }
}

impl fmt::Display for Facing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Facing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "N" | "n" => Ok(Facing::North),
            "S" | "s" => Ok(Facing::South),
            "E" | "e" => Ok(Facing::East),
            "W" | "w" => Ok(Facing::West),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessPoint {
    pub coord: Coord,
    /// Set when `coord` is the shelf block itself rather than an aisle cell.
    pub fallback: Option<FallbackReason>,
}

/// Aisle cell a worker stands in to pick from `facing` of the block at `block`.
///
/// Only N and S have an access rule. Anything that does not land on a
/// walkable in-room cell degrades to the block coordinate, which may itself
/// be an obstacle.
pub fn resolve_access_point(map: &Map, block: Coord, facing: Facing) -> AccessPoint {
    let candidate = match facing {
        Facing::North => block.y.checked_sub(1).map(|y| Coord::new(block.x, y)),
        Facing::South => Some(Coord::new(block.x, block.y + 1)),
        Facing::East | Facing::West => {
            return fallback(block, FallbackReason::UnsupportedFacing);
        }
    };

    match candidate {
        Some(coord) if !map.in_bounds(coord) => fallback(block, FallbackReason::OutOfBounds),
        Some(coord) if !map.is_passable(coord) => fallback(block, FallbackReason::Obstacle),
        Some(coord) => {
            trace!("access point for {block} facing {facing}: {coord}");
            AccessPoint {
                coord,
                fallback: None,
            }
        }
        None => fallback(block, FallbackReason::OutOfBounds),
    }
}

fn fallback(block: Coord, reason: FallbackReason) -> AccessPoint {
    AccessPoint {
        coord: block,
        fallback: Some(reason),
    }
}

/// One pickable face of a shelf block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShelfSlot {
    pub shelf_id: u32,
    pub block: Coord,
    pub facing: Facing,
}

/// Numbers every N/S face that opens onto an aisle, row-major, starting at 1.
pub fn shelf_slots(map: &Map) -> Vec<ShelfSlot> {
    let mut slots = Vec::new();
    let mut next_id = 1;

    for y in 0..map.height {
        for x in 0..map.width {
            let block = Coord::new(x, y);
            if map.is_passable(block) {
                continue;
            }
            for facing in [Facing::North, Facing::South] {
                if resolve_access_point(map, block, facing).fallback.is_none() {
                    slots.push(ShelfSlot {
                        shelf_id: next_id,
                        block,
                        facing,
                    });
                    next_id += 1;
                }
            }
        }
    }

    slots
}
