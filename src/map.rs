use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context};

use crate::common::Coord;
use crate::error::InputError;

pub const MIN_ROOM_SIDE: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    passable: bool,
    pub neighbors: Vec<Coord>, // Walkable 4-neighbourhood, empty for obstacles
}

impl Tile {
    pub fn is_passable(&self) -> bool {
        self.passable
    }
}

/// Walkability grid, indexed `grid[y][x]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
    pub height: usize,
    pub width: usize,
    pub grid: Vec<Vec<Tile>>,
}

impl Map {
    /// Alternating aisle / shelf-block rows with a perimeter aisle.
    ///
    /// Shelf blocks fill the interior columns of every odd row `y < height - 1`.
    pub fn warehouse(width: usize, height: usize) -> Result<Self, InputError> {
        if width < MIN_ROOM_SIDE || height < MIN_ROOM_SIDE {
            return Err(InputError::RoomTooSmall { width, height });
        }

        let rows = (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| {
                        let shelf_row = y % 2 == 1 && y < height - 1;
                        let interior = x >= 1 && x < width - 1;
                        !(shelf_row && interior)
                    })
                    .collect()
            })
            .collect();

        Ok(Self::from_passable_rows(width, height, rows))
    }

    /// Parses the octile text format: `type`, `height H`, `width W` and `map`
    /// header lines followed by `H` rows where `.` is walkable.
    pub fn from_map_str(content: &str) -> anyhow::Result<Self> {
        let mut lines = content.lines();

        let _type = lines.next().ok_or_else(|| anyhow!("missing map type line"))?;
        let height = parse_header(lines.next(), "height")?;
        let width = parse_header(lines.next(), "width")?;
        let _map = lines.next().ok_or_else(|| anyhow!("missing map marker line"))?;

        if width < MIN_ROOM_SIDE || height < MIN_ROOM_SIDE {
            bail!("map {width}x{height} is smaller than {MIN_ROOM_SIDE}x{MIN_ROOM_SIDE}");
        }

        let mut rows = Vec::with_capacity(height);
        for (y, line) in lines.take(height).enumerate() {
            let row: Vec<bool> = line.trim_end().chars().map(|ch| ch == '.').collect();
            if row.len() != width {
                bail!("map row {y} has {} cells, expected {width}", row.len());
            }
            rows.push(row);
        }
        if rows.len() != height {
            bail!("map has {} rows, expected {height}", rows.len());
        }

        Ok(Self::from_passable_rows(width, height, rows))
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read map file {}", path.display()))?;
        Self::from_map_str(&content)
            .with_context(|| format!("failed to parse map file {}", path.display()))
    }

    fn from_passable_rows(width: usize, height: usize, rows: Vec<Vec<bool>>) -> Self {
        let grid = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|passable| Tile {
                        passable,
                        neighbors: Vec::new(),
                    })
                    .collect()
            })
            .collect();

        let mut map = Map {
            height,
            width,
            grid,
        };
        map.initialize_neighbors();
        map
    }

    fn initialize_neighbors(&mut self) {
        for y in 0..self.height {
            for x in 0..self.width {
                if self.grid[y][x].passable {
                    self.grid[y][x].neighbors = self.get_neighbors(x, y);
                }
            }
        }
    }

    pub fn get_neighbors(&self, x: usize, y: usize) -> Vec<Coord> {
        let directions = [(0, -1), (0, 1), (-1, 0), (1, 0)]; // Up, down, left, right
        let mut neighbors = Vec::new();

        for &(dx, dy) in &directions {
            let new_x = x as i64 + dx;
            let new_y = y as i64 + dy;
            if new_x >= 0
                && new_y >= 0
                && new_x < self.width as i64
                && new_y < self.height as i64
                && self.grid[new_y as usize][new_x as usize].passable
            {
                neighbors.push(Coord::new(new_x as usize, new_y as usize));
            }
        }

        neighbors
    }

    pub fn neighbors(&self, coord: Coord) -> &[Coord] {
        &self.grid[coord.y][coord.x].neighbors
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    pub fn is_passable(&self, coord: Coord) -> bool {
        self.in_bounds(coord) && self.grid[coord.y][coord.x].is_passable()
    }

    /// Vertical midpoint of the leftmost aisle column.
    pub fn default_entry(&self) -> Coord {
        Coord::new(0, self.height / 2)
    }

    /// Vertical midpoint of the rightmost aisle column.
    pub fn default_exit(&self) -> Coord {
        Coord::new(self.width - 1, self.height / 2)
    }

    pub fn walkable_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.height)
            .flat_map(move |y| (0..self.width).map(move |x| Coord::new(x, y)))
            .filter(|&coord| self.is_passable(coord))
    }
}

fn parse_header(line: Option<&str>, key: &str) -> anyhow::Result<usize> {
    let line = line.ok_or_else(|| anyhow!("missing {key} line"))?;
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(name), Some(value)) if name == key => value
            .parse::<usize>()
            .with_context(|| format!("invalid {key} value {value:?}")),
        _ => bail!("expected `{key} <n>`, got {line:?}"),
    }
}
