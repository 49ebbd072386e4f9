//! Arrangement of workers into a 2-D grid of tiles.
//!
//! Tile columns split the x axis (`i`) and tile rows split the y axis (`j`).
//! Rank `r` sits at row `r / cols`, column `r % cols`. "Up" is the tile with
//! the next smaller row, i.e. smaller `j`.

use crate::error::{Result, SweError};
use crate::global_grid::GlobalGrid;
use crate::index_partition::{tile_range, IndexRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Up,
    Down,
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Up, Side::Down, Side::Left, Side::Right];

    pub fn opposite(self) -> Self {
        match self {
            Side::Up => Side::Down,
            Side::Down => Side::Up,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::Up => 0,
            Side::Down => 1,
            Side::Left => 2,
            Side::Right => 3,
        }
    }

    /// Whether this side faces along the x axis.
    pub fn is_x_face(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileTopology {
    pub num_workers: usize,
    pub rows: usize,
    pub cols: usize,
    pub periodic: bool,
}

impl TileTopology {
    pub fn new(num_workers: usize, periodic: bool) -> Result<Self> {
        if num_workers == 0 {
            return Err(SweError::InvalidParameter(
                "need at least one worker to build a tile topology".to_owned(),
            ));
        }

        let (rows, cols) = near_square_factors(num_workers);

        Ok(TileTopology {
            num_workers,
            rows,
            cols,
            periodic,
        })
    }

    pub fn coords(&self, rank: usize) -> (usize, usize) {
        (rank / self.cols, rank % self.cols)
    }

    pub fn rank_of(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub fn neighbor(&self, rank: usize, side: Side) -> Option<usize> {
        let (row, col) = self.coords(rank);

        let (row, col) = match side {
            Side::Up => (self.step(row, -1, self.rows)?, col),
            Side::Down => (self.step(row, 1, self.rows)?, col),
            Side::Left => (row, self.step(col, -1, self.cols)?),
            Side::Right => (row, self.step(col, 1, self.cols)?),
        };

        Some(self.rank_of(row, col))
    }

    /// Neighbours indexed by `Side::index`.
    pub fn neighbors(&self, rank: usize) -> [Option<usize>; 4] {
        let mut neighbors = [None; 4];
        for &side in &Side::ALL {
            neighbors[side.index()] = self.neighbor(rank, side);
        }
        neighbors
    }

    /// Lays every tile of this topology over `grid`.
    pub fn decompose(&self, grid: &GlobalGrid) -> Result<Vec<TileDescriptor>> {
        (0..self.num_workers)
            .map(|rank| self.tile(rank, grid))
            .collect()
    }

    pub fn tile(&self, rank: usize, grid: &GlobalGrid) -> Result<TileDescriptor> {
        let (row, col) = self.coords(rank);

        Ok(TileDescriptor {
            rank,
            row,
            col,
            i_range: tile_range("x", grid.im, col + 1, self.cols)?,
            j_range: tile_range("y", grid.jm, row + 1, self.rows)?,
            neighbors: self.neighbors(rank),
        })
    }

    fn step(&self, idx: usize, delta: isize, extent: usize) -> Option<usize> {
        let moved = idx as isize + delta;

        if self.periodic {
            Some(moved.rem_euclid(extent as isize) as usize)
        } else if moved < 0 || moved >= extent as isize {
            None
        } else {
            Some(moved as usize)
        }
    }
}

/// Everything a worker needs to know about the tile it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileDescriptor {
    pub rank: usize,
    pub row: usize,
    pub col: usize,
    pub i_range: IndexRange,
    pub j_range: IndexRange,
    pub neighbors: [Option<usize>; 4],
}

impl TileDescriptor {
    pub fn neighbor(&self, side: Side) -> Option<usize> {
        self.neighbors[side.index()]
    }

    pub fn is_global_edge(&self, side: Side) -> bool {
        self.neighbor(side).is_none()
    }

    pub fn local_im(&self) -> usize {
        self.i_range.len()
    }

    pub fn local_jm(&self) -> usize {
        self.j_range.len()
    }
}

/// Factors `n` as `rows * cols` with `rows <= cols` as close together as possible.
fn near_square_factors(n: usize) -> (usize, usize) {
    let mut rows = 1;
    let mut candidate = 1;
    while candidate * candidate <= n {
        if n % candidate == 0 {
            rows = candidate;
        }
        candidate += 1;
    }
    (rows, n / rows)
}
