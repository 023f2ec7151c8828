//! Immutable adjacency structure over a rectangular grid of digit values.

use std::collections::BTreeSet;

use crate::schema::GridSpec;

use super::SearchError;

/// Grid coordinate as `(x, y)`.
pub type Coord = (usize, usize);

/// A single grid cell: coordinates plus its digit value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Column index, `0 <= x < width`.
    pub x: usize,
    /// Row index, `0 <= y < height`.
    pub y: usize,
    /// Non-negative cell value.
    pub value: u8,
}

impl Cell {
    /// Coordinate pair of this cell.
    #[inline]
    pub fn coords(&self) -> Coord {
        (self.x, self.y)
    }
}

/// Orthogonal neighbor offsets.
const ORTHOGONAL: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Diagonal neighbor offsets, appended when 8-connectivity is enabled.
const DIAGONAL: [(i64, i64); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];

/// Immutable adjacency structure over a rectangular grid of cell values.
///
/// Owns all cell values in row-major order and answers 4- or 8-connected
/// neighbor queries. Built once, then shared by reference with every
/// grouping operation that needs adjacency.
#[derive(Debug, Clone)]
pub struct GridGraph {
    width: usize,
    height: usize,
    values: Vec<u8>,
    diagonals: bool,
}

impl GridGraph {
    /// Build a graph from a parsed grid, with the given adjacency mode.
    pub fn from_spec(spec: &GridSpec, diagonals: bool) -> Self {
        let values = spec.rows().iter().flatten().copied().collect();
        Self {
            width: spec.width(),
            height: spec.height(),
            values,
            diagonals,
        }
    }

    /// Build a graph directly from row-major rows. Rows must be equal length.
    pub fn from_rows(rows: &[Vec<u8>], diagonals: bool) -> Self {
        let width = rows.first().map_or(0, Vec::len);
        debug_assert!(rows.iter().all(|r| r.len() == width));
        Self {
            width,
            height: rows.len(),
            values: rows.iter().flatten().copied().collect(),
            diagonals,
        }
    }

    /// Grid width in cells.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Whether diagonal adjacency is enabled.
    #[inline]
    pub fn diagonals(&self) -> bool {
        self.diagonals
    }

    /// Cell at `(x, y)`, or `None` if outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        if x < self.width && y < self.height {
            Some(Cell {
                x,
                y,
                value: self.values[y * self.width + x],
            })
        } else {
            None
        }
    }

    /// Cell at `(x, y)`, failing with `OutOfBounds` when the coordinate is
    /// not on the grid. Out-of-bounds lookups are contract violations by the
    /// caller; grouping growth never requests invalid coordinates.
    pub fn lookup(&self, x: usize, y: usize) -> Result<Cell, SearchError> {
        self.get(x, y).ok_or(SearchError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })
    }

    /// All adjacent cells of `(x, y)` that exist on the grid.
    pub fn neighbors(&self, x: usize, y: usize) -> Vec<Cell> {
        self.neighbors_excluding(x, y, &BTreeSet::new())
    }

    /// Adjacent cells of `(x, y)` that exist on the grid and are not in
    /// `exclude`. Pure function of the grid and its arguments.
    pub fn neighbors_excluding(&self, x: usize, y: usize, exclude: &BTreeSet<Coord>) -> Vec<Cell> {
        let diagonal: &[(i64, i64)] = if self.diagonals { &DIAGONAL } else { &[] };

        let mut out = Vec::with_capacity(ORTHOGONAL.len() + diagonal.len());
        for &(dx, dy) in ORTHOGONAL.iter().chain(diagonal) {
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            if nx < 0 || ny < 0 {
                continue;
            }
            let (nx, ny) = (nx as usize, ny as usize);
            if exclude.contains(&(nx, ny)) {
                continue;
            }
            if let Some(cell) = self.get(nx, ny) {
                out.push(cell);
            }
        }
        out
    }
}
