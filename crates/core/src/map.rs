//! Map module - static occupancy grid
//!
//! The map is a rectangular grid of cell codes stored as a flat row-major array.
//! `0` is open floor, any other value is a wall variant whose base color comes
//! from the wall palette.
//!
//! Coordinates: `(col, row)` where col grows to the right (+x) and row grows
//! downward (+y). A continuous position `(x, y)` lies in cell
//! `(floor(x), floor(y))`.
//!
//! Construction enforces a complete ring of walls around the border so every
//! ray cast from an open cell terminates on a wall.

use std::str::FromStr;

use crate::error::InvalidMapError;

/// Open floor cell code
pub const EMPTY: u8 = 0;

/// Largest supported width/height in cells
pub const MAX_MAP_SIDE: usize = 4096;

/// Minimum width/height in cells (one open cell plus its enclosing ring)
pub const MIN_MAP_SIDE: usize = 3;

/// Immutable 2D occupancy grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMap {
    width: usize,
    height: usize,
    /// Flat array of cell codes, row-major order (row * width + col)
    cells: Vec<u8>,
}

impl GridMap {
    /// Build a map from literal rows.
    ///
    /// Fails if the grid is empty, smaller than 3x3, ragged, or has an open cell
    /// on its border.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, InvalidMapError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(InvalidMapError::Empty);
        }

        let mut cells = Vec::with_capacity(width * height);
        for (row, r) in rows.iter().enumerate() {
            let r = r.as_ref();
            if r.len() != width {
                return Err(InvalidMapError::Ragged {
                    row,
                    expected: width,
                    found: r.len(),
                });
            }
            cells.extend_from_slice(r);
        }

        Self::from_cells(width, height, cells)
    }

    fn from_cells(width: usize, height: usize, cells: Vec<u8>) -> Result<Self, InvalidMapError> {
        if width < MIN_MAP_SIDE || height < MIN_MAP_SIDE {
            return Err(InvalidMapError::TooSmall { width, height });
        }
        if width > MAX_MAP_SIDE || height > MAX_MAP_SIDE {
            return Err(InvalidMapError::TooLarge {
                width,
                height,
                max: MAX_MAP_SIDE,
            });
        }

        let map = Self {
            width,
            height,
            cells,
        };
        map.check_enclosed()?;
        Ok(map)
    }

    /// The outside of the grid touches every border cell, so an open cell is
    /// reachable from outside exactly when some border cell is open.
    fn check_enclosed(&self) -> Result<(), InvalidMapError> {
        let last_col = self.width - 1;
        let last_row = self.height - 1;
        let border = (0..self.width)
            .flat_map(|col| [(col, 0), (col, last_row)])
            .chain((0..self.height).flat_map(|row| [(0, row), (last_col, row)]));

        for (col, row) in border {
            if self.cells[row * self.width + col] == EMPTY {
                return Err(InvalidMapError::OpenBoundary { col, row });
            }
        }
        Ok(())
    }

    /// Get width and height in cells
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Calculate flat index from (col, row)
    #[inline(always)]
    fn index(&self, col: i64, row: i64) -> Option<usize> {
        if col < 0 || row < 0 || col >= self.width as i64 || row >= self.height as i64 {
            return None;
        }
        Some((row as usize) * self.width + (col as usize))
    }

    /// Get the cell code at (col, row)
    /// Returns None if out of bounds
    #[inline]
    pub fn cell_at(&self, col: i64, row: i64) -> Option<u8> {
        self.index(col, row).map(|i| self.cells[i])
    }

    /// Whether a cell code is a wall variant
    #[inline(always)]
    pub fn is_wall(code: u8) -> bool {
        code != EMPTY
    }

    /// Whether (col, row) blocks movement. Out-of-bounds cells count as walls.
    #[inline]
    pub fn is_wall_cell(&self, col: i64, row: i64) -> bool {
        self.cell_at(col, row).map(Self::is_wall).unwrap_or(true)
    }

    /// Whether the continuous point (x, y) lies inside a wall cell.
    ///
    /// Non-finite coordinates are treated as inside a wall.
    pub fn is_wall_at(&self, x: f64, y: f64) -> bool {
        if !x.is_finite() || !y.is_finite() {
            return true;
        }
        self.is_wall_cell(x.floor() as i64, y.floor() as i64)
    }

    /// Upper bound on DDA steps for any ray starting inside the map.
    ///
    /// A grid walk crosses at most one column line per column and one row line
    /// per row, so `width + height` steps always reach the border ring.
    pub fn max_ray_steps(&self) -> usize {
        self.width + self.height
    }

    /// Length of the map diagonal in cells
    pub fn diagonal(&self) -> f64 {
        (self.width as f64).hypot(self.height as f64)
    }

    /// Iterate over `(col, row, code)` for every cell
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, u8)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &code)| (i % self.width, i / self.width, code))
    }
}

impl FromStr for GridMap {
    type Err = InvalidMapError;

    /// Parse a map literal: one line per row, one decimal digit per cell.
    ///
    /// Blank lines and surrounding whitespace are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows: Vec<Vec<u8>> = Vec::new();
        for line in s.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let row = rows.len();
            let parsed = line
                .chars()
                .enumerate()
                .map(|(col, ch)| {
                    ch.to_digit(10)
                        .map(|d| d as u8)
                        .ok_or(InvalidMapError::InvalidCell { col, row, found: ch })
                })
                .collect::<Result<Vec<u8>, _>>()?;
            rows.push(parsed);
        }
        Self::from_rows(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(width: usize, height: usize) -> Vec<Vec<u8>> {
        (0..height)
            .map(|row| {
                (0..width)
                    .map(|col| {
                        let edge = row == 0 || col == 0 || row == height - 1 || col == width - 1;
                        u8::from(edge)
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn enclosed_map_is_accepted() {
        let map = GridMap::from_rows(&ring(5, 4)).unwrap();
        assert_eq!(map.dimensions(), (5, 4));
        assert_eq!(map.cell_at(2, 2), Some(EMPTY));
        assert_eq!(map.cell_at(0, 2), Some(1));
    }

    #[test]
    fn empty_map_is_rejected() {
        let rows: Vec<Vec<u8>> = Vec::new();
        assert_eq!(GridMap::from_rows(&rows), Err(InvalidMapError::Empty));
        assert_eq!(GridMap::from_rows(&[Vec::<u8>::new()]), Err(InvalidMapError::Empty));
    }

    #[test]
    fn ragged_map_is_rejected() {
        let mut rows = ring(4, 4);
        rows[2].push(1);
        assert_eq!(
            GridMap::from_rows(&rows),
            Err(InvalidMapError::Ragged {
                row: 2,
                expected: 4,
                found: 5
            })
        );
    }

    #[test]
    fn open_border_is_rejected() {
        let mut rows = ring(5, 5);
        rows[4][2] = 0;
        assert_eq!(
            GridMap::from_rows(&rows),
            Err(InvalidMapError::OpenBoundary { col: 2, row: 4 })
        );
    }

    #[test]
    fn tiny_map_is_rejected() {
        let rows = vec![vec![1u8, 1], vec![1, 1]];
        assert_eq!(
            GridMap::from_rows(&rows),
            Err(InvalidMapError::TooSmall {
                width: 2,
                height: 2
            })
        );
    }

    #[test]
    fn out_of_bounds_cells_block() {
        let map = GridMap::from_rows(&ring(3, 3)).unwrap();
        assert_eq!(map.cell_at(-1, 0), None);
        assert_eq!(map.cell_at(3, 1), None);
        assert!(map.is_wall_cell(-1, 0));
        assert!(!map.is_wall_at(1.5, 1.5));
        assert!(map.is_wall_at(0.99, 1.5));
        assert!(map.is_wall_at(f64::NAN, 1.5));
    }

    #[test]
    fn parses_digit_literal() {
        let map: GridMap = "
            1111
            1021
            1111
        "
        .parse()
        .unwrap();
        assert_eq!(map.dimensions(), (4, 3));
        assert_eq!(map.cell_at(2, 1), Some(2));
    }

    #[test]
    fn parse_rejects_non_digits() {
        let err = "111\n1x1\n111".parse::<GridMap>().unwrap_err();
        assert_eq!(
            err,
            InvalidMapError::InvalidCell {
                col: 1,
                row: 1,
                found: 'x'
            }
        );
    }
}
