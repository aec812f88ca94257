//! Terrain Grid
//!
//! Fixed 16x8 playfield of cell types.
//! Every accessor is bounds-checked; out-of-range coordinates yield `None`
//! instead of touching memory outside the grid.

use std::fmt;
use serde::{Serialize, Deserialize};

/// Grid width in cells.
pub const GRID_WIDTH: usize = 16;

/// Grid height in cells.
pub const GRID_HEIGHT: usize = 8;

/// Total number of cells.
pub const GRID_CELLS: usize = GRID_WIDTH * GRID_HEIGHT;

/// Flat index of `(x, y)` in row-major order.
///
/// Callers must pass in-bounds coordinates; use [`Point::index`] when the
/// point has not been validated yet.
#[inline]
pub const fn ix(x: usize, y: usize) -> usize {
    y * GRID_WIDTH + x
}

// =============================================================================
// CELL TYPE
// =============================================================================

/// Terrain cell contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[derive(Default)]
pub enum CellType {
    /// Walkable floor
    #[default]
    Empty = 0,
    /// Solid wall
    Wall = 1,
    /// Crate that explosions clear
    Destructible = 2,
}

impl CellType {
    /// Get cell type from its wire/hash value.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(CellType::Empty),
            1 => Some(CellType::Wall),
            2 => Some(CellType::Destructible),
            _ => None,
        }
    }

    /// Can a player stand on this cell?
    #[inline]
    pub fn is_walkable(self) -> bool {
        self == CellType::Empty
    }

    /// Character used by the debug frame and the level format.
    pub fn glyph(self) -> char {
        match self {
            CellType::Empty => '.',
            CellType::Wall => '#',
            CellType::Destructible => '+',
        }
    }
}

// =============================================================================
// POINT
// =============================================================================

/// A cell coordinate.
///
/// Fields are public so packets and level data can build points freely;
/// [`Point::is_in_bounds`] must hold before a point is used to index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Column (0 = left)
    pub x: u8,
    /// Row (0 = top)
    pub y: u8,
}

impl Point {
    /// Create a point without validation.
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Create a point only if it lies inside the grid.
    pub fn checked(x: i32, y: i32) -> Option<Self> {
        if x < 0 || y < 0 || x >= GRID_WIDTH as i32 || y >= GRID_HEIGHT as i32 {
            return None;
        }
        Some(Self { x: x as u8, y: y as u8 })
    }

    /// Is this point inside the grid?
    #[inline]
    pub fn is_in_bounds(self) -> bool {
        (self.x as usize) < GRID_WIDTH && (self.y as usize) < GRID_HEIGHT
    }

    /// Flat index, or `None` when out of bounds.
    #[inline]
    pub fn index(self) -> Option<usize> {
        if self.is_in_bounds() {
            Some(ix(self.x as usize, self.y as usize))
        } else {
            None
        }
    }

    /// Point shifted by `(dx, dy)`, or `None` if that leaves the grid.
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        Self::checked(self.x as i32 + dx, self.y as i32 + dy)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

// =============================================================================
// TERRAIN GRID
// =============================================================================

/// The playfield.
///
/// Stored as rows so serde can derive over the fixed-size arrays; the
/// logical layout is still `y * GRID_WIDTH + x`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainGrid {
    rows: [[CellType; GRID_WIDTH]; GRID_HEIGHT],
}

impl Default for TerrainGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl TerrainGrid {
    /// Create an all-empty grid.
    pub fn new() -> Self {
        Self {
            rows: [[CellType::Empty; GRID_WIDTH]; GRID_HEIGHT],
        }
    }

    /// Build a grid from row-major cells. Returns `None` unless exactly
    /// [`GRID_CELLS`] cells are supplied.
    pub fn from_cells(cells: &[CellType]) -> Option<Self> {
        if cells.len() != GRID_CELLS {
            return None;
        }
        let mut grid = Self::new();
        for (i, cell) in cells.iter().enumerate() {
            grid.rows[i / GRID_WIDTH][i % GRID_WIDTH] = *cell;
        }
        Some(grid)
    }

    /// Cell at `p`, `None` if out of bounds.
    #[inline]
    pub fn get(&self, p: Point) -> Option<CellType> {
        if !p.is_in_bounds() {
            return None;
        }
        Some(self.rows[p.y as usize][p.x as usize])
    }

    /// Cell at flat index `i`.
    pub fn get_index(&self, i: usize) -> Option<CellType> {
        if i >= GRID_CELLS {
            return None;
        }
        Some(self.rows[i / GRID_WIDTH][i % GRID_WIDTH])
    }

    /// Overwrite the cell at `p`. Returns false if out of bounds.
    #[inline]
    pub fn set(&mut self, p: Point, cell: CellType) -> bool {
        if !p.is_in_bounds() {
            return false;
        }
        self.rows[p.y as usize][p.x as usize] = cell;
        true
    }

    /// Is `p` inside the grid and empty?
    pub fn is_walkable(&self, p: Point) -> bool {
        matches!(self.get(p), Some(CellType::Empty))
    }

    /// Iterate all cells in `y * GRID_WIDTH + x` order.
    pub fn cells(&self) -> impl Iterator<Item = (Point, CellType)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, cell)| (Point::new(x as u8, y as u8), *cell))
        })
    }

    /// Number of cells of the given type.
    pub fn count(&self, cell: CellType) -> usize {
        self.cells().filter(|(_, c)| *c == cell).count()
    }
}

impl fmt::Display for TerrainGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for cell in row {
                write!(f, "{}", cell.glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_layout() {
        assert_eq!(ix(0, 0), 0);
        assert_eq!(ix(15, 0), 15);
        assert_eq!(ix(0, 1), 16);
        assert_eq!(ix(15, 7), GRID_CELLS - 1);
        assert_eq!(Point::new(3, 2).index(), Some(35));
    }

    #[test]
    fn test_point_bounds() {
        assert!(Point::new(15, 7).is_in_bounds());
        assert!(!Point::new(16, 0).is_in_bounds());
        assert!(!Point::new(0, 8).is_in_bounds());
        assert_eq!(Point::new(16, 0).index(), None);

        assert_eq!(Point::checked(-1, 0), None);
        assert_eq!(Point::checked(0, -1), None);
        assert_eq!(Point::checked(4, 5), Some(Point::new(4, 5)));

        assert_eq!(Point::new(0, 0).offset(-1, 0), None);
        assert_eq!(Point::new(15, 7).offset(0, 1), None);
        assert_eq!(Point::new(5, 5).offset(1, -1), Some(Point::new(6, 4)));
    }

    #[test]
    fn test_get_set_out_of_bounds() {
        let mut grid = TerrainGrid::new();
        assert_eq!(grid.get(Point::new(16, 3)), None);
        assert!(!grid.set(Point::new(3, 8), CellType::Wall));

        assert!(grid.set(Point::new(3, 4), CellType::Wall));
        assert_eq!(grid.get(Point::new(3, 4)), Some(CellType::Wall));
        assert_eq!(grid.get_index(ix(3, 4)), Some(CellType::Wall));
        assert_eq!(grid.get_index(GRID_CELLS), None);
    }

    #[test]
    fn test_from_cells_requires_full_grid() {
        assert!(TerrainGrid::from_cells(&[CellType::Empty; 10]).is_none());

        let mut cells = [CellType::Empty; GRID_CELLS];
        cells[ix(2, 1)] = CellType::Destructible;
        let grid = TerrainGrid::from_cells(&cells).unwrap();
        assert_eq!(grid.get(Point::new(2, 1)), Some(CellType::Destructible));
        assert_eq!(grid.count(CellType::Destructible), 1);
    }

    #[test]
    fn test_cells_iteration_order() {
        let grid = TerrainGrid::new();
        let points: Vec<Point> = grid.cells().map(|(p, _)| p).collect();
        assert_eq!(points.len(), GRID_CELLS);
        for (i, p) in points.iter().enumerate() {
            assert_eq!(p.index(), Some(i));
        }
    }

    #[test]
    fn test_walkable() {
        let mut grid = TerrainGrid::new();
        grid.set(Point::new(1, 1), CellType::Wall);
        grid.set(Point::new(2, 1), CellType::Destructible);

        assert!(grid.is_walkable(Point::new(0, 1)));
        assert!(!grid.is_walkable(Point::new(1, 1)));
        assert!(!grid.is_walkable(Point::new(2, 1)));
        assert!(!grid.is_walkable(Point::new(20, 1)));
    }

    #[test]
    fn test_display() {
        let mut grid = TerrainGrid::new();
        grid.set(Point::new(0, 0), CellType::Wall);
        grid.set(Point::new(1, 0), CellType::Destructible);
        let text = grid.to_string();
        let first = text.lines().next().unwrap();
        assert_eq!(first.len(), GRID_WIDTH);
        assert!(first.starts_with("#+."));
        assert_eq!(text.lines().count(), GRID_HEIGHT);
    }
}
