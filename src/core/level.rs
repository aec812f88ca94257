//! Level Loading
//!
//! Parses the textual level format into a terrain grid plus spawn points.
//!
//! ```text
//! .  empty        #  wall        +  destructible
//! F  fox spawn    W  wolf spawn  (spawn cells are empty)
//! ```
//!
//! A level is exactly [`GRID_HEIGHT`] lines of [`GRID_WIDTH`] characters.
//! Blank lines and trailing whitespace are ignored.

use thiserror::Error;

use super::grid::{CellType, Point, TerrainGrid, GRID_HEIGHT, GRID_WIDTH};

/// The first (and default) level.
pub const LEVEL_ONE: &str = "\
F.+.+.+..+.+.+..
.#.#+#.#.#+#.#+.
+.+...+..+...+.+
.#.#.#+#+#.#.#..
..+.+..++..+.+.+
.#+#.#.#.#+#.#+.
+.....+..+.....+
.+.+.+..+.+.+.W.
";

/// Level parse errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    /// Wrong number of rows.
    #[error("level has {0} rows, expected 8")]
    RowCount(usize),

    /// A row of the wrong width.
    #[error("row {row} has {width} cells, expected 16")]
    RowWidth {
        /// Zero-based row
        row: usize,
        /// Characters found
        width: usize,
    },

    /// Unrecognised cell character.
    #[error("unknown cell {glyph:?} at ({x}, {y})")]
    UnknownCell {
        /// Offending character
        glyph: char,
        /// Column
        x: usize,
        /// Row
        y: usize,
    },

    /// A spawn marker is missing.
    #[error("no spawn marker {0:?}")]
    MissingSpawn(char),

    /// A spawn marker appears twice.
    #[error("spawn marker {0:?} appears more than once")]
    DuplicateSpawn(char),
}

/// A parsed level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    /// Initial terrain
    pub grid: TerrainGrid,
    /// Fox start cell
    pub fox_spawn: Point,
    /// Wolf start cell
    pub wolf_spawn: Point,
}

impl Level {
    /// Parse a level from text.
    pub fn parse(text: &str) -> Result<Self, LevelError> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect();

        if rows.len() != GRID_HEIGHT {
            return Err(LevelError::RowCount(rows.len()));
        }

        let mut grid = TerrainGrid::new();
        let mut fox = None;
        let mut wolf = None;

        for (y, row) in rows.iter().enumerate() {
            let width = row.chars().count();
            if width != GRID_WIDTH {
                return Err(LevelError::RowWidth { row: y, width });
            }

            for (x, glyph) in row.chars().enumerate() {
                let point = Point::new(x as u8, y as u8);
                let cell = match glyph {
                    '.' => CellType::Empty,
                    '#' => CellType::Wall,
                    '+' => CellType::Destructible,
                    'F' => {
                        if fox.replace(point).is_some() {
                            return Err(LevelError::DuplicateSpawn('F'));
                        }
                        CellType::Empty
                    }
                    'W' => {
                        if wolf.replace(point).is_some() {
                            return Err(LevelError::DuplicateSpawn('W'));
                        }
                        CellType::Empty
                    }
                    _ => return Err(LevelError::UnknownCell { glyph, x, y }),
                };
                grid.set(point, cell);
            }
        }

        Ok(Self {
            grid,
            fox_spawn: fox.ok_or(LevelError::MissingSpawn('F'))?,
            wolf_spawn: wolf.ok_or(LevelError::MissingSpawn('W'))?,
        })
    }

    /// The built-in first level.
    pub fn level_one() -> Result<Self, LevelError> {
        Self::parse(LEVEL_ONE)
    }

    /// An open arena with the given spawns; handy for tests and demos.
    pub fn open(fox_spawn: Point, wolf_spawn: Point) -> Self {
        Self {
            grid: TerrainGrid::new(),
            fox_spawn,
            wolf_spawn,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_one_parses() {
        let level = Level::parse(LEVEL_ONE).unwrap();
        assert_eq!(level.fox_spawn, Point::new(0, 0));
        assert_eq!(level.wolf_spawn, Point::new(14, 7));
        assert!(level.grid.is_walkable(level.fox_spawn));
        assert!(level.grid.is_walkable(level.wolf_spawn));
        assert!(level.grid.count(CellType::Wall) > 0);
        assert!(level.grid.count(CellType::Destructible) > 0);
        assert_eq!(Level::level_one().unwrap(), level);
    }

    #[test]
    fn test_row_count_error() {
        let text = "F..............W\n";
        assert_eq!(Level::parse(text), Err(LevelError::RowCount(1)));
    }

    #[test]
    fn test_row_width_error() {
        let mut text = String::new();
        for y in 0..GRID_HEIGHT {
            if y == 3 {
                text.push_str("....\n");
            } else {
                text.push_str("................\n");
            }
        }
        assert_eq!(
            Level::parse(&text),
            Err(LevelError::RowWidth { row: 3, width: 4 })
        );
    }

    #[test]
    fn test_unknown_cell_error() {
        let text = LEVEL_ONE.replacen('#', "X", 1);
        assert!(matches!(
            Level::parse(&text),
            Err(LevelError::UnknownCell { glyph: 'X', .. })
        ));
    }

    #[test]
    fn test_spawn_errors() {
        let no_wolf = LEVEL_ONE.replace('W', ".");
        assert_eq!(Level::parse(&no_wolf), Err(LevelError::MissingSpawn('W')));

        let two_fox = LEVEL_ONE.replacen('.', "F", 1);
        assert_eq!(Level::parse(&two_fox), Err(LevelError::DuplicateSpawn('F')));
    }
}
