//! Core primitives.
//!
//! Terrain, level data and state hashing. No I/O and no async here;
//! everything in this module is plain data with bounds-checked access.

pub mod grid;
pub mod level;
pub mod hash;

// Re-export core types
pub use grid::{CellType, Point, TerrainGrid, GRID_WIDTH, GRID_HEIGHT, GRID_CELLS, ix};
pub use level::{Level, LevelError, LEVEL_ONE};
pub use hash::{StateHash, StateHasher, compute_state_hash};
