//! Movement & Collision
//!
//! Grid-step movement against the terrain. A step is accepted only when
//! the target cell is inside the grid and Empty; walls and crates block,
//! and movement never changes terrain.

use serde::{Serialize, Deserialize};

use crate::core::grid::{Point, TerrainGrid};
use crate::game::events::GameEvent;
use crate::game::state::{GameState, PlayerId};

/// A cardinal direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards row 0
    Up,
    /// Towards the last row
    Down,
    /// Towards column 0
    Left,
    /// Towards the last column
    Right,
}

impl Direction {
    /// All four directions.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Unit step `(dx, dy)`.
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Adjacent cell in `dir`, or `None` at the grid edge.
#[inline]
pub fn step(from: Point, dir: Direction) -> Option<Point> {
    let (dx, dy) = dir.delta();
    from.offset(dx, dy)
}

/// Where a step from `from` would land, if it is allowed.
pub fn resolve_move(grid: &TerrainGrid, from: Point, dir: Direction) -> Option<Point> {
    let target = step(from, dir)?;
    if grid.is_walkable(target) {
        Some(target)
    } else {
        None
    }
}

/// Move a player one cell.
///
/// On success the position is committed and a `PlayerMoved` event is
/// queued for peer sync. Returns whether anything changed.
pub fn move_player(state: &mut GameState, id: PlayerId, dir: Direction) -> bool {
    let from = state.player(id).position;
    let Some(target) = resolve_move(&state.grid, from, dir) else {
        return false;
    };

    state.player_mut(id).position = target;
    let event = GameEvent::player_moved(state.now, id, target);
    state.push_event(event);
    true
}
