//! Bomb Timer Engine
//!
//! Advances every live bomb through its lifecycle from the ticks elapsed
//! since planting:
//!
//! ```text
//! elapsed:  0 ........ HOT .. PLANTED .... EXPLODE .. RESET ....
//! state:    Planted/Hot  Hot    Planted     Exploding   None
//!           (blinking)
//! ```
//!
//! The blast fires only on the call where a bomb *enters* Exploding, so
//! running the engine twice for the same tick changes nothing the second
//! time.

use std::time::Duration;
use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::core::grid::{CellType, Point, TerrainGrid};
use crate::game::events::GameEvent;
use crate::game::movement::{step, Direction};
use crate::game::state::{BombState, GameState, Player};

/// Warning band end, in milliseconds.
pub const HOT_TIME_MS: u64 = 2000;
/// Solid Hot band end, in milliseconds.
pub const PLANTED_TIME_MS: u64 = 2100;
/// Fuse length, in milliseconds.
pub const EXPLODE_TIME_MS: u64 = 2500;
/// Blast end, in milliseconds.
pub const RESET_TIME_MS: u64 = 2600;
/// Warning blink half-period, in milliseconds.
pub const BLINK_MS: u64 = 250;

/// Default tick interval.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);

// =============================================================================
// TIMINGS
// =============================================================================

/// Lifecycle thresholds in ticks.
///
/// `hot < planted < explode < reset` always holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BombTimings {
    /// End of the blinking warning band
    pub hot: u32,
    /// End of the solid Hot band
    pub planted: u32,
    /// Bomb explodes once elapsed passes this
    pub explode: u32,
    /// Slot is freed once elapsed passes this
    pub reset: u32,
    /// Ticks per blink half-period
    pub blink: u32,
}

impl Default for BombTimings {
    fn default() -> Self {
        Self::from_tick_interval(DEFAULT_TICK_INTERVAL)
    }
}

impl BombTimings {
    /// Convert the millisecond thresholds for a tick interval.
    ///
    /// Rounds up, and bumps thresholds that collide after rounding so the
    /// bands never collapse.
    pub fn from_tick_interval(interval: Duration) -> Self {
        let tick_ms = (interval.as_millis() as u64).max(1);
        let to_ticks = |ms: u64| -> u32 { ms.div_ceil(tick_ms).min(u32::MAX as u64 / 2) as u32 };

        let hot = to_ticks(HOT_TIME_MS).max(1);
        let planted = to_ticks(PLANTED_TIME_MS).max(hot + 1);
        let explode = to_ticks(EXPLODE_TIME_MS).max(planted + 1);
        let reset = to_ticks(RESET_TIME_MS).max(explode + 1);
        let blink = to_ticks(BLINK_MS).max(1);

        Self {
            hot,
            planted,
            explode,
            reset,
            blink,
        }
    }

    /// State a live bomb should be in after `elapsed` ticks.
    pub fn phase_for(&self, elapsed: u32) -> BombState {
        if elapsed <= self.hot {
            if (elapsed / self.blink) % 2 == 1 {
                BombState::Hot
            } else {
                BombState::Planted
            }
        } else if elapsed <= self.planted {
            BombState::Hot
        } else if elapsed <= self.explode {
            BombState::Planted
        } else if elapsed <= self.reset {
            BombState::Exploding
        } else {
            BombState::None
        }
    }
}

// =============================================================================
// BLAST
// =============================================================================

/// How a blast treats walls.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[derive(Default)]
pub enum BlastPolicy {
    /// Every cell in range is cleared, walls included
    #[default]
    PierceWalls,
    /// A wall stops the blast in that direction and survives
    StopAtWalls,
}

/// Clear the blast footprint of a bomb at `origin`.
///
/// Covers the origin and up to `power` cells in each cardinal direction,
/// cut short at the grid edge. Returns the number of cells that changed.
pub fn clear_blast(grid: &mut TerrainGrid, origin: Point, power: u8, policy: BlastPolicy) -> u8 {
    let mut cleared = 0u8;
    let mut clear = |grid: &mut TerrainGrid, p: Point| {
        if grid.get(p).is_some_and(|c| c != CellType::Empty) && grid.set(p, CellType::Empty) {
            cleared = cleared.saturating_add(1);
        }
    };

    if !origin.is_in_bounds() {
        return 0;
    }
    clear(grid, origin);

    for dir in Direction::ALL {
        let mut cursor = origin;
        for _ in 0..power {
            let Some(next) = step(cursor, dir) else {
                break;
            };
            if policy == BlastPolicy::StopAtWalls && grid.get(next) == Some(CellType::Wall) {
                break;
            }
            clear(grid, next);
            cursor = next;
        }
    }

    cleared
}

// =============================================================================
// ENGINE
// =============================================================================

/// Advance one player's bombs to `now`.
///
/// Explosions are appended to `events`. Returns true if any bomb state or
/// grid cell changed.
pub fn update_bombs(
    player: &mut Player,
    grid: &mut TerrainGrid,
    now: u32,
    timings: &BombTimings,
    policy: BlastPolicy,
    events: &mut Vec<GameEvent>,
) -> bool {
    let mut changed = false;
    let power = player.bomb_power;

    for bomb in player.bombs.iter_mut().filter(|b| b.is_live()) {
        let elapsed = now.wrapping_sub(bomb.planted);
        let next = timings.phase_for(elapsed);
        if next == bomb.state {
            continue;
        }

        if next == BombState::Exploding {
            let cleared = clear_blast(grid, bomb.position, power, policy);
            debug!(
                "{} bomb at {} exploded, {} cells cleared",
                player.id.name(),
                bomb.position,
                cleared
            );
            events.push(GameEvent::bomb_exploded(now, player.id, bomb.position, cleared));
        }

        bomb.state = next;
        if next == BombState::None {
            bomb.planted = 0;
        }
        changed = true;
    }

    changed
}

/// Run the engine for both players at the state's current tick.
pub fn tick_bombs(state: &mut GameState, timings: &BombTimings, policy: BlastPolicy) -> bool {
    let now = state.now;
    let mut events = Vec::new();

    let fox = update_bombs(&mut state.fox, &mut state.grid, now, timings, policy, &mut events);
    let wolf = update_bombs(&mut state.wolf, &mut state.grid, now, timings, policy, &mut events);

    for event in events {
        state.push_event(event);
    }
    fox || wolf
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::{GRID_HEIGHT, GRID_WIDTH};
    use crate::core::level::Level;
    use crate::game::events::GameEventData;
    use crate::game::state::{Bomb, PlayerId};
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn crate_field() -> TerrainGrid {
        let mut grid = TerrainGrid::new();
        for y in 0..GRID_HEIGHT as u8 {
            for x in 0..GRID_WIDTH as u8 {
                grid.set(Point::new(x, y), CellType::Destructible);
            }
        }
        grid
    }

    fn state_at(fox: Point) -> GameState {
        let mut state = GameState::new(&Level::open(fox, Point::new(15, 0)), 1);
        state.grid = crate_field();
        state.grid.set(fox, CellType::Empty);
        state
    }

    #[test]
    fn test_default_timings() {
        let t = BombTimings::default();
        assert_eq!((t.hot, t.planted, t.explode, t.reset, t.blink), (40, 42, 50, 52, 5));
    }

    #[test]
    fn test_coarse_tick_keeps_bands_ordered() {
        let t = BombTimings::from_tick_interval(Duration::from_millis(1000));
        assert!(t.hot < t.planted && t.planted < t.explode && t.explode < t.reset);
        assert_eq!(t.blink, 1);

        let zero = BombTimings::from_tick_interval(Duration::ZERO);
        assert_eq!(zero.hot, 2000);
    }

    #[test]
    fn test_phase_bands() {
        let t = BombTimings::default();
        assert_eq!(t.phase_for(0), BombState::Planted);
        assert_eq!(t.phase_for(5), BombState::Hot);
        assert_eq!(t.phase_for(10), BombState::Planted);
        assert_eq!(t.phase_for(41), BombState::Hot);
        assert_eq!(t.phase_for(42), BombState::Hot);
        assert_eq!(t.phase_for(43), BombState::Planted);
        assert_eq!(t.phase_for(50), BombState::Planted);
        assert_eq!(t.phase_for(51), BombState::Exploding);
        assert_eq!(t.phase_for(52), BombState::Exploding);
        assert_eq!(t.phase_for(53), BombState::None);
    }

    #[test]
    fn test_fox_bomb_lifecycle() {
        let t = BombTimings::default();
        let origin = Point::new(5, 5);
        let mut state = state_at(origin);
        state.now = 100;
        state.fox.plant_bomb(state.now);

        state.now = 100 + t.explode + 1;
        assert!(tick_bombs(&mut state, &t, BlastPolicy::PierceWalls));
        assert_eq!(state.fox.bombs[0].state, BombState::Exploding);
        for p in [Point::new(4, 5), Point::new(6, 5), Point::new(5, 4), Point::new(5, 6)] {
            assert_eq!(state.grid.get(p), Some(CellType::Empty), "{p}");
        }
        assert_eq!(state.grid.get(Point::new(7, 5)), Some(CellType::Destructible));

        let events = state.take_events();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].data,
            GameEventData::BombExploded { player_id: PlayerId::Fox, position: origin, cells_cleared: 4 }
        );

        state.now = 100 + t.reset + 1;
        assert!(tick_bombs(&mut state, &t, BlastPolicy::PierceWalls));
        assert_eq!(state.fox.bombs[0].state, BombState::None);
        assert_eq!(state.fox.bombs[0].planted, 0);
        assert_eq!(state.fox.live_bombs().count(), 0);
    }

    #[test]
    fn test_same_tick_twice_is_idempotent() {
        let t = BombTimings::default();
        let mut state = state_at(Point::new(8, 3));
        state.fox.plant_bomb(0);
        state.wolf.plant_bomb(0);

        for now in [3, 5, 41, 51, 52, 53] {
            state.now = now;
            tick_bombs(&mut state, &t, BlastPolicy::PierceWalls);
            let before = state.compute_hash();
            assert!(!tick_bombs(&mut state, &t, BlastPolicy::PierceWalls));
            assert_eq!(state.compute_hash(), before, "now {now}");
        }
    }

    #[test]
    fn test_blast_fires_only_on_transition() {
        let t = BombTimings::default();
        let origin = Point::new(5, 5);
        let mut state = state_at(origin);
        state.fox.plant_bomb(0);

        state.now = t.explode + 1;
        tick_bombs(&mut state, &t, BlastPolicy::PierceWalls);
        state.take_events();

        // Terrain restored mid-blast stays put.
        state.grid.set(Point::new(6, 5), CellType::Destructible);
        state.now = t.reset;
        assert!(!tick_bombs(&mut state, &t, BlastPolicy::PierceWalls));
        assert_eq!(state.grid.get(Point::new(6, 5)), Some(CellType::Destructible));
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_clock_wrap() {
        let t = BombTimings::default();
        let mut state = state_at(Point::new(2, 2));
        state.fox.place_bomb(Bomb::planted(Point::new(2, 2), u32::MAX - 10));
        state.now = 5;
        tick_bombs(&mut state, &t, BlastPolicy::PierceWalls);
        assert_eq!(state.fox.bombs[0].state, t.phase_for(16));
    }

    #[test]
    fn test_corner_blast_stays_in_bounds() {
        for origin in [Point::new(0, 0), Point::new(15, 0), Point::new(0, 7), Point::new(15, 7)] {
            let mut grid = crate_field();
            let cleared = clear_blast(&mut grid, origin, 3, BlastPolicy::PierceWalls);
            assert_eq!(cleared, 7, "{origin}");
        }
    }

    #[test]
    fn test_walls_pierced_by_default() {
        let mut grid = TerrainGrid::new();
        grid.set(Point::new(6, 5), CellType::Wall);
        grid.set(Point::new(7, 5), CellType::Destructible);
        clear_blast(&mut grid, Point::new(5, 5), 2, BlastPolicy::default());
        assert_eq!(grid.get(Point::new(6, 5)), Some(CellType::Empty));
        assert_eq!(grid.get(Point::new(7, 5)), Some(CellType::Empty));
    }

    #[test]
    fn test_walls_stop_blast_when_configured() {
        let mut grid = TerrainGrid::new();
        grid.set(Point::new(6, 5), CellType::Wall);
        grid.set(Point::new(7, 5), CellType::Destructible);
        grid.set(Point::new(3, 5), CellType::Destructible);
        let cleared = clear_blast(&mut grid, Point::new(5, 5), 2, BlastPolicy::StopAtWalls);
        assert_eq!(cleared, 1);
        assert_eq!(grid.get(Point::new(6, 5)), Some(CellType::Wall));
        assert_eq!(grid.get(Point::new(7, 5)), Some(CellType::Destructible));
        assert_eq!(grid.get(Point::new(3, 5)), Some(CellType::Empty));
    }

    proptest! {
        #[test]
        fn prop_blast_footprint_is_exact(
            x in 0u8..GRID_WIDTH as u8,
            y in 0u8..GRID_HEIGHT as u8,
            power in 0u8..6,
        ) {
            let mut grid = crate_field();
            clear_blast(&mut grid, Point::new(x, y), power, BlastPolicy::PierceWalls);

            let mut expected = BTreeSet::new();
            for i in 0..=power as i32 {
                for (dx, dy) in [(i, 0), (-i, 0), (0, i), (0, -i)] {
                    if let Some(p) = Point::checked(x as i32 + dx, y as i32 + dy) {
                        expected.insert(p);
                    }
                }
            }

            let cleared: BTreeSet<Point> = grid
                .cells()
                .filter(|(_, c)| *c == CellType::Empty)
                .map(|(p, _)| p)
                .collect();
            prop_assert_eq!(cleared, expected);
        }

        #[test]
        fn prop_reset_frees_slot(offset in 1u32..1000, planted in any::<u32>()) {
            let t = BombTimings::default();
            let mut state = state_at(Point::new(4, 4));
            state.fox.place_bomb(Bomb::planted(Point::new(4, 4), planted));
            state.fox.bombs[0].state = BombState::Exploding;
            state.now = planted.wrapping_add(t.reset).wrapping_add(offset);
            tick_bombs(&mut state, &t, BlastPolicy::PierceWalls);
            prop_assert_eq!(state.fox.bombs[0].state, BombState::None);
            prop_assert_eq!(state.fox.bombs[0].planted, 0);
        }
    }
}
