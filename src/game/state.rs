//! Game State Definitions
//!
//! Players, bombs and the lock-guarded game state shared by the tick path,
//! the input path and the peer sync transceiver.

use serde::{Serialize, Deserialize};
use tracing::{info, warn};

use crate::core::grid::{Point, TerrainGrid};
use crate::core::hash::{StateHash, StateHasher, compute_state_hash};
use crate::core::level::Level;
use crate::game::events::GameEvent;
use crate::game::mode::AppMode;

/// Bomb slots per player.
pub const BOMB_SLOTS: usize = 10;

// =============================================================================
// PLAYER ID
// =============================================================================

/// One of the two players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum PlayerId {
    /// Player one
    Fox = 0,
    /// Player two
    Wolf = 1,
}

impl PlayerId {
    /// Both players, in wire order.
    pub const ALL: [PlayerId; 2] = [PlayerId::Fox, PlayerId::Wolf];

    /// Get player from its wire value.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(PlayerId::Fox),
            1 => Some(PlayerId::Wolf),
            _ => None,
        }
    }

    /// The other player.
    #[inline]
    pub fn other(self) -> Self {
        match self {
            PlayerId::Fox => PlayerId::Wolf,
            PlayerId::Wolf => PlayerId::Fox,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            PlayerId::Fox => "fox",
            PlayerId::Wolf => "wolf",
        }
    }
}

// =============================================================================
// BOMB
// =============================================================================

/// Bomb lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[derive(Default)]
pub enum BombState {
    /// Slot unused
    #[default]
    None = 0,
    /// Ticking
    Planted = 1,
    /// Ticking, warning frame
    Hot = 2,
    /// Blast in progress
    Exploding = 3,
}

/// A bomb slot.
///
/// `position` and `planted` are meaningless while `state` is `None`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bomb {
    /// Cell the bomb was dropped on
    pub position: Point,
    /// Lifecycle state
    pub state: BombState,
    /// Tick when planted
    pub planted: u32,
}

impl Bomb {
    /// A freshly planted bomb.
    pub const fn planted(position: Point, now: u32) -> Self {
        Self {
            position,
            state: BombState::Planted,
            planted: now,
        }
    }

    /// Is this slot in use?
    #[inline]
    pub fn is_live(&self) -> bool {
        self.state != BombState::None
    }
}

// =============================================================================
// PLAYER
// =============================================================================

/// A player and their bomb ring.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Which player
    pub id: PlayerId,
    /// Current cell
    pub position: Point,
    /// Blast radius in cells
    pub bomb_power: u8,
    /// Ring of bomb slots
    pub bombs: [Bomb; BOMB_SLOTS],
    bomb_ix: usize,
}

impl Player {
    /// Create a player with an empty bomb ring.
    pub fn new(id: PlayerId, position: Point, bomb_power: u8) -> Self {
        Self {
            id,
            position,
            bomb_power,
            bombs: [Bomb::default(); BOMB_SLOTS],
            bomb_ix: 0,
        }
    }

    /// Next ring slot to be written.
    #[inline]
    pub fn bomb_ix(&self) -> usize {
        self.bomb_ix
    }

    /// Write `bomb` into the next ring slot and advance the index.
    ///
    /// The slot is overwritten whatever its state; with all ten slots live
    /// the oldest bomb is lost. Returns the slot written.
    pub fn place_bomb(&mut self, bomb: Bomb) -> usize {
        let slot = self.bomb_ix;
        self.bombs[slot] = bomb;
        self.bomb_ix = (slot + 1) % BOMB_SLOTS;
        slot
    }

    /// Drop a bomb at the current position.
    pub fn plant_bomb(&mut self, now: u32) -> usize {
        self.place_bomb(Bomb::planted(self.position, now))
    }

    /// Slots currently in use.
    pub fn live_bombs(&self) -> impl Iterator<Item = &Bomb> {
        self.bombs.iter().filter(|b| b.is_live())
    }

    /// Hash this player's state.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u8(self.id as u8);
        hasher.update_point(self.position);
        hasher.update_u8(self.bomb_power);
        hasher.update_u8(self.bomb_ix as u8);
        for bomb in &self.bombs {
            hasher.update_u8(bomb.state as u8);
            if bomb.is_live() {
                hasher.update_point(bomb.position);
                hasher.update_u32(bomb.planted);
            }
        }
    }
}

// =============================================================================
// GAME STATE
// =============================================================================

/// Everything the tick path, input path and peer sync mutate.
///
/// Lives behind a single mutex; see `runtime::app::SharedState`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    /// Current application mode
    pub mode: AppMode,
    /// Terrain
    pub grid: TerrainGrid,
    /// Player one
    pub fox: Player,
    /// Player two
    pub wolf: Player,
    /// Local device controls the wolf
    pub is_player_two: bool,
    /// Tick clock, advanced once per dispatched tick
    pub now: u32,
    /// Events generated since the last drain
    #[serde(skip)]
    pub pending_events: Vec<GameEvent>,
}

impl GameState {
    /// Create state from a level. Mode starts `Uninitialised`.
    pub fn new(level: &Level, bomb_power: u8) -> Self {
        Self {
            mode: AppMode::Uninitialised,
            grid: level.grid.clone(),
            fox: Player::new(PlayerId::Fox, level.fox_spawn, bomb_power),
            wolf: Player::new(PlayerId::Wolf, level.wolf_spawn, bomb_power),
            is_player_two: false,
            now: 0,
            pending_events: Vec::new(),
        }
    }

    /// Player controlled by this device.
    #[inline]
    pub fn local_id(&self) -> PlayerId {
        if self.is_player_two {
            PlayerId::Wolf
        } else {
            PlayerId::Fox
        }
    }

    /// Player controlled by the peer device.
    #[inline]
    pub fn remote_id(&self) -> PlayerId {
        self.local_id().other()
    }

    /// Get a player.
    pub fn player(&self, id: PlayerId) -> &Player {
        match id {
            PlayerId::Fox => &self.fox,
            PlayerId::Wolf => &self.wolf,
        }
    }

    /// Get a player mutably.
    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        match id {
            PlayerId::Fox => &mut self.fox,
            PlayerId::Wolf => &mut self.wolf,
        }
    }

    /// Change mode if the transition is legal.
    ///
    /// Returns false (and leaves the mode alone) otherwise.
    pub fn set_mode(&mut self, next: AppMode) -> bool {
        let prev = self.mode;
        if !prev.can_transition_to(next) {
            warn!("Rejected mode transition {} -> {}", prev, next);
            return false;
        }

        info!("Mode {} -> {}", prev, next);
        self.mode = next;
        self.push_event(GameEvent::mode_changed(self.now, prev, next));
        true
    }

    /// Push a game event.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Compute hash of current state.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.now, |hasher| {
            hasher.update_u8(self.mode as u8);
            hasher.update_bool(self.is_player_two);
            hasher.update_grid(&self.grid);
            self.fox.hash_into(hasher);
            self.wolf.hash_into(hasher);
        })
    }

    /// Hash of what both devices should agree on: terrain and player
    /// positions. Excludes the local flag, the mode and tick timestamps.
    pub fn world_hash(&self) -> StateHash {
        let mut hasher = StateHasher::new(b"BOMBER_WORLD_V1");
        hasher.update_grid(&self.grid);
        hasher.update_point(self.fox.position);
        hasher.update_point(self.wolf.position);
        hasher.finalize()
    }

    /// Serialize a snapshot to JSON for debugging.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Text frame of the playfield: terrain, bombs and both players.
    ///
    /// Bombs show as `o` (planted), `O` (hot) or `*` (exploding);
    /// players as `F` and `W`.
    pub fn ascii_frame(&self) -> String {
        let mut frame: Vec<Vec<char>> = self
            .grid
            .to_string()
            .lines()
            .map(|line| line.chars().collect())
            .collect();

        let mut stamp = |p: Point, glyph: char| {
            if let Some(row) = frame.get_mut(p.y as usize) {
                if let Some(cell) = row.get_mut(p.x as usize) {
                    *cell = glyph;
                }
            }
        };

        for bomb in self.fox.live_bombs().chain(self.wolf.live_bombs()) {
            let glyph = match bomb.state {
                BombState::Hot => 'O',
                BombState::Exploding => '*',
                _ => 'o',
            };
            stamp(bomb.position, glyph);
        }
        stamp(self.fox.position, 'F');
        stamp(self.wolf.position, 'W');

        let mut out = String::new();
        for row in frame {
            out.extend(row);
            out.push('\n');
        }
        out
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::{GRID_HEIGHT, GRID_WIDTH};
    use crate::game::events::GameEventData;
    use proptest::prelude::*;

    fn test_state() -> GameState {
        GameState::new(&Level::open(Point::new(1, 1), Point::new(14, 6)), 1)
    }

    #[test]
    fn test_player_id_wire_values() {
        assert_eq!(PlayerId::from_u8(0), Some(PlayerId::Fox));
        assert_eq!(PlayerId::from_u8(1), Some(PlayerId::Wolf));
        assert_eq!(PlayerId::from_u8(2), None);
        assert_eq!(PlayerId::Fox.other(), PlayerId::Wolf);
        assert_eq!(PlayerId::Wolf.other(), PlayerId::Fox);
    }

    #[test]
    fn test_new_state_from_level() {
        let state = test_state();
        assert_eq!(state.mode, AppMode::Uninitialised);
        assert_eq!(state.fox.position, Point::new(1, 1));
        assert_eq!(state.wolf.position, Point::new(14, 6));
        assert_eq!(state.fox.live_bombs().count(), 0);
        assert_eq!(state.local_id(), PlayerId::Fox);
        assert_eq!(state.remote_id(), PlayerId::Wolf);
    }

    #[test]
    fn test_local_player_follows_flag() {
        let mut state = test_state();
        state.is_player_two = true;
        assert_eq!(state.local_id(), PlayerId::Wolf);
        assert_eq!(state.remote_id(), PlayerId::Fox);
        assert_eq!(state.player(PlayerId::Wolf).id, PlayerId::Wolf);
    }

    #[test]
    fn test_eleventh_bomb_reuses_slot_zero() {
        let mut player = Player::new(PlayerId::Fox, Point::new(0, 0), 1);
        for i in 0..BOMB_SLOTS {
            player.position = Point::new(i as u8, 0);
            assert_eq!(player.plant_bomb(i as u32), i);
        }
        assert_eq!(player.bomb_ix(), 0);
        assert_eq!(player.live_bombs().count(), BOMB_SLOTS);

        // Slot 0 is overwritten even though it is still live.
        player.position = Point::new(5, 5);
        assert_eq!(player.plant_bomb(99), 0);
        assert_eq!(player.bombs[0], Bomb::planted(Point::new(5, 5), 99));
        assert_eq!(player.bomb_ix(), 1);
        assert_eq!(player.live_bombs().count(), BOMB_SLOTS);
    }

    proptest! {
        #[test]
        fn prop_ring_index_wraps(plants in 0usize..100) {
            let mut player = Player::new(PlayerId::Wolf, Point::new(3, 3), 2);
            let mut last_slot = None;
            for n in 0..plants {
                last_slot = Some(player.plant_bomb(n as u32));
            }
            prop_assert_eq!(player.bomb_ix(), plants % BOMB_SLOTS);
            if let Some(slot) = last_slot {
                prop_assert_eq!(slot, (plants - 1) % BOMB_SLOTS);
            }
        }
    }

    #[test]
    fn test_set_mode_records_event() {
        let mut state = test_state();
        assert!(state.set_mode(AppMode::Ready));
        assert!(!state.set_mode(AppMode::Playing));
        assert_eq!(state.mode, AppMode::Ready);

        let events = state.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0].data,
            GameEventData::ModeChanged { from: AppMode::Uninitialised, to: AppMode::Ready }
        ));
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_hash_tracks_state() {
        let mut a = test_state();
        let b = test_state();
        assert_eq!(a.compute_hash(), b.compute_hash());

        a.fox.position = Point::new(2, 1);
        assert_ne!(a.compute_hash(), b.compute_hash());
    }

    #[test]
    fn test_world_hash_ignores_local_view() {
        let mut a = test_state();
        let mut b = test_state();
        b.is_player_two = true;
        b.now = 500;
        b.set_mode(AppMode::Ready);
        assert_eq!(a.world_hash(), b.world_hash());
        assert_ne!(a.compute_hash(), b.compute_hash());

        a.grid.set(Point::new(3, 3), crate::core::grid::CellType::Wall);
        assert_ne!(a.world_hash(), b.world_hash());
    }

    #[test]
    fn test_ascii_frame_overlays() {
        let mut state = test_state();
        state.fox.plant_bomb(0);
        state.fox.position = Point::new(2, 1);

        let frame = state.ascii_frame();
        let rows: Vec<&str> = frame.lines().collect();
        assert_eq!(rows.len(), GRID_HEIGHT);
        assert!(rows.iter().all(|r| r.chars().count() == GRID_WIDTH));
        assert_eq!(rows[1].chars().nth(1), Some('o'));
        assert_eq!(rows[1].chars().nth(2), Some('F'));
        assert_eq!(rows[6].chars().nth(14), Some('W'));
    }

    #[test]
    fn test_json_snapshot() {
        let state = test_state();
        let json = state.to_json().unwrap();
        assert!(json.contains("\"is_player_two\":false"));
        assert!(!json.contains("pending_events"));
    }

    #[test]
    fn test_json_snapshot_tracks_play() {
        let mut state = test_state();
        state.now = 42;
        state.pending_events.push(GameEvent::player_moved(42, PlayerId::Fox, Point::new(2, 1)));

        let value: serde_json::Value = serde_json::from_str(&state.to_json().unwrap()).unwrap();
        assert_eq!(value["now"], 42);
        assert_eq!(value["mode"], "Uninitialised");
        assert!(value.get("pending_events").is_none());
        assert!(value.get("fox").is_some() && value.get("wolf").is_some());
    }
}
