//! Event Dispatch
//!
//! Applies one dequeued event to the game state. The caller holds the state
//! lock for the duration of a single call.
//!
//! # Determinism
//!
//! Given the same state and the same event, the result is identical on
//! every device. No clock reads happen here; time is the tick counter.

use serde::{Serialize, Deserialize};
use tracing::{debug, info, trace};

use crate::game::bomb::{tick_bombs, BlastPolicy, BombTimings};
use crate::game::events::GameEvent;
use crate::game::input::{BomberEvent, InputEvent, InputKey};
use crate::game::mode::{route_input, AppMode, InputRoute};
use crate::game::movement::move_player;
use crate::game::state::GameState;

/// Game rules shared by both devices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRules {
    /// Bomb lifecycle thresholds
    pub timings: BombTimings,
    /// Wall handling for blasts
    pub blast: BlastPolicy,
    /// Blast radius given to both players
    pub bomb_power: u8,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            timings: BombTimings::default(),
            blast: BlastPolicy::PierceWalls,
            bomb_power: 1,
        }
    }
}

/// Apply one queued event. Returns true if a redraw is needed.
pub fn handle_event(state: &mut GameState, event: BomberEvent, rules: &GameRules) -> bool {
    match event {
        BomberEvent::Tick => handle_tick(state, rules),
        BomberEvent::Input(input) => handle_input(state, input),
    }
}

/// Advance the tick clock and run the bomb engine for both players.
pub fn handle_tick(state: &mut GameState, rules: &GameRules) -> bool {
    state.now = state.now.wrapping_add(1);
    tick_bombs(state, &rules.timings, rules.blast)
}

/// Route an input through the mode state machine.
pub fn handle_input(state: &mut GameState, input: InputEvent) -> bool {
    match route_input(state.mode, &input) {
        InputRoute::Quit => {
            info!("Long back pressed in {}, quitting", state.mode);
            state.set_mode(AppMode::Quit);
            false
        }
        InputRoute::Menu => handle_menu_input(state, input.key),
        InputRoute::Game => handle_game_input(state, input.key),
        InputRoute::Ignore => {
            trace!("Ignoring {:?} {:?} in {}", input.kind, input.key, state.mode);
            false
        }
    }
}

/// Player select screen.
///
/// Any direction toggles which player this device controls; Ok starts the
/// round.
pub fn handle_menu_input(state: &mut GameState, key: InputKey) -> bool {
    if key.direction().is_some() {
        state.is_player_two = !state.is_player_two;
        debug!("Local player is now {}", state.local_id().name());
        return true;
    }

    match key {
        InputKey::Ok => state.set_mode(AppMode::Playing),
        _ => false,
    }
}

/// In-round input for the local player.
pub fn handle_game_input(state: &mut GameState, key: InputKey) -> bool {
    let id = state.local_id();

    if let Some(dir) = key.direction() {
        return move_player(state, id, dir);
    }

    match key {
        InputKey::Ok => {
            let now = state.now;
            let player = state.player_mut(id);
            let slot = player.plant_bomb(now);
            let position = player.position;
            debug!("{} planted bomb {} at {}", id.name(), slot, position);
            state.push_event(GameEvent::bomb_planted(now, id, position, slot as u8));
            true
        }
        InputKey::Back => state.set_mode(AppMode::Finished),
        _ => false,
    }
}

// =============================================================================
// TESTS
// =============================================================================
