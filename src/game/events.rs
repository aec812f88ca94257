//! Game Events
//!
//! Events generated while the state lock is held. They are drained after
//! each dispatch so outbound sync and logging happen outside the lock.

use serde::{Serialize, Deserialize};
use crate::core::grid::Point;
use crate::game::mode::AppMode;
use crate::game::state::PlayerId;

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Local player moved (outbound sync)
    PlayerMoved {
        /// Who moved
        player_id: PlayerId,
        /// Cell after the move
        position: Point,
    },

    /// Local player dropped a bomb (outbound sync)
    BombPlanted {
        /// Bomb owner
        player_id: PlayerId,
        /// Cell the bomb sits on
        position: Point,
        /// Ring slot the bomb took
        slot: u8,
    },

    /// A bomb started exploding
    BombExploded {
        /// Bomb owner
        player_id: PlayerId,
        /// Blast centre
        position: Point,
        /// Crates and walls removed by the blast
        cells_cleared: u8,
    },

    /// Application mode changed
    ModeChanged {
        /// Mode before the change
        from: AppMode,
        /// Mode after the change
        to: AppMode,
    },
}

/// A game event stamped with the tick it happened on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick clock value
    pub tick: u32,
    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u32, data: GameEventData) -> Self {
        Self { tick, data }
    }

    /// Create player moved event.
    pub fn player_moved(tick: u32, player_id: PlayerId, position: Point) -> Self {
        Self::new(tick, GameEventData::PlayerMoved { player_id, position })
    }

    /// Create bomb planted event.
    pub fn bomb_planted(tick: u32, player_id: PlayerId, position: Point, slot: u8) -> Self {
        Self::new(tick, GameEventData::BombPlanted { player_id, position, slot })
    }

    /// Create bomb exploded event.
    pub fn bomb_exploded(tick: u32, player_id: PlayerId, position: Point, cells_cleared: u8) -> Self {
        Self::new(
            tick,
            GameEventData::BombExploded {
                player_id,
                position,
                cells_cleared,
            },
        )
    }

    /// Create mode changed event.
    pub fn mode_changed(tick: u32, from: AppMode, to: AppMode) -> Self {
        Self::new(tick, GameEventData::ModeChanged { from, to })
    }

    /// Should this event be replicated to the peer device?
    pub fn is_outbound(&self) -> bool {
        matches!(
            self.data,
            GameEventData::PlayerMoved { .. } | GameEventData::BombPlanted { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outbound_classification() {
        let p = Point::new(1, 2);
        assert!(GameEvent::player_moved(1, PlayerId::Fox, p).is_outbound());
        assert!(GameEvent::bomb_planted(1, PlayerId::Fox, p, 0).is_outbound());
        assert!(!GameEvent::bomb_exploded(1, PlayerId::Fox, p, 5).is_outbound());
        assert!(!GameEvent::mode_changed(1, AppMode::Menu, AppMode::Playing).is_outbound());
    }

    #[test]
    fn test_constructors_fill_fields() {
        let p = Point::new(3, 4);
        let planted = GameEvent::bomb_planted(7, PlayerId::Wolf, p, 9);
        assert_eq!(planted.tick, 7);
        assert_eq!(
            planted.data,
            GameEventData::BombPlanted {
                player_id: PlayerId::Wolf,
                position: p,
                slot: 9,
            }
        );

        let exploded = GameEvent::bomb_exploded(8, PlayerId::Fox, p, 5);
        assert!(matches!(
            exploded.data,
            GameEventData::BombExploded { cells_cleared: 5, player_id: PlayerId::Fox, .. }
        ));

        let changed = GameEvent::mode_changed(0, AppMode::Menu, AppMode::Playing);
        assert_eq!(
            changed.data,
            GameEventData::ModeChanged {
                from: AppMode::Menu,
                to: AppMode::Playing,
            }
        );
    }
}
