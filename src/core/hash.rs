//! State Hashing
//!
//! Deterministic SHA-256 digest of game state, used to:
//! - Compare the two devices' views after a session
//! - Check that repeated engine passes leave state untouched

use sha2::{Sha256, Digest};
use super::grid::{Point, TerrainGrid};

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Deterministic hasher for game state.
///
/// Wraps SHA-256 with helpers for grid types.
/// Order of updates is significant.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for game state.
    pub fn for_game_state() -> Self {
        Self::new(b"BOMBER_STATE_V1")
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a boolean.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Update with a grid point.
    #[inline]
    pub fn update_point(&mut self, point: Point) {
        self.update_u8(point.x);
        self.update_u8(point.y);
    }

    /// Update with every cell of a grid, row-major.
    pub fn update_grid(&mut self, grid: &TerrainGrid) {
        for (_, cell) in grid.cells() {
            self.update_u8(cell as u8);
        }
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Compute a game state hash.
///
/// The tick clock is always hashed first; `add_state` appends the rest.
pub fn compute_state_hash<F>(now: u32, add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_game_state();
    hasher.update_u32(now);
    add_state(&mut hasher);
    hasher.finalize()
}

// =============================================================================
// TESTS
// =============================================================================
