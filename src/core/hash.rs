//! State Hashing
//!
//! SHA-256 digests of simulation state. Two runs of the same level with the
//! same recorded input must end with the same [`StateHash`]; comparing
//! hashes is how replays and independent hosts are checked.

use std::fmt;
use serde::{Serialize, Deserialize};
use sha2::{Sha256, Digest};

use super::vec2::Vec2;

/// 256-bit digest of a grid or an input recording.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateHash(pub [u8; 32]);

impl StateHash {
    /// Lowercase hex form, for logs.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First 8 hex digits.
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for StateHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for StateHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateHash({}..)", self.short())
    }
}

/// Domain-separated SHA-256 writer.
///
/// Fields are fed in a fixed order; floats go in by bit pattern so `0.0`
/// and `-0.0` differ.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Start a digest tagged with `domain`.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Hasher for grid snapshots.
    pub fn for_grid_state() -> Self {
        Self::new(b"TILE_PLATFORMER_GRID_V1")
    }

    /// Hasher for input recordings.
    pub fn for_input_recording() -> Self {
        Self::new(b"TILE_PLATFORMER_INPUTS_V1")
    }

    /// Feed a byte.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Feed a u32 (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Feed a u64 (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Feed an i32 (little-endian).
    #[inline]
    pub fn update_i32(&mut self, value: i32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Feed a flag as one byte.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Feed an f32 by bit pattern.
    #[inline]
    pub fn update_f32(&mut self, value: f32) {
        self.update_u32(value.to_bits());
    }

    /// Feed both components of a vector, x first.
    #[inline]
    pub fn update_vec2(&mut self, value: Vec2) {
        let (x, y) = value.to_bits();
        self.update_u32(x);
        self.update_u32(y);
    }

    /// Finish the digest.
    pub fn finalize(self) -> StateHash {
        StateHash(self.hasher.finalize().into())
    }
}

/// Hash a grid snapshot: clocks first, then whatever `add_state` feeds.
pub fn compute_state_hash<F>(tick: u64, elapsed_ms: u64, add_state: F) -> StateHash
where
    F: FnOnce(&mut StateHasher),
{
    let mut hasher = StateHasher::for_grid_state();
    hasher.update_u64(tick);
    hasher.update_u64(elapsed_ms);
    add_state(&mut hasher);
    hasher.finalize()
}
