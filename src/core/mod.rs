//! Core primitives.
//!
//! Units, vectors and state hashing shared by every simulation module.

pub mod units;
pub mod vec2;
pub mod hash;

// Re-export core types
pub use units::{TILE_SIZE, round_px, pixels_to_tiles, tiles_to_pixels};
pub use vec2::Vec2;
pub use hash::{StateHash, StateHasher, compute_state_hash};
