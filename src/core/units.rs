//! Pixel and Tile Units
//!
//! All simulation geometry is expressed in pixels (f32, sub-pixel precise)
//! and milliseconds. Tiles are fixed-size squares addressed by integer
//! coordinates.
//!
//! ## Conversions
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  pixels (f32) ──round half-up──► i32 ──floor / 64──► tile   │
//! │  tile (i32)   ──────────────── × 64 ─────────────► pixels   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rounding is half-up (`floor(x + 0.5)`), which differs from
//! [`f32::round`] for negative halves. Collision results depend on it, so
//! every pixel rounding in the crate goes through [`round_px`].

/// Edge length of a tile in pixels.
pub const TILE_SIZE: i32 = 64;

/// log2(TILE_SIZE)
pub const TILE_SIZE_BITS: u32 = 6;

// =============================================================================
// PHYSICS DEFAULTS (px and ms)
// =============================================================================

/// Gravitational acceleration: 0.002 px/ms²
pub const GRAVITY: f32 = 0.002;

/// Vertical velocity applied by a jump (negative is up).
pub const JUMP_SPEED: f32 = -0.95;

/// Player horizontal speed.
pub const PLAYER_MAX_SPEED: f32 = 0.5;

/// Walking enemy speed.
pub const BLOB_MAX_SPEED: f32 = 0.5;

/// Flying enemy speed.
pub const FLY_MAX_SPEED: f32 = 0.2;

/// Bullet horizontal speed.
pub const BULLET_SPEED: f32 = 0.75;

/// Time a creature spends in the dying state before it is dead.
pub const DIE_TIME_MS: u64 = 1000;

/// Pistol rounds the player starts each level with.
pub const STARTING_PISTOL_AMMO: u32 = 10;

// =============================================================================
// CONVERSIONS
// =============================================================================

/// Round a pixel coordinate half-up to the nearest integer pixel.
#[inline]
pub fn round_px(pixels: f32) -> i32 {
    (pixels + 0.5).floor() as i32
}

/// Convert a pixel coordinate to the tile containing it.
#[inline]
pub fn pixels_to_tiles(pixels: f32) -> i32 {
    int_pixels_to_tiles(round_px(pixels))
}

/// Convert an integer pixel coordinate to its tile (floor division).
#[inline]
pub const fn int_pixels_to_tiles(pixels: i32) -> i32 {
    pixels.div_euclid(TILE_SIZE)
}

/// Pixel coordinate of a tile's leading (left/top) edge.
#[inline]
pub const fn tiles_to_pixels(tiles: i32) -> i32 {
    tiles * TILE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_size_bits() {
        assert_eq!(1 << TILE_SIZE_BITS, TILE_SIZE);
    }

    #[test]
    fn test_round_px_half_up() {
        assert_eq!(round_px(0.5), 1);
        assert_eq!(round_px(0.49), 0);
        assert_eq!(round_px(-0.5), 0);
        assert_eq!(round_px(-0.51), -1);
        assert_eq!(round_px(63.5), 64);
    }

    #[test]
    fn test_pixels_to_tiles_floor() {
        assert_eq!(pixels_to_tiles(0.0), 0);
        assert_eq!(pixels_to_tiles(63.0), 0);
        assert_eq!(pixels_to_tiles(63.6), 1);
        assert_eq!(pixels_to_tiles(64.0), 1);
        assert_eq!(pixels_to_tiles(-1.0), -1);
        assert_eq!(pixels_to_tiles(-64.0), -1);
        assert_eq!(pixels_to_tiles(-65.0), -2);
    }

    #[test]
    fn test_tiles_to_pixels() {
        assert_eq!(tiles_to_pixels(0), 0);
        assert_eq!(tiles_to_pixels(5), 320);
        assert_eq!(tiles_to_pixels(-1), -64);
    }
}
