//! Collision Detection
//!
//! Axis-separated tile resolution and actor-vs-actor overlap.
//!
//! Movers are always resolved X first, then Y, each axis sweeping only its
//! own motion against the tile layer with the other axis already resolved.
//! A diagonal sweep would let actors snag on or slip through corners.

use crate::core::units::{pixels_to_tiles, tiles_to_pixels};
use crate::game::actor::{Actor, Mover, Sprite};
use crate::game::grid::{TileCoord, TileLayer};

// =============================================================================
// TILE SWEEP
// =============================================================================

/// First blocking tile touched by moving `sprite` to `(new_x, new_y)`.
///
/// The swept rectangle spans the old and new positions. Tiles are scanned
/// column by column, top to bottom. A column outside the layer's width
/// blocks; rows above or below the layer do not, so actors can fall off
/// the bottom of a level.
pub fn tile_collision<S: Sprite + ?Sized>(
    sprite: &S,
    new_x: f32,
    new_y: f32,
    tiles: &TileLayer,
) -> Option<TileCoord> {
    let position = sprite.body().position;
    let from_x = position.x.min(new_x);
    let from_y = position.y.min(new_y);
    let to_x = position.x.max(new_x);
    let to_y = position.y.max(new_y);

    let from_tile_x = pixels_to_tiles(from_x);
    let from_tile_y = pixels_to_tiles(from_y);
    let to_tile_x = pixels_to_tiles(to_x + sprite.width() as f32 - 1.0);
    let to_tile_y = pixels_to_tiles(to_y + sprite.height() as f32 - 1.0);

    for x in from_tile_x..=to_tile_x {
        for y in from_tile_y..=to_tile_y {
            if x < 0 || x >= tiles.width() || tiles.tile(x, y).is_some() {
                return Some(TileCoord::new(x, y));
            }
        }
    }

    None
}

/// Move along X by `velocity.x * elapsed_ms`, snapping to a blocking tile.
///
/// On contact the mover's trailing edge is placed against the tile edge it
/// was moving toward (no snap when `velocity.x` is zero), then its
/// horizontal collision hook runs. Returns the blocking tile.
pub fn resolve_x<M: Mover + ?Sized>(
    mover: &mut M,
    tiles: &TileLayer,
    elapsed_ms: u64,
) -> Option<TileCoord> {
    let body = *mover.body();
    let dx = body.velocity.x;
    let new_x = body.position.x + dx * elapsed_ms as f32;

    match tile_collision(&*mover, new_x, body.position.y, tiles) {
        None => {
            mover.set_x(new_x);
            None
        }
        Some(tile) => {
            if dx > 0.0 {
                let x = (tiles_to_pixels(tile.x) - mover.width()) as f32;
                mover.set_x(x);
            } else if dx < 0.0 {
                mover.set_x(tiles_to_pixels(tile.x + 1) as f32);
            }
            mover.collide_horizontal();
            Some(tile)
        }
    }
}

/// Move along Y by `velocity.y * elapsed_ms`, snapping to a blocking tile.
///
/// Mirror of [`resolve_x`] for the vertical axis.
pub fn resolve_y<M: Mover + ?Sized>(
    mover: &mut M,
    tiles: &TileLayer,
    elapsed_ms: u64,
) -> Option<TileCoord> {
    let body = *mover.body();
    let dy = body.velocity.y;
    let new_y = body.position.y + dy * elapsed_ms as f32;

    match tile_collision(&*mover, body.position.x, new_y, tiles) {
        None => {
            mover.set_y(new_y);
            None
        }
        Some(tile) => {
            if dy > 0.0 {
                let y = (tiles_to_pixels(tile.y) - mover.height()) as f32;
                mover.set_y(y);
            } else if dy < 0.0 {
                mover.set_y(tiles_to_pixels(tile.y + 1) as f32);
            }
            mover.collide_vertical();
            Some(tile)
        }
    }
}

// =============================================================================
// ACTOR VS ACTOR
// =============================================================================

/// Check if two actors collide.
///
/// Never true for an actor against itself or when either side is inert
/// (a dying/dead creature or a spent bullet).
pub fn is_collision<A, B>(a: &A, b: &B) -> bool
where
    A: Sprite + ?Sized,
    B: Sprite + ?Sized,
{
    if a.id() == b.id() {
        return false;
    }
    if a.is_inert() || b.is_inert() {
        return false;
    }
    a.hitbox().overlaps(&b.hitbox())
}

/// Index of the first actor, in collection order, colliding with `sprite`.
pub fn find_collision<S: Sprite + ?Sized>(sprite: &S, actors: &[Actor]) -> Option<usize> {
    actors.iter().position(|other| is_collision(sprite, other))
}

/// Index of the first creature colliding with `sprite`; items are ignored.
pub fn find_creature_collision<S: Sprite + ?Sized>(sprite: &S, actors: &[Actor]) -> Option<usize> {
    actors
        .iter()
        .position(|other| other.as_creature().is_some() && is_collision(sprite, other))
}
