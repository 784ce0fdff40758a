//! Grid
//!
//! One level's world: a static tile layer, the live actor collection,
//! the player's bullets and the player. A grid is built once by the level
//! loader and replaced wholesale on reload or level change; only the actor
//! collections change during play.

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};

use crate::core::hash::{StateHash, StateHasher, compute_state_hash};
use crate::core::units::{TILE_SIZE, round_px, tiles_to_pixels};
use crate::game::actor::{Actor, ActorId, Body, Bullet, Sprite};
use crate::game::player::{Player, Weapon};

// =============================================================================
// TILES
// =============================================================================

/// Opaque reference to a tile image owned by the asset collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(pub u16);

/// Tile coordinate (column, row).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl TileCoord {
    /// Create a coordinate.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Sparse, fixed-size tile layer. Absent tiles are passable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileLayer {
    width: i32,
    height: i32,
    tiles: BTreeMap<TileCoord, TileId>,
}

impl TileLayer {
    /// Create an empty layer. Returns `None` unless both sides are positive.
    pub fn new(width: i32, height: i32) -> Option<Self> {
        if width <= 0 || height <= 0 {
            return None;
        }
        Some(Self {
            width,
            height,
            tiles: BTreeMap::new(),
        })
    }

    /// Width in tiles
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in tiles
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Width in pixels
    pub fn pixel_width(&self) -> i32 {
        tiles_to_pixels(self.width)
    }

    /// Whether `(x, y)` lies inside the layer.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        (0..self.width).contains(&x) && (0..self.height).contains(&y)
    }

    /// Tile at `(x, y)`; `None` when passable or out of range.
    pub fn tile(&self, x: i32, y: i32) -> Option<TileId> {
        if !self.contains(x, y) {
            return None;
        }
        self.tiles.get(&TileCoord::new(x, y)).copied()
    }

    /// Place a tile. Out-of-range coordinates are ignored.
    ///
    /// Returns true if the tile was placed.
    pub fn set_tile(&mut self, x: i32, y: i32, tile: TileId) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        self.tiles.insert(TileCoord::new(x, y), tile);
        true
    }

    /// Solid tiles in (column, row) order.
    pub fn solid_tiles(&self) -> impl Iterator<Item = (TileCoord, TileId)> + '_ {
        self.tiles.iter().map(|(coord, tile)| (*coord, *tile))
    }
}

// =============================================================================
// VIEWPORT
// =============================================================================

/// Horizontal camera window pushed in by the host each tick.
///
/// Creatures whose rounded screen x falls inside the window are woken.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Added to world x to get screen x (zero or negative)
    pub offset_x: i32,
    /// Screen width in pixels
    pub width: i32,
}

impl Viewport {
    /// Camera centred on the player, clamped to the map edges.
    pub fn following(player_x: f32, screen_width: i32, tiles: &TileLayer) -> Self {
        let map_width = tiles.pixel_width();
        let offset_x = (screen_width / 2 - round_px(player_x) - TILE_SIZE)
            .min(0)
            .max(screen_width - map_width);

        Self {
            offset_x,
            width: screen_width,
        }
    }

    /// Whether world x coordinate `x` is on screen.
    pub fn contains_x(&self, x: f32) -> bool {
        let screen_x = round_px(x) + self.offset_x;
        screen_x >= 0 && screen_x < self.width
    }
}

// =============================================================================
// GRID
// =============================================================================

/// The static tile layout plus the live actors of one level.
#[derive(Clone, Debug)]
pub struct Grid {
    tiles: TileLayer,
    /// Creatures and items in insertion order
    actors: Vec<Actor>,
    bullets: Vec<Bullet>,
    player: Option<Player>,
    next_actor_id: u32,
    tick: u64,
    elapsed_ms: u64,
}

impl Grid {
    /// Create a grid with no actors.
    pub fn new(tiles: TileLayer) -> Self {
        Self {
            tiles,
            actors: Vec::new(),
            bullets: Vec::new(),
            player: None,
            next_actor_id: 0,
            tick: 0,
            elapsed_ms: 0,
        }
    }

    /// Allocate the next actor id.
    pub fn next_id(&mut self) -> ActorId {
        let id = ActorId(self.next_actor_id);
        self.next_actor_id = self.next_actor_id.wrapping_add(1);
        id
    }

    /// Tile layer
    pub fn tiles(&self) -> &TileLayer {
        &self.tiles
    }

    /// Width in tiles
    pub fn width(&self) -> i32 {
        self.tiles.width
    }

    /// Height in tiles
    pub fn height(&self) -> i32 {
        self.tiles.height
    }

    /// Live creatures and items, in insertion order.
    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub(crate) fn actors_mut(&mut self) -> &mut Vec<Actor> {
        &mut self.actors
    }

    /// Bullets fired this level, spent ones included.
    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub(crate) fn bullets_mut(&mut self) -> &mut Vec<Bullet> {
        &mut self.bullets
    }

    /// Append an actor to the collection.
    pub fn add_actor(&mut self, actor: Actor) {
        self.actors.push(actor);
    }

    /// Append a bullet.
    pub fn add_bullet(&mut self, bullet: Bullet) {
        self.bullets.push(bullet);
    }

    /// Remove an actor by id, keeping the order of the rest.
    pub fn remove_actor(&mut self, id: ActorId) -> Option<Actor> {
        let index = self.actors.iter().position(|a| a.id() == id)?;
        Some(self.actors.remove(index))
    }

    /// Find an actor by id.
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id() == id)
    }

    /// The player, if one was placed.
    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    /// Mutable player access.
    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.player.as_mut()
    }

    /// Designate the player.
    pub fn set_player(&mut self, player: Player) {
        self.player = Some(player);
    }

    pub(crate) fn split_mut(&mut self) -> (&TileLayer, Option<&mut Player>, &mut Vec<Actor>, &mut Vec<Bullet>) {
        (&self.tiles, self.player.as_mut(), &mut self.actors, &mut self.bullets)
    }

    /// Ticks simulated on this grid
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Milliseconds simulated on this grid
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub(crate) fn advance_clock(&mut self, elapsed_ms: u64) {
        self.tick += 1;
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
    }

    /// Number of live creatures (excluding the player).
    pub fn creature_count(&self) -> usize {
        self.actors.iter().filter(|a| a.as_creature().is_some()).count()
    }

    /// Number of uncollected items.
    pub fn item_count(&self) -> usize {
        self.actors.iter().filter(|a| a.as_item().is_some()).count()
    }

    /// Compute the state hash.
    ///
    /// Covers clocks, tiles, the player, every actor and every bullet.
    /// Floats are hashed by bit pattern.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, self.elapsed_ms, |hasher| {
            hasher.update_i32(self.tiles.width);
            hasher.update_i32(self.tiles.height);
            for (coord, tile) in self.tiles.solid_tiles() {
                hasher.update_i32(coord.x);
                hasher.update_i32(coord.y);
                hasher.update_u32(tile.0 as u32);
            }

            match &self.player {
                Some(player) => {
                    hasher.update_bool(true);
                    hash_player(hasher, player);
                }
                None => hasher.update_bool(false),
            }

            hasher.update_u32(self.actors.len() as u32);
            for actor in &self.actors {
                hasher.update_u32(actor.id().0);
                hash_body(hasher, actor.body());
                match actor {
                    Actor::Creature(c) => {
                        hasher.update_u8(0);
                        hasher.update_u8(c.kind() as u8);
                        hasher.update_u8(c.state() as u8);
                        hasher.update_u64(c.state_time());
                    }
                    Actor::Item(i) => {
                        hasher.update_u8(1);
                        hasher.update_u8(i.kind() as u8);
                    }
                }
            }

            hasher.update_u32(self.bullets.len() as u32);
            for bullet in &self.bullets {
                hasher.update_u32(bullet.id().0);
                hash_body(hasher, bullet.body());
                hasher.update_bool(bullet.is_visible());
            }
        })
    }
}

fn hash_body(hasher: &mut StateHasher, body: &Body) {
    hasher.update_vec2(body.position);
    hasher.update_vec2(body.velocity);
}

fn hash_player(hasher: &mut StateHasher, player: &Player) {
    let creature = player.creature();
    hash_body(hasher, creature.body());
    hasher.update_u8(creature.state() as u8);
    hasher.update_u64(creature.state_time());
    hasher.update_u32(player.coins());
    for weapon in Weapon::ALL {
        hasher.update_u32(player.ammo(weapon));
    }
    hasher.update_u8(player.weapon().slot());
    hasher.update_bool(player.is_looking_left());
    hasher.update_bool(player.is_on_ground());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec2::Vec2;
    use crate::game::actor::{Item, ItemKind};
    use crate::game::animation::{Animation, Frame, ImageId};

    fn coin(grid: &mut Grid, x: f32) -> ActorId {
        let id = grid.next_id();
        let anim = Animation::still(Frame::new(ImageId(0), 32, 32));
        grid.add_actor(Actor::Item(Item::new(id, ItemKind::Coin, Vec2::new(x, 0.0), anim)));
        id
    }

    #[test]
    fn test_tile_layer_rejects_empty() {
        assert!(TileLayer::new(0, 5).is_none());
        assert!(TileLayer::new(5, -1).is_none());
        assert!(TileLayer::new(1, 1).is_some());
    }

    #[test]
    fn test_tile_lookup_out_of_range() {
        let mut tiles = TileLayer::new(4, 3).unwrap();
        assert!(tiles.set_tile(1, 2, TileId(7)));
        assert!(!tiles.set_tile(4, 0, TileId(7)));

        assert_eq!(tiles.tile(1, 2), Some(TileId(7)));
        assert_eq!(tiles.tile(0, 0), None);
        assert_eq!(tiles.tile(-1, 0), None);
        assert_eq!(tiles.tile(1, 3), None);
        assert_eq!(tiles.solid_tiles().count(), 1);
    }

    #[test]
    fn test_actor_order_and_removal() {
        let mut grid = Grid::new(TileLayer::new(10, 5).unwrap());
        let a = coin(&mut grid, 0.0);
        let b = coin(&mut grid, 64.0);
        let c = coin(&mut grid, 128.0);

        assert!(grid.remove_actor(b).is_some());
        assert!(grid.remove_actor(b).is_none());

        let ids: Vec<ActorId> = grid.actors().iter().map(|a| a.id()).collect();
        assert_eq!(ids, vec![a, c]);
        assert_eq!(grid.item_count(), 2);
        assert_eq!(grid.creature_count(), 0);
    }

    #[test]
    fn test_viewport_following_clamps() {
        let tiles = TileLayer::new(40, 5).unwrap();

        // Near the left edge the camera does not scroll
        let vp = Viewport::following(100.0, 800, &tiles);
        assert_eq!(vp.offset_x, 0);

        // Middle of the map: player kept near the centre
        let vp = Viewport::following(1000.0, 800, &tiles);
        assert_eq!(vp.offset_x, 400 - 1000 - 64);

        // Right edge: clamped to map width
        let vp = Viewport::following(2500.0, 800, &tiles);
        assert_eq!(vp.offset_x, 800 - 2560);
    }

    #[test]
    fn test_viewport_contains() {
        let vp = Viewport { offset_x: -100, width: 800 };
        assert!(vp.contains_x(100.0));
        assert!(vp.contains_x(899.4));
        assert!(!vp.contains_x(899.5));
        assert!(!vp.contains_x(99.0));
    }

    #[test]
    fn test_hash_changes_with_actors() {
        let mut grid = Grid::new(TileLayer::new(10, 5).unwrap());
        let empty = grid.compute_hash();
        assert_eq!(empty, grid.clone().compute_hash());

        coin(&mut grid, 0.0);
        assert_ne!(empty, grid.compute_hash());
    }
}
