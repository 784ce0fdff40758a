//! Actors
//!
//! Every positioned, animated entity in a level. Two capabilities are
//! shared across the variants:
//!
//! - [`Sprite`]: read-only position, size and collision rectangle
//! - [`Mover`]: position/velocity mutation plus the per-type hooks the tile
//!   resolver calls after snapping a mover to a tile edge
//!
//! Creatures (player included) and bullets are movers. Items never move.

use serde::{Serialize, Deserialize};

use crate::core::units::round_px;
use crate::core::vec2::Vec2;
use crate::game::animation::{Animation, Frame};
use crate::game::creature::Creature;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Unique identifier for an actor within one grid.
///
/// Ids are handed out in spawn order, so they also record insertion order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u32);

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// BODY
// =============================================================================

/// Position (top-left corner, px) and velocity (px/ms) of an actor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner in pixels
    pub position: Vec2,
    /// Velocity in pixels per millisecond
    pub velocity: Vec2,
}

impl Body {
    /// A body at rest at `(x, y)`.
    pub const fn at(x: f32, y: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
        }
    }
}

/// Integer pixel rectangle used for actor-vs-actor overlap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hitbox {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width in pixels
    pub width: i32,
    /// Height in pixels
    pub height: i32,
}

impl Hitbox {
    /// Half-open rectangle intersection.
    ///
    /// Rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

// =============================================================================
// CAPABILITIES
// =============================================================================

/// Read-only view of a positioned, animated actor.
pub trait Sprite {
    /// Actor id
    fn id(&self) -> ActorId;

    /// Position and velocity
    fn body(&self) -> &Body;

    /// Currently selected animation
    fn animation(&self) -> &Animation;

    /// Frame currently shown, if the animation has any.
    fn frame(&self) -> Option<&Frame> {
        self.animation().current_frame()
    }

    /// Width of the current frame (0 without one).
    fn width(&self) -> i32 {
        self.frame().map_or(0, |f| f.width as i32)
    }

    /// Height of the current frame (0 without one).
    fn height(&self) -> i32 {
        self.frame().map_or(0, |f| f.height as i32)
    }

    /// Whether this actor is excluded from actor-vs-actor collision.
    fn is_inert(&self) -> bool {
        false
    }

    /// Rounded pixel rectangle of the current frame.
    fn hitbox(&self) -> Hitbox {
        let position = self.body().position;
        Hitbox {
            x: round_px(position.x),
            y: round_px(position.y),
            width: self.width(),
            height: self.height(),
        }
    }
}

/// An actor the tile resolver can move.
pub trait Mover: Sprite {
    /// Mutable position and velocity
    fn body_mut(&mut self) -> &mut Body;

    /// Set the horizontal position.
    fn set_x(&mut self, x: f32) {
        self.body_mut().position.x = x;
    }

    /// Set the vertical position.
    fn set_y(&mut self, y: f32) {
        self.body_mut().position.y = y;
    }

    /// Called after the mover was snapped against a tile horizontally.
    fn collide_horizontal(&mut self);

    /// Called after the mover was snapped against a tile vertically.
    fn collide_vertical(&mut self);
}

// =============================================================================
// ITEMS
// =============================================================================

/// Collectable item variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ItemKind {
    /// Adds one coin
    Coin = 0,
    /// Adds one pistol round
    Ammo = 1,
    /// Completes the level
    Goal = 2,
}

/// A static collectable. Velocity is always zero.
#[derive(Clone, Debug)]
pub struct Item {
    id: ActorId,
    kind: ItemKind,
    body: Body,
    animation: Animation,
}

impl Item {
    /// Create an item at `position`.
    pub fn new(id: ActorId, kind: ItemKind, position: Vec2, animation: Animation) -> Self {
        Self {
            id,
            kind,
            body: Body::at(position.x, position.y),
            animation,
        }
    }

    /// Item variant
    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Advance the animation.
    pub fn update(&mut self, elapsed_ms: u64) {
        self.animation.update(elapsed_ms);
    }
}

impl Sprite for Item {
    fn id(&self) -> ActorId {
        self.id
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn animation(&self) -> &Animation {
        &self.animation
    }
}

// =============================================================================
// BULLETS
// =============================================================================

/// A projectile fired by the player.
///
/// A bullet is spent (invisible) after its first tile or creature contact
/// and never becomes visible again.
#[derive(Clone, Debug)]
pub struct Bullet {
    id: ActorId,
    body: Body,
    animation: Animation,
    visible: bool,
}

impl Bullet {
    /// Create a visible bullet at `position` moving horizontally.
    pub fn new(id: ActorId, position: Vec2, velocity_x: f32, animation: Animation) -> Self {
        Self {
            id,
            body: Body {
                position,
                velocity: Vec2::new(velocity_x, 0.0),
            },
            animation,
            visible: true,
        }
    }

    /// Whether the bullet is still active.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Mark the bullet spent.
    pub fn deactivate(&mut self) {
        self.visible = false;
    }
}

impl Sprite for Bullet {
    fn id(&self) -> ActorId {
        self.id
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn animation(&self) -> &Animation {
        &self.animation
    }

    fn is_inert(&self) -> bool {
        !self.visible
    }
}

impl Mover for Bullet {
    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn collide_horizontal(&mut self) {
        self.deactivate();
    }

    fn collide_vertical(&mut self) {
        self.deactivate();
    }
}

// =============================================================================
// GRID ACTORS
// =============================================================================

/// An entry in a grid's actor collection.
#[derive(Clone, Debug)]
pub enum Actor {
    /// Enemy creature
    Creature(Creature),
    /// Collectable item
    Item(Item),
}

impl Actor {
    /// The creature, if this actor is one.
    pub fn as_creature(&self) -> Option<&Creature> {
        match self {
            Actor::Creature(c) => Some(c),
            Actor::Item(_) => None,
        }
    }

    /// Mutable creature access.
    pub fn as_creature_mut(&mut self) -> Option<&mut Creature> {
        match self {
            Actor::Creature(c) => Some(c),
            Actor::Item(_) => None,
        }
    }

    /// The item, if this actor is one.
    pub fn as_item(&self) -> Option<&Item> {
        match self {
            Actor::Item(i) => Some(i),
            Actor::Creature(_) => None,
        }
    }

    /// Advance animation and state clocks.
    ///
    /// Returns true if a creature became dead during this update.
    pub fn update(&mut self, elapsed_ms: u64, die_time_ms: u64) -> bool {
        match self {
            Actor::Creature(c) => c.update(elapsed_ms, die_time_ms),
            Actor::Item(i) => {
                i.update(elapsed_ms);
                false
            }
        }
    }
}

impl Sprite for Actor {
    fn id(&self) -> ActorId {
        match self {
            Actor::Creature(c) => c.id(),
            Actor::Item(i) => i.id(),
        }
    }

    fn body(&self) -> &Body {
        match self {
            Actor::Creature(c) => c.body(),
            Actor::Item(i) => i.body(),
        }
    }

    fn animation(&self) -> &Animation {
        match self {
            Actor::Creature(c) => c.animation(),
            Actor::Item(i) => i.animation(),
        }
    }

    fn is_inert(&self) -> bool {
        match self {
            Actor::Creature(c) => c.is_inert(),
            Actor::Item(i) => i.is_inert(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::animation::ImageId;

    fn still(width: u32, height: u32) -> Animation {
        Animation::still(Frame::new(ImageId(0), width, height))
    }

    #[test]
    fn test_hitbox_half_open() {
        let a = Hitbox { x: 0, y: 0, width: 10, height: 10 };
        let touching = Hitbox { x: 10, y: 0, width: 10, height: 10 };
        let inside = Hitbox { x: 9, y: 9, width: 10, height: 10 };

        assert!(!a.overlaps(&touching));
        assert!(!touching.overlaps(&a));
        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
    }

    #[test]
    fn test_hitbox_rounds_position() {
        let item = Item::new(ActorId(1), ItemKind::Coin, Vec2::new(10.5, 3.49), still(32, 16));
        let hitbox = item.hitbox();
        assert_eq!(hitbox, Hitbox { x: 11, y: 3, width: 32, height: 16 });
    }

    #[test]
    fn test_empty_animation_has_zero_size() {
        let item = Item::new(ActorId(1), ItemKind::Goal, Vec2::ZERO, Animation::new(std::iter::empty()));
        assert_eq!(item.width(), 0);
        assert_eq!(item.height(), 0);
    }

    #[test]
    fn test_bullet_spent_on_tile_contact() {
        let mut bullet = Bullet::new(ActorId(4), Vec2::new(0.0, 0.0), 0.75, still(16, 8));
        assert!(bullet.is_visible());
        assert!(!bullet.is_inert());

        bullet.collide_horizontal();
        assert!(!bullet.is_visible());
        assert!(bullet.is_inert());

        // Stays spent
        bullet.collide_vertical();
        assert!(!bullet.is_visible());
    }

    #[test]
    fn test_actor_id_display() {
        assert_eq!(ActorId(7).to_string(), "#7");
    }
}
