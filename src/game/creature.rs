//! Creature State Machine
//!
//! NORMAL -> DYING -> DEAD, never backwards. Entering DYING zeroes the
//! velocity and restarts the state clock; DEAD follows once the clock
//! reaches the death duration.

use serde::{Serialize, Deserialize};

use crate::core::vec2::Vec2;
use crate::game::actor::{ActorId, Body, Mover, Sprite};
use crate::game::animation::Animation;

/// Life-cycle state of a creature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CreatureState {
    /// Alive and colliding
    Normal = 0,
    /// Playing its death animation, inert
    Dying = 1,
    /// Terminal; pruned from the grid
    Dead = 2,
}

impl CreatureState {
    /// The only state this one may move to.
    pub fn next(self) -> Option<CreatureState> {
        match self {
            CreatureState::Normal => Some(CreatureState::Dying),
            CreatureState::Dying => Some(CreatureState::Dead),
            CreatureState::Dead => None,
        }
    }
}

/// Kinds of creature that can be spawned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CreatureKind {
    /// The player's body
    Player = 0,
    /// Walking enemy
    Blob = 1,
    /// Flying enemy, ignores gravity
    Fly = 2,
}

/// The four direction/death animation variants of a creature.
#[derive(Clone, Debug)]
pub struct CreatureAnimations {
    /// Facing left
    pub left: Animation,
    /// Facing right
    pub right: Animation,
    /// Dying while facing left
    pub left_dead: Animation,
    /// Dying while facing right
    pub right_dead: Animation,
}

impl CreatureAnimations {
    /// Copies sharing frame data, each with a fresh clock.
    pub fn restarted(&self) -> Self {
        Self {
            left: self.left.restarted(),
            right: self.right.restarted(),
            left_dead: self.left_dead.restarted(),
            right_dead: self.right_dead.restarted(),
        }
    }
}

/// Which of the four animations is selected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AnimationSlot {
    Left,
    Right,
    LeftDead,
    RightDead,
}

/// A moving, killable actor.
#[derive(Clone, Debug)]
pub struct Creature {
    id: ActorId,
    kind: CreatureKind,
    body: Body,
    max_speed: f32,
    flying: bool,
    animations: CreatureAnimations,
    slot: AnimationSlot,
    state: CreatureState,
    state_time: u64,
}

impl Creature {
    /// Create a creature at rest at `position`.
    ///
    /// Enemies start facing left, the player faces right.
    pub fn new(
        id: ActorId,
        kind: CreatureKind,
        position: Vec2,
        animations: CreatureAnimations,
        max_speed: f32,
    ) -> Self {
        let slot = match kind {
            CreatureKind::Player => AnimationSlot::Right,
            CreatureKind::Blob | CreatureKind::Fly => AnimationSlot::Left,
        };

        Self {
            id,
            kind,
            body: Body::at(position.x, position.y),
            max_speed,
            flying: kind == CreatureKind::Fly,
            animations,
            slot,
            state: CreatureState::Normal,
            state_time: 0,
        }
    }

    /// Creature kind
    pub fn kind(&self) -> CreatureKind {
        self.kind
    }

    /// Current state
    pub fn state(&self) -> CreatureState {
        self.state
    }

    /// Milliseconds spent in the current state
    pub fn state_time(&self) -> u64 {
        self.state_time
    }

    /// Only NORMAL creatures are alive.
    pub fn is_alive(&self) -> bool {
        self.state == CreatureState::Normal
    }

    /// Flying creatures ignore gravity.
    pub fn is_flying(&self) -> bool {
        self.flying
    }

    /// Walking/flying speed once awake.
    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// Move to the next state.
    ///
    /// Returns false (and changes nothing) unless `state` directly follows
    /// the current one: NORMAL to DYING, or DYING to DEAD.
    pub fn set_state(&mut self, state: CreatureState) -> bool {
        if self.state.next() != Some(state) {
            return false;
        }

        self.state = state;
        self.state_time = 0;
        if state == CreatureState::Dying {
            self.body.velocity = Vec2::ZERO;
        }
        true
    }

    /// The creature entered the viewport.
    ///
    /// A stationary NORMAL enemy starts moving left. The player ignores it.
    pub fn wake_up(&mut self) {
        if self.kind == CreatureKind::Player {
            return;
        }
        if self.state == CreatureState::Normal && self.body.velocity.x == 0.0 {
            self.body.velocity.x = -self.max_speed;
        }
    }

    /// Select the animation, advance clocks and finish dying.
    ///
    /// Returns true if the creature became DEAD during this update.
    pub fn update(&mut self, elapsed_ms: u64, die_time_ms: u64) -> bool {
        let vx = self.body.velocity.x;
        let mut slot = self.slot;
        if vx < 0.0 {
            slot = AnimationSlot::Left;
        } else if vx > 0.0 {
            slot = AnimationSlot::Right;
        }

        if self.state == CreatureState::Dying {
            slot = match slot {
                AnimationSlot::Left => AnimationSlot::LeftDead,
                AnimationSlot::Right => AnimationSlot::RightDead,
                dead => dead,
            };
        }

        if slot != self.slot {
            self.slot = slot;
            self.current_animation_mut().start();
        } else {
            self.current_animation_mut().update(elapsed_ms);
        }

        self.state_time = self.state_time.saturating_add(elapsed_ms);
        if self.state == CreatureState::Dying && self.state_time >= die_time_ms {
            return self.set_state(CreatureState::Dead);
        }
        false
    }

    fn current_animation_mut(&mut self) -> &mut Animation {
        match self.slot {
            AnimationSlot::Left => &mut self.animations.left,
            AnimationSlot::Right => &mut self.animations.right,
            AnimationSlot::LeftDead => &mut self.animations.left_dead,
            AnimationSlot::RightDead => &mut self.animations.right_dead,
        }
    }
}

impl Sprite for Creature {
    fn id(&self) -> ActorId {
        self.id
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn animation(&self) -> &Animation {
        match self.slot {
            AnimationSlot::Left => &self.animations.left,
            AnimationSlot::Right => &self.animations.right,
            AnimationSlot::LeftDead => &self.animations.left_dead,
            AnimationSlot::RightDead => &self.animations.right_dead,
        }
    }

    fn is_inert(&self) -> bool {
        !self.is_alive()
    }
}

impl Mover for Creature {
    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Bounce: reverse horizontal direction.
    fn collide_horizontal(&mut self) {
        self.body.velocity.x = -self.body.velocity.x;
    }

    /// Landing or ceiling: stop vertical motion.
    fn collide_vertical(&mut self) {
        self.body.velocity.y = 0.0;
    }
}
