//! Player
//!
//! The player is a creature with an inventory (coins, ammo per weapon),
//! a selected weapon, a facing flag and an on-ground flag.

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};

use crate::core::units::round_px;
use crate::core::vec2::Vec2;
use crate::game::actor::{ActorId, Body, Bullet, Mover, Sprite};
use crate::game::animation::Animation;
use crate::game::creature::Creature;

/// Weapons the player can select.
///
/// Ammo is tracked per weapon. `Unarmed` has no ammo and never fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Weapon {
    /// No weapon
    Unarmed = 0,
    /// Starting weapon
    Pistol = 1,
    /// Machine gun
    MachineGun = 2,
    /// Rocket launcher
    RocketLauncher = 3,
}

impl Weapon {
    /// Every weapon, in slot order.
    pub const ALL: [Weapon; 4] = [
        Weapon::Unarmed,
        Weapon::Pistol,
        Weapon::MachineGun,
        Weapon::RocketLauncher,
    ];

    /// Weapon bound to select-weapon slot `n`.
    pub fn from_slot(n: u8) -> Option<Weapon> {
        Self::ALL.get(n as usize).copied()
    }

    /// Slot number of this weapon.
    pub fn slot(self) -> u8 {
        self as u8
    }
}

/// The player-controlled creature.
#[derive(Clone, Debug)]
pub struct Player {
    creature: Creature,
    coins: u32,
    ammo: BTreeMap<Weapon, u32>,
    weapon: Weapon,
    looking_left: bool,
    on_ground: bool,
    bullet_right: Animation,
    bullet_left: Animation,
}

impl Player {
    /// Wrap a creature as the player, armed with the pistol.
    ///
    /// `bullet_right` / `bullet_left` are the animations given to bullets
    /// fired in each direction.
    pub fn new(
        creature: Creature,
        bullet_right: Animation,
        bullet_left: Animation,
        pistol_ammo: u32,
    ) -> Self {
        let mut ammo = BTreeMap::new();
        for weapon in Weapon::ALL {
            ammo.insert(weapon, 0);
        }
        ammo.insert(Weapon::Pistol, pistol_ammo);

        Self {
            creature,
            coins: 0,
            ammo,
            weapon: Weapon::Pistol,
            looking_left: false,
            on_ground: false,
            bullet_right,
            bullet_left,
        }
    }

    /// Underlying creature
    pub fn creature(&self) -> &Creature {
        &self.creature
    }

    /// Mutable creature access.
    pub fn creature_mut(&mut self) -> &mut Creature {
        &mut self.creature
    }

    /// Coins collected
    pub fn coins(&self) -> u32 {
        self.coins
    }

    /// Add one coin.
    pub fn add_coin(&mut self) {
        self.coins = self.coins.saturating_add(1);
    }

    /// Rounds held for `weapon`.
    pub fn ammo(&self, weapon: Weapon) -> u32 {
        self.ammo.get(&weapon).copied().unwrap_or(0)
    }

    /// Rounds held for the selected weapon.
    pub fn current_ammo(&self) -> u32 {
        self.ammo(self.weapon)
    }

    /// Add rounds for `weapon`. Unarmed never holds ammo.
    pub fn add_ammo(&mut self, weapon: Weapon, rounds: u32) {
        if weapon == Weapon::Unarmed {
            return;
        }
        let count = self.ammo.entry(weapon).or_insert(0);
        *count = count.saturating_add(rounds);
    }

    /// Selected weapon
    pub fn weapon(&self) -> Weapon {
        self.weapon
    }

    /// Select a weapon. Returns true if the selection changed.
    pub fn select_weapon(&mut self, weapon: Weapon) -> bool {
        let changed = self.weapon != weapon;
        self.weapon = weapon;
        changed
    }

    /// Whether the player faces left.
    pub fn is_looking_left(&self) -> bool {
        self.looking_left
    }

    /// Set the facing flag.
    pub fn set_looking_left(&mut self, looking_left: bool) {
        self.looking_left = looking_left;
    }

    /// Whether the player is standing on a tile.
    pub fn is_on_ground(&self) -> bool {
        self.on_ground
    }

    /// Jump if standing on the ground, or unconditionally if `force`.
    ///
    /// Returns true if the jump happened.
    pub fn jump(&mut self, force: bool, jump_speed: f32) -> bool {
        if self.on_ground || force {
            self.on_ground = false;
            self.creature.body_mut().velocity.y = jump_speed;
            true
        } else {
            false
        }
    }

    /// Whether [`fire`](Player::fire) would spawn a bullet.
    pub fn can_fire(&self) -> bool {
        self.weapon != Weapon::Unarmed && self.current_ammo() > 0
    }

    /// Fire the selected weapon.
    ///
    /// Consumes one round and returns the new bullet, or `None` when the
    /// selected weapon has no ammo.
    pub fn fire(&mut self, id: ActorId, bullet_speed: f32) -> Option<Bullet> {
        if !self.can_fire() {
            return None;
        }
        let count = self.ammo.get_mut(&self.weapon)?;
        if *count == 0 {
            return None;
        }
        *count -= 1;

        let (velocity_x, animation) = if self.looking_left {
            (-bullet_speed, self.bullet_left.restarted())
        } else {
            (bullet_speed, self.bullet_right.restarted())
        };
        Some(Bullet::new(id, self.creature.body().position, velocity_x, animation))
    }

    /// Place the player without touching the on-ground flag.
    pub fn place(&mut self, position: Vec2) {
        self.creature.body_mut().position = position;
    }
}

impl Sprite for Player {
    fn id(&self) -> ActorId {
        self.creature.id()
    }

    fn body(&self) -> &Body {
        self.creature.body()
    }

    fn animation(&self) -> &Animation {
        self.creature.animation()
    }

    fn is_inert(&self) -> bool {
        self.creature.is_inert()
    }
}

impl Mover for Player {
    fn body_mut(&mut self) -> &mut Body {
        self.creature.body_mut()
    }

    /// Moving down by a whole rounded pixel means the player is falling.
    fn set_y(&mut self, y: f32) {
        if round_px(y) > round_px(self.creature.body().position.y) {
            self.on_ground = false;
        }
        self.creature.body_mut().position.y = y;
    }

    fn collide_horizontal(&mut self) {
        self.creature.body_mut().velocity.x = 0.0;
    }

    fn collide_vertical(&mut self) {
        let body = self.creature.body_mut();
        if body.velocity.y > 0.0 {
            self.on_ground = true;
        }
        body.velocity.y = 0.0;
    }
}
