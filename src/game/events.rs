//! Game Events
//!
//! Events generated during a tick, for hosts (sound, HUD) and replay
//! verification. Events never feed back into the simulation.

use serde::{Serialize, Deserialize};

use crate::game::actor::{ActorId, ItemKind};
use crate::game::grid::TileCoord;
use crate::game::player::Weapon;

/// Game event data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Player fired the selected weapon
    BulletFired {
        bullet: ActorId,
        weapon: Weapon,
        remaining: u32,
    },

    /// Player switched weapons
    WeaponSelected {
        weapon: Weapon,
    },

    /// Player picked up a coin or ammo
    ItemCollected {
        item: ActorId,
        kind: ItemKind,
    },

    /// Player landed on a creature
    CreatureStomped {
        creature: ActorId,
    },

    /// A bullet hit a creature
    CreatureShot {
        creature: ActorId,
        bullet: ActorId,
    },

    /// Player touched a creature without landing on it
    PlayerHit {
        creature: ActorId,
    },

    /// A bullet hit a tile or the map edge
    BulletSpent {
        bullet: ActorId,
        tile: TileCoord,
    },

    /// A dying creature finished dying
    CreatureDied {
        creature: ActorId,
    },

    /// The player finished dying
    PlayerDied,

    /// A dead creature was removed from the grid
    CreaturePruned {
        creature: ActorId,
    },

    /// Player collected the goal
    LevelComplete {
        goal: ActorId,
    },
}

/// A game event with timing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Grid tick when the event occurred
    pub tick: u64,

    /// Actor the event is about, if any
    pub actor: Option<ActorId>,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u64, data: GameEventData) -> Self {
        let actor = match &data {
            GameEventData::BulletFired { bullet, .. } => Some(*bullet),
            GameEventData::ItemCollected { item, .. } => Some(*item),
            GameEventData::CreatureStomped { creature } => Some(*creature),
            GameEventData::CreatureShot { creature, .. } => Some(*creature),
            GameEventData::PlayerHit { creature } => Some(*creature),
            GameEventData::BulletSpent { bullet, .. } => Some(*bullet),
            GameEventData::CreatureDied { creature } => Some(*creature),
            GameEventData::CreaturePruned { creature } => Some(*creature),
            GameEventData::LevelComplete { goal } => Some(*goal),
            GameEventData::WeaponSelected { .. } | GameEventData::PlayerDied => None,
        };

        Self { tick, actor, data }
    }

    /// Create bullet fired event.
    pub fn bullet_fired(tick: u64, bullet: ActorId, weapon: Weapon, remaining: u32) -> Self {
        Self::new(tick, GameEventData::BulletFired { bullet, weapon, remaining })
    }

    /// Create weapon selected event.
    pub fn weapon_selected(tick: u64, weapon: Weapon) -> Self {
        Self::new(tick, GameEventData::WeaponSelected { weapon })
    }

    /// Create item collected event.
    pub fn item_collected(tick: u64, item: ActorId, kind: ItemKind) -> Self {
        Self::new(tick, GameEventData::ItemCollected { item, kind })
    }

    /// Create creature stomped event.
    pub fn creature_stomped(tick: u64, creature: ActorId) -> Self {
        Self::new(tick, GameEventData::CreatureStomped { creature })
    }

    /// Create creature shot event.
    pub fn creature_shot(tick: u64, creature: ActorId, bullet: ActorId) -> Self {
        Self::new(tick, GameEventData::CreatureShot { creature, bullet })
    }

    /// Create player hit event.
    pub fn player_hit(tick: u64, creature: ActorId) -> Self {
        Self::new(tick, GameEventData::PlayerHit { creature })
    }

    /// Create bullet spent event.
    pub fn bullet_spent(tick: u64, bullet: ActorId, tile: TileCoord) -> Self {
        Self::new(tick, GameEventData::BulletSpent { bullet, tile })
    }

    /// Create creature died event.
    pub fn creature_died(tick: u64, creature: ActorId) -> Self {
        Self::new(tick, GameEventData::CreatureDied { creature })
    }

    /// Create player died event.
    pub fn player_died(tick: u64) -> Self {
        Self::new(tick, GameEventData::PlayerDied)
    }

    /// Create creature pruned event.
    pub fn creature_pruned(tick: u64, creature: ActorId) -> Self {
        Self::new(tick, GameEventData::CreaturePruned { creature })
    }

    /// Create level complete event.
    pub fn level_complete(tick: u64, goal: ActorId) -> Self {
        Self::new(tick, GameEventData::LevelComplete { goal })
    }
}
