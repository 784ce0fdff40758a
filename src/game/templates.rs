//! Actor Templates
//!
//! Factory for every spawnable actor kind. Each template owns the
//! animations for its kind; spawning hands out copies that share frame
//! data but start with fresh clocks.

use serde::{Serialize, Deserialize};

use crate::config::SimConfig;
use crate::core::units::{TILE_SIZE, tiles_to_pixels};
use crate::core::vec2::Vec2;
use crate::game::actor::{Actor, ActorId, Item, ItemKind};
use crate::game::animation::{Animation, Frame, ImageId};
use crate::game::creature::{Creature, CreatureAnimations, CreatureKind};
use crate::game::grid::Grid;
use crate::game::player::Player;

/// Everything a level can spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SpawnKind {
    /// The player
    Player,
    /// Walking enemy
    Blob,
    /// Flying enemy
    Fly,
    /// Coin item
    Coin,
    /// Ammo item
    Ammo,
    /// Level goal
    Goal,
}

impl SpawnKind {
    /// Creature kind spawned, if this is a creature.
    pub fn creature_kind(self) -> Option<CreatureKind> {
        match self {
            SpawnKind::Player => Some(CreatureKind::Player),
            SpawnKind::Blob => Some(CreatureKind::Blob),
            SpawnKind::Fly => Some(CreatureKind::Fly),
            _ => None,
        }
    }

    /// Item kind spawned, if this is an item.
    pub fn item_kind(self) -> Option<ItemKind> {
        match self {
            SpawnKind::Coin => Some(ItemKind::Coin),
            SpawnKind::Ammo => Some(ItemKind::Ammo),
            SpawnKind::Goal => Some(ItemKind::Goal),
            _ => None,
        }
    }
}

/// Animations for every spawnable kind.
#[derive(Clone, Debug)]
pub struct ActorTemplates {
    /// Player body
    pub player: CreatureAnimations,
    /// Walking enemy
    pub blob: CreatureAnimations,
    /// Flying enemy
    pub fly: CreatureAnimations,
    /// Coin item
    pub coin: Animation,
    /// Ammo item
    pub ammo: Animation,
    /// Goal item
    pub goal: Animation,
    /// Bullet fired to the right
    pub bullet_right: Animation,
    /// Bullet fired to the left
    pub bullet_left: Animation,
}

// =============================================================================
// STANDARD SET
// =============================================================================

/// Image id blocks per kind; variants offset by 10 within a block.
mod image_base {
    pub const PLAYER: u32 = 100;
    pub const BLOB: u32 = 200;
    pub const FLY: u32 = 300;
    pub const COIN: u32 = 400;
    pub const AMMO: u32 = 500;
    pub const GOAL: u32 = 600;
    pub const BULLET: u32 = 700;
}

fn sequence(base: u32, size: (u32, u32), scenes: &[(u32, u64)]) -> Animation {
    Animation::new(
        scenes
            .iter()
            .map(|&(image, duration)| (Frame::new(ImageId(base + image), size.0, size.1), duration)),
    )
}

/// Right, mirrored, flipped and flipped-mirrored copies of one sequence.
fn creature_set(base: u32, size: (u32, u32), scenes: &[(u32, u64)]) -> CreatureAnimations {
    CreatureAnimations {
        right: sequence(base, size, scenes),
        left: sequence(base + 10, size, scenes),
        right_dead: sequence(base + 20, size, scenes),
        left_dead: sequence(base + 30, size, scenes),
    }
}

impl ActorTemplates {
    /// The stock set: stock frame timings with placeholder image ids
    /// and sizes.
    pub fn standard() -> Self {
        let player = creature_set(
            image_base::PLAYER,
            (48, 60),
            &[(0, 250), (1, 150), (0, 150), (1, 150), (2, 200), (1, 150)],
        );
        let enemy_scenes: [(u32, u64); 4] = [(0, 50), (1, 50), (2, 50), (1, 50)];
        let item_scenes = |duration: u64| -> [(u32, u64); 4] {
            [(0, duration), (1, duration), (2, duration), (1, duration)]
        };

        Self {
            player,
            blob: creature_set(image_base::BLOB, (40, 40), &enemy_scenes),
            fly: creature_set(image_base::FLY, (40, 32), &enemy_scenes),
            coin: sequence(image_base::COIN, (32, 32), &item_scenes(150)),
            ammo: sequence(image_base::AMMO, (32, 32), &item_scenes(100)),
            goal: sequence(image_base::GOAL, (48, 48), &item_scenes(150)),
            bullet_right: sequence(image_base::BULLET, (16, 8), &[(0, 100)]),
            bullet_left: sequence(image_base::BULLET + 10, (16, 8), &[(0, 100)]),
        }
    }

    fn creature_animations(&self, kind: CreatureKind) -> &CreatureAnimations {
        match kind {
            CreatureKind::Player => &self.player,
            CreatureKind::Blob => &self.blob,
            CreatureKind::Fly => &self.fly,
        }
    }

    fn item_animation(&self, kind: ItemKind) -> &Animation {
        match kind {
            ItemKind::Coin => &self.coin,
            ItemKind::Ammo => &self.ammo,
            ItemKind::Goal => &self.goal,
        }
    }

    /// Size of the frame a freshly spawned actor of `kind` shows.
    pub fn spawn_size(&self, kind: SpawnKind) -> (i32, i32) {
        let animation = match (kind.creature_kind(), kind.item_kind()) {
            (Some(CreatureKind::Player), _) => &self.player.right,
            (Some(creature), _) => &self.creature_animations(creature).left,
            (None, Some(item)) => self.item_animation(item),
            (None, None) => return (0, 0),
        };
        animation
            .current_frame()
            .map_or((0, 0), |f| (f.width as i32, f.height as i32))
    }

    // =========================================================================
    // SPAWNING
    // =========================================================================

    /// New creature of `kind` at `position`.
    pub fn spawn_creature(
        &self,
        kind: CreatureKind,
        id: ActorId,
        position: Vec2,
        config: &SimConfig,
    ) -> Creature {
        let max_speed = match kind {
            CreatureKind::Player => config.player_max_speed,
            CreatureKind::Blob => config.blob_max_speed,
            CreatureKind::Fly => config.fly_max_speed,
        };
        let animations = self.creature_animations(kind).restarted();
        Creature::new(id, kind, position, animations, max_speed)
    }

    /// New item of `kind` at `position`.
    pub fn spawn_item(&self, kind: ItemKind, id: ActorId, position: Vec2) -> Item {
        Item::new(id, kind, position, self.item_animation(kind).restarted())
    }

    /// New player at `position` with the configured starting ammo.
    pub fn spawn_player(&self, id: ActorId, position: Vec2, config: &SimConfig) -> Player {
        let creature = self.spawn_creature(CreatureKind::Player, id, position, config);
        Player::new(
            creature,
            self.bullet_right.restarted(),
            self.bullet_left.restarted(),
            config.starting_pistol_ammo,
        )
    }

    /// Spawn into tile `(tile_x, tile_y)`: centred horizontally and standing
    /// on the tile's bottom edge. The player replaces any existing player.
    pub fn spawn_in_tile(
        &self,
        grid: &mut Grid,
        kind: SpawnKind,
        tile_x: i32,
        tile_y: i32,
        config: &SimConfig,
    ) -> ActorId {
        let (width, height) = self.spawn_size(kind);
        let position = Vec2::new(
            (tiles_to_pixels(tile_x) + (TILE_SIZE - width) / 2) as f32,
            (tiles_to_pixels(tile_y + 1) - height) as f32,
        );

        let id = grid.next_id();
        match (kind.creature_kind(), kind.item_kind()) {
            (Some(CreatureKind::Player), _) => {
                grid.set_player(self.spawn_player(id, position, config));
            }
            (Some(creature), _) => {
                let creature = self.spawn_creature(creature, id, position, config);
                grid.add_actor(Actor::Creature(creature));
            }
            (None, Some(item)) => {
                grid.add_actor(Actor::Item(self.spawn_item(item, id, position)));
            }
            (None, None) => {}
        }
        id
    }
}

impl Default for ActorTemplates {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::actor::Sprite;
    use crate::game::grid::TileLayer;

    #[test]
    fn test_standard_timings() {
        let templates = ActorTemplates::standard();
        assert_eq!(templates.player.right.total_time(), 1050);
        assert_eq!(templates.blob.left.total_time(), 200);
        assert_eq!(templates.coin.total_time(), 600);
        assert_eq!(templates.ammo.total_time(), 400);
        assert_eq!(templates.goal.total_time(), 600);
        assert_eq!(templates.bullet_right.len(), 1);
    }

    #[test]
    fn test_spawn_centres_and_bottom_justifies() {
        let templates = ActorTemplates::standard();
        let config = SimConfig::default();
        let mut grid = Grid::new(TileLayer::new(10, 5).unwrap());

        let id = templates.spawn_in_tile(&mut grid, SpawnKind::Blob, 2, 3, &config);
        let blob = grid.actor(id).unwrap();
        // 40px wide in a 64px tile: 12px margin
        assert_eq!(blob.body().position, Vec2::new(140.0, 216.0));

        let id = templates.spawn_in_tile(&mut grid, SpawnKind::Coin, 0, 0, &config);
        assert_eq!(grid.actor(id).unwrap().body().position, Vec2::new(16.0, 32.0));
    }

    #[test]
    fn test_spawned_clocks_are_independent() {
        let mut templates = ActorTemplates::standard();
        templates.coin.update(200);
        let item = templates.spawn_item(ItemKind::Coin, ActorId(1), Vec2::ZERO);
        assert_eq!(item.animation().clock(), 0);
        assert!(item.animation().shares_frames_with(&templates.coin));
    }

    #[test]
    fn test_spawn_player_uses_config() {
        let templates = ActorTemplates::standard();
        let config = SimConfig {
            starting_pistol_ammo: 3,
            ..SimConfig::default()
        };
        let player = templates.spawn_player(ActorId(0), Vec2::new(192.0, 0.0), &config);
        assert_eq!(player.current_ammo(), 3);
        assert_eq!(player.creature().max_speed(), config.player_max_speed);
    }

    #[test]
    fn test_fly_speed_from_config() {
        let templates = ActorTemplates::standard();
        let config = SimConfig::default();
        let fly = templates.spawn_creature(CreatureKind::Fly, ActorId(1), Vec2::ZERO, &config);
        assert_eq!(fly.max_speed(), 0.2);
        assert!(fly.is_flying());
    }
}
