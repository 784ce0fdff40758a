//! Property tests for tile resolution and the creature state machine.

use proptest::prelude::*;

use platformer::config::SimConfig;
use platformer::core::units::tiles_to_pixels;
use platformer::core::vec2::Vec2;
use platformer::game::actor::{ActorId, Mover, Sprite};
use platformer::game::collision::{is_collision, resolve_x};
use platformer::game::creature::{Creature, CreatureKind, CreatureState};
use platformer::game::grid::{TileId, TileLayer};
use platformer::game::templates::ActorTemplates;

fn blob(id: u32, x: f32, y: f32) -> Creature {
    ActorTemplates::standard().spawn_creature(CreatureKind::Blob, ActorId(id), Vec2::new(x, y), &SimConfig::default())
}

fn state_strategy() -> impl Strategy<Value = CreatureState> {
    prop_oneof![
        Just(CreatureState::Normal),
        Just(CreatureState::Dying),
        Just(CreatureState::Dead),
    ]
}

proptest! {
    #[test]
    fn free_horizontal_move_is_exact(
        x in 200.0f32..2000.0,
        y in 0.0f32..300.0,
        vx in -0.5f32..0.5,
        elapsed in 1u64..40,
    ) {
        let tiles = TileLayer::new(40, 5).unwrap();
        let mut creature = blob(1, x, y);
        creature.body_mut().velocity.x = vx;

        let hit = resolve_x(&mut creature, &tiles, elapsed);

        prop_assert!(hit.is_none());
        prop_assert_eq!(creature.body().position.x, x + vx * elapsed as f32);
        prop_assert_eq!(creature.body().velocity.x, vx);
    }

    #[test]
    fn approach_from_left_clamps_to_tile_edge(
        column in 5i32..30,
        gap in 1i32..200,
        sixteenths in 1u32..16,
        frames in 1u64..4,
    ) {
        // Whole-pixel steps keep every position exact
        let vx = sixteenths as f32 / 16.0;
        let elapsed = frames * 16;

        let mut tiles = TileLayer::new(40, 5).unwrap();
        for y in 0..5 {
            tiles.set_tile(column, y, TileId(0));
        }
        let wall = tiles_to_pixels(column);

        let mut creature = blob(1, (wall - 40 - gap) as f32, 64.0);
        let width = creature.width();
        creature.body_mut().velocity.x = vx;

        let mut clamped = false;
        for _ in 0..2000 {
            let hit = resolve_x(&mut creature, &tiles, elapsed);
            let x = creature.body().position.x;
            if let Some(tile) = hit {
                prop_assert_eq!(tile.x, column);
                prop_assert_eq!(x + width as f32, wall as f32);
                clamped = true;
                break;
            }
            prop_assert!(x + width as f32 <= wall as f32);
        }
        prop_assert!(clamped);
    }

    #[test]
    fn state_transitions_are_monotonic(requests in proptest::collection::vec(state_strategy(), 0..20)) {
        let mut creature = blob(1, 0.0, 0.0);
        let mut previous = creature.state();

        for requested in requests {
            let changed = creature.set_state(requested);
            let current = creature.state();

            prop_assert!(current >= previous);
            if changed {
                prop_assert_eq!(previous.next(), Some(current));
            } else {
                prop_assert_eq!(current, previous);
            }
            previous = current;
        }
    }

    #[test]
    fn collision_is_irreflexive_and_ignores_dying(
        ax in 0.0f32..200.0,
        ay in 0.0f32..200.0,
        bx in 0.0f32..200.0,
        by in 0.0f32..200.0,
        kill_b in any::<bool>(),
    ) {
        let a = blob(1, ax, ay);
        let mut b = blob(2, bx, by);
        if kill_b {
            b.set_state(CreatureState::Dying);
        }

        prop_assert!(!is_collision(&a, &a));
        prop_assert!(!is_collision(&b, &b));
        prop_assert_eq!(is_collision(&a, &b), is_collision(&b, &a));
        if kill_b {
            prop_assert!(!is_collision(&a, &b));
        }
    }
}
