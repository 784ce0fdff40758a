//! End-to-end gameplay scenarios driven through the public API.

use platformer::config::SimConfig;
use platformer::core::units::tiles_to_pixels;
use platformer::core::vec2::Vec2;
use platformer::game::actor::{Actor, Mover, Sprite};
use platformer::game::creature::{CreatureKind, CreatureState};
use platformer::game::events::GameEventData;
use platformer::game::grid::{Grid, TileId, TileLayer, Viewport};
use platformer::game::input::InputFrame;
use platformer::game::level::{LevelLoader, MemorySource};
use platformer::game::session::Session;
use platformer::game::templates::{ActorTemplates, SpawnKind};
use platformer::game::tick::{tick, TickInput, TickOutcome};

const SOLID: TileId = TileId(0);

/// 10x5 layer with a solid floor on row 4.
fn floor_layer() -> TileLayer {
    let mut tiles = TileLayer::new(10, 5).unwrap();
    for x in 0..10 {
        tiles.set_tile(x, 4, SOLID);
    }
    tiles
}

fn frame(flags: u8) -> TickInput {
    TickInput::new(InputFrame::with_flags(flags), 16)
}

#[test]
fn player_clamps_against_column_five() {
    let config = SimConfig {
        gravity: 0.0,
        ..SimConfig::default()
    };
    let templates = ActorTemplates::standard();

    let mut tiles = TileLayer::new(10, 5).unwrap();
    for y in 0..5 {
        tiles.set_tile(5, y, SOLID);
    }
    let mut grid = Grid::new(tiles);
    let id = grid.next_id();
    grid.set_player(templates.spawn_player(id, Vec2::new(0.0, 64.0), &config));

    let wall = tiles_to_pixels(5) as f32;
    for _ in 0..100 {
        tick(&mut grid, &frame(InputFrame::FLAG_MOVE_RIGHT), &config);
        let player = grid.player().unwrap();
        assert!(player.body().position.x + player.width() as f32 <= wall);
    }

    let player = grid.player().unwrap();
    assert_eq!(player.body().position.x + player.width() as f32, wall);
    assert_eq!(player.body().position.y, 64.0);
}

#[test]
fn fire_without_ammo_spawns_nothing() {
    let config = SimConfig {
        starting_pistol_ammo: 0,
        ..SimConfig::default()
    };
    let templates = ActorTemplates::standard();
    let mut grid = Grid::new(floor_layer());
    templates.spawn_in_tile(&mut grid, SpawnKind::Player, 1, 3, &config);

    let result = tick(&mut grid, &frame(InputFrame::FLAG_FIRE), &config);

    assert!(grid.bullets().is_empty());
    assert_eq!(grid.player().unwrap().current_ammo(), 0);
    assert!(result.events.is_empty());
}

#[test]
fn goal_replaces_grid() {
    let source = MemorySource::new()
        .with_level(1, "#\n   m\ngggggg")
        .with_level(2, "#\n\ngggggggggggg");
    let loader = LevelLoader::new(source, ActorTemplates::standard(), SimConfig::default());
    let mut session = Session::start(loader).unwrap();
    assert_eq!(session.grid().item_count(), 1);

    let result = session.step(16, InputFrame::new(), None).unwrap();

    assert_eq!(result.outcome, TickOutcome::AdvanceLevel);
    assert!(result.events.iter().any(|e| matches!(e.data, GameEventData::LevelComplete { .. })));
    assert_eq!(session.current_level(), 2);
    assert_eq!(session.grid().width(), 12);
    assert_eq!(session.grid().item_count(), 0);
    assert_eq!(session.grid().tick(), 0);
}

#[test]
fn goal_on_last_level_wraps_to_first() {
    let source = MemorySource::new().with_level(1, "#\n   m\ngggggg");
    let loader = LevelLoader::new(source, ActorTemplates::standard(), SimConfig::default());
    let mut session = Session::start(loader).unwrap();

    let result = session.step(16, InputFrame::new(), None).unwrap();

    assert_eq!(result.outcome, TickOutcome::AdvanceLevel);
    assert_eq!(session.current_level(), 1);
    // Fresh copy of level 1, goal restored
    assert_eq!(session.grid().item_count(), 1);
    assert_eq!(session.grid().tick(), 0);
}

#[test]
fn creature_bounces_off_wall() {
    let config = SimConfig::default();
    let templates = ActorTemplates::standard();

    let mut tiles = floor_layer();
    for y in 0..4 {
        tiles.set_tile(0, y, SOLID);
    }
    let mut grid = Grid::new(tiles);
    let blob = templates.spawn_in_tile(&mut grid, SpawnKind::Blob, 2, 3, &config);
    templates.spawn_in_tile(&mut grid, SpawnKind::Player, 8, 3, &config);

    let viewport = Viewport { offset_x: 0, width: 640 };
    let mut bounced = false;
    for _ in 0..50 {
        tick(&mut grid, &TickInput::new(InputFrame::new(), 16).with_viewport(viewport), &config);
        let body = *grid.actor(blob).unwrap().body();
        if body.velocity.x > 0.0 {
            assert_eq!(body.velocity.x, config.blob_max_speed);
            assert_eq!(body.position.x, tiles_to_pixels(1) as f32);
            bounced = true;
            break;
        }
        assert_eq!(body.velocity.x, -config.blob_max_speed);
    }
    assert!(bounced);
}

#[test]
fn creature_dies_exactly_at_die_time() {
    let config = SimConfig::default();
    let templates = ActorTemplates::standard();
    let mut creature = templates.spawn_creature(
        CreatureKind::Blob,
        platformer::game::actor::ActorId(1),
        Vec2::ZERO,
        &config,
    );
    assert!(creature.set_state(CreatureState::Dying));

    for _ in 0..3 {
        assert!(!creature.update(250, config.die_time_ms));
    }
    assert!(!creature.update(249, config.die_time_ms));
    assert_eq!(creature.state(), CreatureState::Dying);

    assert!(creature.update(1, config.die_time_ms));
    assert_eq!(creature.state(), CreatureState::Dead);
}

#[test]
fn bullet_kills_creature_and_stays_spent() {
    let config = SimConfig::default();
    let templates = ActorTemplates::standard();
    let mut grid = Grid::new(floor_layer());
    templates.spawn_in_tile(&mut grid, SpawnKind::Player, 1, 3, &config);

    // A hovering fly level with the player's head
    let fly_id = grid.next_id();
    let fly = templates.spawn_creature(CreatureKind::Fly, fly_id, Vec2::new(268.0, 180.0), &config);
    grid.add_actor(Actor::Creature(fly));

    let result = tick(&mut grid, &frame(InputFrame::FLAG_FIRE), &config);
    assert_eq!(grid.bullets().len(), 1);
    let bullet_id = grid.bullets()[0].id();
    assert!(matches!(result.events[0].data, GameEventData::BulletFired { .. }));

    let mut shot_at = None;
    for t in 0..40 {
        let result = tick(&mut grid, &frame(0), &config);
        if result
            .events
            .iter()
            .any(|e| e.data == GameEventData::CreatureShot { creature: fly_id, bullet: bullet_id })
        {
            shot_at = Some(t);
            break;
        }
    }
    assert!(shot_at.is_some());

    let bullet = &grid.bullets()[0];
    assert!(!bullet.is_visible());
    assert_eq!(bullet.body().position.y, 180.0 - 8.0);
    let resting = *bullet.body();

    let fly = grid.actor(fly_id).and_then(Actor::as_creature).unwrap();
    assert_eq!(fly.state(), CreatureState::Dying);

    // Spent bullets never move or come back
    let mut pruned = false;
    for _ in 0..80 {
        let result = tick(&mut grid, &frame(0), &config);
        assert!(!grid.bullets()[0].is_visible());
        assert_eq!(*grid.bullets()[0].body(), resting);
        pruned |= result
            .events
            .iter()
            .any(|e| e.data == GameEventData::CreaturePruned { creature: fly_id });
    }
    assert!(pruned);
    assert!(grid.actor(fly_id).is_none());
    assert_eq!(grid.bullets().len(), 1);
}

#[test]
fn player_standing_on_floor_stays_grounded() {
    let config = SimConfig::default();
    let templates = ActorTemplates::standard();
    let mut grid = Grid::new(floor_layer());
    templates.spawn_in_tile(&mut grid, SpawnKind::Player, 1, 3, &config);

    for _ in 0..10 {
        tick(&mut grid, &frame(0), &config);
        let player = grid.player().unwrap();
        assert!(player.is_on_ground());
        assert_eq!(player.body().position.y, (tiles_to_pixels(4) - player.height()) as f32);
    }
}

#[test]
fn mover_trait_positions_player() {
    let config = SimConfig::default();
    let templates = ActorTemplates::standard();
    let mut player = templates.spawn_player(platformer::game::actor::ActorId(0), Vec2::ZERO, &config);
    player.set_x(10.0);
    player.set_y(20.0);
    assert_eq!(player.body().position, Vec2::new(10.0, 20.0));
}
