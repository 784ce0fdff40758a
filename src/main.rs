//! Tile Platformer Demo Host
//!
//! Headless host for the simulation core. Plays a scripted run through a
//! level, logs what happens, then replays the recorded input and checks
//! that the final state hash matches.
//!
//! Usage: `tile-platformer [LEVEL_DIR] [CONFIG_JSON]`. Without a level
//! directory the built-in levels are used.

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use platformer::{
    FRAME_MS, SCREEN_WIDTH, TICK_RATE, VERSION,
    config::SimConfig,
    game::{
        actor::Sprite,
        events::GameEventData,
        grid::Viewport,
        input::{Action, ActionSet, InputRecording},
        level::{DirectorySource, LevelLoader, LevelSource, MemorySource},
        player::Weapon,
        session::Session,
        templates::ActorTemplates,
        tick::{replay, tick, TickInput, TickOutcome},
    },
};

/// Length of the scripted run (ticks)
const DEMO_TICKS: u64 = 900;

const LEVEL_ONE: &str = "\
# Built-in level 1
#

         c c c
                    ggg        m
    ggg      e    1        e  ggg
gggggggggggggggggggg  gggggggggggg";

const LEVEL_TWO: &str = "\
# Built-in level 2

     b      c c
   gggg    ggggg     m
        e          ggg
gggggggggggggggggggggg";

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to set tracing subscriber")?;

    info!("Tile Platformer v{}", VERSION);
    info!("Tick Rate: {} Hz ({} ms per frame)", TICK_RATE, FRAME_MS);

    let mut args = std::env::args().skip(1);
    let level_dir = args.next();
    let config = match args.next() {
        Some(path) => SimConfig::load(&path).with_context(|| format!("loading config {path}"))?,
        None => SimConfig::default(),
    };

    match level_dir {
        Some(dir) => {
            info!("Levels: {}", dir);
            run(DirectorySource::new(dir), config)
        }
        None => {
            info!("Levels: built-in");
            let source = MemorySource::new()
                .with_level(1, LEVEL_ONE)
                .with_level(2, LEVEL_TWO);
            run(source, config)
        }
    }
}

fn run<S: LevelSource + Clone>(source: S, config: SimConfig) -> Result<()> {
    let templates = ActorTemplates::standard();
    demo_replay(LevelLoader::new(source.clone(), templates.clone(), config.clone()))?;
    demo_session(LevelLoader::new(source, templates, config))
}

/// Scripted input: run right, hop now and then, shoot in bursts.
fn script(actions: &mut ActionSet, t: u64) {
    if t == 0 {
        actions.press(Action::MoveRight);
    }
    if t == 400 {
        actions.release(Action::MoveRight);
        actions.press(Action::MoveLeft);
    }
    if t == 460 {
        actions.release(Action::MoveLeft);
        actions.press(Action::MoveRight);
    }

    match t % 50 {
        0 => actions.press(Action::Jump),
        5 => actions.release(Action::Jump),
        _ => {}
    }
    match t % 40 {
        20 => actions.press(Action::Fire),
        22 => actions.release(Action::Fire),
        _ => {}
    }

    if t == 600 {
        actions.press(Action::SelectWeapon(Weapon::MachineGun));
    }
    if t == 620 {
        actions.release(Action::SelectWeapon(Weapon::MachineGun));
        actions.press(Action::SelectWeapon(Weapon::Pistol));
    }
}

/// Play one level attempt, then verify determinism by replaying it.
fn demo_replay<S: LevelSource>(mut loader: LevelLoader<S>) -> Result<()> {
    info!("=== Starting Demo Run ===");

    let initial = loader.load_next().context("loading first level")?;
    let config = loader.config().clone();
    let mut grid = initial.clone();

    info!(
        "Level {}: {}x{} tiles, {} creatures, {} items",
        loader.current_level(),
        grid.width(),
        grid.height(),
        grid.creature_count(),
        grid.item_count()
    );

    let mut actions = ActionSet::new();
    let mut recording = InputRecording::new();
    let mut total_events = 0;

    for t in 0..DEMO_TICKS {
        script(&mut actions, t);
        let frame = actions.snapshot();
        recording.record(FRAME_MS, frame);

        let viewport = grid
            .player()
            .map(|player| Viewport::following(player.body().position.x, SCREEN_WIDTH, grid.tiles()));
        let input = TickInput {
            frame,
            viewport,
            elapsed_ms: FRAME_MS,
        };
        let result = tick(&mut grid, &input, &config);
        total_events += result.events.len();

        for event in &result.events {
            match &event.data {
                GameEventData::ItemCollected { item, kind } => {
                    info!("Tick {}: collected {:?} {}", event.tick, kind, item);
                }
                GameEventData::CreatureStomped { creature } => {
                    info!("Tick {}: stomped {}", event.tick, creature);
                }
                GameEventData::CreatureShot { creature, bullet } => {
                    info!("Tick {}: bullet {} hit {}", event.tick, bullet, creature);
                }
                GameEventData::PlayerHit { creature } => {
                    info!("Tick {}: player hit by {}", event.tick, creature);
                }
                _ => {}
            }
        }

        if result.outcome != TickOutcome::Continue {
            info!("Run ended at tick {}: {:?}", t, result.outcome);
            break;
        }
    }

    info!("=== Run Results ===");
    if let Some(player) = grid.player() {
        info!(
            "Player: {:?}, {} coins, {} pistol rounds",
            player.creature().state(),
            player.coins(),
            player.ammo(Weapon::Pistol)
        );
    }
    info!("Total events: {}", total_events);

    let hash = grid.compute_hash();
    info!("Final State Hash: {}", hash);
    info!("Input Hash: {}", recording.compute_hash());

    info!("=== Verifying Determinism ===");
    let (replayed, _) = replay(initial, &recording, Some(SCREEN_WIDTH), &config);
    let replay_hash = replayed.compute_hash();
    info!("Replay State Hash: {}", replay_hash);

    if hash == replay_hash {
        info!("DETERMINISM VERIFIED: Hashes match!");
    } else {
        warn!("DETERMINISM FAILURE: Hashes differ!");
    }

    Ok(())
}

/// Drive the same script through a session, across reloads and levels.
fn demo_session<S: LevelSource>(loader: LevelLoader<S>) -> Result<()> {
    info!("=== Starting Demo Session ===");

    let mut session = Session::start(loader).context("starting session")?;
    let mut actions = ActionSet::new();

    for t in 0..DEMO_TICKS * 2 {
        if t == DEMO_TICKS * 2 - 1 {
            actions.press(Action::Exit);
        }
        script(&mut actions, t % DEMO_TICKS);
        let frame = actions.snapshot();

        session.step_following(FRAME_MS, frame, SCREEN_WIDTH)?;
        if !session.is_running() {
            break;
        }
    }

    let control = session.control();
    info!(
        "Session over: {} ticks, {} ms, level {}, {} completed, {} reloads",
        control.ticks,
        control.total_time_ms,
        session.current_level(),
        session.levels_completed(),
        session.reloads()
    );

    Ok(())
}
