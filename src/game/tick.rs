//! Simulation Tick
//!
//! One tick runs to completion before anything else touches the grid:
//!
//! 1. Dead player: request a reload and stop
//! 2. Wake creatures inside the viewport
//! 3. Apply input to the player
//! 4. Player: gravity, X, contacts, Y, contacts
//! 5. Creatures: gravity, X, Y
//! 6. Bullets: X, Y, creature hits
//! 7. Prune dead creatures
//! 8. Advance animations and state clocks
//!
//! The same grid, inputs and elapsed times always produce the same
//! resulting grid hash.

use tracing::debug;
#[cfg(feature = "debug-tracing")]
use tracing::trace;

use crate::config::SimConfig;
use crate::game::actor::{Actor, ItemKind, Mover, Sprite};
use crate::game::collision::{find_collision, find_creature_collision, resolve_x, resolve_y};
use crate::game::creature::CreatureState;
use crate::game::events::GameEvent;
use crate::game::grid::{Grid, Viewport};
use crate::game::input::{InputFrame, InputRecording};
use crate::game::player::{Player, Weapon};

/// What the caller must do after a tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TickOutcome {
    /// Keep ticking this grid
    #[default]
    Continue,
    /// The player is dead: rebuild the current level
    ReloadLevel,
    /// The goal was collected: load the next level
    AdvanceLevel,
}

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// What to do with the grid next
    pub outcome: TickOutcome,
    /// Events generated this tick
    pub events: Vec<GameEvent>,
}

/// Everything the host feeds into one tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct TickInput {
    /// Input snapshot for this tick
    pub frame: InputFrame,
    /// Camera window; creatures inside it are woken
    pub viewport: Option<Viewport>,
    /// Milliseconds since the previous tick
    pub elapsed_ms: u64,
}

impl TickInput {
    /// Input without a viewport.
    pub fn new(frame: InputFrame, elapsed_ms: u64) -> Self {
        Self {
            frame,
            viewport: None,
            elapsed_ms,
        }
    }

    /// Builder: attach a viewport.
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = Some(viewport);
        self
    }
}

/// Run one simulation tick.
///
/// # Arguments
///
/// * `grid` - The level (will be mutated)
/// * `input` - Input snapshot, viewport and elapsed time
/// * `config` - Physics constants
///
/// A grid without a player is left untouched. A dead player yields
/// [`TickOutcome::ReloadLevel`] without updating anything. Collecting the
/// goal yields [`TickOutcome::AdvanceLevel`] and ends the tick at once.
pub fn tick(grid: &mut Grid, input: &TickInput, config: &SimConfig) -> TickResult {
    let mut result = TickResult::default();

    let player_state = match grid.player() {
        Some(player) => player.creature().state(),
        None => return result,
    };
    if player_state == CreatureState::Dead {
        debug!(tick = grid.tick(), "player dead, level must reload");
        result.outcome = TickOutcome::ReloadLevel;
        return result;
    }

    let elapsed_ms = input.elapsed_ms;
    grid.advance_clock(elapsed_ms);

    #[cfg(feature = "debug-tracing")]
    trace!(tick = grid.tick(), elapsed_ms, flags = input.frame.flags, "tick");

    if let Some(viewport) = input.viewport {
        wake_visible(grid, viewport);
    }

    apply_input(grid, &input.frame, config, &mut result);

    if update_player(grid, elapsed_ms, config, &mut result) {
        debug!(tick = grid.tick(), "goal collected");
        result.outcome = TickOutcome::AdvanceLevel;
        return result;
    }

    update_creatures(grid, elapsed_ms, config);
    update_bullets(grid, elapsed_ms, &mut result);
    prune_dead(grid, &mut result);
    update_animations(grid, elapsed_ms, config, &mut result);

    result
}

// =============================================================================
// PHASES
// =============================================================================

fn wake_visible(grid: &mut Grid, viewport: Viewport) {
    for actor in grid.actors_mut().iter_mut() {
        if let Actor::Creature(creature) = actor {
            if viewport.contains_x(creature.body().position.x) {
                creature.wake_up();
            }
        }
    }
}

/// Movement, jump, fire and weapon selection. Ignored unless the player is
/// NORMAL.
fn apply_input(grid: &mut Grid, frame: &InputFrame, config: &SimConfig, result: &mut TickResult) {
    let tick = grid.tick();

    let can_fire = match grid.player_mut() {
        Some(player) if player.creature().is_alive() => {
            let max_speed = player.creature().max_speed();
            let mut velocity_x = 0.0;
            if frame.move_left() {
                velocity_x -= max_speed;
                player.set_looking_left(true);
            }
            if frame.move_right() {
                velocity_x += max_speed;
                player.set_looking_left(false);
            }
            player.body_mut().velocity.x = velocity_x;

            if frame.jump() {
                player.jump(false, config.jump_speed);
            }
            frame.fire() && player.can_fire()
        }
        _ => return,
    };

    if can_fire {
        let id = grid.next_id();
        let fired = grid
            .player_mut()
            .and_then(|player| {
                let weapon = player.weapon();
                player
                    .fire(id, config.bullet_speed)
                    .map(|bullet| (bullet, weapon, player.current_ammo()))
            });
        if let Some((bullet, weapon, remaining)) = fired {
            grid.add_bullet(bullet);
            result.events.push(GameEvent::bullet_fired(tick, id, weapon, remaining));
        }
    }

    if let Some(weapon) = frame.select_weapon {
        if let Some(player) = grid.player_mut() {
            if player.select_weapon(weapon) {
                result.events.push(GameEvent::weapon_selected(tick, weapon));
            }
        }
    }
}

/// Returns true if the goal was collected.
fn update_player(grid: &mut Grid, elapsed_ms: u64, config: &SimConfig, result: &mut TickResult) -> bool {
    let tick = grid.tick();
    let (tiles, player, actors, _) = grid.split_mut();
    let Some(player) = player else {
        return false;
    };

    if !player.creature().is_flying() {
        player.body_mut().velocity.y += config.gravity * elapsed_ms as f32;
    }

    let old_y = player.body().position.y;

    resolve_x(player, tiles, elapsed_ms);
    if check_player_collision(player, actors, false, config, tick, result) {
        return true;
    }

    resolve_y(player, tiles, elapsed_ms);
    let can_kill = old_y < player.body().position.y;
    check_player_collision(player, actors, can_kill, config, tick, result)
}

/// Resolve the player's first contact. Returns true if it was the goal.
fn check_player_collision(
    player: &mut Player,
    actors: &mut Vec<Actor>,
    can_kill: bool,
    config: &SimConfig,
    tick: u64,
    result: &mut TickResult,
) -> bool {
    if !player.creature().is_alive() {
        return false;
    }
    let Some(index) = find_collision(&*player, actors) else {
        return false;
    };

    if let Some(item) = actors[index].as_item() {
        let (id, kind) = (item.id(), item.kind());
        actors.remove(index);
        match kind {
            ItemKind::Coin => player.add_coin(),
            ItemKind::Ammo => player.add_ammo(Weapon::Pistol, 1),
            ItemKind::Goal => {
                result.events.push(GameEvent::level_complete(tick, id));
                return true;
            }
        }
        result.events.push(GameEvent::item_collected(tick, id, kind));
        return false;
    }

    if let Some(creature) = actors[index].as_creature_mut() {
        if can_kill {
            creature.set_state(CreatureState::Dying);
            let y = creature.body().position.y - player.height() as f32;
            player.set_y(y);
            player.jump(true, config.jump_speed);
            result.events.push(GameEvent::creature_stomped(tick, creature.id()));
        } else {
            player.creature_mut().set_state(CreatureState::Dying);
            debug!(tick, creature = %creature.id(), "player hit");
            result.events.push(GameEvent::player_hit(tick, creature.id()));
        }
    }

    false
}

/// Every creature that is not DEAD falls and moves; DYING ones still fall.
fn update_creatures(grid: &mut Grid, elapsed_ms: u64, config: &SimConfig) {
    let (tiles, _, actors, _) = grid.split_mut();
    for actor in actors.iter_mut() {
        let Actor::Creature(creature) = actor else {
            continue;
        };
        if creature.state() == CreatureState::Dead {
            continue;
        }

        if !creature.is_flying() {
            creature.body_mut().velocity.y += config.gravity * elapsed_ms as f32;
        }
        resolve_x(creature, tiles, elapsed_ms);
        resolve_y(creature, tiles, elapsed_ms);
    }
}

/// Visible bullets move; a tile or creature contact spends them.
fn update_bullets(grid: &mut Grid, elapsed_ms: u64, result: &mut TickResult) {
    let tick = grid.tick();
    let (tiles, _, actors, bullets) = grid.split_mut();

    for bullet in bullets.iter_mut() {
        if !bullet.is_visible() {
            continue;
        }

        let hit = resolve_x(bullet, tiles, elapsed_ms)
            .or_else(|| resolve_y(bullet, tiles, elapsed_ms));
        if let Some(tile) = hit {
            result.events.push(GameEvent::bullet_spent(tick, bullet.id(), tile));
            continue;
        }

        let Some(index) = find_creature_collision(&*bullet, actors) else {
            continue;
        };
        if let Some(creature) = actors.get_mut(index).and_then(Actor::as_creature_mut) {
            creature.set_state(CreatureState::Dying);
            let y = creature.body().position.y - bullet.height() as f32;
            bullet.set_y(y);
            bullet.deactivate();
            result.events.push(GameEvent::creature_shot(tick, creature.id(), bullet.id()));
        }
    }
}

fn prune_dead(grid: &mut Grid, result: &mut TickResult) {
    let tick = grid.tick();
    grid.actors_mut().retain(|actor| {
        let dead = actor
            .as_creature()
            .is_some_and(|c| c.state() == CreatureState::Dead);
        if dead {
            result.events.push(GameEvent::creature_pruned(tick, actor.id()));
        }
        !dead
    });
}

fn update_animations(grid: &mut Grid, elapsed_ms: u64, config: &SimConfig, result: &mut TickResult) {
    let tick = grid.tick();

    if let Some(player) = grid.player_mut() {
        if player.creature_mut().update(elapsed_ms, config.die_time_ms) {
            debug!(tick, "player died");
            result.events.push(GameEvent::player_died(tick));
        }
    }

    for actor in grid.actors_mut().iter_mut() {
        if actor.update(elapsed_ms, config.die_time_ms) {
            result.events.push(GameEvent::creature_died(tick, actor.id()));
        }
    }
}

// =============================================================================
// REPLAY
// =============================================================================

/// Replay a recorded level attempt.
///
/// With `screen_width` set, each tick wakes creatures through a viewport
/// following the player, as a host would. Stops early when a tick asks for
/// a reload or the next level. Returns the final grid and all events.
pub fn replay(
    initial: Grid,
    recording: &InputRecording,
    screen_width: Option<i32>,
    config: &SimConfig,
) -> (Grid, Vec<GameEvent>) {
    let mut grid = initial;
    let mut all_events = Vec::new();

    for (_, elapsed_ms, frame) in recording.replay_iter() {
        let mut input = TickInput::new(frame, elapsed_ms);
        if let (Some(width), Some(player)) = (screen_width, grid.player()) {
            input.viewport = Some(Viewport::following(player.body().position.x, width, grid.tiles()));
        }

        let result = tick(&mut grid, &input, config);
        all_events.extend(result.events);

        if result.outcome != TickOutcome::Continue {
            break;
        }
    }

    (grid, all_events)
}
