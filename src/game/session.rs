//! Play Session
//!
//! Drives one player's run through the levels: owns the level loader, the
//! current grid and the host loop's control state. The host calls
//! [`Session::step`] once per frame and draws between steps.

use tracing::{debug, info};

use crate::game::actor::Sprite;
use crate::game::events::{GameEvent, GameEventData};
use crate::game::grid::{Grid, Viewport};
use crate::game::input::InputFrame;
use crate::game::level::{LevelError, LevelLoader, LevelSource};
use crate::game::tick::{tick, TickInput, TickOutcome, TickResult};

/// Whether the host loop should keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopState {
    /// Keep ticking
    #[default]
    Running,
    /// The player asked to exit
    Stopped,
}

/// Host loop bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopControl {
    /// Running or stopped
    pub state: LoopState,
    /// Milliseconds simulated across all levels
    pub total_time_ms: u64,
    /// Ticks run across all levels
    pub ticks: u64,
}

impl LoopControl {
    /// A running loop with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if the loop should continue.
    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Stop the loop. Takes effect before the next tick.
    pub fn stop(&mut self) {
        self.state = LoopState::Stopped;
    }

    fn record_tick(&mut self, elapsed_ms: u64) {
        self.ticks += 1;
        self.total_time_ms = self.total_time_ms.saturating_add(elapsed_ms);
    }
}

/// A run through the levels of one source.
pub struct Session<S> {
    loader: LevelLoader<S>,
    grid: Grid,
    control: LoopControl,
    levels_completed: u32,
    reloads: u32,
}

impl<S: LevelSource> Session<S> {
    /// Load the first level and start running.
    pub fn start(mut loader: LevelLoader<S>) -> Result<Self, LevelError> {
        let grid = loader.load_next()?;
        info!(level = loader.current_level(), "session started");

        Ok(Self {
            loader,
            grid,
            control: LoopControl::new(),
            levels_completed: 0,
            reloads: 0,
        })
    }

    /// Current grid, for drawing
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Level loader
    pub fn loader(&self) -> &LevelLoader<S> {
        &self.loader
    }

    /// Loop control state
    pub fn control(&self) -> &LoopControl {
        &self.control
    }

    /// Number of the level being played
    pub fn current_level(&self) -> u32 {
        self.loader.current_level()
    }

    /// Goals collected so far
    pub fn levels_completed(&self) -> u32 {
        self.levels_completed
    }

    /// Times the current or an earlier level was restarted after a death
    pub fn reloads(&self) -> u32 {
        self.reloads
    }

    /// Check if the loop should continue.
    pub fn is_running(&self) -> bool {
        self.control.is_running()
    }

    /// Run one frame.
    ///
    /// An `exit` input stops the loop without ticking. Otherwise runs one
    /// tick and, when it asks for one, swaps in a freshly loaded grid. The
    /// returned result is the tick's, before any grid swap.
    pub fn step(
        &mut self,
        elapsed_ms: u64,
        frame: InputFrame,
        viewport: Option<Viewport>,
    ) -> Result<TickResult, LevelError> {
        if !self.control.is_running() {
            return Ok(TickResult::default());
        }
        if frame.exit() {
            info!(ticks = self.control.ticks, total_ms = self.control.total_time_ms, "exit requested");
            self.control.stop();
            return Ok(TickResult::default());
        }

        let input = TickInput {
            frame,
            viewport,
            elapsed_ms,
        };
        let result = tick(&mut self.grid, &input, self.loader.config());
        self.control.record_tick(elapsed_ms);
        log_events(&result.events);

        match result.outcome {
            TickOutcome::Continue => {}
            TickOutcome::ReloadLevel => {
                info!(level = self.loader.current_level(), "player dead, reloading level");
                self.grid = self.loader.reload()?;
                self.reloads += 1;
            }
            TickOutcome::AdvanceLevel => {
                self.levels_completed += 1;
                self.grid = self.loader.load_next()?;
                info!(level = self.loader.current_level(), "advanced to level");
            }
        }

        Ok(result)
    }

    /// [`step`](Session::step) with a viewport following the player.
    pub fn step_following(
        &mut self,
        elapsed_ms: u64,
        frame: InputFrame,
        screen_width: i32,
    ) -> Result<TickResult, LevelError> {
        let viewport = self
            .grid
            .player()
            .map(|player| Viewport::following(player.body().position.x, screen_width, self.grid.tiles()));
        self.step(elapsed_ms, frame, viewport)
    }
}

fn log_events(events: &[GameEvent]) {
    for event in events {
        match &event.data {
            GameEventData::ItemCollected { .. }
            | GameEventData::CreatureStomped { .. }
            | GameEventData::CreatureShot { .. }
            | GameEventData::PlayerHit { .. } => {
                debug!(tick = event.tick, event = ?event.data, "game event");
            }
            _ => {}
        }
    }
}
