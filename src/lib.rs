//! # Tile Platformer
//!
//! Headless simulation core for a 2D side-scrolling tile platformer.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     TILE PLATFORMER                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  config.rs       - Physics constants (JSON overridable)      │
//! │                                                              │
//! │  core/           - Primitives                                │
//! │  ├── units.rs    - Pixel/tile conversion, default constants  │
//! │  ├── vec2.rs     - f32 2D vector                             │
//! │  └── hash.rs     - State hashing for reproducibility         │
//! │                                                              │
//! │  game/           - Simulation                                │
//! │  ├── animation.rs- Frame sequences                           │
//! │  ├── actor.rs    - Items, bullets, capabilities              │
//! │  ├── creature.rs - Creature state machine                    │
//! │  ├── player.rs   - Player, weapons                           │
//! │  ├── grid.rs     - Tile layer, actors, viewport              │
//! │  ├── collision.rs- Tile sweep, actor overlap                 │
//! │  ├── tick.rs     - One simulation step, replay               │
//! │  ├── events.rs   - Tick events                               │
//! │  ├── input.rs    - Input snapshots and recordings            │
//! │  ├── templates.rs- Spawn factory                             │
//! │  ├── level.rs    - Level text format, level sequencing       │
//! │  └── session.rs  - Host loop state                           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! A tick depends only on the grid, the input snapshot, the viewport and
//! the elapsed time:
//! - No HashMap (uses BTreeMap for sorted iteration)
//! - No system time or randomness
//! - Actors are processed in insertion order
//!
//! Replaying a recorded input stream on a freshly loaded level reproduces
//! the same final state hash.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod game;

// Re-export commonly used types
pub use config::{SimConfig, ConfigError};
pub use core::units::TILE_SIZE;
pub use core::vec2::Vec2;
pub use game::grid::Grid;
pub use game::input::{InputFrame, InputRecording};
pub use game::tick::{tick, TickInput, TickOutcome, TickResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Host frame rate (Hz)
pub const TICK_RATE: u32 = 60;

/// Milliseconds per frame at [`TICK_RATE`]
pub const FRAME_MS: u64 = 1000 / TICK_RATE as u64;

/// Screen width the demo host assumes, in pixels
pub const SCREEN_WIDTH: i32 = 800;
