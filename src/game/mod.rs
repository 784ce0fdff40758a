//! Game Logic Module
//!
//! The simulation core plus its thin level, input and session layers.
//! Nothing here touches pixels, images or devices.
//!
//! ## Module Structure
//!
//! - `animation`: Frame sequences with wrapping clocks
//! - `actor`: Sprite/Mover capabilities, items, bullets
//! - `creature`: NORMAL → DYING → DEAD state machine
//! - `player`: Inventory, weapons, jump and fire
//! - `grid`: Tiles, actors and the camera viewport
//! - `collision`: Axis-separated tile sweep and actor overlap
//! - `tick`: One simulation step, and replay
//! - `events`: Events produced by each tick
//! - `input`: Input snapshots, held/edge-triggered actions, recordings
//! - `templates`: Spawn factory keyed by kind
//! - `level`: Text level format and level sequencing
//! - `session`: Host loop state across levels

pub mod animation;
pub mod actor;
pub mod creature;
pub mod player;
pub mod grid;
pub mod collision;
pub mod tick;
pub mod events;
pub mod input;
pub mod templates;
pub mod level;
pub mod session;

// Re-export key types
pub use actor::{Actor, ActorId, Bullet, Item, ItemKind, Mover, Sprite};
pub use creature::{Creature, CreatureKind, CreatureState};
pub use player::{Player, Weapon};
pub use grid::{Grid, TileId, TileLayer, Viewport};
pub use tick::{tick, replay, TickInput, TickOutcome, TickResult};
pub use events::{GameEvent, GameEventData};
pub use input::{InputFrame, InputRecording, ActionSet, Action};
pub use templates::{ActorTemplates, SpawnKind};
pub use level::{LevelLoader, LevelSource, LevelError, DirectorySource, MemorySource};
pub use session::{Session, LoopControl, LoopState};
