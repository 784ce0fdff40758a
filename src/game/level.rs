//! Level Loading
//!
//! Levels are plain text, one character per tile:
//!
//! ```text
//! # comment lines start with '#'
//! g  solid tile        c  coin
//! b  ammo              m  goal
//! e  blob              1  fly
//! ```
//!
//! Any other character is passable. The grid is as wide as the longest
//! line and as tall as the number of non-comment lines. Levels are
//! numbered from 1; running off the end wraps back to level 1.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::SimConfig;
use crate::core::units::tiles_to_pixels;
use crate::core::vec2::Vec2;
use crate::game::grid::{Grid, TileId, TileLayer};
use crate::game::templates::{ActorTemplates, SpawnKind};

/// Tile image used for every `g` cell.
pub const GROUND_TILE: TileId = TileId(0);

/// Errors raised while loading a level.
#[derive(Debug, thiserror::Error)]
pub enum LevelError {
    /// The source has no level with this number
    #[error("level {level} not found")]
    NotFound {
        /// Level number
        level: u32,
    },

    /// Not even level 1 exists
    #[error("no levels to load")]
    NoLevels,

    /// The level text has no rows or no columns
    #[error("level has no tiles")]
    Empty,

    /// The level file exists but could not be read
    #[error("failed to read level {path}: {source}")]
    Io {
        /// Path that was read
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// SOURCES
// =============================================================================

/// Where level text comes from.
pub trait LevelSource {
    /// Text of level `level`, or [`LevelError::NotFound`].
    fn read_level(&self, level: u32) -> Result<String, LevelError>;
}

/// Levels stored as `Level<N>.txt` files in one directory.
#[derive(Clone, Debug)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Read levels from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of level `level`.
    pub fn path_of(&self, level: u32) -> PathBuf {
        self.root.join(format!("Level{level}.txt"))
    }
}

impl LevelSource for DirectorySource {
    fn read_level(&self, level: u32) -> Result<String, LevelError> {
        let path = self.path_of(level);
        std::fs::read_to_string(&path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => LevelError::NotFound { level },
            _ => LevelError::Io {
                path: path.display().to_string(),
                source,
            },
        })
    }
}

/// Levels held in memory, keyed by number.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    levels: BTreeMap<u32, String>,
}

impl MemorySource {
    /// Empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add level `level`.
    pub fn with_level(mut self, level: u32, text: impl Into<String>) -> Self {
        self.insert(level, text);
        self
    }

    /// Add or replace level `level`.
    pub fn insert(&mut self, level: u32, text: impl Into<String>) {
        self.levels.insert(level, text.into());
    }

    /// Number of stored levels
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether no levels are stored
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl LevelSource for MemorySource {
    fn read_level(&self, level: u32) -> Result<String, LevelError> {
        self.levels
            .get(&level)
            .cloned()
            .ok_or(LevelError::NotFound { level })
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn spawn_kind(ch: char) -> Option<SpawnKind> {
    match ch {
        'b' => Some(SpawnKind::Ammo),
        'c' => Some(SpawnKind::Coin),
        'm' => Some(SpawnKind::Goal),
        '1' => Some(SpawnKind::Fly),
        'e' => Some(SpawnKind::Blob),
        _ => None,
    }
}

/// Build a grid from level text.
///
/// Sprites are spawned row by row, left to right, so actor order follows
/// reading order. The player is added last, at the top of column
/// `config.player_spawn_tile_x`.
pub fn parse_level(text: &str, templates: &ActorTemplates, config: &SimConfig) -> Result<Grid, LevelError> {
    let rows: Vec<&str> = text.lines().filter(|line| !line.starts_with('#')).collect();
    let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);

    let mut tiles = TileLayer::new(width as i32, rows.len() as i32).ok_or(LevelError::Empty)?;
    let mut spawns = Vec::new();
    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            if ch == 'g' {
                tiles.set_tile(x as i32, y as i32, GROUND_TILE);
            } else if let Some(kind) = spawn_kind(ch) {
                spawns.push((kind, x as i32, y as i32));
            }
        }
    }

    let mut grid = Grid::new(tiles);

    for (kind, x, y) in spawns {
        templates.spawn_in_tile(&mut grid, kind, x, y, config);
    }

    let id = grid.next_id();
    let position = Vec2::new(tiles_to_pixels(config.player_spawn_tile_x) as f32, 0.0);
    grid.set_player(templates.spawn_player(id, position, config));

    Ok(grid)
}

// =============================================================================
// LOADER
// =============================================================================

/// Tracks the current level number and builds fresh grids on demand.
#[derive(Clone, Debug)]
pub struct LevelLoader<S> {
    source: S,
    templates: ActorTemplates,
    config: SimConfig,
    current_level: u32,
}

impl<S: LevelSource> LevelLoader<S> {
    /// Create a loader positioned before level 1.
    pub fn new(source: S, templates: ActorTemplates, config: SimConfig) -> Self {
        Self {
            source,
            templates,
            config,
            current_level: 0,
        }
    }

    /// Number of the last level loaded (0 before the first load)
    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    /// Simulation constants handed to spawned actors
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Actor templates
    pub fn templates(&self) -> &ActorTemplates {
        &self.templates
    }

    /// Level source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Load the level after the current one.
    ///
    /// A missing level wraps back to level 1. Fails with
    /// [`LevelError::NoLevels`] when level 1 itself is missing.
    pub fn load_next(&mut self) -> Result<Grid, LevelError> {
        loop {
            self.current_level += 1;
            match self.build(self.current_level) {
                Ok(grid) => return Ok(grid),
                Err(LevelError::NotFound { .. }) if self.current_level == 1 => {
                    warn!("no levels available");
                    self.current_level = 0;
                    return Err(LevelError::NoLevels);
                }
                Err(LevelError::NotFound { level }) => {
                    info!(level, "no more levels, wrapping to level 1");
                    self.current_level = 0;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Rebuild the current level from scratch.
    pub fn reload(&self) -> Result<Grid, LevelError> {
        self.build(self.current_level)
    }

    fn build(&self, level: u32) -> Result<Grid, LevelError> {
        let text = self.source.read_level(level)?;
        let grid = parse_level(&text, &self.templates, &self.config)?;
        info!(
            level,
            width = grid.width(),
            height = grid.height(),
            creatures = grid.creature_count(),
            items = grid.item_count(),
            "level loaded"
        );
        Ok(grid)
    }
}
