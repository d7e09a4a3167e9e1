#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Origin Defence adapters.
//!
//! Adapters never mutate game state. They read [`GameSnapshot`] values, map
//! pointer positions back to grid cells through a [`ScreenLayout`] and turn
//! events into player-facing messages.

use glam::Vec2;
use origin_defence_core::{CellCoord, Event, GamePhase, GameSnapshot, Outcome};
use std::{error::Error, fmt};

/// Glyph drawn for the origin cell.
pub const ORIGIN_GLYPH: char = 'O';
/// Glyph drawn for a tower.
pub const TOWER_GLYPH: char = 'T';
/// Glyph drawn for a creep spawner tower.
pub const SPAWNER_GLYPH: char = 'S';
/// Glyph drawn for a creep.
pub const CREEP_GLYPH: char = 'c';
/// Glyph drawn for an empty cell.
pub const EMPTY_GLYPH: char = '.';

/// Maps between screen positions and grid cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenLayout {
    /// Screen position of the top-left corner of the grid.
    pub offset: Vec2,
    /// Side length of a single cell in screen units.
    pub cell_size: f32,
    /// Number of columns in the grid.
    pub columns: u32,
    /// Number of rows in the grid.
    pub rows: u32,
}

impl ScreenLayout {
    /// Creates a new layout.
    ///
    /// Returns an error when `cell_size` is not a positive finite number.
    pub fn new(
        offset: Vec2,
        cell_size: f32,
        columns: u32,
        rows: u32,
    ) -> Result<Self, RenderingError> {
        if !cell_size.is_finite() || cell_size <= f32::EPSILON {
            return Err(RenderingError::InvalidCellSize { cell_size });
        }

        Ok(Self {
            offset,
            cell_size,
            columns,
            rows,
        })
    }

    /// Creates the layout described by a snapshot, anchored at `offset`.
    pub fn for_snapshot(snapshot: &GameSnapshot, offset: Vec2) -> Result<Self, RenderingError> {
        Self::new(
            offset,
            snapshot.cell_size as f32,
            snapshot.grid_width,
            snapshot.grid_height,
        )
    }

    /// Total width of the grid in screen units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_size
    }

    /// Total height of the grid in screen units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_size
    }

    /// Resolves the grid cell under a screen position.
    ///
    /// Returns `None` when the position lies outside the grid.
    #[must_use]
    pub fn screen_to_cell(&self, position: Vec2) -> Option<CellCoord> {
        let local = (position - self.offset) / self.cell_size;
        if !local.is_finite() || local.x < 0.0 || local.y < 0.0 {
            return None;
        }

        let local = local.floor();
        if local.x >= self.columns as f32 || local.y >= self.rows as f32 {
            return None;
        }

        Some(CellCoord::new(local.x as i32, local.y as i32))
    }

    /// Screen position of the center of a cell.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        let cell = Vec2::new(cell.column() as f32, cell.row() as f32);
        self.offset + (cell + Vec2::splat(0.5)) * self.cell_size
    }
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Cells must have a positive finite side length.
    InvalidCellSize {
        /// Provided cell size that failed validation.
        cell_size: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCellSize { cell_size } => {
                write!(f, "cell_size must be positive (received {cell_size})")
            }
        }
    }
}

impl Error for RenderingError {}

/// Status line shown above the board.
#[must_use]
pub fn status_line(snapshot: &GameSnapshot) -> String {
    format!(
        "Phase: {}  Turn: {}/{}  Health: {}",
        snapshot.phase.label(),
        snapshot.turn,
        snapshot.max_turns,
        snapshot.origin_health
    )
}

/// Renders the snapshot as a status line followed by one text row per grid row.
///
/// Creeps are drawn above the origin, which is drawn above towers and
/// spawners. Entities outside the board are not drawn.
#[must_use]
pub fn render_text(snapshot: &GameSnapshot) -> String {
    let width = usize::try_from(snapshot.grid_width).unwrap_or(0);
    let height = usize::try_from(snapshot.grid_height).unwrap_or(0);
    let mut rows = vec![vec![EMPTY_GLYPH; width]; height];

    let mut draw = |cell: CellCoord, glyph: char| {
        let (Ok(column), Ok(row)) = (usize::try_from(cell.column()), usize::try_from(cell.row()))
        else {
            return;
        };
        if let Some(slot) = rows.get_mut(row).and_then(|line| line.get_mut(column)) {
            *slot = glyph;
        }
    };

    for spawner in &snapshot.spawners {
        draw(spawner.cell, SPAWNER_GLYPH);
    }
    for tower in &snapshot.towers {
        draw(tower.cell, TOWER_GLYPH);
    }
    draw(snapshot.origin, ORIGIN_GLYPH);
    for creep in &snapshot.creeps {
        draw(creep.cell, CREEP_GLYPH);
    }

    let mut text = status_line(snapshot);
    for row in rows {
        text.push('\n');
        text.extend(row);
    }
    text
}

/// Player-facing message for events that deserve one.
#[must_use]
pub fn event_message(event: &Event) -> Option<String> {
    let message = match event {
        Event::GameStarted { max_turns } => format!("New game: survive {max_turns} turns."),
        Event::TurnAdvanced { turn, max_turns } => format!("Turn {turn}/{max_turns}"),
        Event::PhaseChanged {
            phase: GamePhase::Placement,
        } => "Place your towers.".to_owned(),
        Event::AlertStarted { .. } => "Creeps incoming!".to_owned(),
        Event::CreepArrived { .. } => "A creep reached the origin.".to_owned(),
        Event::GameOver {
            outcome: Outcome::Survived,
            origin_health,
        } => format!("Game over: the origin survived with {origin_health} health."),
        Event::GameOver {
            outcome: Outcome::Overrun,
            ..
        } => "Game over: the origin was overrun.".to_owned(),
        _ => return None,
    };
    Some(message)
}
