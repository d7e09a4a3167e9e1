#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Origin Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and the systems that drive a game. Adapters submit
//! [`PlayerInput`] values, the turn controller translates them into
//! [`Command`] values that the world executes through its `apply` entry point,
//! and every mutation is broadcast as an [`Event`]. Presentation layers consume
//! events together with immutable [`GameSnapshot`] values and never mutate
//! state themselves.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Origin Defence.";

/// Step of an attack phase that is still resolving.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttackStage {
    /// The attack alert is playing; creeps have spawned but do not move yet.
    Alert,
    /// Creeps are advancing toward the origin on the pursuit cadence.
    Pursuit,
}

/// Describes the active phase of a game.
///
/// An attack is only ever left once its pursuit has resolved, so carrying the
/// [`AttackStage`] inside the phase is what rejects overlapping phase switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GamePhase {
    /// No game was started yet.
    NotStarted,
    /// The player may place towers and trigger the next attack.
    Placement,
    /// An attack is resolving.
    Attack(AttackStage),
    /// The final turn completed; only a new game may be started.
    GameOver,
}

impl GamePhase {
    /// Reports whether the phase accepts tower placement input.
    #[must_use]
    pub const fn accepts_placement(self) -> bool {
        matches!(self, Self::Placement)
    }

    /// Reports whether an attack is resolving.
    #[must_use]
    pub const fn is_attack(self) -> bool {
        matches!(self, Self::Attack(_))
    }

    /// Human readable label used by phase displays.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::Placement => "Placement",
            Self::Attack(_) => "Attack",
            Self::GameOver => "Game Over",
        }
    }
}

/// Final result reported when a game ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The origin still had health left after the final turn.
    Survived,
    /// Creeps drained the origin's health to zero.
    Overrun,
}

/// Inputs forwarded by adapters to the turn controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerInput {
    /// Starts a fresh game, discarding the previous one.
    StartGame,
    /// Requests a tower on the provided grid cell.
    Click {
        /// Cell resolved by the input layer from the pointer position.
        cell: CellCoord,
    },
    /// Requests the switch from placement to attack.
    SwitchPhase,
    /// Ends the session.
    Quit,
}

/// Reasons an input was ignored by the turn controller.
///
/// Rejections are routine outcomes of player input and never surface as
/// errors; they are only broadcast so adapters can log them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// No game has been started yet.
    NotStarted,
    /// An attack is still resolving.
    AttackInProgress,
    /// The game already ended.
    GameOver,
    /// The clicked cell is outside the grid or already occupied.
    InvalidPlacement,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Removes every tower and vacates every grid cell.
    ResetBoard,
    /// Marks the cell as occupied when it is currently a valid position.
    OccupyCell {
        /// Cell that should become occupied.
        cell: CellCoord,
    },
    /// Records a tower at the provided cell without validating it.
    PlaceTower {
        /// Cell that anchors the tower.
        cell: CellCoord,
    },
    /// Records a creep spawner tower at the provided cell.
    PlaceSpawner {
        /// Cell that anchors the spawner.
        cell: CellCoord,
        /// Number of creeps released each time the spawner triggers.
        creep_count: u32,
        /// Completed turns remaining before the spawner becomes ready.
        turns_until_release: u32,
    },
    /// Changes the number of creeps a spawner releases per trigger.
    SetSpawnerCreepCount {
        /// Spawner that should be updated.
        spawner: SpawnerId,
        /// New number of creeps released per trigger.
        creep_count: u32,
    },
    /// Removes a single spawner tower.
    RemoveSpawner {
        /// Spawner that should be removed.
        spawner: SpawnerId,
    },
    /// Removes every spawner tower.
    ClearSpawners,
    /// Decrements the release countdown of every spawner by one turn.
    AdvanceSpawnerCountdowns,
    /// Subtracts health from the origin, clamping at zero.
    DamageOrigin {
        /// Amount of health to subtract.
        amount: u32,
    },
    /// Replaces the origin's health with an absolute value.
    SetOriginHealth {
        /// New health value.
        health: u32,
    },
}

/// Events broadcast after processing inputs, commands and pursuit ticks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A new game started.
    GameStarted {
        /// Turn limit of the new game.
        max_turns: u32,
    },
    /// The game entered a new phase.
    PhaseChanged {
        /// Phase that became active.
        phase: GamePhase,
    },
    /// The turn counter changed.
    TurnAdvanced {
        /// Current turn.
        turn: u32,
        /// Turn limit of the game.
        max_turns: u32,
    },
    /// The board was cleared for a new game.
    BoardReset,
    /// A grid cell became occupied.
    CellOccupied {
        /// Cell that became occupied.
        cell: CellCoord,
    },
    /// A tower was recorded.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Grid cell of the tower.
        cell: CellCoord,
        /// Math coordinate of the tower relative to the origin.
        coord: MathCoord,
    },
    /// A spawner tower was recorded.
    SpawnerPlaced {
        /// Identifier assigned to the spawner.
        spawner: SpawnerId,
        /// Grid cell of the spawner.
        cell: CellCoord,
        /// Number of creeps released per trigger.
        creep_count: u32,
        /// Completed turns remaining before release.
        turns_until_release: u32,
    },
    /// A spawner's creep count changed.
    SpawnerCreepCountChanged {
        /// Spawner that changed.
        spawner: SpawnerId,
        /// New number of creeps released per trigger.
        creep_count: u32,
    },
    /// A spawner's release countdown changed.
    SpawnerCountdownChanged {
        /// Spawner that changed.
        spawner: SpawnerId,
        /// Completed turns remaining before release.
        turns_until_release: u32,
    },
    /// A spawner tower was removed.
    SpawnerRemoved {
        /// Spawner that was removed.
        spawner: SpawnerId,
    },
    /// Every spawner tower was removed.
    SpawnersCleared,
    /// The origin's health changed.
    OriginHealthChanged {
        /// Health after the change.
        health: u32,
    },
    /// The attack alert started.
    AlertStarted {
        /// Duration the alert lasts.
        duration: Duration,
    },
    /// The attack alert finished.
    AlertFinished,
    /// A creep entered the board.
    CreepSpawned {
        /// Identifier assigned to the creep.
        creep: CreepId,
        /// Cell the creep spawned on.
        cell: CellCoord,
    },
    /// A creep started a step toward the origin.
    CreepStepped {
        /// Creep that stepped.
        creep: CreepId,
        /// Cell the creep left.
        from: CellCoord,
        /// Cell the creep moves into.
        to: CellCoord,
    },
    /// A creep finished the transition of its current step.
    CreepSettled {
        /// Creep whose step completed.
        creep: CreepId,
    },
    /// A creep reached the origin and was removed.
    CreepArrived {
        /// Creep that arrived.
        creep: CreepId,
    },
    /// All creeps were removed without reaching the origin.
    CreepsCleared,
    /// An input was ignored.
    InputIgnored {
        /// Input that was ignored.
        input: PlayerInput,
        /// Reason the input was ignored.
        reason: Rejection,
    },
    /// The final turn completed.
    GameOver {
        /// Result of the game.
        outcome: Outcome,
        /// Origin health left at the end of the game.
        origin_health: u32,
    },
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $what:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            #[doc = concat!("Creates a new ", $what, " identifier with the provided numeric value.")]
            #[must_use]
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            #[doc = concat!("Retrieves the numeric representation of the ", $what, " identifier.")]
            #[must_use]
            pub const fn get(&self) -> u32 {
                self.0
            }
        }
    };
}

entity_id!(
    /// Unique identifier assigned to a tower.
    TowerId,
    "tower"
);
entity_id!(
    /// Unique identifier assigned to a creep spawner tower.
    SpawnerId,
    "spawner"
);
entity_id!(
    /// Unique identifier assigned to a creep.
    CreepId,
    "creep"
);

/// Location of a grid cell expressed as column and row.
///
/// Coordinates are signed so that positions outside the board, such as ring
/// cells of an oversized spawner ring, remain representable. The grid itself
/// is the only authority on whether a cell is inside the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Column of the cell; increases to the right.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Row of the cell; increases downwards.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Returns the cell displaced by the provided column and row deltas.
    #[must_use]
    pub const fn offset(self, columns: i32, rows: i32) -> Self {
        Self {
            column: self.column.saturating_add(columns),
            row: self.row.saturating_add(rows),
        }
    }

    /// Computes the Chebyshev distance between two cells.
    ///
    /// This is the number of 8-directional steps separating the cells.
    #[must_use]
    pub fn chebyshev_distance(self, other: CellCoord) -> u32 {
        self.column
            .abs_diff(other.column)
            .max(self.row.abs_diff(other.row))
    }
}

/// Signed coordinate centered on the origin with the Y axis pointing up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MathCoord {
    x: i32,
    y: i32,
}

impl MathCoord {
    /// The origin's coordinate.
    pub const ORIGIN: Self = Self::new(0, 0);

    /// Creates a new math coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal offset from the origin; positive to the right.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical offset from the origin; positive upwards.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }
}

/// Immutable representation of a tower used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower.
    pub id: TowerId,
    /// Grid cell of the tower.
    pub cell: CellCoord,
    /// Math coordinate of the tower.
    pub coord: MathCoord,
}

/// Immutable representation of a creep spawner tower used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnerSnapshot {
    /// Identifier allocated to the spawner.
    pub id: SpawnerId,
    /// Grid cell of the spawner.
    pub cell: CellCoord,
    /// Math coordinate of the spawner.
    pub coord: MathCoord,
    /// Number of creeps released per trigger.
    pub creep_count: u32,
    /// Completed turns remaining before release.
    pub turns_until_release: u32,
}

impl SpawnerSnapshot {
    /// Reports whether the spawner releases creeps on the next attack.
    #[must_use]
    pub const fn is_ready_to_release(&self) -> bool {
        self.turns_until_release == 0
    }
}

/// Immutable representation of a creep used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CreepSnapshot {
    /// Identifier allocated to the creep.
    pub id: CreepId,
    /// Grid cell the creep occupies.
    pub cell: CellCoord,
    /// Cell the creep's current step heads to.
    pub target: CellCoord,
    /// Indicates whether a step transition is still in flight.
    pub is_moving: bool,
}

/// Read-only picture of a game handed to presentation layers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSnapshot {
    /// Number of grid columns.
    pub grid_width: u32,
    /// Number of grid rows.
    pub grid_height: u32,
    /// Cell side length in screen units.
    pub cell_size: u32,
    /// Grid cell of the origin.
    pub origin: CellCoord,
    /// Towers in identifier order.
    pub towers: Vec<TowerSnapshot>,
    /// Spawner towers in identifier order.
    pub spawners: Vec<SpawnerSnapshot>,
    /// Active creeps in identifier order.
    pub creeps: Vec<CreepSnapshot>,
    /// Current origin health.
    pub origin_health: u32,
    /// Active phase.
    pub phase: GamePhase,
    /// Current turn; zero before the first game starts.
    pub turn: u32,
    /// Turn limit.
    pub max_turns: u32,
}

/// How spawner towers are laid out when a game starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnerLayout {
    /// A single spawner on a uniformly random ring cell.
    #[default]
    RandomCell,
    /// A spawner on every ring cell.
    FullRing,
}

/// Largest number of grid cells a configuration may request.
pub const MAX_GRID_CELLS: u64 = 1 << 20;

/// Flat configuration record injected when a game is created.
///
/// Missing fields fall back to the defaults listed on [`GameConfig::default`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Number of grid columns.
    pub grid_width: u32,
    /// Number of grid rows.
    pub grid_height: u32,
    /// Cell side length in screen units.
    pub cell_size: u32,
    /// Turn limit; the game ends once the turn counter reaches it.
    pub max_turns: u32,
    /// Origin health at the start of every game.
    pub starting_health: u32,
    /// Side length of the square whose perimeter hosts spawner towers.
    pub ring_size: u32,
    /// Creeps released per trigger by newly placed spawners.
    pub spawner_creep_count: u32,
    /// Initial release countdown of newly placed spawners.
    pub spawner_turns_until_release: u32,
    /// Spawner layout used when a game starts.
    pub spawner_layout: SpawnerLayout,
    /// Duration of the attack alert in milliseconds.
    pub alert_ms: u64,
    /// Interval between pursuit ticks in milliseconds.
    pub tick_ms: u64,
    /// Duration of a single creep step transition in milliseconds.
    pub step_ms: u64,
    /// Seed for spawner placement; entropy is used when absent.
    pub rng_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 27,
            grid_height: 27,
            cell_size: 32,
            max_turns: 3,
            starting_health: 10,
            ring_size: 22,
            spawner_creep_count: 1,
            spawner_turns_until_release: 0,
            spawner_layout: SpawnerLayout::RandomCell,
            alert_ms: 1_000,
            tick_ms: 500,
            step_ms: 300,
            rng_seed: None,
        }
    }
}

impl GameConfig {
    /// Checks the configuration, returning it unchanged when it is usable.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        if u64::from(self.grid_width) * u64::from(self.grid_height) > MAX_GRID_CELLS {
            return Err(ConfigError::GridTooLarge {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        if self.cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }
        if self.max_turns == 0 {
            return Err(ConfigError::ZeroMaxTurns);
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.ring_size < 2 {
            return Err(ConfigError::InvalidRing {
                ring_size: self.ring_size,
            });
        }
        let ring_limit = self.grid_width.max(self.grid_height);
        if self.ring_size > ring_limit {
            return Err(ConfigError::RingTooLarge {
                ring_size: self.ring_size,
                limit: ring_limit,
            });
        }
        Ok(self)
    }

    /// Duration of the attack alert.
    #[must_use]
    pub const fn alert_duration(&self) -> Duration {
        Duration::from_millis(self.alert_ms)
    }

    /// Interval between pursuit ticks.
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Duration of a creep step transition.
    #[must_use]
    pub const fn step_duration(&self) -> Duration {
        Duration::from_millis(self.step_ms)
    }
}

/// Reasons a [`GameConfig`] is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The grid has no cells.
    #[error("grid must have at least one cell (received {width}x{height})")]
    EmptyGrid {
        /// Configured number of columns.
        width: u32,
        /// Configured number of rows.
        height: u32,
    },
    /// The grid has more cells than [`MAX_GRID_CELLS`].
    #[error("grid dimensions {width}x{height} exceed {MAX_GRID_CELLS} cells")]
    GridTooLarge {
        /// Configured number of columns.
        width: u32,
        /// Configured number of rows.
        height: u32,
    },
    /// Cells must have a positive side length.
    #[error("cell_size must be positive")]
    ZeroCellSize,
    /// A game needs at least one turn.
    #[error("max_turns must be at least 1")]
    ZeroMaxTurns,
    /// The pursuit cadence must be positive.
    #[error("tick_ms must be positive")]
    ZeroTickInterval,
    /// The spawner ring has no perimeter cells.
    #[error("ring_size must be at least 2 (received {ring_size})")]
    InvalidRing {
        /// Configured ring size.
        ring_size: u32,
    },
    /// The spawner ring is wider than the larger grid extent.
    #[error("ring_size {ring_size} exceeds the larger grid extent ({limit})")]
    RingTooLarge {
        /// Configured ring size.
        ring_size: u32,
        /// Largest ring size the grid allows.
        limit: u32,
    },
}
