#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Origin Defence.
//!
//! The world owns the occupancy grid, the tower and spawner registry and the
//! origin's health. Every mutation flows through [`apply`], which reports what
//! changed as [`Event`] values; everything else is read through [`query`].

pub mod grid;
pub mod health;
pub mod towers;

use log::debug;
use origin_defence_core::{Command, Event, GameConfig, WELCOME_BANNER};

pub use grid::Grid;
pub use health::OriginHealth;
pub use towers::{ring_cells, CreepSpawnerTower, PlacementRegistry, Tower};

/// Represents the authoritative Origin Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    cell_size: u32,
    grid: Grid,
    registry: PlacementRegistry,
    health: OriginHealth,
}

impl World {
    /// Creates a world sized by the provided configuration with an empty board.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        let grid = Grid::new(config.grid_width, config.grid_height);
        let registry = PlacementRegistry::new(grid.origin());
        Self {
            banner: WELCOME_BANNER,
            cell_size: config.cell_size,
            grid,
            registry,
            health: OriginHealth::new(config.starting_health),
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ResetBoard => {
            world.registry.clear_towers();
            world.grid.clear();
            debug!("board reset");
            out_events.push(Event::BoardReset);
        }
        Command::OccupyCell { cell } => {
            if world.grid.occupy_cell(cell) {
                out_events.push(Event::CellOccupied { cell });
            }
        }
        Command::PlaceTower { cell } => {
            let tower = world.registry.place_tower(cell);
            debug!(
                "tower {} placed at {:?} ({}, {})",
                tower.id().get(),
                cell,
                tower.coord().x(),
                tower.coord().y()
            );
            out_events.push(Event::TowerPlaced {
                tower: tower.id(),
                cell,
                coord: tower.coord(),
            });
        }
        Command::PlaceSpawner {
            cell,
            creep_count,
            turns_until_release,
        } => {
            let spawner = world
                .registry
                .place_creep_spawner_tower(cell, creep_count, turns_until_release);
            debug!("spawner {} placed at {:?}", spawner.id().get(), cell);
            out_events.push(Event::SpawnerPlaced {
                spawner: spawner.id(),
                cell,
                creep_count,
                turns_until_release,
            });
        }
        Command::SetSpawnerCreepCount {
            spawner,
            creep_count,
        } => {
            if world.registry.update_creep_count(spawner, creep_count) {
                out_events.push(Event::SpawnerCreepCountChanged {
                    spawner,
                    creep_count,
                });
            }
        }
        Command::RemoveSpawner { spawner } => {
            if world.registry.remove_creep_spawner_tower(spawner).is_some() {
                out_events.push(Event::SpawnerRemoved { spawner });
            }
        }
        Command::ClearSpawners => {
            world.registry.clear_creep_spawner_towers();
            out_events.push(Event::SpawnersCleared);
        }
        Command::AdvanceSpawnerCountdowns => {
            for spawner in world.registry.spawner_ids() {
                let before = world
                    .registry
                    .spawner(spawner)
                    .map(CreepSpawnerTower::turns_until_release);
                let after = world.registry.decrement_turn_counter(spawner);
                if let Some(turns_until_release) = after {
                    if before != after {
                        out_events.push(Event::SpawnerCountdownChanged {
                            spawner,
                            turns_until_release,
                        });
                    }
                }
            }
        }
        Command::DamageOrigin { amount } => {
            let before = world.health.health();
            let health = world.health.decrement_health(amount);
            if health != before {
                debug!("origin damaged by {amount}, {health} health left");
                out_events.push(Event::OriginHealthChanged { health });
            }
        }
        Command::SetOriginHealth { health } => {
            world.health.set_health(health);
            out_events.push(Event::OriginHealthChanged { health });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use origin_defence_core::{CellCoord, SpawnerId, SpawnerSnapshot, TowerSnapshot};

    use super::{Grid, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the occupancy grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Cell side length in screen units.
    #[must_use]
    pub fn cell_size(world: &World) -> u32 {
        world.cell_size
    }

    /// Grid cell of the origin.
    #[must_use]
    pub fn origin(world: &World) -> CellCoord {
        world.grid.origin()
    }

    /// Reports whether a tower may be placed on the cell.
    #[must_use]
    pub fn is_valid_position(world: &World, cell: CellCoord) -> bool {
        world.grid.is_valid_position(cell)
    }

    /// Captures every tower in identifier order.
    #[must_use]
    pub fn tower_view(world: &World) -> Vec<TowerSnapshot> {
        world.registry.towers().map(|tower| tower.snapshot()).collect()
    }

    /// Captures every spawner in identifier order.
    #[must_use]
    pub fn spawner_view(world: &World) -> Vec<SpawnerSnapshot> {
        world
            .registry
            .spawners()
            .map(|spawner| spawner.snapshot())
            .collect()
    }

    /// Captures a single spawner.
    #[must_use]
    pub fn spawner(world: &World, spawner: SpawnerId) -> Option<SpawnerSnapshot> {
        world.registry.spawner(spawner).map(|entry| entry.snapshot())
    }

    /// Current origin health.
    #[must_use]
    pub fn origin_health(world: &World) -> u32 {
        world.health.health()
    }

    /// Perimeter cells of the spawner ring of side `square_size` around the origin.
    #[must_use]
    pub fn ring_cells(world: &World, square_size: u32) -> Vec<CellCoord> {
        super::ring_cells(world.grid.origin(), square_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use origin_defence_core::{CellCoord, MathCoord, SpawnerId};

    fn small_world() -> World {
        World::new(&GameConfig {
            grid_width: 10,
            grid_height: 10,
            starting_health: 3,
            ..GameConfig::default()
        })
    }

    #[test]
    fn new_world_is_empty() {
        let world = small_world();
        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
        assert_eq!(query::origin(&world), CellCoord::new(5, 5));
        assert!(query::tower_view(&world).is_empty());
        assert!(query::spawner_view(&world).is_empty());
        assert_eq!(query::origin_health(&world), 3);
        assert_eq!(query::grid(&world).occupied_count(), 0);
    }

    #[test]
    fn occupy_cell_reports_only_new_occupation() {
        let mut world = small_world();
        let mut events = Vec::new();
        let cell = CellCoord::new(1, 1);

        apply(&mut world, Command::OccupyCell { cell }, &mut events);
        apply(&mut world, Command::OccupyCell { cell }, &mut events);
        apply(
            &mut world,
            Command::OccupyCell {
                cell: CellCoord::new(10, 0),
            },
            &mut events,
        );

        assert_eq!(events, vec![Event::CellOccupied { cell }]);
        assert!(!query::is_valid_position(&world, cell));
    }

    #[test]
    fn tower_placement_reports_math_coordinate() {
        let mut world = small_world();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::PlaceTower {
                cell: CellCoord::new(7, 2),
            },
            &mut events,
        );

        let towers = query::tower_view(&world);
        assert_eq!(towers.len(), 1);
        assert_eq!(towers[0].coord, MathCoord::new(2, 3));
        assert!(matches!(
            events.as_slice(),
            [Event::TowerPlaced { coord, .. }] if *coord == MathCoord::new(2, 3)
        ));
    }

    #[test]
    fn reset_board_clears_towers_and_occupancy() {
        let mut world = small_world();
        let mut events = Vec::new();
        let cell = CellCoord::new(2, 3);

        apply(&mut world, Command::OccupyCell { cell }, &mut events);
        apply(&mut world, Command::PlaceTower { cell }, &mut events);
        apply(
            &mut world,
            Command::PlaceSpawner {
                cell: CellCoord::new(0, 0),
                creep_count: 1,
                turns_until_release: 0,
            },
            &mut events,
        );
        events.clear();

        apply(&mut world, Command::ResetBoard, &mut events);

        assert_eq!(events, vec![Event::BoardReset]);
        assert!(query::tower_view(&world).is_empty());
        assert!(query::is_valid_position(&world, cell));
        assert_eq!(query::spawner_view(&world).len(), 1);
    }

    #[test]
    fn countdown_events_stop_once_ready() {
        let mut world = small_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceSpawner {
                cell: CellCoord::new(0, 0),
                creep_count: 2,
                turns_until_release: 1,
            },
            &mut events,
        );
        events.clear();

        apply(&mut world, Command::AdvanceSpawnerCountdowns, &mut events);
        apply(&mut world, Command::AdvanceSpawnerCountdowns, &mut events);

        assert_eq!(
            events,
            vec![Event::SpawnerCountdownChanged {
                spawner: SpawnerId::new(0),
                turns_until_release: 0,
            }]
        );
        assert_eq!(
            query::spawner(&world, SpawnerId::new(0)).map(|s| s.is_ready_to_release()),
            Some(true)
        );
    }

    #[test]
    fn spawner_updates_and_removal_report_known_spawners_only() {
        let mut world = small_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::PlaceSpawner {
                cell: CellCoord::new(0, 9),
                creep_count: 1,
                turns_until_release: 0,
            },
            &mut events,
        );
        events.clear();
        let spawner = SpawnerId::new(0);

        apply(
            &mut world,
            Command::SetSpawnerCreepCount {
                spawner,
                creep_count: 4,
            },
            &mut events,
        );
        apply(&mut world, Command::RemoveSpawner { spawner }, &mut events);
        apply(&mut world, Command::RemoveSpawner { spawner }, &mut events);

        assert_eq!(
            events,
            vec![
                Event::SpawnerCreepCountChanged {
                    spawner,
                    creep_count: 4,
                },
                Event::SpawnerRemoved { spawner },
            ]
        );
    }

    #[test]
    fn origin_damage_clamps_and_reports_changes() {
        let mut world = small_world();
        let mut events = Vec::new();

        apply(&mut world, Command::DamageOrigin { amount: 5 }, &mut events);
        apply(&mut world, Command::DamageOrigin { amount: 1 }, &mut events);
        apply(&mut world, Command::SetOriginHealth { health: 10 }, &mut events);

        assert_eq!(
            events,
            vec![
                Event::OriginHealthChanged { health: 0 },
                Event::OriginHealthChanged { health: 10 },
            ]
        );
        assert_eq!(query::origin_health(&world), 10);
    }
}
