use std::collections::HashSet;

use origin_defence_core::{CellCoord, Command, GameConfig, SpawnerLayout};
use origin_defence_system_spawning::{Config, Spawning};
use origin_defence_world::{self as world, query, World};

fn placed_cells(commands: &[Command]) -> Vec<CellCoord> {
    commands
        .iter()
        .map(|command| match command {
            Command::PlaceSpawner { cell, .. } => *cell,
            other => panic!("unexpected command emitted: {other:?}"),
        })
        .collect()
}

#[test]
fn random_layout_places_single_spawner_on_ring() {
    let world = World::new(&GameConfig::default());
    let ring = query::ring_cells(&world, 22);
    let origin = query::origin(&world);

    for seed in 0..32 {
        let mut spawning = Spawning::new(Config::new(SpawnerLayout::RandomCell, 1, 0, Some(seed)));
        let mut commands = Vec::new();
        spawning.place_spawners(&ring, &mut commands);

        let cells = placed_cells(&commands);
        assert_eq!(cells.len(), 1, "expected one spawner for seed {seed}");
        assert_eq!(cells[0].chebyshev_distance(origin), 11);
        assert!(ring.contains(&cells[0]));
    }
}

#[test]
fn seeded_placement_is_deterministic() {
    let world = World::new(&GameConfig::default());
    let ring = query::ring_cells(&world, 22);

    let place = || {
        let mut spawning =
            Spawning::new(Config::new(SpawnerLayout::RandomCell, 1, 0, Some(0x5eed)));
        let mut commands = Vec::new();
        spawning.place_spawners(&ring, &mut commands);
        spawning.place_spawners(&ring, &mut commands);
        commands
    };

    assert_eq!(place(), place());
}

#[test]
fn full_ring_layout_covers_every_ring_cell() {
    let world = World::new(&GameConfig::default());
    let ring = query::ring_cells(&world, 22);
    let mut spawning = Spawning::new(Config::new(SpawnerLayout::FullRing, 2, 1, None));
    let mut commands = Vec::new();

    spawning.place_spawners(&ring, &mut commands);

    let cells: HashSet<_> = placed_cells(&commands).into_iter().collect();
    assert_eq!(cells.len(), 88);
    assert!(commands.iter().all(|command| matches!(
        command,
        Command::PlaceSpawner {
            creep_count: 2,
            turns_until_release: 1,
            ..
        }
    )));
}

#[test]
fn ready_spawners_release_their_creep_count() {
    let mut world = World::new(&GameConfig::default());
    let mut events = Vec::new();
    let ring = query::ring_cells(&world, 22);
    let mut spawning = Spawning::new(Config::new(SpawnerLayout::RandomCell, 3, 1, Some(7)));
    let mut commands = Vec::new();
    spawning.place_spawners(&ring, &mut commands);
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    let mut released = Vec::new();
    spawning.release(&query::spawner_view(&world), &mut released);
    assert!(released.is_empty(), "spawner still counting down");

    world::apply(&mut world, Command::AdvanceSpawnerCountdowns, &mut events);
    spawning.release(&query::spawner_view(&world), &mut released);
    assert_eq!(released.len(), 3);

    let spawner_cell = query::spawner_view(&world)[0].cell;
    assert!(released.iter().all(|cell| *cell == spawner_cell));
}
