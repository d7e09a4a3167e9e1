#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Spawning system responsible for laying out spawner towers and releasing creeps.

use log::{debug, trace};
use origin_defence_core::{CellCoord, Command, GameConfig, SpawnerLayout, SpawnerSnapshot};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    layout: SpawnerLayout,
    creep_count: u32,
    turns_until_release: u32,
    rng_seed: Option<u64>,
}

impl Config {
    /// Creates a new configuration.
    ///
    /// Without a seed the placement generator is seeded from system entropy.
    #[must_use]
    pub const fn new(
        layout: SpawnerLayout,
        creep_count: u32,
        turns_until_release: u32,
        rng_seed: Option<u64>,
    ) -> Self {
        Self {
            layout,
            creep_count,
            turns_until_release,
            rng_seed,
        }
    }

    /// Extracts the spawning parameters from a game configuration.
    #[must_use]
    pub const fn from_game(config: &GameConfig) -> Self {
        Self::new(
            config.spawner_layout,
            config.spawner_creep_count,
            config.spawner_turns_until_release,
            config.rng_seed,
        )
    }
}

/// Pure system that places spawners on the ring and turns ready spawners into creeps.
#[derive(Debug)]
pub struct Spawning {
    config: Config,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self { config, rng }
    }

    /// Emits the commands that place the game's spawners on the provided ring.
    ///
    /// A random layout picks one ring cell uniformly; a full ring places a
    /// spawner on every cell. Nothing is emitted for an empty ring.
    pub fn place_spawners(&mut self, ring: &[CellCoord], out: &mut Vec<Command>) {
        if ring.is_empty() {
            return;
        }

        match self.config.layout {
            SpawnerLayout::RandomCell => {
                let index = self.rng.gen_range(0..ring.len());
                let cell = ring[index];
                debug!("spawner placed on ring cell {index} at {cell:?}");
                out.push(self.place_command(cell));
            }
            SpawnerLayout::FullRing => {
                debug!("spawners placed on all {} ring cells", ring.len());
                out.extend(ring.iter().map(|cell| self.place_command(*cell)));
            }
        }
    }

    /// Collects one spawn cell per creep released by the ready spawners.
    ///
    /// Spawners are visited in the provided order and each ready spawner
    /// contributes its cell `creep_count` times.
    pub fn release(&self, spawners: &[SpawnerSnapshot], out: &mut Vec<CellCoord>) {
        for spawner in spawners.iter().filter(|spawner| spawner.is_ready_to_release()) {
            trace!(
                "spawner {} releases {} creeps",
                spawner.id.get(),
                spawner.creep_count
            );
            for _ in 0..spawner.creep_count {
                out.push(spawner.cell);
            }
        }
    }

    fn place_command(&self, cell: CellCoord) -> Command {
        Command::PlaceSpawner {
            cell,
            creep_count: self.config.creep_count,
            turns_until_release: self.config.turns_until_release,
        }
    }
}
