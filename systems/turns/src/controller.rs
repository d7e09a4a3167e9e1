//! Synchronous state machine that sequences games, turns and attacks.

use std::time::Duration;

use log::{debug, info};
use origin_defence_core::{
    AttackStage, CellCoord, Command, ConfigError, CreepId, Event, GameConfig, GamePhase,
    GameSnapshot, Outcome, PlayerInput, Rejection, SpawnerId,
};
use origin_defence_system_pursuit::Pursuit;
use origin_defence_system_spawning::{Config as SpawningConfig, Spawning};
use origin_defence_world::{self as world, query, World};

/// Owns the world and the systems of a session and drives its phase transitions.
///
/// Every operation appends the events it caused to the provided buffer.
/// Rejected operations leave state untouched and report
/// [`Event::InputIgnored`].
#[derive(Debug)]
pub struct TurnController {
    config: GameConfig,
    world: World,
    pursuit: Pursuit,
    spawning: Spawning,
    phase: GamePhase,
    turn: u32,
}

impl TurnController {
    /// Creates a controller waiting for the first game to start.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        let config = config.validated()?;
        let world = World::new(&config);
        let pursuit = Pursuit::new(query::origin(&world), config.step_duration());
        let spawning = Spawning::new(SpawningConfig::from_game(&config));
        Ok(Self {
            config,
            world,
            pursuit,
            spawning,
            phase: GamePhase::NotStarted,
            turn: 0,
        })
    }

    /// Configuration the controller was created with.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Active phase.
    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Current turn; zero before the first game starts.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// Read-only access to the world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Number of creeps still pursuing the origin.
    #[must_use]
    pub fn creep_count(&self) -> usize {
        self.pursuit.creep_count()
    }

    /// Routes a player input to the matching operation.
    ///
    /// `Quit` is owned by the session driver and ignored here.
    pub fn handle_input(&mut self, input: PlayerInput, out_events: &mut Vec<Event>) {
        match input {
            PlayerInput::StartGame => self.start_game(out_events),
            PlayerInput::Click { cell } => {
                let _ = self.place_tower(cell, out_events);
            }
            PlayerInput::SwitchPhase => {
                let _ = self.begin_attack(out_events);
            }
            PlayerInput::Quit => {}
        }
    }

    /// Starts a fresh game, discarding every trace of the previous one.
    ///
    /// Rejected while an attack resolves.
    pub fn start_game(&mut self, out_events: &mut Vec<Event>) {
        if self.phase.is_attack() {
            reject(
                PlayerInput::StartGame,
                Rejection::AttackInProgress,
                out_events,
            );
            return;
        }

        out_events.push(Event::GameStarted {
            max_turns: self.config.max_turns,
        });
        self.pursuit.clear_all_creeps(out_events);
        self.execute(Command::ClearSpawners, out_events);
        self.execute(Command::ResetBoard, out_events);
        self.execute(
            Command::SetOriginHealth {
                health: self.config.starting_health,
            },
            out_events,
        );
        let origin = query::origin(&self.world);
        self.execute(Command::OccupyCell { cell: origin }, out_events);

        let ring = query::ring_cells(&self.world, self.config.ring_size);
        let mut commands = Vec::new();
        self.spawning.place_spawners(&ring, &mut commands);
        for command in commands {
            self.execute(command, out_events);
        }

        self.turn = 1;
        info!("game started, turn 1 of {}", self.config.max_turns);
        out_events.push(Event::TurnAdvanced {
            turn: self.turn,
            max_turns: self.config.max_turns,
        });
        self.enter_phase(GamePhase::Placement, out_events);
    }

    /// Places a tower on the cell and occupies it.
    ///
    /// Returns `true` when the tower was placed. Clicks outside the placement
    /// phase or on invalid cells are ignored.
    pub fn place_tower(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) -> bool {
        let input = PlayerInput::Click { cell };
        if let Some(reason) = self.phase_rejection() {
            reject(input, reason, out_events);
            return false;
        }
        if !query::is_valid_position(&self.world, cell) {
            reject(input, Rejection::InvalidPlacement, out_events);
            return false;
        }

        self.execute(Command::PlaceTower { cell }, out_events);
        self.execute(Command::OccupyCell { cell }, out_events);
        true
    }

    /// Switches from placement to the attack alert, releasing creeps from ready spawners.
    ///
    /// Returns `true` when the attack began.
    pub fn begin_attack(&mut self, out_events: &mut Vec<Event>) -> bool {
        if let Some(reason) = self.phase_rejection() {
            reject(PlayerInput::SwitchPhase, reason, out_events);
            return false;
        }

        let mut spawn_cells = Vec::new();
        self.spawning
            .release(&query::spawner_view(&self.world), &mut spawn_cells);
        for cell in spawn_cells {
            let _ = self.pursuit.spawn_creep(cell, out_events);
        }

        self.enter_phase(GamePhase::Attack(AttackStage::Alert), out_events);
        out_events.push(Event::AlertStarted {
            duration: self.config.alert_duration(),
        });
        true
    }

    /// Ends the alert and lets the released creeps pursue the origin.
    ///
    /// Returns `false` and changes nothing unless the alert is active.
    pub fn finish_alert(&mut self, out_events: &mut Vec<Event>) -> bool {
        if self.phase != GamePhase::Attack(AttackStage::Alert) {
            debug!("alert cannot finish during {}", self.phase.label());
            return false;
        }
        out_events.push(Event::AlertFinished);
        self.enter_phase(GamePhase::Attack(AttackStage::Pursuit), out_events);
        true
    }

    /// Runs one pursuit tick covering `dt` of elapsed time.
    ///
    /// In-flight steps are advanced first, then every idle creep moves and
    /// each arrival costs the origin one health. Returns `true` while creeps
    /// remain. Outside the pursuit nothing moves and `false` is returned.
    pub fn pursuit_tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) -> bool {
        if self.phase != GamePhase::Attack(AttackStage::Pursuit) {
            debug!("no pursuit to tick during {}", self.phase.label());
            return false;
        }
        let mut tick_events = Vec::new();
        self.pursuit.advance(dt, &mut tick_events);
        self.pursuit.move_all_creeps(&mut tick_events);

        let arrivals = tick_events
            .iter()
            .filter(|event| matches!(event, Event::CreepArrived { .. }))
            .count();
        out_events.append(&mut tick_events);
        for _ in 0..arrivals {
            self.execute(Command::DamageOrigin { amount: 1 }, out_events);
        }

        self.pursuit.creep_count() > 0
    }

    /// Settles the in-flight step of a creep without waiting for its timer.
    ///
    /// Only valid during the pursuit. Returns `false` when the creep is
    /// unknown or idle.
    pub fn complete_step(&mut self, creep: CreepId, out_events: &mut Vec<Event>) -> bool {
        if self.phase != GamePhase::Attack(AttackStage::Pursuit) {
            debug!("creep {} cannot step during {}", creep.get(), self.phase.label());
            return false;
        }
        self.pursuit.complete_step(creep, out_events)
    }

    /// Changes how many creeps a spawner releases per trigger.
    ///
    /// Only valid during placement. Returns `false` when the spawner is unknown.
    pub fn set_spawner_creep_count(
        &mut self,
        spawner: SpawnerId,
        creep_count: u32,
        out_events: &mut Vec<Event>,
    ) -> bool {
        if !self.edits_spawner(spawner) {
            return false;
        }
        self.execute(
            Command::SetSpawnerCreepCount {
                spawner,
                creep_count,
            },
            out_events,
        );
        true
    }

    /// Removes a spawner so it never releases again.
    ///
    /// Only valid during placement. Returns `false` when the spawner is unknown.
    pub fn remove_spawner(&mut self, spawner: SpawnerId, out_events: &mut Vec<Event>) -> bool {
        if !self.edits_spawner(spawner) {
            return false;
        }
        self.execute(Command::RemoveSpawner { spawner }, out_events);
        true
    }

    /// Completes the attack once no creep remains and advances the turn.
    ///
    /// Returns `false` and changes nothing outside the pursuit or while
    /// creeps are still on the board.
    pub fn finish_attack(&mut self, out_events: &mut Vec<Event>) -> bool {
        if self.phase != GamePhase::Attack(AttackStage::Pursuit) {
            debug!("attack cannot finish during {}", self.phase.label());
            return false;
        }
        if self.pursuit.creep_count() > 0 {
            debug!("attack unresolved, {} creeps remain", self.pursuit.creep_count());
            return false;
        }

        self.execute(Command::AdvanceSpawnerCountdowns, out_events);
        self.turn = self.turn.saturating_add(1);
        out_events.push(Event::TurnAdvanced {
            turn: self.turn,
            max_turns: self.config.max_turns,
        });

        if self.turn >= self.config.max_turns {
            let origin_health = query::origin_health(&self.world);
            let outcome = if origin_health == 0 {
                Outcome::Overrun
            } else {
                Outcome::Survived
            };
            self.enter_phase(GamePhase::GameOver, out_events);
            info!("game over after turn {}: {outcome:?}", self.turn);
            out_events.push(Event::GameOver {
                outcome,
                origin_health,
            });
        } else {
            info!("turn {} of {}", self.turn, self.config.max_turns);
            self.enter_phase(GamePhase::Placement, out_events);
        }
        true
    }

    /// Captures the read-only picture handed to presentation layers.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        let grid = query::grid(&self.world);
        GameSnapshot {
            grid_width: grid.width(),
            grid_height: grid.height(),
            cell_size: query::cell_size(&self.world),
            origin: query::origin(&self.world),
            towers: query::tower_view(&self.world),
            spawners: query::spawner_view(&self.world),
            creeps: self.pursuit.creeps(),
            origin_health: query::origin_health(&self.world),
            phase: self.phase,
            turn: self.turn,
            max_turns: self.config.max_turns,
        }
    }

    fn phase_rejection(&self) -> Option<Rejection> {
        match self.phase {
            GamePhase::Placement => None,
            GamePhase::NotStarted => Some(Rejection::NotStarted),
            GamePhase::Attack(_) => Some(Rejection::AttackInProgress),
            GamePhase::GameOver => Some(Rejection::GameOver),
        }
    }

    fn edits_spawner(&self, spawner: SpawnerId) -> bool {
        if self.phase != GamePhase::Placement {
            debug!("spawner {} is locked during {}", spawner.get(), self.phase.label());
            return false;
        }
        query::spawner(&self.world, spawner).is_some()
    }

    fn enter_phase(&mut self, phase: GamePhase, out_events: &mut Vec<Event>) {
        if self.phase != phase {
            info!("phase {} -> {}", self.phase.label(), phase.label());
        }
        self.phase = phase;
        out_events.push(Event::PhaseChanged { phase });
    }

    fn execute(&mut self, command: Command, out_events: &mut Vec<Event>) {
        world::apply(&mut self.world, command, out_events);
    }
}

fn reject(input: PlayerInput, reason: Rejection, out_events: &mut Vec<Event>) {
    debug!("ignored {input:?}: {reason:?}");
    out_events.push(Event::InputIgnored { input, reason });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> TurnController {
        TurnController::new(GameConfig {
            rng_seed: Some(3),
            ..GameConfig::default()
        })
        .expect("default config is valid")
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = GameConfig {
            max_turns: 0,
            ..GameConfig::default()
        };
        assert_eq!(
            TurnController::new(config).err(),
            Some(ConfigError::ZeroMaxTurns)
        );
    }

    #[test]
    fn oversized_ring_is_rejected() {
        let config = GameConfig {
            ring_size: 1 << 30,
            ..GameConfig::default()
        };
        assert!(matches!(
            TurnController::new(config),
            Err(ConfigError::RingTooLarge { .. })
        ));
    }

    #[test]
    fn inputs_before_start_are_ignored() {
        let mut controller = controller();
        let mut events = Vec::new();

        assert!(!controller.begin_attack(&mut events));
        assert!(!controller.place_tower(CellCoord::new(0, 0), &mut events));

        assert_eq!(controller.phase(), GamePhase::NotStarted);
        assert!(events.iter().all(|event| matches!(
            event,
            Event::InputIgnored {
                reason: Rejection::NotStarted,
                ..
            }
        )));
    }

    #[test]
    fn start_game_occupies_origin_and_places_one_spawner() {
        let mut controller = controller();
        let mut events = Vec::new();
        controller.start_game(&mut events);

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.phase, GamePhase::Placement);
        assert_eq!(snapshot.turn, 1);
        assert_eq!(snapshot.origin_health, 10);
        assert_eq!(snapshot.spawners.len(), 1);
        assert_eq!(snapshot.spawners[0].cell.chebyshev_distance(snapshot.origin), 11);
        assert!(!query::is_valid_position(controller.world(), snapshot.origin));
        assert_eq!(
            events.last(),
            Some(&Event::PhaseChanged {
                phase: GamePhase::Placement
            })
        );
    }

    #[test]
    fn clicking_the_origin_is_an_invalid_placement() {
        let mut controller = controller();
        let mut events = Vec::new();
        controller.start_game(&mut events);
        events.clear();

        let origin = controller.snapshot().origin;
        assert!(!controller.place_tower(origin, &mut events));
        assert_eq!(
            events,
            vec![Event::InputIgnored {
                input: PlayerInput::Click { cell: origin },
                reason: Rejection::InvalidPlacement,
            }]
        );
    }
}
