#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pursuit system that walks creeps toward the origin.
//!
//! Creeps advance one cell per tick along the 8-directional greedy path and
//! ignore towers entirely. A creep that starts a tick on the origin is
//! removed and reported as arrived.

use std::time::Duration;

use log::trace;
use origin_defence_core::{CellCoord, CreepId, CreepSnapshot, Event};

#[derive(Clone, Debug)]
struct Creep {
    id: CreepId,
    cell: CellCoord,
    target: CellCoord,
    transition_remaining: Option<Duration>,
}

impl Creep {
    fn is_moving(&self) -> bool {
        self.transition_remaining.is_some()
    }

    fn snapshot(&self) -> CreepSnapshot {
        CreepSnapshot {
            id: self.id,
            cell: self.cell,
            target: self.target,
            is_moving: self.is_moving(),
        }
    }
}

/// Pure system that owns the active creeps and resolves their steps.
#[derive(Debug)]
pub struct Pursuit {
    origin: CellCoord,
    step_duration: Duration,
    creeps: Vec<Creep>,
    next_creep_id: CreepId,
}

impl Pursuit {
    /// Creates an empty pursuit toward `origin` whose steps last `step_duration`.
    #[must_use]
    pub fn new(origin: CellCoord, step_duration: Duration) -> Self {
        Self {
            origin,
            step_duration,
            creeps: Vec::new(),
            next_creep_id: CreepId::new(0),
        }
    }

    /// Adds an idle creep on the provided cell.
    pub fn spawn_creep(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) -> CreepId {
        let id = self.next_creep_id;
        self.next_creep_id = CreepId::new(id.get().wrapping_add(1));
        self.creeps.push(Creep {
            id,
            cell,
            target: cell,
            transition_remaining: None,
        });
        out_events.push(Event::CreepSpawned { creep: id, cell });
        id
    }

    /// Applies one pursuit tick to every creep that is not mid-step.
    ///
    /// Creeps standing on the origin are removed and reported; all others
    /// start a step toward it.
    pub fn move_all_creeps(&mut self, out_events: &mut Vec<Event>) {
        let ids: Vec<CreepId> = self.creeps.iter().map(|creep| creep.id).collect();
        for id in ids {
            let Some(index) = self.creeps.iter().position(|creep| creep.id == id) else {
                continue;
            };

            if self.creeps[index].is_moving() {
                continue;
            }

            let from = self.creeps[index].cell;
            let Some(to) = next_step(from, self.origin) else {
                let _ = self.creeps.remove(index);
                trace!("creep {} arrived at the origin", id.get());
                out_events.push(Event::CreepArrived { creep: id });
                continue;
            };

            let creep = &mut self.creeps[index];
            creep.cell = to;
            creep.target = to;
            creep.transition_remaining = Some(self.step_duration);
            trace!("creep {} steps {from:?} -> {to:?}", id.get());
            out_events.push(Event::CreepStepped { creep: id, from, to });
        }
    }

    /// Counts down in-flight step transitions by `dt`, settling those that finish.
    pub fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        for creep in &mut self.creeps {
            let Some(remaining) = creep.transition_remaining else {
                continue;
            };

            let remaining = remaining.saturating_sub(dt);
            if remaining.is_zero() {
                creep.transition_remaining = None;
                out_events.push(Event::CreepSettled { creep: creep.id });
            } else {
                creep.transition_remaining = Some(remaining);
            }
        }
    }

    /// Completes the in-flight step of a creep immediately.
    ///
    /// Returns `false` when the creep is unknown or idle.
    pub fn complete_step(&mut self, creep: CreepId, out_events: &mut Vec<Event>) -> bool {
        let Some(entry) = self
            .creeps
            .iter_mut()
            .find(|entry| entry.id == creep && entry.is_moving())
        else {
            return false;
        };

        entry.transition_remaining = None;
        out_events.push(Event::CreepSettled { creep });
        true
    }

    /// Removes every creep without reporting arrivals.
    pub fn clear_all_creeps(&mut self, out_events: &mut Vec<Event>) {
        if self.creeps.is_empty() {
            return;
        }
        self.creeps.clear();
        out_events.push(Event::CreepsCleared);
    }

    /// Number of active creeps.
    #[must_use]
    pub fn creep_count(&self) -> usize {
        self.creeps.len()
    }

    /// Reports whether any creep is mid-step.
    #[must_use]
    pub fn are_creeps_moving(&self) -> bool {
        self.creeps.iter().any(Creep::is_moving)
    }

    /// Captures every active creep in spawn order.
    #[must_use]
    pub fn creeps(&self) -> Vec<CreepSnapshot> {
        self.creeps.iter().map(Creep::snapshot).collect()
    }
}

/// Computes the greedy 8-directional step from `cell` toward `origin`.
///
/// Returns `None` when the cell already is the origin.
#[must_use]
pub fn next_step(cell: CellCoord, origin: CellCoord) -> Option<CellCoord> {
    if cell == origin {
        return None;
    }

    let step_column = origin.column().saturating_sub(cell.column()).signum();
    let step_row = origin.row().saturating_sub(cell.row()).signum();
    Some(cell.offset(step_column, step_row))
}
