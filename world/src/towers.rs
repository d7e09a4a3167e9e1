//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use origin_defence_core::{
    CellCoord, MathCoord, SpawnerId, SpawnerSnapshot, TowerId, TowerSnapshot,
};

use crate::grid::to_math;

/// Defensive tower placed by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tower {
    id: TowerId,
    cell: CellCoord,
    coord: MathCoord,
}

impl Tower {
    /// Identifier allocated by the registry.
    #[must_use]
    pub const fn id(&self) -> TowerId {
        self.id
    }

    /// Grid cell of the tower.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Math coordinate of the tower.
    #[must_use]
    pub const fn coord(&self) -> MathCoord {
        self.coord
    }

    /// Captures an immutable snapshot of the tower.
    #[must_use]
    pub const fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            cell: self.cell,
            coord: self.coord,
        }
    }
}

/// Hostile tower that releases creeps once its countdown reaches zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CreepSpawnerTower {
    id: SpawnerId,
    cell: CellCoord,
    coord: MathCoord,
    creep_count: u32,
    turns_until_release: u32,
}

impl CreepSpawnerTower {
    /// Identifier allocated by the registry.
    #[must_use]
    pub const fn id(&self) -> SpawnerId {
        self.id
    }

    /// Grid cell of the spawner.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Number of creeps released per trigger.
    #[must_use]
    pub const fn creep_count(&self) -> u32 {
        self.creep_count
    }

    /// Completed turns remaining before release.
    #[must_use]
    pub const fn turns_until_release(&self) -> u32 {
        self.turns_until_release
    }

    /// Reports whether the countdown reached zero.
    #[must_use]
    pub const fn is_ready_to_release(&self) -> bool {
        self.turns_until_release == 0
    }

    /// Counts one completed turn down, stopping at zero.
    pub fn decrement_turn_counter(&mut self) {
        self.turns_until_release = self.turns_until_release.saturating_sub(1);
    }

    /// Captures an immutable snapshot of the spawner.
    #[must_use]
    pub const fn snapshot(&self) -> SpawnerSnapshot {
        SpawnerSnapshot {
            id: self.id,
            cell: self.cell,
            coord: self.coord,
            creep_count: self.creep_count,
            turns_until_release: self.turns_until_release,
        }
    }
}

/// Registry that stores towers and spawners and manages identifier allocation.
///
/// Placement is unconditional: the grid is the single authority on whether a
/// cell may hold a tower, and spawners ignore occupancy altogether.
#[derive(Debug)]
pub struct PlacementRegistry {
    origin: CellCoord,
    towers: BTreeMap<TowerId, Tower>,
    spawners: BTreeMap<SpawnerId, CreepSpawnerTower>,
    next_tower_id: TowerId,
    next_spawner_id: SpawnerId,
}

impl PlacementRegistry {
    /// Creates an empty registry whose math coordinates are centered on `origin`.
    #[must_use]
    pub fn new(origin: CellCoord) -> Self {
        Self {
            origin,
            towers: BTreeMap::new(),
            spawners: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
            next_spawner_id: SpawnerId::new(0),
        }
    }

    /// Records a tower at the provided cell.
    pub fn place_tower(&mut self, cell: CellCoord) -> Tower {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().wrapping_add(1));
        let tower = Tower {
            id,
            cell,
            coord: to_math(self.origin, cell),
        };
        let _ = self.towers.insert(id, tower);
        tower
    }

    /// Records a creep spawner tower at the provided cell.
    pub fn place_creep_spawner_tower(
        &mut self,
        cell: CellCoord,
        creep_count: u32,
        turns_until_release: u32,
    ) -> CreepSpawnerTower {
        let id = self.next_spawner_id;
        self.next_spawner_id = SpawnerId::new(id.get().wrapping_add(1));
        let spawner = CreepSpawnerTower {
            id,
            cell,
            coord: to_math(self.origin, cell),
            creep_count,
            turns_until_release,
        };
        let _ = self.spawners.insert(id, spawner);
        spawner
    }

    /// Counts one completed turn down on the spawner.
    ///
    /// Returns the remaining countdown, or `None` for unknown spawners.
    pub fn decrement_turn_counter(&mut self, spawner: SpawnerId) -> Option<u32> {
        let entry = self.spawners.get_mut(&spawner)?;
        entry.decrement_turn_counter();
        Some(entry.turns_until_release)
    }

    /// Reports whether the spawner releases creeps on the next attack.
    #[must_use]
    pub fn is_ready_to_release(&self, spawner: SpawnerId) -> bool {
        self.spawners
            .get(&spawner)
            .is_some_and(CreepSpawnerTower::is_ready_to_release)
    }

    /// Changes how many creeps the spawner releases per trigger.
    pub fn update_creep_count(&mut self, spawner: SpawnerId, creep_count: u32) -> bool {
        match self.spawners.get_mut(&spawner) {
            Some(entry) => {
                entry.creep_count = creep_count;
                true
            }
            None => false,
        }
    }

    /// Removes a spawner, returning it when it existed.
    pub fn remove_creep_spawner_tower(&mut self, spawner: SpawnerId) -> Option<CreepSpawnerTower> {
        self.spawners.remove(&spawner)
    }

    /// Removes every spawner.
    pub fn clear_creep_spawner_towers(&mut self) {
        self.spawners.clear();
    }

    /// Removes every tower.
    pub fn clear_towers(&mut self) {
        self.towers.clear();
    }

    /// Looks up a tower.
    #[must_use]
    pub fn tower(&self, tower: TowerId) -> Option<&Tower> {
        self.towers.get(&tower)
    }

    /// Looks up a spawner.
    #[must_use]
    pub fn spawner(&self, spawner: SpawnerId) -> Option<&CreepSpawnerTower> {
        self.spawners.get(&spawner)
    }

    /// Towers in identifier order.
    pub fn towers(&self) -> impl Iterator<Item = &Tower> {
        self.towers.values()
    }

    /// Spawners in identifier order.
    pub fn spawners(&self) -> impl Iterator<Item = &CreepSpawnerTower> {
        self.spawners.values()
    }

    /// Identifiers of every spawner in identifier order.
    #[must_use]
    pub fn spawner_ids(&self) -> Vec<SpawnerId> {
        self.spawners.keys().copied().collect()
    }

    /// Number of towers.
    #[must_use]
    pub fn tower_count(&self) -> usize {
        self.towers.len()
    }

    /// Number of spawners.
    #[must_use]
    pub fn spawner_count(&self) -> usize {
        self.spawners.len()
    }
}

/// Enumerates the perimeter cells of a square of side `square_size` centered on `origin`.
///
/// The top and bottom edges are listed in full from left to right, followed by
/// the left and right edges without their corners, top to bottom. Every cell
/// is distinct and lies at Chebyshev distance `square_size / 2` from the
/// origin; sizes below two produce no cells.
#[must_use]
pub fn ring_cells(origin: CellCoord, square_size: u32) -> Vec<CellCoord> {
    let Ok(half) = i32::try_from(square_size / 2) else {
        return Vec::new();
    };
    if half == 0 {
        return Vec::new();
    }

    let mut cells = Vec::with_capacity(usize::try_from(half).unwrap_or(0) * 8);
    for x in -half..=half {
        cells.push(origin.offset(x, -half));
    }
    for x in -half..=half {
        cells.push(origin.offset(x, half));
    }
    for y in (-half + 1)..half {
        cells.push(origin.offset(-half, -y));
    }
    for y in (-half + 1)..half {
        cells.push(origin.offset(half, -y));
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn registry_starts_empty_with_zero_identifiers() {
        let registry = PlacementRegistry::new(CellCoord::new(5, 5));
        assert_eq!(registry.tower_count(), 0);
        assert_eq!(registry.spawner_count(), 0);
        assert_eq!(registry.next_tower_id.get(), 0);
        assert_eq!(registry.next_spawner_id.get(), 0);
    }

    #[test]
    fn tower_derives_math_coordinate_from_origin() {
        let mut registry = PlacementRegistry::new(CellCoord::new(13, 13));
        let tower = registry.place_tower(CellCoord::new(15, 10));

        assert_eq!(tower.id(), TowerId::new(0));
        assert_eq!(tower.coord(), MathCoord::new(2, 3));
        assert_eq!(registry.tower(tower.id()), Some(&tower));
    }

    #[test]
    fn identifiers_increase_monotonically() {
        let mut registry = PlacementRegistry::new(CellCoord::new(0, 0));
        let first = registry.place_creep_spawner_tower(CellCoord::new(1, 1), 1, 0);
        let second = registry.place_creep_spawner_tower(CellCoord::new(1, 1), 1, 0);
        assert!(first.id() < second.id());
        assert_eq!(registry.spawner_count(), 2);
    }

    #[test]
    fn spawner_countdown_clamps_at_zero() {
        let mut registry = PlacementRegistry::new(CellCoord::new(0, 0));
        let spawner = registry
            .place_creep_spawner_tower(CellCoord::new(4, 0), 3, 2)
            .id();

        assert!(!registry.is_ready_to_release(spawner));
        assert_eq!(registry.decrement_turn_counter(spawner), Some(1));
        assert!(!registry.is_ready_to_release(spawner));
        assert_eq!(registry.decrement_turn_counter(spawner), Some(0));
        assert!(registry.is_ready_to_release(spawner));
        assert_eq!(registry.decrement_turn_counter(spawner), Some(0));
        assert!(registry.is_ready_to_release(spawner));
    }

    #[test]
    fn unknown_spawner_is_never_ready() {
        let mut registry = PlacementRegistry::new(CellCoord::new(0, 0));
        assert!(!registry.is_ready_to_release(SpawnerId::new(9)));
        assert_eq!(registry.decrement_turn_counter(SpawnerId::new(9)), None);
        assert!(!registry.update_creep_count(SpawnerId::new(9), 4));
    }

    #[test]
    fn creep_count_updates_and_removal() {
        let mut registry = PlacementRegistry::new(CellCoord::new(0, 0));
        let spawner = registry
            .place_creep_spawner_tower(CellCoord::new(2, 2), 1, 0)
            .id();

        assert!(registry.update_creep_count(spawner, 5));
        assert_eq!(registry.spawner(spawner).map(|s| s.creep_count()), Some(5));
        assert!(registry.remove_creep_spawner_tower(spawner).is_some());
        assert!(registry.remove_creep_spawner_tower(spawner).is_none());
    }

    #[test]
    fn ring_of_size_twenty_two_is_distinct_and_equidistant() {
        let origin = CellCoord::new(13, 13);
        let cells = ring_cells(origin, 22);

        assert_eq!(cells.len(), 88);
        let unique: HashSet<_> = cells.iter().copied().collect();
        assert_eq!(unique.len(), cells.len());
        assert!(cells.iter().all(|cell| cell.chebyshev_distance(origin) == 11));
    }

    #[test]
    fn ring_covers_whole_perimeter_of_small_square() {
        let origin = CellCoord::new(0, 0);
        let cells: HashSet<_> = ring_cells(origin, 3).into_iter().collect();
        let expected: HashSet<_> = (-1..=1)
            .flat_map(|x| (-1..=1).map(move |y| CellCoord::new(x, y)))
            .filter(|cell| *cell != origin)
            .collect();
        assert_eq!(cells, expected);
    }

    #[test]
    fn ring_lists_top_edge_first() {
        let cells = ring_cells(CellCoord::new(10, 10), 4);
        assert_eq!(cells[0], CellCoord::new(8, 8));
        assert_eq!(cells[4], CellCoord::new(12, 8));
        assert_eq!(cells[5], CellCoord::new(8, 12));
    }

    #[test]
    fn tiny_rings_are_empty() {
        assert!(ring_cells(CellCoord::new(3, 3), 0).is_empty());
        assert!(ring_cells(CellCoord::new(3, 3), 1).is_empty());
    }
}
