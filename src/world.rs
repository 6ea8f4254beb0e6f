use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    geo::{self, Coordinate},
    spawn::SpawnPlanner,
    state::GameState,
};

pub const DEFAULT_MONSTER_NAME: &str = "Monster";
pub const DEFAULT_MONSTER_SPEED_MPS: f64 = 10.0;
pub const DEFAULT_MONSTER_KIND: &str = "monster_anim";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonsterId(u64);

impl MonsterId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monster {
    pub id: MonsterId,
    pub display_name: String,
    pub position: Coordinate,
    pub speed_mps: f64,
    /// Opaque token for the renderer.
    pub kind: String,
}

/// Attributes stamped onto every spawned monster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonsterTemplate {
    pub name: String,
    pub speed_mps: f64,
    pub kind: String,
}

impl Default for MonsterTemplate {
    fn default() -> Self {
        Self {
            name: DEFAULT_MONSTER_NAME.to_string(),
            speed_mps: DEFAULT_MONSTER_SPEED_MPS,
            kind: DEFAULT_MONSTER_KIND.to_string(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PopulationError {
    #[error("wave size must not be negative (got {0})")]
    NegativeWaveCount(i32),
}

/// What a renderer needs to draw one marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterView {
    pub id: u64,
    pub name: String,
    pub position: Coordinate,
    pub kind: String,
}

impl From<&Monster> for MonsterView {
    fn from(monster: &Monster) -> Self {
        Self {
            id: monster.id.raw(),
            name: monster.display_name.clone(),
            position: monster.position,
            kind: monster.kind.clone(),
        }
    }
}

/// The live monsters, in spawn order.
///
/// Monsters only leave through [`MonsterPopulation::clear`]. Ids come from a
/// counter that survives `clear`, so an id is never handed out twice.
pub struct MonsterPopulation {
    next_id: u64,
    monsters: Vec<Monster>,
    planner: SpawnPlanner,
    template: MonsterTemplate,
}

impl MonsterPopulation {
    pub fn new(planner: SpawnPlanner, template: MonsterTemplate) -> Self {
        Self {
            next_id: 0,
            monsters: Vec::new(),
            planner,
            template,
        }
    }

    pub fn spawn_one<R: Rng>(&mut self, near: Coordinate, rng: &mut R) -> Monster {
        let position = self.planner.calculate_spawn_position(near, rng);
        let monster = Monster {
            id: self.allocate(),
            display_name: self.template.name.clone(),
            position,
            speed_mps: self.template.speed_mps,
            kind: self.template.kind.clone(),
        };
        self.monsters.push(monster.clone());
        monster
    }

    pub fn spawn_wave<R: Rng>(
        &mut self,
        near: Coordinate,
        count: i32,
        rng: &mut R,
    ) -> Result<Vec<Monster>, PopulationError> {
        if count < 0 {
            return Err(PopulationError::NegativeWaveCount(count));
        }
        Ok((0..count).map(|_| self.spawn_one(near, rng)).collect())
    }

    /// Every monster pursues `target` for `dt_seconds` at its own speed.
    pub fn advance(&mut self, target: Coordinate, dt_seconds: f64) {
        for monster in &mut self.monsters {
            monster.position =
                geo::move_toward(monster.position, target, monster.speed_mps * dt_seconds);
        }
    }

    /// Inclusive: a monster exactly `radius_m` away counts.
    pub fn is_any_within(&self, point: Coordinate, radius_m: f64) -> bool {
        self.monsters
            .iter()
            .any(|monster| geo::distance(point, monster.position) <= radius_m)
    }

    /// Closest monster and its distance; the earliest spawned wins ties.
    pub fn nearest(&self, point: Coordinate) -> Option<(&Monster, f64)> {
        let mut best: Option<(&Monster, f64)> = None;
        for monster in &self.monsters {
            let distance = geo::distance(point, monster.position);
            match best {
                Some((_, best_distance)) if best_distance <= distance => {}
                _ => best = Some((monster, distance)),
            }
        }
        best
    }

    pub fn clear(&mut self) {
        self.monsters.clear();
    }

    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Monster> {
        self.monsters.iter()
    }

    pub fn get_mut(&mut self, id: MonsterId) -> Option<&mut Monster> {
        self.monsters.iter_mut().find(|monster| monster.id == id)
    }

    pub fn views(&self) -> Vec<MonsterView> {
        self.monsters.iter().map(MonsterView::from).collect()
    }

    fn allocate(&mut self) -> MonsterId {
        let id = MonsterId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl Default for MonsterPopulation {
    fn default() -> Self {
        Self::new(SpawnPlanner::default(), MonsterTemplate::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub scenario: String,
    pub tick: u64,
    pub state: GameState,
    pub monsters: Vec<MonsterView>,
}

/// Everything the tick pipeline mutates: the population and the state draft
/// for the tick in progress.
pub struct World {
    pub(crate) population: MonsterPopulation,
    pub(crate) state: GameState,
}

impl World {
    pub fn new(population: MonsterPopulation) -> Self {
        Self {
            population,
            state: GameState::default(),
        }
    }

    pub fn population(&self) -> &MonsterPopulation {
        &self.population
    }

    pub fn population_mut(&mut self) -> &mut MonsterPopulation {
        &mut self.population
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn reset(&mut self) {
        self.population.clear();
        self.state = GameState::default();
    }

    pub fn snapshot(&self, scenario: &str) -> WorldSnapshot {
        WorldSnapshot {
            scenario: scenario.to_string(),
            tick: self.state.elapsed_seconds,
            state: self.state.clone(),
            monsters: self.population.views(),
        }
    }
}
