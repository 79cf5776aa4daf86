use super::network::{CreatureAction, NeuralNetwork};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type CreatureId = u64;
pub type FoodId = u64;

/// Rectangle the world lives in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl WorldBounds {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Anything placed in the world as a circle of diameter `size`, anchored at its top-left.
pub trait WorldObject {
    fn position(&self) -> (f64, f64);
    fn size(&self) -> f64;

    #[must_use]
    fn mid_point(&self) -> (f64, f64) {
        let (x, y) = self.position();
        let half = self.size() / 2.0;
        (x + half, y + half)
    }

    #[must_use]
    fn area(&self) -> f64 {
        let r = self.size() / 2.0;
        std::f64::consts::PI * r * r
    }
}

/// Lifetime tallies used for ranking and diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureCounters {
    pub food_eaten: u64,
    pub attempted_eats: u64,
    pub times_reproduced: u64,
    pub attempted_attacks: u64,
    pub initiated_attacks: u64,
    pub successful_attacks: u64,
    pub attacks_evaded: u64,
}

/// A living agent driven by its own neural network.
///
/// Resource fields are public for inspection; mutate them through the
/// `set_*` methods so they stay within `[0, max]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub id: CreatureId,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    /// Degrees in `[0, 360)`, clockwise from +x.
    pub forward_angle: f64,
    pub sight_range: f64,
    /// Degrees in `[0, 360]`.
    pub field_of_view: f64,

    pub energy: f64,
    pub max_energy: f64,
    pub nutrients: f64,
    pub max_nutrients: f64,
    pub health: f64,
    pub max_health: f64,
    pub mass: f64,
    pub max_mass: f64,
    pub age: u64,
    pub max_age: u64,
    pub is_dead: bool,

    pub speed: f64,
    pub move_effort: f64,
    pub move_cost: f64,
    pub attack_cost: f64,
    pub defend_cost: f64,
    /// Energy burnt per unit of mass on every action.
    pub metabolism_rate: f64,
    pub energy_per_eat: f64,
    pub nutrients_per_eat: f64,
    pub energy_required_to_reproduce: f64,
    pub nutrients_required_to_reproduce: f64,
    pub mass_required_to_reproduce: f64,

    pub counters: CreatureCounters,
    pub generation: u32,
    pub parent_id: Option<CreatureId>,
    pub brain: NeuralNetwork,
}

impl WorldObject for Creature {
    fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    fn size(&self) -> f64 {
        self.size
    }
}

impl Creature {
    /// Energy charged on top of every action.
    #[must_use]
    pub fn metabolism(&self) -> f64 {
        self.mass * self.metabolism_rate
    }

    pub fn set_energy(&mut self, value: f64) {
        self.energy = value.clamp(0.0, self.max_energy.max(0.0));
    }

    pub fn set_nutrients(&mut self, value: f64) {
        self.nutrients = value.clamp(0.0, self.max_nutrients.max(0.0));
    }

    pub fn set_health(&mut self, value: f64) {
        self.health = value.clamp(0.0, self.max_health.max(0.0));
    }

    pub fn set_mass(&mut self, value: f64) {
        self.mass = value.clamp(0.0, self.max_mass.max(0.0));
    }

    #[must_use]
    pub fn should_be_dead(&self) -> bool {
        self.energy <= 0.0 || self.health <= 0.0 || self.age > self.max_age
    }

    /// One-way transition: marks the creature dead and zeroes its energy and health.
    pub fn die(&mut self) {
        self.is_dead = true;
        self.energy = 0.0;
        self.health = 0.0;
    }
}

/// A stationary energy source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub id: FoodId,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub energy: f64,
    pub max_energy: f64,
    pub nutrients: f64,
    pub servings: u32,
    pub energy_per_serving: f64,
    pub serving_digestion_cost: f64,
}

impl WorldObject for Food {
    fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    fn size(&self) -> f64 {
        self.size
    }
}

impl Food {
    pub fn set_energy(&mut self, value: f64) {
        self.energy = value.clamp(0.0, self.max_energy.max(0.0));
    }

    pub fn set_nutrients(&mut self, value: f64) {
        self.nutrients = value.max(0.0);
    }

    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.energy <= 0.0
    }
}

/// A creature's decision for the coming tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepAction {
    pub creature_id: CreatureId,
    pub action: CreatureAction,
    /// Raw output value per action; absent actions had no output node.
    pub outputs: BTreeMap<CreatureAction, f32>,
}
