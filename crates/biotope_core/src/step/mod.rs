//! One tick's worth of world state and the rules that advance it.
//!
//! A [`WorldStep`] owns the creature and food arenas plus per-tick caches
//! (visibility lists, circle areas, grids). Caches are never serialized and
//! are rebuilt by [`WorldStep::compute_visibility`] each tick.

pub mod actions;
pub mod combat;
pub mod decision;
pub mod feeding;
pub mod perception;
pub mod reproduction;

pub use actions::ActionReport;
pub use combat::CombatOutcome;
pub use decision::{choose_action, Decision};
pub use perception::Sighting;

use crate::config::AppConfig;
use crate::spatial_grid::SpatialGrid;
use biotope_data::{Creature, CreatureId, Food, FoodId, WorldBounds};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Derived data rebuilt every tick.
#[derive(Debug, Clone, Default)]
pub struct StepCache {
    /// Per creature index: visible creatures, nearest first.
    pub visible_creatures: Vec<Vec<Sighting>>,
    /// Per creature index: visible food, nearest first.
    pub visible_food: Vec<Vec<Sighting>>,
    pub creature_areas: Vec<f64>,
    pub food_areas: Vec<f64>,
    pub creature_grid: SpatialGrid,
    pub food_grid: SpatialGrid,
}

/// World state for a single tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldStep {
    /// Configuration copied in when the step was created.
    pub config: AppConfig,
    pub creatures: Vec<Creature>,
    pub food: Vec<Food>,
    pub next_creature_id: CreatureId,
    pub next_food_id: FoodId,
    /// Fingerprint of `config` at creation; compared on load.
    pub config_fingerprint: String,
    #[serde(skip, default)]
    pub cache: StepCache,
}

impl WorldStep {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let config_fingerprint = config.fingerprint();
        Self {
            config,
            creatures: Vec::new(),
            food: Vec::new(),
            next_creature_id: 0,
            next_food_id: 0,
            config_fingerprint,
            cache: StepCache::default(),
        }
    }

    /// Step holding the given population. Id counters continue past the largest id.
    #[must_use]
    pub fn with_population(config: AppConfig, creatures: Vec<Creature>, food: Vec<Food>) -> Self {
        let mut step = Self::new(config);
        step.next_creature_id = creatures.iter().map(|c| c.id + 1).max().unwrap_or(0);
        step.next_food_id = food.iter().map(|f| f.id + 1).max().unwrap_or(0);
        step.creatures = creatures;
        step.food = food;
        step
    }

    #[must_use]
    pub fn bounds(&self) -> WorldBounds {
        self.config.world.bounds()
    }

    pub fn allocate_creature_id(&mut self) -> CreatureId {
        let id = self.next_creature_id;
        self.next_creature_id += 1;
        id
    }

    pub fn allocate_food_id(&mut self) -> FoodId {
        let id = self.next_food_id;
        self.next_food_id += 1;
        id
    }

    #[must_use]
    pub fn index_of(&self, id: CreatureId) -> Option<usize> {
        self.creatures.iter().position(|c| c.id == id)
    }

    #[must_use]
    pub fn creature(&self, id: CreatureId) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.id == id)
    }

    #[must_use]
    pub fn live_creature_count(&self) -> usize {
        self.creatures.iter().filter(|c| !c.is_dead).count()
    }

    /// Drops dead creatures and depleted food; returns how many of each went.
    pub fn remove_dead_and_depleted(&mut self) -> (usize, usize) {
        let creatures_before = self.creatures.len();
        let food_before = self.food.len();
        self.creatures.retain(|c| !c.is_dead);
        self.food.retain(|f| !f.is_depleted());
        (
            creatures_before - self.creatures.len(),
            food_before - self.food.len(),
        )
    }

    pub fn clear_caches(&mut self) {
        self.cache = StepCache::default();
    }

    /// Wraps or clamps a top-left position so the object stays in the world.
    #[must_use]
    pub fn place(&self, x: f64, y: f64, size: f64) -> (f64, f64) {
        place_in_bounds(x, y, size, &self.bounds(), self.config.world.loop_bounds)
    }

    fn id_index(&self) -> HashMap<CreatureId, usize> {
        self.creatures
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id, i))
            .collect()
    }
}

/// Wrapping moves the mid-point modulo the world size; clamping keeps the
/// whole circle inside when it fits, pinning it to the top-left edge when not.
#[must_use]
pub fn place_in_bounds(x: f64, y: f64, size: f64, bounds: &WorldBounds, wrap: bool) -> (f64, f64) {
    let half = size / 2.0;
    if wrap {
        let mx = bounds.x + (x + half - bounds.x).rem_euclid(bounds.width);
        let my = bounds.y + (y + half - bounds.y).rem_euclid(bounds.height);
        (mx - half, my - half)
    } else {
        (
            x.clamp(bounds.x, (bounds.right() - size).max(bounds.x)),
            y.clamp(bounds.y, (bounds.bottom() - size).max(bounds.y)),
        )
    }
}

/// Mutable references to two distinct elements.
pub fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> Option<(&mut T, &mut T)> {
    if a == b || a >= items.len() || b >= items.len() {
        return None;
    }
    if a < b {
        let (left, right) = items.split_at_mut(b);
        Some((&mut left[a], &mut right[0]))
    } else {
        let (left, right) = items.split_at_mut(a);
        Some((&mut right[0], &mut left[b]))
    }
}

/// `numerator / denominator`, or `1.0` when the denominator is zero.
#[inline]
#[must_use]
pub fn ratio_or_one(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        1.0
    } else {
        numerator / denominator
    }
}
