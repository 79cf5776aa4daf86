use super::WorldStep;
use crate::lifecycle::food_size_for_energy;
use biotope_data::WorldObject;

/// Mid-point distance at which two circles touch.
#[inline]
#[must_use]
pub fn contact_range(a_size: f64, b_size: f64) -> f64 {
    (a_size + b_size) / 2.0
}

impl WorldStep {
    /// Eats from the nearest visible food if it is in contact.
    ///
    /// Transfers `min(energy_per_eat, food.energy)` energy and the matching
    /// nutrients, consumes one serving and charges its digestion cost.
    /// Every call counts as an attempt. Nearest food that another creature
    /// emptied earlier this tick gives no meal. Returns whether a meal happened.
    pub fn try_eat(&mut self, idx: usize) -> bool {
        self.creatures[idx].counters.attempted_eats += 1;

        let Some(sighting) = self
            .cache
            .visible_food
            .get(idx)
            .and_then(|seen| seen.first())
            .copied()
        else {
            return false;
        };
        let Some(food) = self.food.get(sighting.index).filter(|f| !f.is_depleted()) else {
            return false;
        };
        let creature = &self.creatures[idx];

        let (cx, cy) = creature.mid_point();
        let (fx, fy) = food.mid_point();
        if (fx - cx).hypot(fy - cy) > contact_range(creature.size, food.size) {
            return false;
        }

        let energy = creature.energy_per_eat.min(food.energy);
        let nutrients = creature.nutrients_per_eat.min(food.nutrients);
        let digestion = food.serving_digestion_cost;

        let food_config = &self.config.food;
        let food = &mut self.food[sighting.index];
        food.set_energy(food.energy - energy);
        food.set_nutrients(food.nutrients - nutrients);
        food.servings = food.servings.saturating_sub(1);
        let new_size = food_size_for_energy(food.energy, food_config);
        food.x = fx - new_size / 2.0;
        food.y = fy - new_size / 2.0;
        food.size = new_size;

        let creature = &mut self.creatures[idx];
        creature.set_energy(creature.energy + energy - digestion);
        creature.set_nutrients(creature.nutrients + nutrients);
        creature.counters.food_eaten += 1;
        true
    }
}
