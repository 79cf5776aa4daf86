use super::{ratio_or_one, WorldStep};
use crate::brain::NetworkLogic;
use crate::error::Result;
use crate::lifecycle::apply_size_traits;
use biotope_data::{Creature, CreatureCounters, CreatureId, NeuralNetwork};
use rand::Rng;

fn spread<R: Rng>(rng: &mut R, bound: f64) -> f64 {
    if bound > 0.0 {
        rng.gen_range(-bound..=bound)
    } else {
        0.0
    }
}

/// Whole children the creature can currently afford.
#[must_use]
pub fn children_possible(creature: &Creature) -> u64 {
    let by_energy = ratio_or_one(creature.energy, creature.energy_required_to_reproduce);
    let by_nutrients = ratio_or_one(creature.nutrients, creature.nutrients_required_to_reproduce);
    let possible = by_energy.min(by_nutrients).floor();
    if possible.is_finite() && possible > 0.0 {
        possible as u64
    } else {
        0
    }
}

impl WorldStep {
    /// Spawns between zero and `max_offspring` children next to the parent.
    ///
    /// Each child costs the parent one reproduction threshold of energy,
    /// nutrients and mass, and starts with exactly what the parent paid.
    /// `times_reproduced` grows by one per call that produced any child.
    pub fn try_reproduce<R: Rng>(&mut self, idx: usize, rng: &mut R) -> Result<Vec<CreatureId>> {
        let possible = children_possible(&self.creatures[idx]);
        if possible == 0 {
            return Ok(Vec::new());
        }

        let capacity = self
            .config
            .world
            .max_creatures
            .saturating_sub(self.live_creature_count()) as u64;
        let count = rng
            .gen_range(0..=possible)
            .min(self.config.evolution.max_offspring as u64)
            .min(capacity);

        let mut born = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let id = self.allocate_creature_id();
            let mut child = self.build_child(idx, id, rng)?;

            let parent = &mut self.creatures[idx];
            let (energy, nutrients, mass) = (parent.energy, parent.nutrients, parent.mass);
            parent.set_energy(energy - parent.energy_required_to_reproduce);
            parent.set_nutrients(nutrients - parent.nutrients_required_to_reproduce);
            parent.set_mass(mass - parent.mass_required_to_reproduce);

            child.set_energy(energy - parent.energy);
            child.set_nutrients(nutrients - parent.nutrients);
            child.set_mass(mass - parent.mass);

            tracing::trace!(parent = parent.id, child = id, "Creature born");
            born.push(id);
            self.creatures.push(child);
        }

        if !born.is_empty() {
            self.creatures[idx].counters.times_reproduced += 1;
        }
        Ok(born)
    }

    /// Child of the creature at `idx` with a combined, mutated brain, varied
    /// size and effort, placed within two body sizes of the parent.
    fn build_child<R: Rng>(&self, idx: usize, id: CreatureId, rng: &mut R) -> Result<Creature> {
        let parent = &self.creatures[idx];
        let creature_config = &self.config.creature;
        let evolution = &self.config.evolution;

        let mut brain = NeuralNetwork::combine_with_rng(&[&parent.brain], rng)?;
        for _ in 0..evolution.mutation_attempts {
            brain.mutate_with_config(&self.config, rng);
        }

        let size = (parent.size * (1.0 + spread(rng, evolution.size_variance)))
            .clamp(creature_config.min_size, creature_config.max_size);
        let move_effort = (parent.move_effort + spread(rng, evolution.move_effort_variance))
            .clamp(creature_config.min_move_effort, creature_config.max_move_effort);

        let reach = 2.0 * parent.size;
        let (x, y) = self.place(
            parent.x + spread(rng, reach),
            parent.y + spread(rng, reach),
            size,
        );

        let mut child = Creature {
            id,
            x,
            y,
            size,
            move_effort,
            age: 0,
            is_dead: false,
            energy: 0.0,
            nutrients: 0.0,
            mass: 0.0,
            counters: CreatureCounters::default(),
            generation: parent.generation + 1,
            parent_id: Some(parent.id),
            brain,
            ..parent.clone()
        };
        apply_size_traits(&mut child, creature_config);
        child.set_health(child.max_health);
        Ok(child)
    }
}
