use super::{CreatureInfo, GameHost, GatherFlags, GenerationSummary, StepResult};
use biotope_core::lifecycle::create_food_with_rng;
use biotope_core::step::Decision;
use biotope_core::BrainError;
use biotope_data::{Creature, CreatureId, StepAction};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::time::Instant;

/// Seed of the RNG a creature uses while deciding during `tick`.
#[must_use]
pub fn creature_seed(world_seed: u64, tick: u64, id: CreatureId) -> u64 {
    world_seed.wrapping_add(tick).wrapping_mul(0x517C_C1B7_2722_0A95) ^ id
}

/// Strictly more food eaten and strictly more reproductions.
fn outranks(candidate: &Creature, incumbent: &Creature) -> bool {
    candidate.counters.food_eaten > incumbent.counters.food_eaten
        && candidate.counters.times_reproduced > incumbent.counters.times_reproduced
}

impl GameHost {
    /// Advances the world by one tick.
    ///
    /// Executes `actions` (the previous tick's choices), removes the dead and
    /// depleted, rebuilds visibility, evaluates every brain in parallel, ages
    /// creatures, updates the best creature and maybe spawns food. The
    /// returned actions are meant to be passed back on the next call.
    pub fn next_step(
        &mut self,
        actions: &[StepAction],
        flags: GatherFlags,
    ) -> anyhow::Result<StepResult> {
        let started = Instant::now();
        self.tick += 1;

        let report = self.step.execute_actions(actions, &mut self.rng)?;
        let (removed_creatures, removed_food) = self.step.remove_dead_and_depleted();
        self.step.clear_caches();
        self.step.compute_visibility();

        let decisions = self.decide_all()?;

        let mut aged_out = 0;
        let mut best_idx = self
            .best_creature()
            .and_then(|id| self.step.index_of(id))
            .filter(|&i| !self.step.creatures[i].is_dead);
        for idx in 0..decisions.len() {
            let creature = &mut self.step.creatures[idx];
            if !creature.is_dead {
                if creature.age >= creature.max_age {
                    creature.die();
                    aged_out += 1;
                } else {
                    creature.age += 1;
                }
            }
            if creature.is_dead {
                if best_idx == Some(idx) {
                    best_idx = None;
                }
                continue;
            }
            let replace = match best_idx {
                None => true,
                Some(b) => b != idx && outranks(&self.step.creatures[idx], &self.step.creatures[b]),
            };
            if replace {
                best_idx = Some(idx);
            }
        }
        self.set_best_creature(best_idx.map(|i| self.step.creatures[i].id));

        let best = self.best_creature();
        let selected = self.selected_creature();
        let mut next_actions = Vec::with_capacity(decisions.len());
        let mut diagnostics = Vec::new();
        for (creature, decision) in self.step.creatures.iter().zip(decisions) {
            let is_best = best == Some(creature.id);
            let is_selected = selected == Some(creature.id);
            if flags.wants(is_best, is_selected, creature.is_dead) {
                diagnostics.push(CreatureInfo::capture(
                    creature,
                    &decision.node_values,
                    decision.action.action,
                    is_best,
                    is_selected,
                ));
            }
            if !creature.is_dead {
                next_actions.push(decision.action);
            }
        }

        let food_spawned = self.spawn_food();

        let creatures = self.step.creatures.len();
        let food = self.step.food.len();
        self.metrics.record_tick(started.elapsed(), creatures, food);
        self.metrics.add("births", report.births.len() as u64);
        self.metrics.add("deaths", (report.deaths + aged_out) as u64);
        self.metrics.add("meals", report.meals as u64);
        self.metrics.add("fights", report.fights as u64);

        tracing::debug!(
            tick = self.tick,
            creatures,
            food,
            births = report.births.len(),
            deaths = report.deaths + aged_out,
            actions = next_actions.len(),
            "Tick complete"
        );

        Ok(StepResult {
            tick: self.tick,
            actions: next_actions,
            report,
            removed_creatures,
            removed_food,
            aged_out,
            food_spawned,
            diagnostics,
        })
    }

    /// Runs [`GameHost::next_step`] with the queued actions and queues the new ones.
    pub fn advance(&mut self, flags: GatherFlags) -> anyhow::Result<StepResult> {
        let actions = std::mem::take(&mut self.pending_actions);
        let result = self.next_step(&actions, flags)?;
        self.pending_actions.clone_from(&result.actions);
        Ok(result)
    }

    /// Runs one generation of `iterations_per_generation` ticks.
    ///
    /// An extinct world ends the generation early and is reseeded.
    pub fn run_generation(&mut self) -> anyhow::Result<GenerationSummary> {
        let mut summary = GenerationSummary {
            generation: self.generation,
            peak_population: self.step.live_creature_count(),
            ..GenerationSummary::default()
        };

        for _ in 0..self.config.generation.iterations_per_generation {
            let result = self.advance(GatherFlags::NONE)?;
            summary.ticks += 1;
            summary.births += result.report.births.len();
            summary.deaths += result.report.deaths + result.aged_out;

            let alive = self.step.live_creature_count();
            summary.peak_population = summary.peak_population.max(alive);
            if alive == 0 {
                summary.extinct = true;
                break;
            }
        }

        summary.best_creature = self.best_creature();
        self.generation += 1;
        tracing::info!(
            generation = summary.generation,
            ticks = summary.ticks,
            peak_population = summary.peak_population,
            births = summary.births,
            deaths = summary.deaths,
            "Generation complete"
        );

        if summary.extinct {
            tracing::info!(generation = summary.generation, "Population extinct, reseeding");
            self.populate()?;
        }
        Ok(summary)
    }

    /// One rayon task per creature, each with its own seeded RNG.
    fn decide_all(&self) -> Result<Vec<Decision>, BrainError> {
        let step = &self.step;
        let (seed, tick) = (self.seed(), self.tick);
        (0..step.creatures.len())
            .into_par_iter()
            .map(|idx| {
                let id = step.creatures[idx].id;
                let mut rng = ChaCha8Rng::seed_from_u64(creature_seed(seed, tick, id));
                step.decide(idx, &mut rng)
            })
            .collect()
    }

    /// Adds one food item with probability `food_spawn_chance` while under the cap.
    fn spawn_food(&mut self) -> bool {
        if !self.rng.gen_bool(self.config.world.food_spawn_chance) {
            return false;
        }
        if self.step.food.len() >= self.config.world.max_food {
            return false;
        }
        let id = self.step.allocate_food_id();
        let bounds = self.config.world.bounds();
        let food = create_food_with_rng(id, &bounds, &self.config.food, &mut self.rng);
        self.step.food.push(food);
        true
    }
}
