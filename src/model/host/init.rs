use super::GameHost;
use crate::model::config::AppConfig;
use biotope_core::lifecycle::{create_creature_with_rng, create_food_with_rng, random_position};
use biotope_core::step::WorldStep;
use biotope_core::Metrics;
use biotope_data::{Creature, Food};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

impl GameHost {
    /// Host with an empty world. Fails when `config` does not validate.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let mut rng = if let Some(seed) = config.world.seed {
            ChaCha8Rng::seed_from_u64(seed)
        } else {
            ChaCha8Rng::from_entropy()
        };
        let seed = config.world.seed.unwrap_or_else(|| rng.gen());

        Ok(Self {
            step: WorldStep::new(config.clone()),
            config,
            tick: 0,
            generation: 0,
            metrics: Metrics::new(),
            rng,
            seed,
            pending_actions: Vec::new(),
            best_creature: None,
            selected_creature: None,
            subscribers: Vec::new(),
        })
    }

    /// Host populated with freshly generated creatures and food.
    pub fn with_generated_world(config: AppConfig) -> anyhow::Result<Self> {
        let mut host = Self::new(config)?;
        host.populate()?;
        Ok(host)
    }

    /// Replaces the world with generated creatures and food.
    pub fn populate(&mut self) -> anyhow::Result<()> {
        let creatures = self.generate_creatures()?;
        let food = self.generate_food();
        self.reset_step(creatures, food);
        Ok(())
    }

    /// `initial_creatures` creatures at random positions, each with a fresh brain.
    ///
    /// Ids continue from the current step so they never collide with
    /// creatures that existed before a reseed.
    pub fn generate_creatures(&mut self) -> anyhow::Result<Vec<Creature>> {
        let bounds = self.config.world.bounds();
        let count = self.config.world.initial_creatures;
        let mut creatures = Vec::with_capacity(count);
        for _ in 0..count {
            let id = self.step.allocate_creature_id();
            let mut creature = create_creature_with_rng(id, 0.0, 0.0, &self.config, &mut self.rng)?;
            let (x, y) = random_position(&bounds, creature.size, &mut self.rng);
            creature.x = x;
            creature.y = y;
            creatures.push(creature);
        }
        Ok(creatures)
    }

    /// `initial_food` food items at random positions.
    pub fn generate_food(&mut self) -> Vec<Food> {
        let bounds = self.config.world.bounds();
        (0..self.config.world.initial_food)
            .map(|_| {
                let id = self.step.allocate_food_id();
                create_food_with_rng(id, &bounds, &self.config.food, &mut self.rng)
            })
            .collect()
    }

    /// Installs a new population under the current configuration.
    ///
    /// Best and selected creatures are cleared, queued actions dropped and
    /// the tick counter restarts.
    pub fn reset_step(&mut self, creatures: Vec<Creature>, food: Vec<Food>) {
        let mut step = WorldStep::with_population(self.config.clone(), creatures, food);
        step.next_creature_id = step.next_creature_id.max(self.step.next_creature_id);
        step.next_food_id = step.next_food_id.max(self.step.next_food_id);
        self.install(step);
        tracing::info!(
            creatures = self.step.creatures.len(),
            food = self.step.food.len(),
            "World reset"
        );
    }

    /// Installs a previously saved step, adopting its configuration.
    pub fn load_step(&mut self, step: WorldStep) -> anyhow::Result<()> {
        step.config.validate()?;
        self.config = step.config.clone();
        self.install(step);
        tracing::info!(
            creatures = self.step.creatures.len(),
            food = self.step.food.len(),
            "World loaded"
        );
        Ok(())
    }

    fn install(&mut self, mut step: WorldStep) {
        step.clear_caches();
        self.step = step;
        self.tick = 0;
        self.pending_actions.clear();
        self.set_best_creature(None);
        self.set_selected_creature(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.world.seed = Some(7);
        config.world.initial_creatures = 12;
        config.world.initial_food = 20;
        config
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = seeded_config();
        config.generation.iterations_per_generation = 0;
        assert!(GameHost::new(config).is_err());
    }

    #[test]
    fn test_generated_world_matches_config() {
        let host = GameHost::with_generated_world(seeded_config()).unwrap();
        assert_eq!(host.step.creatures.len(), 12);
        assert_eq!(host.step.food.len(), 20);

        let bounds = host.config.world.bounds();
        for c in &host.step.creatures {
            assert!(c.x >= bounds.x && c.x + c.size <= bounds.right() + 1e-9);
            assert!(c.y >= bounds.y && c.y + c.size <= bounds.bottom() + 1e-9);
        }
    }

    #[test]
    fn test_reseed_keeps_ids_unique() {
        let mut host = GameHost::with_generated_world(seeded_config()).unwrap();
        let first: Vec<_> = host.step.creatures.iter().map(|c| c.id).collect();
        host.populate().unwrap();
        assert!(host.step.creatures.iter().all(|c| !first.contains(&c.id)));
    }
}
