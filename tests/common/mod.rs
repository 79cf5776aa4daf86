use biotope_lib::model::config::AppConfig;
use biotope_lib::model::lifecycle::create_creature_with_rng;
use biotope_lib::model::state::{Creature, CreatureAction, Food, StepAction};
use biotope_lib::GameHost;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

type CreatureMod = Box<dyn FnOnce(&mut Creature)>;

/// Builds a host with an exact, hand-placed population.
#[allow(dead_code)]
pub struct HostBuilder {
    config: AppConfig,
    creatures: Vec<(f64, f64, Option<CreatureMod>)>,
    food: Vec<Food>,
}

#[allow(dead_code)]
impl HostBuilder {
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.world.initial_creatures = 0;
        config.world.initial_food = 0;
        config.world.food_spawn_chance = 0.0;
        config.world.seed = Some(42);
        Self {
            config,
            creatures: Vec::new(),
            food: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.world.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn with_creature(mut self, x: f64, y: f64) -> Self {
        self.creatures.push((x, y, None));
        self
    }

    pub fn with_creature_mod<F>(mut self, x: f64, y: f64, modifier: F) -> Self
    where
        F: FnOnce(&mut Creature) + 'static,
    {
        self.creatures.push((x, y, Some(Box::new(modifier))));
        self
    }

    pub fn with_food(mut self, food: Food) -> Self {
        self.food.push(food);
        self
    }

    pub fn build(self) -> GameHost {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.world.seed.unwrap_or(0));
        let creatures = self
            .creatures
            .into_iter()
            .enumerate()
            .map(|(id, (x, y, modifier))| {
                let mut creature =
                    create_creature_with_rng(id as u64, x, y, &self.config, &mut rng)
                        .expect("Failed to create creature in test builder");
                if let Some(modifier) = modifier {
                    modifier(&mut creature);
                }
                creature
            })
            .collect();

        let mut host = GameHost::new(self.config).expect("Failed to create host in test builder");
        host.reset_step(creatures, self.food);
        host
    }
}

/// Food item of the given size and energy at `(x, y)`.
#[allow(dead_code)]
pub fn food_at(id: u64, x: f64, y: f64, size: f64, energy: f64) -> Food {
    Food {
        id,
        x,
        y,
        size,
        energy,
        max_energy: energy,
        nutrients: 10.0,
        servings: 4,
        energy_per_serving: energy / 4.0,
        serving_digestion_cost: 0.0,
    }
}

#[allow(dead_code)]
pub fn act(creature_id: u64, action: CreatureAction) -> StepAction {
    StepAction {
        creature_id,
        action,
        outputs: BTreeMap::new(),
    }
}
