//! Configuration management for simulation parameters.
//!
//! Strongly-typed sections that map onto a `config.toml` file. Every field
//! has a default, so a file only needs to name what it overrides.
//!
//! ## Example `config.toml`
//!
//! ```toml
//! [world]
//! width = 800.0
//! height = 600.0
//! initial_creatures = 40
//! seed = 42
//!
//! [brain]
//! weight_bound = 4.0
//! max_connections = 32
//!
//! [generation]
//! iterations_per_generation = 5000
//! ```

use biotope_data::WorldBounds;
use serde::{Deserialize, Serialize};

/// World geometry and population caps.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Wrap objects around the edges instead of clamping them.
    pub loop_bounds: bool,
    pub initial_creatures: usize,
    pub max_creatures: usize,
    pub initial_food: usize,
    pub max_food: usize,
    /// Chance per tick of spawning one food item while under `max_food`.
    pub food_spawn_chance: f64,
    /// Grid cell size used when no creature has a positive sight range.
    pub min_cell_size: f64,
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 1000.0,
            height: 1000.0,
            loop_bounds: false,
            initial_creatures: 50,
            max_creatures: 500,
            initial_food: 150,
            max_food: 300,
            food_spawn_chance: 0.8,
            min_cell_size: 50.0,
            seed: None,
        }
    }
}

impl WorldConfig {
    #[must_use]
    pub fn bounds(&self) -> WorldBounds {
        WorldBounds::new(self.x, self.y, self.width, self.height)
    }
}

/// Network topology limits.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BrainConfig {
    /// Weights live in `[-weight_bound, weight_bound]`.
    pub weight_bound: f32,
    pub bias_bound: f32,
    pub min_connections: usize,
    pub max_connections: usize,
    pub initial_process_nodes: usize,
    pub max_process_nodes: usize,
    /// Value read from a node that is still being evaluated (cycle break).
    pub cycle_default: f32,
}

impl Default for BrainConfig {
    fn default() -> Self {
        Self {
            weight_bound: 4.0,
            bias_bound: 1.0,
            min_connections: 8,
            max_connections: 24,
            initial_process_nodes: 3,
            max_process_nodes: 12,
            cycle_default: 0.0,
        }
    }
}

/// Creature trait ranges and the multipliers that derive stats from size.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CreatureConfig {
    pub min_size: f64,
    pub max_size: f64,
    pub min_sight_range: f64,
    pub max_sight_range: f64,
    pub min_field_of_view: f64,
    pub max_field_of_view: f64,
    pub min_max_age: u64,
    pub max_max_age: u64,
    pub min_move_effort: f64,
    pub max_move_effort: f64,

    pub energy_per_size: f64,
    pub nutrients_per_size: f64,
    pub health_per_size: f64,
    pub mass_per_size: f64,
    pub speed_factor: f64,
    pub move_cost_per_size: f64,
    pub attack_cost_per_size: f64,
    pub defend_cost_per_size: f64,
    pub metabolism_rate: f64,
    pub energy_per_eat_per_size: f64,
    pub nutrients_per_eat_per_size: f64,

    pub reproduction_energy_fraction: f64,
    pub reproduction_nutrients_fraction: f64,
    pub reproduction_mass_fraction: f64,
    pub starting_energy_fraction: f64,
    pub starting_nutrients_fraction: f64,
}

impl Default for CreatureConfig {
    fn default() -> Self {
        Self {
            min_size: 6.0,
            max_size: 14.0,
            min_sight_range: 40.0,
            max_sight_range: 120.0,
            min_field_of_view: 60.0,
            max_field_of_view: 180.0,
            min_max_age: 800,
            max_max_age: 2000,
            min_move_effort: 0.5,
            max_move_effort: 1.0,
            energy_per_size: 10.0,
            nutrients_per_size: 5.0,
            health_per_size: 10.0,
            mass_per_size: 2.0,
            speed_factor: 10.0,
            move_cost_per_size: 0.02,
            attack_cost_per_size: 0.05,
            defend_cost_per_size: 0.03,
            metabolism_rate: 0.005,
            energy_per_eat_per_size: 2.0,
            nutrients_per_eat_per_size: 1.0,
            reproduction_energy_fraction: 0.4,
            reproduction_nutrients_fraction: 0.4,
            reproduction_mass_fraction: 0.2,
            starting_energy_fraction: 0.8,
            starting_nutrients_fraction: 0.5,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FoodConfig {
    pub min_energy: f64,
    pub max_energy: f64,
    pub min_nutrients: f64,
    pub max_nutrients: f64,
    pub min_size: f64,
    pub max_size: f64,
    pub energy_per_serving: f64,
    pub serving_digestion_cost: f64,
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            min_energy: 20.0,
            max_energy: 80.0,
            min_nutrients: 5.0,
            max_nutrients: 20.0,
            min_size: 3.0,
            max_size: 8.0,
            energy_per_serving: 10.0,
            serving_digestion_cost: 0.5,
        }
    }
}

/// Offspring variation and brain mutation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Mutation attempts applied to every child brain.
    pub mutation_attempts: usize,
    /// Chance that one attempt applies each mutation operation.
    pub mutation_chance: f32,
    pub max_offspring: usize,
    /// Child size is parent size scaled by `1 ± size_variance`.
    pub size_variance: f64,
    pub move_effort_variance: f64,
    pub weight_mutation_amount: f32,
    pub bias_mutation_amount: f32,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            mutation_attempts: 3,
            mutation_chance: 0.1,
            max_offspring: 2,
            size_variance: 0.1,
            move_effort_variance: 0.1,
            weight_mutation_amount: 0.5,
            bias_mutation_amount: 0.2,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    pub iterations_per_generation: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            iterations_per_generation: 2000,
        }
    }
}

/// Top-level configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub brain: BrainConfig,
    pub creature: CreatureConfig,
    pub food: FoodConfig,
    pub evolution: EvolutionConfig,
    pub generation: GenerationConfig,
}

fn ordered<T: PartialOrd>(min: T, max: T) -> bool {
    min <= max
}

impl AppConfig {
    /// Rejects values the engine cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        // World
        anyhow::ensure!(self.world.width > 0.0, "World width must be positive");
        anyhow::ensure!(self.world.height > 0.0, "World height must be positive");
        anyhow::ensure!(
            self.world.initial_creatures <= self.world.max_creatures,
            "Initial creatures exceed max creatures"
        );
        anyhow::ensure!(
            self.world.initial_food <= self.world.max_food,
            "Initial food exceeds max food"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.world.food_spawn_chance),
            "Food spawn chance must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.world.min_cell_size > 0.0,
            "Minimum cell size must be positive"
        );

        // Brain
        anyhow::ensure!(
            self.brain.weight_bound > 0.0,
            "Connection weight bound must be positive"
        );
        anyhow::ensure!(
            self.brain.bias_bound >= 0.0,
            "Bias bound must be non-negative"
        );
        anyhow::ensure!(
            ordered(self.brain.min_connections, self.brain.max_connections),
            "Min connections exceeds max connections"
        );
        anyhow::ensure!(
            self.brain.initial_process_nodes <= self.brain.max_process_nodes,
            "Initial process nodes exceed max process nodes"
        );

        // Creature
        let c = &self.creature;
        anyhow::ensure!(c.min_size > 0.0, "Creature min size must be positive");
        anyhow::ensure!(ordered(c.min_size, c.max_size), "Creature size range inverted");
        anyhow::ensure!(
            c.min_sight_range >= 0.0 && ordered(c.min_sight_range, c.max_sight_range),
            "Sight range must be a non-negative, ordered range"
        );
        anyhow::ensure!(
            c.min_field_of_view >= 0.0
                && c.max_field_of_view <= 360.0
                && ordered(c.min_field_of_view, c.max_field_of_view),
            "Field of view must be an ordered range within [0, 360]"
        );
        anyhow::ensure!(
            ordered(c.min_max_age, c.max_max_age),
            "Max age range inverted"
        );
        anyhow::ensure!(
            c.min_move_effort >= 0.0 && ordered(c.min_move_effort, c.max_move_effort),
            "Move effort must be a non-negative, ordered range"
        );
        anyhow::ensure!(c.speed_factor >= 0.0, "Speed factor must be non-negative");
        anyhow::ensure!(
            c.metabolism_rate >= 0.0,
            "Metabolism rate must be non-negative"
        );
        for (name, value) in [
            ("Reproduction energy fraction", c.reproduction_energy_fraction),
            ("Reproduction nutrients fraction", c.reproduction_nutrients_fraction),
            ("Reproduction mass fraction", c.reproduction_mass_fraction),
        ] {
            anyhow::ensure!(value > 0.0 && value <= 1.0, "{name} must be in (0.0, 1.0]");
        }
        anyhow::ensure!(
            (0.0..=1.0).contains(&c.starting_energy_fraction)
                && (0.0..=1.0).contains(&c.starting_nutrients_fraction),
            "Starting fractions must be in [0.0, 1.0]"
        );

        // Food
        let f = &self.food;
        anyhow::ensure!(
            f.min_energy > 0.0 && ordered(f.min_energy, f.max_energy),
            "Food energy must be a positive, ordered range"
        );
        anyhow::ensure!(
            f.min_nutrients >= 0.0 && ordered(f.min_nutrients, f.max_nutrients),
            "Food nutrients must be a non-negative, ordered range"
        );
        anyhow::ensure!(
            f.min_size > 0.0 && ordered(f.min_size, f.max_size),
            "Food size must be a positive, ordered range"
        );
        anyhow::ensure!(
            f.energy_per_serving > 0.0,
            "Energy per serving must be positive"
        );

        // Evolution
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.evolution.mutation_chance),
            "Mutation chance must be in [0.0, 1.0]"
        );
        anyhow::ensure!(
            self.evolution.size_variance >= 0.0 && self.evolution.move_effort_variance >= 0.0,
            "Variances must be non-negative"
        );
        anyhow::ensure!(
            self.evolution.weight_mutation_amount >= 0.0
                && self.evolution.bias_mutation_amount >= 0.0,
            "Mutation amounts must be non-negative"
        );

        anyhow::ensure!(
            self.generation.iterations_per_generation > 0,
            "Iterations per generation must be positive"
        );

        Ok(())
    }

    /// Parses and validates a TOML document.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Hash of the sections that shape simulation behavior.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.brain).as_bytes());
        hasher.update(format!("{:?}", self.creature).as_bytes());
        hasher.update(format!("{:?}", self.food).as_bytes());
        hasher.update(format!("{:?}", self.evolution).as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_world_width() {
        let config = AppConfig {
            world: WorldConfig {
                width: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_connection_range_rejected() {
        let config = AppConfig {
            brain: BrainConfig {
                min_connections: 10,
                max_connections: 2,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let config = AppConfig {
            generation: GenerationConfig {
                iterations_per_generation: 0,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_positive_weight_bound_rejected() {
        let config = AppConfig {
            brain: BrainConfig {
                weight_bound: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_partial_override() {
        let config = AppConfig::from_toml(
            r#"
            [world]
            width = 300.0
            seed = 7

            [brain]
            max_connections = 40
            "#,
        )
        .unwrap();
        assert_eq!(config.world.width, 300.0);
        assert_eq!(config.world.seed, Some(7));
        assert_eq!(config.brain.max_connections, 40);
        assert_eq!(config.world.height, WorldConfig::default().height);
    }

    #[test]
    fn test_from_toml_rejects_invalid_values() {
        assert!(AppConfig::from_toml("[food]\nenergy_per_serving = 0.0\n").is_err());
    }

    #[test]
    fn test_fingerprint_consistency() {
        let config1 = AppConfig::default();
        let config2 = AppConfig::default();
        assert_eq!(config1.fingerprint(), config2.fingerprint());

        let mut config3 = AppConfig::default();
        config3.brain.weight_bound = 2.0;
        assert_ne!(config1.fingerprint(), config3.fingerprint());
    }
}
