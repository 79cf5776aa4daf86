use crate::brain::NetworkLogic;
use crate::config::{AppConfig, CreatureConfig, FoodConfig};
use crate::error::Result;
use biotope_data::{
    Creature, CreatureCounters, CreatureId, Food, FoodId, NeuralNetwork, WorldBounds,
};
use rand::Rng;

fn sample<R: Rng>(rng: &mut R, min: f64, max: f64) -> f64 {
    if max > min {
        rng.gen_range(min..=max)
    } else {
        min
    }
}

/// Normalizes degrees into `[0, 360)`.
#[must_use]
pub fn normalize_angle(degrees: f64) -> f64 {
    let a = degrees.rem_euclid(360.0);
    if a >= 360.0 {
        0.0
    } else {
        a
    }
}

/// Recomputes every stat derived from `creature.size`.
pub fn apply_size_traits(creature: &mut Creature, config: &CreatureConfig) {
    let s = creature.size.max(f64::EPSILON);
    creature.max_energy = s * config.energy_per_size;
    creature.max_nutrients = s * config.nutrients_per_size;
    creature.max_health = s * config.health_per_size;
    creature.max_mass = s * config.mass_per_size;
    creature.speed = config.speed_factor / s.sqrt();
    creature.move_cost = s * config.move_cost_per_size;
    creature.attack_cost = s * config.attack_cost_per_size;
    creature.defend_cost = s * config.defend_cost_per_size;
    creature.metabolism_rate = config.metabolism_rate;
    creature.energy_per_eat = s * config.energy_per_eat_per_size;
    creature.nutrients_per_eat = s * config.nutrients_per_eat_per_size;
    creature.energy_required_to_reproduce = creature.max_energy * config.reproduction_energy_fraction;
    creature.nutrients_required_to_reproduce =
        creature.max_nutrients * config.reproduction_nutrients_fraction;
    creature.mass_required_to_reproduce = creature.max_mass * config.reproduction_mass_fraction;

    // Re-clamp resources against the new maxima.
    creature.set_energy(creature.energy);
    creature.set_nutrients(creature.nutrients);
    creature.set_health(creature.health);
    creature.set_mass(creature.mass);
}

/// Creature with randomized traits and a fresh random brain at `(x, y)`.
pub fn create_creature_with_rng<R: Rng>(
    id: CreatureId,
    x: f64,
    y: f64,
    config: &AppConfig,
    rng: &mut R,
) -> Result<Creature> {
    let c = &config.creature;
    let brain = NeuralNetwork::new_random_with_rng(config, rng)?;
    let mut creature = Creature {
        id,
        x,
        y,
        size: sample(rng, c.min_size, c.max_size),
        forward_angle: normalize_angle(rng.gen_range(0.0..360.0)),
        sight_range: sample(rng, c.min_sight_range, c.max_sight_range),
        field_of_view: sample(rng, c.min_field_of_view, c.max_field_of_view),
        energy: 0.0,
        max_energy: 0.0,
        nutrients: 0.0,
        max_nutrients: 0.0,
        health: 0.0,
        max_health: 0.0,
        mass: 0.0,
        max_mass: 0.0,
        age: 0,
        max_age: if c.max_max_age > c.min_max_age {
            rng.gen_range(c.min_max_age..=c.max_max_age)
        } else {
            c.min_max_age
        },
        is_dead: false,
        speed: 0.0,
        move_effort: sample(rng, c.min_move_effort, c.max_move_effort),
        move_cost: 0.0,
        attack_cost: 0.0,
        defend_cost: 0.0,
        metabolism_rate: 0.0,
        energy_per_eat: 0.0,
        nutrients_per_eat: 0.0,
        energy_required_to_reproduce: 0.0,
        nutrients_required_to_reproduce: 0.0,
        mass_required_to_reproduce: 0.0,
        counters: CreatureCounters::default(),
        generation: 0,
        parent_id: None,
        brain,
    };
    apply_size_traits(&mut creature, c);
    creature.set_energy(creature.max_energy * c.starting_energy_fraction);
    creature.set_nutrients(creature.max_nutrients * c.starting_nutrients_fraction);
    creature.set_health(creature.max_health);
    creature.set_mass(creature.max_mass);
    Ok(creature)
}

/// Uniform random top-left position keeping an object of `size` inside `bounds`.
pub fn random_position<R: Rng>(bounds: &WorldBounds, size: f64, rng: &mut R) -> (f64, f64) {
    (
        sample(rng, bounds.x, (bounds.right() - size).max(bounds.x)),
        sample(rng, bounds.y, (bounds.bottom() - size).max(bounds.y)),
    )
}

/// Maps an energy value into the configured food-size range.
#[must_use]
pub fn food_size_for_energy(energy: f64, config: &FoodConfig) -> f64 {
    let span = config.max_energy - config.min_energy;
    let t = if span > 0.0 {
        ((energy - config.min_energy) / span).clamp(0.0, 1.0)
    } else {
        1.0
    };
    config.min_size + t * (config.max_size - config.min_size)
}

pub fn create_food_with_rng<R: Rng>(
    id: FoodId,
    bounds: &WorldBounds,
    config: &FoodConfig,
    rng: &mut R,
) -> Food {
    let energy = sample(rng, config.min_energy, config.max_energy);
    let size = food_size_for_energy(energy, config);
    let (x, y) = random_position(bounds, size, rng);
    Food {
        id,
        x,
        y,
        size,
        energy,
        max_energy: energy,
        nutrients: sample(rng, config.min_nutrients, config.max_nutrients),
        servings: (energy / config.energy_per_serving).ceil() as u32,
        energy_per_serving: config.energy_per_serving,
        serving_digestion_cost: config.serving_digestion_cost,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_created_creature_respects_config_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let config = AppConfig::default();
        let c = &config.creature;
        for id in 0..20 {
            let creature = create_creature_with_rng(id, 0.0, 0.0, &config, &mut rng).unwrap();
            assert!(creature.size >= c.min_size && creature.size <= c.max_size);
            assert!(creature.sight_range >= c.min_sight_range);
            assert!(creature.field_of_view <= c.max_field_of_view);
            assert!(creature.energy <= creature.max_energy);
            assert_eq!(creature.health, creature.max_health);
            assert!((0.0..360.0).contains(&creature.forward_angle));
            assert!(!creature.should_be_dead());
        }
    }

    #[test]
    fn test_bigger_creatures_are_slower_and_costlier() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let config = AppConfig::default();
        let mut small = create_creature_with_rng(0, 0.0, 0.0, &config, &mut rng).unwrap();
        let mut big = small.clone();
        small.size = 4.0;
        big.size = 16.0;
        apply_size_traits(&mut small, &config.creature);
        apply_size_traits(&mut big, &config.creature);

        assert!(big.speed < small.speed);
        assert!(big.move_cost > small.move_cost);
        assert!(big.max_energy > small.max_energy);
        assert!((small.speed - config.creature.speed_factor / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_shrinking_reclamps_resources() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let config = AppConfig::default();
        let mut creature = create_creature_with_rng(0, 0.0, 0.0, &config, &mut rng).unwrap();
        creature.set_health(creature.max_health);
        creature.size /= 2.0;
        apply_size_traits(&mut creature, &config.creature);
        assert!(creature.health <= creature.max_health);
        assert!(creature.mass <= creature.max_mass);
    }

    #[test]
    fn test_food_size_mapping() {
        let config = FoodConfig::default();
        assert_eq!(food_size_for_energy(config.min_energy, &config), config.min_size);
        assert_eq!(food_size_for_energy(config.max_energy, &config), config.max_size);
        assert_eq!(food_size_for_energy(0.0, &config), config.min_size);
    }

    #[test]
    fn test_created_food_stays_inside_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let bounds = WorldBounds::new(10.0, 10.0, 50.0, 50.0);
        let config = FoodConfig::default();
        for id in 0..50 {
            let food = create_food_with_rng(id, &bounds, &config, &mut rng);
            assert!(food.x >= bounds.x && food.x + food.size <= bounds.right());
            assert!(food.y >= bounds.y && food.y + food.size <= bounds.bottom());
            assert!(food.servings >= 1);
        }
    }

    #[test]
    fn test_normalize_angle() {
        assert_eq!(normalize_angle(370.0), 10.0);
        assert_eq!(normalize_angle(-90.0), 270.0);
        assert_eq!(normalize_angle(360.0), 0.0);
    }
}
