use super::{ratio_or_one, WorldStep};
use crate::lifecycle::normalize_angle;
use crate::spatial_grid::{cell_size_for, SpatialGrid};
use biotope_data::{Creature, CreatureInput, WorldObject};
use rand::Rng;
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::f64::consts::PI;

/// Another object seen by a creature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sighting {
    /// Arena index of the seen object.
    pub index: usize,
    /// Distance between mid-points.
    pub distance: f64,
}

/// Signed angle in `(-180, 180]`.
#[must_use]
pub fn signed_angle(degrees: f64) -> f64 {
    let a = normalize_angle(degrees);
    if a > 180.0 {
        a - 360.0
    } else {
        a
    }
}

/// Bearing of `target` relative to the creature's heading, scaled by half
/// the field of view into `[-1, 1]`. Clockwise is positive.
#[must_use]
pub fn relative_angle(viewer: &Creature, target: (f64, f64)) -> f64 {
    let half_fov = viewer.field_of_view / 2.0;
    if half_fov <= 0.0 {
        return 0.0;
    }
    let (vx, vy) = viewer.mid_point();
    let bearing = (target.1 - vy).atan2(target.0 - vx).to_degrees();
    (signed_angle(bearing - viewer.forward_angle) / half_fov).clamp(-1.0, 1.0)
}

/// `1 - distance / sight_range`, or 0 when nothing is seen.
fn proximity(viewer: &Creature, sighting: Option<&Sighting>) -> f64 {
    match sighting {
        Some(s) if viewer.sight_range > 0.0 => (1.0 - s.distance / viewer.sight_range).clamp(0.0, 1.0),
        _ => 0.0,
    }
}

/// Visible circle area over the visible sector area, capped at 1; 0 without a sector.
fn density(viewer: &Creature, seen: &[Sighting], areas: &[f64]) -> f64 {
    let sector = viewer.field_of_view / 360.0 * PI * viewer.sight_range * viewer.sight_range;
    if sector <= 0.0 {
        return 0.0;
    }
    let covered: f64 = seen
        .iter()
        .map(|s| areas.get(s.index).copied().unwrap_or(0.0))
        .sum();
    (covered / sector).min(1.0)
}

fn collect_visible(
    grid: &SpatialGrid,
    row: usize,
    col: usize,
    origin: (f64, f64),
    range: f64,
    mids: &[(f64, f64)],
    skip: Option<usize>,
) -> Vec<Sighting> {
    let mut seen = Vec::new();
    if range <= 0.0 {
        return seen;
    }
    grid.for_each_in_neighborhood(row, col, |index| {
        if Some(index) == skip {
            return;
        }
        let (x, y) = mids[index];
        let distance = (x - origin.0).hypot(y - origin.1);
        if distance <= range {
            seen.push(Sighting { index, distance });
        }
    });
    seen.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.index.cmp(&b.index)));
    seen
}

type BandResult = Vec<(usize, Vec<Sighting>, Vec<Sighting>)>;

impl WorldStep {
    /// Rebuilds grids, circle areas and per-creature visibility lists.
    ///
    /// The grid rows are split into bands, one rayon task per band; each task
    /// only reads shared state and the results are scattered afterwards.
    pub fn compute_visibility(&mut self) {
        let bounds = self.bounds();
        let cell_size = cell_size_for(
            self.creatures.iter().map(|c| c.sight_range),
            self.config.world.min_cell_size,
        );

        let creature_mids: Vec<(f64, f64)> =
            self.creatures.iter().map(WorldObject::mid_point).collect();
        let food_mids: Vec<(f64, f64)> = self.food.iter().map(WorldObject::mid_point).collect();

        let mut creature_grid = SpatialGrid::for_bounds(&bounds, cell_size);
        creature_grid.build_parallel(&creature_mids);
        let mut food_grid = SpatialGrid::for_bounds(&bounds, cell_size);
        food_grid.build_parallel(&food_mids);

        let rows = creature_grid.rows;
        let bands = rayon::current_num_threads().clamp(1, rows);
        let rows_per_band = rows.div_ceil(bands);

        let creatures = &self.creatures;
        let band_results: Vec<BandResult> = (0..bands)
            .into_par_iter()
            .map(|band| {
                let mut out = Vec::new();
                let start = band * rows_per_band;
                let end = (start + rows_per_band).min(rows);
                for row in start..end {
                    for col in 0..creature_grid.cols {
                        for &i in creature_grid.cell(row, col) {
                            let viewer = &creatures[i];
                            let origin = creature_mids[i];
                            let range = viewer.sight_range;
                            let seen_creatures = collect_visible(
                                &creature_grid,
                                row,
                                col,
                                origin,
                                range,
                                &creature_mids,
                                Some(i),
                            );
                            let seen_food =
                                collect_visible(&food_grid, row, col, origin, range, &food_mids, None);
                            out.push((i, seen_creatures, seen_food));
                        }
                    }
                }
                out
            })
            .collect();

        let mut visible_creatures = vec![Vec::new(); self.creatures.len()];
        let mut visible_food = vec![Vec::new(); self.creatures.len()];
        for (i, seen_creatures, seen_food) in band_results.into_iter().flatten() {
            visible_creatures[i] = seen_creatures;
            visible_food[i] = seen_food;
        }

        self.cache.creature_areas = self.creatures.par_iter().map(WorldObject::area).collect();
        self.cache.food_areas = self.food.par_iter().map(WorldObject::area).collect();
        self.cache.visible_creatures = visible_creatures;
        self.cache.visible_food = visible_food;
        self.cache.creature_grid = creature_grid;
        self.cache.food_grid = food_grid;
    }

    /// Values for every requested input tag of the creature at `idx`.
    ///
    /// Zero-denominator ratios read 1, densities read 0 and absent targets
    /// read 0, so a steady-state world never errors here.
    pub fn generate_input_values<R: Rng>(
        &self,
        idx: usize,
        tags: &BTreeSet<CreatureInput>,
        rng: &mut R,
    ) -> HashMap<CreatureInput, f32> {
        let c = &self.creatures[idx];
        let bounds = self.bounds();
        let (mx, my) = c.mid_point();
        let empty: &[Sighting] = &[];
        let seen_creatures = self
            .cache
            .visible_creatures
            .get(idx)
            .map_or(empty, Vec::as_slice);
        let seen_food = self.cache.visible_food.get(idx).map_or(empty, Vec::as_slice);

        tags.iter()
            .map(|&tag| {
                let value = match tag {
                    CreatureInput::EnergyRatio => ratio_or_one(c.energy, c.max_energy),
                    CreatureInput::HealthRatio => ratio_or_one(c.health, c.max_health),
                    CreatureInput::AgeRatio => ratio_or_one(c.age as f64, c.max_age as f64),
                    CreatureInput::NutrientsRatio => ratio_or_one(c.nutrients, c.max_nutrients),
                    CreatureInput::MassRatio => ratio_or_one(c.mass, c.max_mass),
                    CreatureInput::ReproductionEnergyRatio => {
                        ratio_or_one(c.energy, c.energy_required_to_reproduce).min(1.0)
                    }
                    CreatureInput::ReproductionNutrientsRatio => {
                        ratio_or_one(c.nutrients, c.nutrients_required_to_reproduce).min(1.0)
                    }
                    CreatureInput::PositionXRatio => {
                        ratio_or_one(mx - bounds.x, bounds.width).clamp(0.0, 1.0)
                    }
                    CreatureInput::PositionYRatio => {
                        ratio_or_one(my - bounds.y, bounds.height).clamp(0.0, 1.0)
                    }
                    CreatureInput::ClosestFoodAngle => seen_food
                        .first()
                        .map_or(0.0, |s| relative_angle(c, self.food[s.index].mid_point())),
                    CreatureInput::ClosestFoodProximity => proximity(c, seen_food.first()),
                    CreatureInput::ClosestCreatureAngle => seen_creatures
                        .first()
                        .map_or(0.0, |s| relative_angle(c, self.creatures[s.index].mid_point())),
                    CreatureInput::ClosestCreatureProximity => {
                        proximity(c, seen_creatures.first())
                    }
                    CreatureInput::VisibleFoodDensity => {
                        density(c, seen_food, &self.cache.food_areas)
                    }
                    CreatureInput::VisibleCreatureDensity => {
                        density(c, seen_creatures, &self.cache.creature_areas)
                    }
                    CreatureInput::Random => rng.gen::<f64>(),
                };
                (tag, value as f32)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::lifecycle::create_creature_with_rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn creature_at(id: u64, x: f64, y: f64, sight: f64) -> Creature {
        let mut rng = ChaCha8Rng::seed_from_u64(id);
        let mut c = create_creature_with_rng(id, x, y, &AppConfig::default(), &mut rng).unwrap();
        c.size = 2.0;
        c.sight_range = sight;
        c.forward_angle = 0.0;
        c.field_of_view = 90.0;
        c
    }

    fn step_with(creatures: Vec<Creature>) -> WorldStep {
        let mut config = AppConfig::default();
        config.world.width = 200.0;
        config.world.height = 200.0;
        WorldStep::with_population(config, creatures, Vec::new())
    }

    #[test]
    fn test_visibility_respects_sight_range_and_sorts_by_distance() {
        let mut step = step_with(vec![
            creature_at(0, 10.0, 10.0, 50.0),
            creature_at(1, 50.0, 10.0, 50.0),
            creature_at(2, 30.0, 10.0, 50.0),
            creature_at(3, 150.0, 150.0, 50.0),
        ]);
        step.compute_visibility();

        let seen: Vec<usize> = step.cache.visible_creatures[0]
            .iter()
            .map(|s| s.index)
            .collect();
        assert_eq!(seen, vec![2, 1]);
        assert!(step.cache.visible_creatures[3].is_empty());
    }

    #[test]
    fn test_zero_sight_range_sees_nothing() {
        let mut step = step_with(vec![
            creature_at(0, 10.0, 10.0, 0.0),
            creature_at(1, 10.0, 10.0, 0.0),
        ]);
        step.compute_visibility();
        assert!(step.cache.visible_creatures[0].is_empty());
        assert_eq!(step.cache.creature_grid.cell_size, step.config.world.min_cell_size);
    }

    #[test]
    fn test_relative_angle_sign_and_clipping() {
        let viewer = creature_at(0, 0.0, 0.0, 100.0);
        let (x, y) = viewer.mid_point();
        // Screen y grows downward: +y is clockwise from +x.
        assert!((relative_angle(&viewer, (x + 10.0, y + 10.0)) - 1.0).abs() < 1e-9);
        assert!((relative_angle(&viewer, (x + 10.0, y - 10.0)) + 1.0).abs() < 1e-9);
        assert!(relative_angle(&viewer, (x + 10.0, y)).abs() < 1e-9);
        assert_eq!(relative_angle(&viewer, (x - 10.0, y + 1.0)), 1.0);
    }

    #[test]
    fn test_inputs_default_without_targets() {
        let mut step = step_with(vec![creature_at(0, 10.0, 10.0, 20.0)]);
        step.compute_visibility();
        let tags: BTreeSet<_> = CreatureInput::ALL.into_iter().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let values = step.generate_input_values(0, &tags, &mut rng);

        assert_eq!(values.len(), CreatureInput::ALL.len());
        assert_eq!(values[&CreatureInput::ClosestFoodAngle], 0.0);
        assert_eq!(values[&CreatureInput::ClosestFoodProximity], 0.0);
        assert_eq!(values[&CreatureInput::VisibleCreatureDensity], 0.0);
        assert!((0.0..1.0).contains(&values[&CreatureInput::Random]));
    }

    #[test]
    fn test_zero_denominator_ratio_reads_one() {
        let mut c = creature_at(0, 10.0, 10.0, 20.0);
        c.max_energy = 0.0;
        c.energy = 0.0;
        let step = step_with(vec![c]);
        let tags: BTreeSet<_> = [CreatureInput::EnergyRatio].into_iter().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let values = step.generate_input_values(0, &tags, &mut rng);
        assert_eq!(values[&CreatureInput::EnergyRatio], 1.0);
    }

    #[test]
    fn test_density_is_capped() {
        let mut crowd = vec![creature_at(0, 10.0, 10.0, 3.0)];
        for id in 1..6 {
            let mut c = creature_at(id, 10.0, 10.0, 3.0);
            c.size = 6.0;
            c.x = 8.0;
            c.y = 8.0;
            crowd.push(c);
        }
        let mut step = step_with(crowd);
        step.compute_visibility();
        let tags: BTreeSet<_> = [CreatureInput::VisibleCreatureDensity].into_iter().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let values = step.generate_input_values(0, &tags, &mut rng);
        assert_eq!(values[&CreatureInput::VisibleCreatureDensity], 1.0);
    }
}
