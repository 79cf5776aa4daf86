use super::WorldStep;
use crate::error::Result;
use biotope_data::{CreatureAction, CreatureId, StepAction};
use rand::Rng;

/// What happened while executing one tick's actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionReport {
    pub executed: usize,
    pub meals: usize,
    pub fights: usize,
    pub births: Vec<CreatureId>,
    pub deaths: usize,
}

/// Heading offset in degrees for each movement action.
#[must_use]
pub fn movement_offset(action: CreatureAction) -> Option<f64> {
    match action {
        CreatureAction::MoveForward => Some(0.0),
        CreatureAction::MoveRight => Some(90.0),
        CreatureAction::MoveBackward => Some(180.0),
        CreatureAction::MoveLeft => Some(-90.0),
        _ => None,
    }
}

impl WorldStep {
    /// Applies each action to its creature in order.
    ///
    /// Actions for unknown or dead creatures are skipped. Every executed
    /// action is followed by a metabolism charge and a death check.
    /// Offspring are appended to the arena and act from the next tick.
    pub fn execute_actions<R: Rng>(
        &mut self,
        actions: &[StepAction],
        rng: &mut R,
    ) -> Result<ActionReport> {
        let index = self.id_index();
        let mut report = ActionReport::default();

        for step_action in actions {
            let Some(&idx) = index.get(&step_action.creature_id) else {
                tracing::trace!(creature = step_action.creature_id, "Action for unknown creature");
                continue;
            };
            if self.creatures[idx].is_dead {
                continue;
            }
            report.executed += 1;

            match step_action.action {
                CreatureAction::MoveForward
                | CreatureAction::MoveBackward
                | CreatureAction::MoveLeft
                | CreatureAction::MoveRight => {
                    if let Some(offset) = movement_offset(step_action.action) {
                        self.move_creature(idx, offset);
                    }
                }
                CreatureAction::TryEat => {
                    if self.try_eat(idx) {
                        report.meals += 1;
                    }
                }
                CreatureAction::TryAttack => {
                    if let Some(outcome) = self.try_attack(idx, rng) {
                        report.fights += 1;
                        if outcome.defender_died {
                            report.deaths += 1;
                        }
                    }
                }
                CreatureAction::TryReproduce => {
                    let children = self.try_reproduce(idx, rng)?;
                    report.births.extend(children);
                }
                CreatureAction::DoNothing => {}
            }

            let creature = &mut self.creatures[idx];
            creature.set_energy(creature.energy - creature.metabolism());
            if creature.should_be_dead() && !creature.is_dead {
                creature.die();
                report.deaths += 1;
            }
        }

        Ok(report)
    }

    /// Moves along `forward_angle + offset` by `speed * move_effort`, then
    /// charges `move_cost * move_effort`.
    pub fn move_creature(&mut self, idx: usize, offset: f64) {
        let (x, y, size) = {
            let c = &self.creatures[idx];
            let heading = (c.forward_angle + offset).to_radians();
            let distance = c.speed * c.move_effort;
            (
                c.x + heading.cos() * distance,
                c.y + heading.sin() * distance,
                c.size,
            )
        };
        let (x, y) = self.place(x, y, size);
        let c = &mut self.creatures[idx];
        c.x = x;
        c.y = y;
        c.set_energy(c.energy - c.move_cost * c.move_effort);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::lifecycle::create_creature_with_rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::BTreeMap;

    fn action(creature_id: CreatureId, action: CreatureAction) -> StepAction {
        StepAction {
            creature_id,
            action,
            outputs: BTreeMap::new(),
        }
    }

    fn lone_creature_step() -> WorldStep {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let config = AppConfig::default();
        let mut c = create_creature_with_rng(0, 500.0, 500.0, &config, &mut rng).unwrap();
        c.forward_angle = 0.0;
        c.speed = 5.0;
        c.move_effort = 1.0;
        c.move_cost = 1.0;
        c.energy = 100.0;
        c.max_energy = 100.0;
        WorldStep::with_population(config, vec![c], Vec::new())
    }

    #[test]
    fn test_move_directions() {
        for (act, dx, dy) in [
            (CreatureAction::MoveForward, 5.0, 0.0),
            (CreatureAction::MoveBackward, -5.0, 0.0),
            (CreatureAction::MoveRight, 0.0, 5.0),
            (CreatureAction::MoveLeft, 0.0, -5.0),
        ] {
            let mut step = lone_creature_step();
            let mut rng = ChaCha8Rng::seed_from_u64(1);
            step.execute_actions(&[action(0, act)], &mut rng).unwrap();
            let c = &step.creatures[0];
            assert!((c.x - (500.0 + dx)).abs() < 1e-9, "{act:?}");
            assert!((c.y - (500.0 + dy)).abs() < 1e-9, "{act:?}");
        }
    }

    #[test]
    fn test_every_action_charges_metabolism() {
        let mut step = lone_creature_step();
        let metabolism = step.creatures[0].metabolism();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        step.execute_actions(&[action(0, CreatureAction::DoNothing)], &mut rng)
            .unwrap();
        assert!((step.creatures[0].energy - (100.0 - metabolism)).abs() < 1e-9);

        step.execute_actions(&[action(0, CreatureAction::MoveForward)], &mut rng)
            .unwrap();
        assert!((step.creatures[0].energy - (100.0 - 2.0 * metabolism - 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_exhausted_creature_dies_and_is_skipped() {
        let mut step = lone_creature_step();
        step.creatures[0].energy = 0.5;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let report = step
            .execute_actions(
                &[
                    action(0, CreatureAction::MoveForward),
                    action(0, CreatureAction::MoveForward),
                ],
                &mut rng,
            )
            .unwrap();
        assert!(step.creatures[0].is_dead);
        assert_eq!(report.deaths, 1);
        assert_eq!(report.executed, 1);
    }

    #[test]
    fn test_unknown_creature_is_ignored() {
        let mut step = lone_creature_step();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let report = step
            .execute_actions(&[action(99, CreatureAction::MoveForward)], &mut rng)
            .unwrap();
        assert_eq!(report.executed, 0);
        assert_eq!(step.creatures[0].x, 500.0);
    }
}
