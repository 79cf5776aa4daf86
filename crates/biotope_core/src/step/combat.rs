use super::feeding::contact_range;
use super::{pair_mut, WorldStep};
use biotope_data::{Creature, WorldObject};
use rand::Rng;

/// Score bonus for a living initiator.
pub const INITIATOR_ADVANTAGE: f64 = 1.25;
/// Share of the loser's maxima at stake in one fight, before size scaling.
pub const PLUNDER_FRACTION: f64 = 1.0 / 8.0;

/// Result of one resolved fight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombatOutcome {
    pub attacker_won: bool,
    pub attacker_score: f64,
    pub defender_score: f64,
    pub defender_died: bool,
}

/// `mass * energy`, boosted for a living initiator; dead creatures score 0.
#[must_use]
pub fn combat_score(creature: &Creature, initiator: bool) -> f64 {
    if creature.is_dead {
        return 0.0;
    }
    let score = creature.mass * creature.energy;
    if initiator {
        score * INITIATOR_ADVANTAGE
    } else {
        score
    }
}

/// `total / own`; 0 when either is zero.
fn effort(total: f64, own: f64) -> f64 {
    if total <= 0.0 || own <= 0.0 {
        0.0
    } else {
        total / own
    }
}

/// Moves resources from `loser` to `winner` and wounds the loser.
fn plunder(winner: &mut Creature, loser: &mut Creature) {
    let size_ratio = if loser.size > 0.0 {
        winner.size / loser.size
    } else {
        1.0
    };
    let cap = |max: f64| max * PLUNDER_FRACTION * size_ratio;

    let energy = loser.energy.min(cap(loser.max_energy));
    loser.set_energy(loser.energy - energy);
    winner.set_energy(winner.energy + energy);

    let nutrients = loser.nutrients.min(cap(loser.max_nutrients));
    loser.set_nutrients(loser.nutrients - nutrients);
    winner.set_nutrients(winner.nutrients + nutrients);

    let mass = loser.mass.min(cap(loser.max_mass));
    loser.set_mass(loser.mass - mass);
    winner.set_mass(winner.mass + mass);

    loser.set_health(loser.health - cap(loser.max_health));
}

/// Fights `defender` on behalf of `attacker`.
///
/// The attacker wins with probability `attacker_score / total_score`. Both
/// sides then pay their fight cost scaled by `total_score / own_score`.
pub fn resolve_combat<R: Rng>(
    attacker: &mut Creature,
    defender: &mut Creature,
    rng: &mut R,
) -> CombatOutcome {
    let attacker_score = combat_score(attacker, true);
    let defender_score = combat_score(defender, false);
    let total = attacker_score + defender_score;
    let chance = if total > 0.0 {
        attacker_score / total
    } else {
        0.0
    };
    let attacker_won = rng.gen::<f64>() < chance;

    if attacker_won {
        plunder(attacker, defender);
        attacker.counters.successful_attacks += 1;
    } else {
        plunder(defender, attacker);
        defender.counters.attacks_evaded += 1;
    }

    attacker.set_energy(attacker.energy - attacker.attack_cost * effort(total, attacker_score));
    defender.set_energy(defender.energy - defender.defend_cost * effort(total, defender_score));

    let defender_died = !defender.is_dead && defender.should_be_dead();
    if defender_died {
        defender.die();
    }

    CombatOutcome {
        attacker_won,
        attacker_score,
        defender_score,
        defender_died,
    }
}

impl WorldStep {
    /// Attacks the nearest visible creature when it is in contact.
    ///
    /// Every call counts as an attempt; only a fight in contact range counts
    /// as initiated. A lunge at a visible target out of reach still costs
    /// `attack_cost`. The attacker's own death check runs in `execute_actions`.
    pub fn try_attack<R: Rng>(&mut self, idx: usize, rng: &mut R) -> Option<CombatOutcome> {
        self.creatures[idx].counters.attempted_attacks += 1;

        let target = self
            .cache
            .visible_creatures
            .get(idx)
            .and_then(|seen| seen.first())
            .map(|s| s.index)?;
        let (attacker, defender) = pair_mut(&mut self.creatures, idx, target)?;

        let (ax, ay) = attacker.mid_point();
        let (dx, dy) = defender.mid_point();
        if (dx - ax).hypot(dy - ay) > contact_range(attacker.size, defender.size) {
            attacker.set_energy(attacker.energy - attacker.attack_cost);
            return None;
        }

        attacker.counters.initiated_attacks += 1;
        Some(resolve_combat(attacker, defender, rng))
    }
}
