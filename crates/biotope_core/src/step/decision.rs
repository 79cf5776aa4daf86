use super::WorldStep;
use crate::brain::NetworkLogic;
use crate::error::Result;
use biotope_data::{CreatureAction, NeuralNetwork, NodeId, NodeType, StepAction};
use rand::Rng;
use std::collections::{BTreeMap, HashMap};

/// A creature's chosen action together with every node value behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub action: StepAction,
    pub node_values: HashMap<NodeId, f32>,
}

/// Picks the action of the strictly highest positive output.
///
/// Output nodes are scanned in ascending id order and the first maximum
/// wins; with no positive output the creature does nothing. When several
/// output nodes share an action, the action reports its largest value.
#[must_use]
pub fn choose_action(
    net: &NeuralNetwork,
    node_values: &HashMap<NodeId, f32>,
) -> (CreatureAction, BTreeMap<CreatureAction, f32>) {
    let mut outputs: BTreeMap<CreatureAction, f32> = BTreeMap::new();
    let mut best = CreatureAction::DoNothing;
    let mut best_value = 0.0f32;

    for id in net.ids_of_type(NodeType::Output) {
        let Some(action) = net.nodes.get(&id).and_then(|n| n.action) else {
            continue;
        };
        let value = node_values.get(&id).copied().unwrap_or(0.0);
        outputs
            .entry(action)
            .and_modify(|v| *v = v.max(value))
            .or_insert(value);
        if value > best_value {
            best_value = value;
            best = action;
        }
    }

    (best, outputs)
}

impl WorldStep {
    /// Senses, evaluates the brain and chooses an action for the creature at `idx`.
    pub fn decide<R: Rng>(&self, idx: usize, rng: &mut R) -> Result<Decision> {
        let creature = &self.creatures[idx];
        let tags = creature.brain.inputs_required()?;
        let inputs = self.generate_input_values(idx, &tags, rng);
        let node_values = creature
            .brain
            .evaluate(&inputs, self.config.brain.cycle_default)?;
        let (action, outputs) = choose_action(&creature.brain, &node_values);
        Ok(Decision {
            action: StepAction {
                creature_id: creature.id,
                action,
                outputs,
            },
            node_values,
        })
    }
}
