use super::topology::{
    add_node, generate_random_connections, random_node, remove_node, source_candidates, symmetric,
    target_candidates,
};
use crate::config::AppConfig;
use biotope_data::{Connection, NeuralNetwork, NodeType};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The structural or parametric change a single mutation applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationKind {
    AddNode,
    RemoveNode,
    PerturbBias,
    AddConnection,
    RemoveConnection,
    RewireSource,
    RewireTarget,
    PerturbWeight,
}

impl MutationKind {
    pub const ALL: [MutationKind; 8] = [
        MutationKind::AddNode,
        MutationKind::RemoveNode,
        MutationKind::PerturbBias,
        MutationKind::AddConnection,
        MutationKind::RemoveConnection,
        MutationKind::RewireSource,
        MutationKind::RewireTarget,
        MutationKind::PerturbWeight,
    ];
}

/// Rolls `chance` independently for every [`MutationKind`] and applies each
/// one that hits. Returns the kinds that changed the network.
pub fn mutate<R: Rng>(
    net: &mut NeuralNetwork,
    chance: f32,
    config: &AppConfig,
    rng: &mut R,
) -> Vec<MutationKind> {
    MutationKind::ALL
        .into_iter()
        .filter(|&kind| rng.gen::<f32>() < chance && apply(net, kind, config, rng))
        .collect()
}

/// [`mutate`] at the configured `evolution.mutation_chance`.
pub fn mutate_with_config<R: Rng>(
    net: &mut NeuralNetwork,
    config: &AppConfig,
    rng: &mut R,
) -> Vec<MutationKind> {
    mutate(net, config.evolution.mutation_chance, config, rng)
}

/// Applies `kind`; returns `false` when the network had nothing eligible.
pub fn apply<R: Rng>(
    net: &mut NeuralNetwork,
    kind: MutationKind,
    config: &AppConfig,
    rng: &mut R,
) -> bool {
    let weight_bound = config.brain.weight_bound;
    let bias_bound = config.brain.bias_bound;

    match kind {
        MutationKind::AddNode => {
            let node = random_node(rng, bias_bound);
            if node.node_type == NodeType::Process
                && net.process_node_count() >= config.brain.max_process_nodes
            {
                return false;
            }
            add_node(net, node);
            true
        }
        MutationKind::RemoveNode => {
            let ids: Vec<_> = net.nodes.keys().copied().collect();
            match ids.choose(rng) {
                Some(&id) => remove_node(net, id, true).is_some(),
                None => false,
            }
        }
        MutationKind::PerturbBias => {
            let ids: Vec<_> = net
                .nodes
                .iter()
                .filter(|(_, n)| n.node_type != NodeType::Input)
                .map(|(&id, _)| id)
                .collect();
            let Some(&id) = ids.choose(rng) else {
                return false;
            };
            let delta = symmetric(rng, config.evolution.bias_mutation_amount);
            if let Some(node) = net.nodes.get_mut(&id) {
                node.bias = (node.bias + delta).clamp(-bias_bound, bias_bound);
            }
            true
        }
        MutationKind::AddConnection => {
            match generate_random_connections(net, 1, 1, weight_bound, rng) {
                Ok(conns) if !conns.is_empty() => {
                    net.connections.extend(conns);
                    true
                }
                _ => false,
            }
        }
        MutationKind::RemoveConnection => {
            if net.connections.is_empty() {
                return false;
            }
            let idx = rng.gen_range(0..net.connections.len());
            net.connections.remove(idx);
            true
        }
        MutationKind::RewireSource => {
            let sources = source_candidates(net);
            if net.connections.is_empty() || sources.is_empty() {
                return false;
            }
            let idx = rng.gen_range(0..net.connections.len());
            let old = net.connections[idx];
            let source = sources[rng.gen_range(0..sources.len())];
            net.connections[idx] = Connection { source, ..old };
            true
        }
        MutationKind::RewireTarget => {
            let targets = target_candidates(net);
            if net.connections.is_empty() || targets.is_empty() {
                return false;
            }
            let idx = rng.gen_range(0..net.connections.len());
            let old = net.connections[idx];
            let target = targets[rng.gen_range(0..targets.len())];
            net.connections[idx] = Connection { target, ..old };
            true
        }
        MutationKind::PerturbWeight => {
            if net.connections.is_empty() {
                return false;
            }
            let idx = rng.gen_range(0..net.connections.len());
            let old = net.connections[idx];
            let delta = symmetric(rng, config.evolution.weight_mutation_amount);
            net.connections[idx] = Connection {
                weight: (old.weight + delta).clamp(-weight_bound, weight_bound),
                ..old
            };
            true
        }
    }
}
