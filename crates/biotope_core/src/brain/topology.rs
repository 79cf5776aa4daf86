use crate::config::AppConfig;
use crate::error::{BrainError, Result};
use biotope_data::{
    Connection, CreatureAction, CreatureInput, NeuralNetwork, Node, NodeId, NodeType,
};
use rand::seq::SliceRandom;
use rand::Rng;

/// Uniform draw from `[-bound, bound]`; zero when the bound is not positive.
pub fn symmetric<R: Rng>(rng: &mut R, bound: f32) -> f32 {
    if bound > 0.0 {
        rng.gen_range(-bound..=bound)
    } else {
        0.0
    }
}

pub fn create_network_random_with_rng<R: Rng>(
    config: &AppConfig,
    rng: &mut R,
) -> Result<NeuralNetwork> {
    let bias_bound = config.brain.bias_bound;
    let mut net = NeuralNetwork::new();

    for tag in CreatureInput::ALL {
        add_node(&mut net, Node::input(tag));
    }
    for action in CreatureAction::ALL {
        add_node(&mut net, Node::output(action, symmetric(rng, bias_bound)));
    }
    for _ in 0..config.brain.initial_process_nodes {
        add_node(&mut net, Node::process(symmetric(rng, bias_bound)));
    }

    let connections = generate_random_connections(
        &net,
        config.brain.min_connections,
        config.brain.max_connections,
        config.brain.weight_bound,
        rng,
    )?;
    net.connections.extend(connections);
    Ok(net)
}

/// Lowest id not present in the network.
#[must_use]
pub fn lowest_unused_id(net: &NeuralNetwork) -> NodeId {
    let mut candidate = 0;
    for &id in net.nodes.keys() {
        if id != candidate {
            break;
        }
        candidate += 1;
    }
    candidate
}

pub fn add_node(net: &mut NeuralNetwork, node: Node) -> NodeId {
    let id = lowest_unused_id(net);
    net.nodes.insert(id, node);
    id
}

pub fn remove_node(net: &mut NeuralNetwork, id: NodeId, remove_connections: bool) -> Option<Node> {
    let removed = net.nodes.remove(&id);
    if removed.is_some() && remove_connections {
        net.connections
            .retain(|c| c.source != id && c.target != id);
    }
    removed
}

pub fn source_candidates(net: &NeuralNetwork) -> Vec<NodeId> {
    net.nodes
        .iter()
        .filter(|(_, n)| n.can_be_source())
        .map(|(&id, _)| id)
        .collect()
}

pub fn target_candidates(net: &NeuralNetwork) -> Vec<NodeId> {
    net.nodes
        .iter()
        .filter(|(_, n)| n.can_be_target())
        .map(|(&id, _)| id)
        .collect()
}

pub fn generate_random_connections<R: Rng>(
    net: &NeuralNetwork,
    min: usize,
    max: usize,
    weight_bound: f32,
    rng: &mut R,
) -> Result<Vec<Connection>> {
    if min > max {
        return Err(BrainError::InvalidConnectionRange { min, max });
    }
    let count = rng.gen_range(min..=max);
    if count == 0 {
        return Ok(Vec::new());
    }

    let sources = source_candidates(net);
    if sources.is_empty() {
        return Err(BrainError::NoSourceCandidates);
    }
    let targets = target_candidates(net);
    if targets.is_empty() {
        return Err(BrainError::NoTargetCandidates);
    }

    let mut connections = Vec::with_capacity(count);
    for _ in 0..count {
        let (Some(&source), Some(&target)) = (sources.choose(rng), targets.choose(rng)) else {
            break;
        };
        connections.push(Connection {
            source,
            target,
            weight: symmetric(rng, weight_bound),
        });
    }
    Ok(connections)
}

/// Random node of any type; input and output tags are drawn uniformly.
pub fn random_node<R: Rng>(rng: &mut R, bias_bound: f32) -> Node {
    match rng.gen_range(0..3) {
        0 => {
            let tag = CreatureInput::ALL[rng.gen_range(0..CreatureInput::ALL.len())];
            Node::input(tag)
        }
        1 => Node::process(symmetric(rng, bias_bound)),
        _ => {
            let action = CreatureAction::ALL[rng.gen_range(0..CreatureAction::ALL.len())];
            Node::output(action, symmetric(rng, bias_bound))
        }
    }
}
