use super::relu;
use crate::error::{BrainError, Result};
use biotope_data::{Connection, CreatureInput, NeuralNetwork, NodeId, NodeType};
use std::collections::{HashMap, HashSet};

/// Evaluates every node reachable from the output and input nodes.
///
/// Works on an explicit stack instead of recursion. A node whose source is
/// still being evaluated reads `default_value` for that source, which is how
/// cycles (self-loops included) terminate. Outputs are pushed before inputs,
/// so inputs are resolved first.
pub fn evaluate(
    net: &NeuralNetwork,
    inputs: &HashMap<CreatureInput, f32>,
    default_value: f32,
) -> Result<HashMap<NodeId, f32>> {
    let mut incoming: HashMap<NodeId, Vec<&Connection>> = HashMap::new();
    for conn in &net.connections {
        for id in [conn.source, conn.target] {
            if !net.nodes.contains_key(&id) {
                return Err(BrainError::MissingNode(id));
            }
        }
        incoming.entry(conn.target).or_default().push(conn);
    }

    let mut cache: HashMap<NodeId, f32> = HashMap::with_capacity(net.nodes.len());
    let mut in_progress: HashSet<NodeId> = HashSet::new();
    let mut stack: Vec<NodeId> = net
        .ids_of_type(NodeType::Output)
        .chain(net.ids_of_type(NodeType::Input))
        .collect();

    while let Some(&id) = stack.last() {
        if cache.contains_key(&id) {
            stack.pop();
            continue;
        }
        let node = net.nodes.get(&id).ok_or(BrainError::MissingNode(id))?;

        if node.node_type == NodeType::Input {
            let tag = node.input.ok_or(BrainError::UntaggedInput(id))?;
            let value = *inputs.get(&tag).ok_or(BrainError::MissingInput(tag))?;
            cache.insert(id, value);
            stack.pop();
            continue;
        }

        in_progress.insert(id);
        let mut sum = 0.0;
        let mut pending = None;
        for conn in incoming.get(&id).map(Vec::as_slice).unwrap_or_default() {
            if let Some(value) = cache.get(&conn.source) {
                sum += value * conn.weight;
            } else if in_progress.contains(&conn.source) {
                sum += default_value * conn.weight;
            } else {
                pending = Some(conn.source);
                break;
            }
        }

        match pending {
            Some(source) => stack.push(source),
            None => {
                in_progress.remove(&id);
                cache.insert(id, relu(sum + node.bias));
                stack.pop();
            }
        }
    }

    Ok(cache)
}
