use super::topology::add_node;
use crate::error::{BrainError, Result};
use biotope_data::{Connection, NeuralNetwork, NodeId};
use rand::Rng;
use std::collections::HashMap;

/// Number of connections a child of `parents` receives.
///
/// The rounded mean of the parents' connection counts, at least one, or zero
/// when every parent is unconnected.
#[must_use]
pub fn target_connection_count(parents: &[&NeuralNetwork]) -> usize {
    if parents.is_empty() {
        return 0;
    }
    let total: usize = parents.iter().map(|p| p.connections.len()).sum();
    if total == 0 {
        return 0;
    }
    let mean = total as f64 / parents.len() as f64;
    (mean.round() as usize).max(1)
}

/// Builds a child by repeatedly taking an unused connection from a random
/// parent. Parent nodes are copied into the child on first use, so two
/// connections sharing a parent node share the child node too.
pub fn combine_networks<R: Rng>(parents: &[&NeuralNetwork], rng: &mut R) -> Result<NeuralNetwork> {
    let target = target_connection_count(parents);
    let mut pools: Vec<Vec<Connection>> = parents.iter().map(|p| p.connections.clone()).collect();
    let mut mapping: HashMap<(usize, NodeId), NodeId> = HashMap::new();
    let mut child = NeuralNetwork::new();

    while child.connections.len() < target {
        let available: Vec<usize> = (0..pools.len()).filter(|&i| !pools[i].is_empty()).collect();
        if available.is_empty() {
            break;
        }
        let parent = available[rng.gen_range(0..available.len())];
        let pick = rng.gen_range(0..pools[parent].len());
        let conn = pools[parent].swap_remove(pick);

        let source = map_node(&mut child, &mut mapping, parents[parent], parent, conn.source)?;
        let target_id = map_node(&mut child, &mut mapping, parents[parent], parent, conn.target)?;
        child.connections.push(Connection {
            source,
            target: target_id,
            weight: conn.weight,
        });
    }

    Ok(child)
}

fn map_node(
    child: &mut NeuralNetwork,
    mapping: &mut HashMap<(usize, NodeId), NodeId>,
    parent: &NeuralNetwork,
    parent_idx: usize,
    id: NodeId,
) -> Result<NodeId> {
    if let Some(&mapped) = mapping.get(&(parent_idx, id)) {
        return Ok(mapped);
    }
    let node = parent.nodes.get(&id).ok_or(BrainError::MissingNode(id))?;
    let mapped = add_node(child, node.clone());
    mapping.insert((parent_idx, id), mapped);
    Ok(mapped)
}
