pub mod crossover;
pub mod evaluate;
pub mod mutation;
pub mod topology;

pub use biotope_data::{Connection, CreatureAction, CreatureInput, NeuralNetwork, Node, NodeId, NodeType};
pub use mutation::MutationKind;

use crate::config::AppConfig;
use crate::error::{BrainError, Result};
use rand::Rng;
use std::collections::{BTreeSet, HashMap};

/// Behavior of a creature's neural network.
pub trait NetworkLogic {
    /// Fresh network with one input per sense, one output per action and
    /// `initial_process_nodes` process nodes, randomly wired.
    fn new_random_with_rng<R: Rng>(config: &AppConfig, rng: &mut R) -> Result<Self>
    where
        Self: Sized;

    /// Inserts `node` under the lowest unused id and returns that id.
    fn add_node(&mut self, node: Node) -> NodeId;

    /// Removes a node. Connections touching it are dropped only when asked.
    fn remove_node(&mut self, id: NodeId, remove_connections: bool) -> Option<Node>;

    /// Draws between `min` and `max` connections from sources (input/process)
    /// to targets (process/output). The network itself is not modified.
    fn generate_random_connections<R: Rng>(
        &self,
        min: usize,
        max: usize,
        weight_bound: f32,
        rng: &mut R,
    ) -> Result<Vec<Connection>>;

    /// Output value of every node reachable from the output and input nodes.
    fn evaluate(
        &self,
        inputs: &HashMap<CreatureInput, f32>,
        default_value: f32,
    ) -> Result<HashMap<NodeId, f32>>;

    /// Distinct input tags read by the network's input nodes.
    ///
    /// An input node without a tag is an invariant violation and fails
    /// with [`BrainError::UntaggedInput`](crate::error::BrainError::UntaggedInput).
    fn inputs_required(&self) -> Result<BTreeSet<CreatureInput>>;

    /// Child network assembled from connections sampled across `parents`.
    fn combine_with_rng<R: Rng>(parents: &[&NeuralNetwork], rng: &mut R) -> Result<Self>
    where
        Self: Sized;

    /// One mutation attempt: every operation rolls `mutation_chance` on its own.
    /// Returns the operations that changed the network.
    fn mutate_with_config<R: Rng>(&mut self, config: &AppConfig, rng: &mut R)
        -> Vec<MutationKind>;
}

impl NetworkLogic for NeuralNetwork {
    fn new_random_with_rng<R: Rng>(config: &AppConfig, rng: &mut R) -> Result<Self> {
        topology::create_network_random_with_rng(config, rng)
    }

    fn add_node(&mut self, node: Node) -> NodeId {
        topology::add_node(self, node)
    }

    fn remove_node(&mut self, id: NodeId, remove_connections: bool) -> Option<Node> {
        topology::remove_node(self, id, remove_connections)
    }

    fn generate_random_connections<R: Rng>(
        &self,
        min: usize,
        max: usize,
        weight_bound: f32,
        rng: &mut R,
    ) -> Result<Vec<Connection>> {
        topology::generate_random_connections(self, min, max, weight_bound, rng)
    }

    fn evaluate(
        &self,
        inputs: &HashMap<CreatureInput, f32>,
        default_value: f32,
    ) -> Result<HashMap<NodeId, f32>> {
        evaluate::evaluate(self, inputs, default_value)
    }

    fn inputs_required(&self) -> Result<BTreeSet<CreatureInput>> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.node_type == NodeType::Input)
            .map(|(&id, node)| node.input.ok_or(BrainError::UntaggedInput(id)))
            .collect()
    }

    fn combine_with_rng<R: Rng>(parents: &[&NeuralNetwork], rng: &mut R) -> Result<Self> {
        crossover::combine_networks(parents, rng)
    }

    fn mutate_with_config<R: Rng>(
        &mut self,
        config: &AppConfig,
        rng: &mut R,
    ) -> Vec<MutationKind> {
        mutation::mutate_with_config(self, config, rng)
    }
}

/// Rectified linear activation used by every process and output node.
#[inline]
#[must_use]
pub fn relu(x: f32) -> f32 {
    x.max(0.0)
}
