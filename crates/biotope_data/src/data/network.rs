use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Identifier of a node inside one network. Ids are reused after removal.
pub type NodeId = usize;

/// Sensory value a creature can feed into an input node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CreatureInput {
    EnergyRatio,
    HealthRatio,
    AgeRatio,
    NutrientsRatio,
    MassRatio,
    /// Energy relative to the reproduction threshold, capped at 1.
    ReproductionEnergyRatio,
    /// Nutrients relative to the reproduction threshold, capped at 1.
    ReproductionNutrientsRatio,
    PositionXRatio,
    PositionYRatio,
    /// Signed bearing of the closest visible food within the field of view.
    ClosestFoodAngle,
    ClosestFoodProximity,
    /// Signed bearing of the closest visible creature within the field of view.
    ClosestCreatureAngle,
    ClosestCreatureProximity,
    VisibleFoodDensity,
    VisibleCreatureDensity,
    /// Uniform noise in [0, 1).
    Random,
}

impl CreatureInput {
    pub const ALL: [CreatureInput; 16] = [
        CreatureInput::EnergyRatio,
        CreatureInput::HealthRatio,
        CreatureInput::AgeRatio,
        CreatureInput::NutrientsRatio,
        CreatureInput::MassRatio,
        CreatureInput::ReproductionEnergyRatio,
        CreatureInput::ReproductionNutrientsRatio,
        CreatureInput::PositionXRatio,
        CreatureInput::PositionYRatio,
        CreatureInput::ClosestFoodAngle,
        CreatureInput::ClosestFoodProximity,
        CreatureInput::ClosestCreatureAngle,
        CreatureInput::ClosestCreatureProximity,
        CreatureInput::VisibleFoodDensity,
        CreatureInput::VisibleCreatureDensity,
        CreatureInput::Random,
    ];
}

/// Action an output node votes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CreatureAction {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    TryEat,
    TryAttack,
    TryReproduce,
    DoNothing,
}

impl CreatureAction {
    pub const ALL: [CreatureAction; 8] = [
        CreatureAction::MoveForward,
        CreatureAction::MoveBackward,
        CreatureAction::MoveLeft,
        CreatureAction::MoveRight,
        CreatureAction::TryEat,
        CreatureAction::TryAttack,
        CreatureAction::TryReproduce,
        CreatureAction::DoNothing,
    ];
}

/// Role of a node in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    /// Reads one creature input.
    Input,
    /// Internal processing node.
    Process,
    /// Votes for one creature action.
    Output,
}

/// Raised when a node's tags do not match its type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NodeError {
    #[error("input node requires an input tag and no action tag")]
    InvalidInputNode,
    #[error("output node requires an action tag and no input tag")]
    InvalidOutputNode,
    #[error("process node must not carry input or action tags")]
    InvalidProcessNode,
}

/// A node in a creature's neural network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub node_type: NodeType,
    pub bias: f32,
    pub input: Option<CreatureInput>,
    pub action: Option<CreatureAction>,
}

impl Node {
    /// Builds a node, rejecting tag combinations that do not fit `node_type`.
    pub fn new(
        node_type: NodeType,
        bias: f32,
        input: Option<CreatureInput>,
        action: Option<CreatureAction>,
    ) -> Result<Self, NodeError> {
        match node_type {
            NodeType::Input if input.is_none() || action.is_some() => {
                return Err(NodeError::InvalidInputNode)
            }
            NodeType::Output if action.is_none() || input.is_some() => {
                return Err(NodeError::InvalidOutputNode)
            }
            NodeType::Process if input.is_some() || action.is_some() => {
                return Err(NodeError::InvalidProcessNode)
            }
            _ => {}
        }
        Ok(Self {
            node_type,
            bias,
            input,
            action,
        })
    }

    #[must_use]
    pub fn input(tag: CreatureInput) -> Self {
        Self {
            node_type: NodeType::Input,
            bias: 0.0,
            input: Some(tag),
            action: None,
        }
    }

    #[must_use]
    pub fn process(bias: f32) -> Self {
        Self {
            node_type: NodeType::Process,
            bias,
            input: None,
            action: None,
        }
    }

    #[must_use]
    pub fn output(action: CreatureAction, bias: f32) -> Self {
        Self {
            node_type: NodeType::Output,
            bias,
            input: None,
            action: Some(action),
        }
    }

    /// Input and process nodes may feed a connection.
    #[must_use]
    pub fn can_be_source(&self) -> bool {
        !matches!(self.node_type, NodeType::Output)
    }

    /// Process and output nodes may receive a connection.
    #[must_use]
    pub fn can_be_target(&self) -> bool {
        !matches!(self.node_type, NodeType::Input)
    }
}

/// Weighted directed edge. Connections are values; rewiring replaces them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub source: NodeId,
    pub target: NodeId,
    pub weight: f32,
}

/// Directed, possibly cyclic network owned by exactly one creature.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NeuralNetwork {
    /// Nodes keyed by id; iteration order is ascending id.
    pub nodes: BTreeMap<NodeId, Node>,
    pub connections: Vec<Connection>,
}

impl NeuralNetwork {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn process_node_count(&self) -> usize {
        self.nodes
            .values()
            .filter(|n| n.node_type == NodeType::Process)
            .count()
    }

    /// Ids of nodes of the given type, ascending.
    pub fn ids_of_type(&self, node_type: NodeType) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .filter(move |(_, n)| n.node_type == node_type)
            .map(|(&id, _)| id)
    }
}
