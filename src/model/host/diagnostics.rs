//! Per-creature brain snapshots for inspection front ends.

use biotope_data::{
    Connection, Creature, CreatureAction, CreatureId, CreatureInput, NodeId, NodeType,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which creatures [`super::GameHost::next_step`] reports on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatherFlags {
    pub best: bool,
    pub selected: bool,
    pub alive: bool,
    pub dead: bool,
}

impl GatherFlags {
    pub const NONE: Self = Self {
        best: false,
        selected: false,
        alive: false,
        dead: false,
    };

    pub const ALL: Self = Self {
        best: true,
        selected: true,
        alive: true,
        dead: true,
    };

    #[must_use]
    pub fn any(&self) -> bool {
        self.best || self.selected || self.alive || self.dead
    }

    /// Whether a creature in this state should be reported.
    #[must_use]
    pub fn wants(&self, is_best: bool, is_selected: bool, is_dead: bool) -> bool {
        (self.best && is_best)
            || (self.selected && is_selected)
            || (self.alive && !is_dead)
            || (self.dead && is_dead)
    }
}

/// One node with its last output and every connection touching it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub id: NodeId,
    pub node_type: NodeType,
    pub bias: f32,
    pub input: Option<CreatureInput>,
    pub action: Option<CreatureAction>,
    pub output: Option<f32>,
    pub connections: Vec<Connection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureInfo {
    pub creature_id: CreatureId,
    pub is_best: bool,
    pub is_selected: bool,
    pub is_dead: bool,
    pub age: u64,
    pub energy: f64,
    pub chosen_action: CreatureAction,
    pub nodes: Vec<NodeInfo>,
}

impl CreatureInfo {
    /// Snapshot of `creature` after evaluation produced `node_values`.
    #[must_use]
    pub fn capture(
        creature: &Creature,
        node_values: &HashMap<NodeId, f32>,
        chosen_action: CreatureAction,
        is_best: bool,
        is_selected: bool,
    ) -> Self {
        let brain = &creature.brain;
        let nodes = brain
            .nodes
            .iter()
            .map(|(&id, node)| NodeInfo {
                id,
                node_type: node.node_type,
                bias: node.bias,
                input: node.input,
                action: node.action,
                output: node_values.get(&id).copied(),
                connections: brain
                    .connections
                    .iter()
                    .filter(|c| c.source == id || c.target == id)
                    .copied()
                    .collect(),
            })
            .collect();

        Self {
            creature_id: creature.id,
            is_best,
            is_selected,
            is_dead: creature.is_dead,
            age: creature.age,
            energy: creature.energy,
            chosen_action,
            nodes,
        }
    }
}
