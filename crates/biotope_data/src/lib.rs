//! Plain data model shared by the biotope crates.
//!
//! Everything here is serde-derivable and free of simulation logic beyond
//! the setters that keep a value inside its documented range.

pub mod data;

pub use data::entity::{
    Creature, CreatureCounters, CreatureId, Food, FoodId, StepAction, WorldBounds, WorldObject,
};
pub use data::network::{
    Connection, CreatureAction, CreatureInput, NeuralNetwork, Node, NodeError, NodeId, NodeType,
};
