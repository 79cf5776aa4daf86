//! Core data structures for the biotope simulation.

pub mod entity;
pub mod network;
