//! Biotope: an artificial-life sandbox of creatures driven by evolving
//! neural networks.
//!
//! The engine lives in the `crates/` workspace members; this package adds
//! the [`model::host::GameHost`] orchestration layer and the headless binary.

pub mod model;

pub use model::host::{
    ChangeKind, CreatureChange, CreatureInfo, GameHost, GatherFlags, GenerationSummary,
    StepResult,
};
