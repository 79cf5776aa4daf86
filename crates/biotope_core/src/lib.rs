//! # Biotope Core
//!
//! The simulation engine for Biotope, an artificial-life sandbox where
//! creatures steered by small evolving neural networks eat, fight and
//! reproduce on a bounded plane.
//!
//! This crate contains the deterministic simulation logic, including:
//! - Directed, possibly cyclic neural networks with structural mutation
//! - Creature and food construction from configured trait ranges
//! - Grid partitioning and perception
//! - The per-tick world rules (movement, eating, combat, reproduction)
//! - Metrics collection and structured logging
//!
//! ## Example
//!
//! ```
//! use biotope_core::brain::NetworkLogic;
//! use biotope_core::config::AppConfig;
//! use biotope_data::{CreatureInput, NeuralNetwork};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use std::collections::HashMap;
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let net = NeuralNetwork::new_random_with_rng(&AppConfig::default(), &mut rng).unwrap();
//!
//! let inputs: HashMap<CreatureInput, f32> = net
//!     .inputs_required()
//!     .unwrap()
//!     .into_iter()
//!     .map(|tag| (tag, 0.5))
//!     .collect();
//! let values = net.evaluate(&inputs, 0.0).unwrap();
//! assert!(values.values().all(|v| *v >= 0.0));
//! ```

/// Neural network construction, evaluation, crossover and mutation
pub mod brain;
/// Configuration management for simulation parameters
pub mod config;
/// Errors raised by network operations
pub mod error;
/// Creature and food construction
pub mod lifecycle;
/// Performance metrics collection and logging
pub mod metrics;
/// Uniform grid partitioning for neighbourhood queries
pub mod spatial_grid;
/// World state for one tick and the rules that advance it
pub mod step;

pub use brain::{MutationKind, NetworkLogic};
pub use config::AppConfig;
pub use error::BrainError;
pub use metrics::{init_logging, Metrics};
pub use spatial_grid::SpatialGrid;
pub use step::WorldStep;
