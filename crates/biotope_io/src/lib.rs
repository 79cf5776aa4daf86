//! # Biotope IO
//!
//! Persistence layer for the Biotope simulation.
//!
//! This crate provides:
//! - Structured error handling with custom error types
//! - Validated JSON serialization helpers
//! - Saving and loading world steps, tolerating renamed senses and actions

/// Error types and result aliases for I/O operations
pub mod error;
/// Saving and loading world steps
pub mod persistence;
/// Validated serialization helpers for JSON
pub mod serialization;

pub use error::{IoError, Result};
pub use persistence::{load_step, load_step_from_str, save_step};
pub use serialization::{from_json, read_json_file, to_json, to_json_pretty, write_json_file};
