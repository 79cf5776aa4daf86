use biotope_data::{CreatureInput, NodeId};
use thiserror::Error;

/// Failures raised by network evaluation and topology generation.
///
/// These are invariant violations: the step that hits one stops and reports it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BrainError {
    #[error("connection references missing node {0}")]
    MissingNode(NodeId),
    #[error("no value supplied for input {0:?}")]
    MissingInput(CreatureInput),
    #[error("input node {0} carries no input tag")]
    UntaggedInput(NodeId),
    #[error("network has no node that can be a connection source")]
    NoSourceCandidates,
    #[error("network has no node that can be a connection target")]
    NoTargetCandidates,
    #[error("invalid connection count range {min}..={max}")]
    InvalidConnectionRange { min: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, BrainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BrainError::MissingInput(CreatureInput::EnergyRatio);
        assert_eq!(err.to_string(), "no value supplied for input EnergyRatio");

        let err = BrainError::InvalidConnectionRange { min: 5, max: 2 };
        assert_eq!(err.to_string(), "invalid connection count range 5..=2");
    }
}
