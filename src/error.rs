//! Error types shared by the grammar, turtle and mutation modules

use thiserror::Error;

use crate::mutation::MutationKind;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlantError {
    #[error("branch pop with empty stack at symbol {index}")]
    UnbalancedPop { index: usize },
    #[error("mutation '{kind}' applied without its precondition")]
    Precondition { kind: MutationKind },
    #[error("no closing bracket for '[' at {index}")]
    UnmatchedBracket { index: usize },
    #[error("no occurrence of any of {characters:?}")]
    EmptyCandidateSet { characters: String },
    #[error("degenerate weights: {0}")]
    DegenerateWeights(String),
    #[error("length {0} outside [0, 3)")]
    LengthOutOfRange(f64),
    #[error("no production for '{0}'")]
    MissingRule(char),
    #[error("unknown preset: {0}")]
    UnknownPreset(String),
}

pub type Result<T> = std::result::Result<T, PlantError>;
