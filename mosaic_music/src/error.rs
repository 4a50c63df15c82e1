// Error type shared by every stage of generation.
//
// All variants are fatal for the run that raised them: the facade never
// retries or skips, it hands the error back to its caller through `?`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MosaicError {
    #[error("vector of length {len} cannot fill a {width}x{height} matrix")]
    DimensionMismatch {
        width: usize,
        height: usize,
        len: usize,
    },
    #[error("start state {0} is not in the state list")]
    InvalidStartState(i64),
    #[error("{0} has an empty state list")]
    EmptyStateSpace(&'static str),
    #[error("transition row for state {state} is not a usable distribution: {weights:?}")]
    InvalidDistribution { state: i64, weights: Vec<f64> },
    #[error("index {0} has no entry in the values map")]
    MissingValueMapping(usize),
    #[error("operator symbol '{0}' is not registered")]
    UnknownOperator(char),
    #[error("{0} cannot be represented as a MIDI data byte")]
    InvalidNote(String),
    #[error("malformed configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
