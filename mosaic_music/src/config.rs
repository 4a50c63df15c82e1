// Generator configuration, loaded from JSON.
//
// A config names an `algorithm` and carries one set of parameters per
// musical stream (pitch, velocity, rhythm). The two algorithms read the
// `values` key differently: the algebraic path wants an index → value map,
// the Markov path an ordered list of states whose first entry is the
// starting state. Loading therefore happens in two passes: the shared header
// first, then the algorithm-specific body.
//
// Example (algebraic):
//   {"algorithm": "algebraic", "steps": 4,
//    "dimensions": {"pitch": [2, 2], "velocity": [1, 1], "rhythm": [1, 1]},
//    "values": {"pitch": {"0": "C4", "1": "E4", "2": 67, "3": "C5"},
//               "velocity": {"0": 64}, "rhythm": {"0": 200}}}

use crate::error::MosaicError;
use crate::grid::{Dimensions, Values};
use crate::markov::{State, Transition};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Algebraic,
    Markov,
}

/// One entry per musical stream. Only `pitch` is required; a missing
/// `velocity` or `rhythm` entry is empty.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PerParameter<T> {
    pub pitch: T,
    #[serde(default)]
    pub velocity: T,
    #[serde(default)]
    pub rhythm: T,
}

impl<T> PerParameter<T> {
    pub fn uniform(value: T) -> Self
    where
        T: Clone,
    {
        PerParameter {
            pitch: value.clone(),
            velocity: value.clone(),
            rhythm: value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AlgebraicConfig {
    /// Grid shape per stream, as `[width, height]`.
    pub dimensions: PerParameter<Dimensions>,
    /// Index overlays. Only `pitch` feeds the emitted notes.
    pub values: PerParameter<Values>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MarkovConfig {
    /// State space per stream; the first state is where the chain starts.
    pub values: PerParameter<Vec<State>>,
    pub transitions: PerParameter<Transition>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Model {
    Algebraic(AlgebraicConfig),
    Markov(MarkovConfig),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Iterations the facade runs.
    pub steps: usize,
    /// PRNG seed. `None` lets the caller pick one.
    pub seed: Option<u64>,
    /// Where the MIDI sink writes.
    pub filename: String,
    pub author: String,
    /// General MIDI program selected at the start of the track.
    pub program: u8,
    pub model: Model,
}

/// Keys shared by both algorithms.
#[derive(Deserialize)]
struct Header {
    algorithm: Algorithm,
    #[serde(default = "default_steps")]
    steps: usize,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default = "default_filename")]
    filename: String,
    #[serde(default = "default_author")]
    author: String,
    #[serde(default = "default_program")]
    program: u8,
}

fn default_steps() -> usize {
    10
}

fn default_filename() -> String {
    "unknown.mid".to_string()
}

fn default_author() -> String {
    "unknown".to_string()
}

fn default_program() -> u8 {
    12
}

impl GeneratorConfig {
    /// A config with every optional key at its default.
    pub fn new(model: Model) -> Self {
        GeneratorConfig {
            steps: default_steps(),
            seed: None,
            filename: default_filename(),
            author: default_author(),
            program: default_program(),
            model,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        match self.model {
            Model::Algebraic(_) => Algorithm::Algebraic,
            Model::Markov(_) => Algorithm::Markov,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, MosaicError> {
        let document: Value = serde_json::from_str(json)?;
        let header: Header = serde_json::from_value(document.clone())?;
        let model = match header.algorithm {
            Algorithm::Algebraic => Model::Algebraic(serde_json::from_value(document)?),
            Algorithm::Markov => Model::Markov(serde_json::from_value(document)?),
        };
        Ok(GeneratorConfig {
            steps: header.steps,
            seed: header.seed,
            filename: header.filename,
            author: header.author,
            program: header.program,
            model,
        })
    }

    pub fn load(path: &Path) -> Result<Self, MosaicError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }
}
