// Mosaic music generator
//
// Algorithmic composition from two sources of controlled randomness: random
// walks over permutation puzzles (rotations and row permutations of an index
// grid) and first-order Markov chains over explicit state lists. Both feed
// note-on/note-off events to a pluggable sink, usually a MIDI file.
//
// Architecture:
// - grid.rs: Index grids (matrices), identity construction, flattening
// - operators.rs: Grid moves (rotate, permute first row) and their registry
// - compose.rs: Right-to-left function composition, symbol strings to moves
// - algebraic.rs: Lazy random walk over the move registry
// - markov.rs: Lazy Markov chain over a state list and transition matrix
// - events.rs: Note events, note names, the `EventSink` trait
// - generator.rs: Facade running three streams (pitch, velocity, rhythm)
// - config.rs: JSON generator configuration
// - midi.rs: `EventSink` that writes a Standard MIDI File
// - analysis.rs: How quickly random move sequences scramble a grid
// - error.rs: `MosaicError`
//
// The generator is deterministic given a seed, supporting reproducible output.

pub mod algebraic;
pub mod analysis;
pub mod compose;
pub mod config;
pub mod error;
pub mod events;
pub mod generator;
pub mod grid;
pub mod markov;
pub mod midi;
pub mod operators;
