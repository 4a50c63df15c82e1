// Generator facade: drives three parameter streams and emits note pairs.
//
// Both entry points follow the same shape. One generator is built per
// musical stream (pitch, velocity, rhythm), each with its own `MosaicRng`
// seeded from the caller's source. The three are stepped in lockstep for
// `steps` iterations, and each step becomes note-on/note-off pairs handed to
// the sink.
//
// - Algebraic: every index of the flattened pitch grid becomes one note,
//   looked up in the pitch `Values`. Velocity and duration are fixed; the
//   velocity and rhythm grids advance alongside but are not sounded.
// - Markov: one note per step whose key, velocity and duration are the three
//   sampled states.
//
// Errors abort the run at the point they occur. Events already emitted stay
// with the sink.

use crate::algebraic::AlgebraicSequence;
use crate::config::{AlgebraicConfig, GeneratorConfig, MarkovConfig, Model};
use crate::error::MosaicError;
use crate::events::{EventSink, NoteEvent, NoteValue};
use crate::grid::{element_count, to_vector};
use crate::markov::{MarkovChain, State, Transition};
use crate::operators::operations;
use log::{debug, info};
use mosaic_prng::{MosaicRng, RandomSource};

/// Velocity of every note on the algebraic path.
pub const ALGEBRAIC_VELOCITY: i64 = 64;

/// Duration, in ticks, of every note on the algebraic path.
pub const ALGEBRAIC_DURATION: i64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationSummary {
    /// Iterations completed.
    pub steps: usize,
    /// Events handed to the sink (two per note).
    pub events: usize,
}

pub struct Generators;

impl Generators {
    /// Run whichever algorithm the config names.
    pub fn generate<R, S>(
        config: &GeneratorConfig,
        rng: &mut R,
        sink: &mut S,
    ) -> Result<GenerationSummary, MosaicError>
    where
        R: RandomSource,
        S: EventSink + ?Sized,
    {
        info!(
            "generating {:?}, {} steps (author: {})",
            config.algorithm(),
            config.steps,
            config.author
        );
        let summary = match &config.model {
            Model::Algebraic(body) => Self::algebraic(config.steps, body, rng, sink)?,
            Model::Markov(body) => Self::markov(config.steps, body, rng, sink)?,
        };
        info!(
            "generated {} events over {} steps",
            summary.events, summary.steps
        );
        Ok(summary)
    }

    /// Random walks over three puzzle grids; the pitch grid is sounded.
    pub fn algebraic<R, S>(
        steps: usize,
        config: &AlgebraicConfig,
        rng: &mut R,
        sink: &mut S,
    ) -> Result<GenerationSummary, MosaicError>
    where
        R: RandomSource,
        S: EventSink + ?Sized,
    {
        let ops = operations();
        let dims = &config.dimensions;
        for d in [dims.pitch, dims.velocity, dims.rhythm] {
            element_count(d)?;
        }
        let pitch =
            AlgebraicSequence::new(dims.pitch, ops.clone(), MosaicRng::new(rng.next_u64()));
        let velocity =
            AlgebraicSequence::new(dims.velocity, ops.clone(), MosaicRng::new(rng.next_u64()));
        let rhythm = AlgebraicSequence::new(dims.rhythm, ops, MosaicRng::new(rng.next_u64()));

        let mut summary = GenerationSummary { steps: 0, events: 0 };
        for ((pitch_grid, velocity_grid), rhythm_grid) in pitch.zip(velocity).zip(rhythm).take(steps)
        {
            debug!(
                "step {}: pitch {:?} velocity {:?} rhythm {:?}",
                summary.steps, pitch_grid, velocity_grid, rhythm_grid
            );
            for index in to_vector(&pitch_grid) {
                let note = config
                    .values
                    .pitch
                    .get(&index)
                    .ok_or(MosaicError::MissingValueMapping(index))?;
                summary.events +=
                    emit_pair(sink, note.clone(), ALGEBRAIC_VELOCITY, ALGEBRAIC_DURATION)?;
            }
            summary.steps += 1;
        }
        Ok(summary)
    }

    /// Three Markov chains; each step sounds one note from their states.
    pub fn markov<R, S>(
        steps: usize,
        config: &MarkovConfig,
        rng: &mut R,
        sink: &mut S,
    ) -> Result<GenerationSummary, MosaicError>
    where
        R: RandomSource,
        S: EventSink + ?Sized,
    {
        let values = &config.values;
        let transitions = &config.transitions;
        let pitch = chain("pitch", &values.pitch, &transitions.pitch, steps, rng)?;
        let velocity = chain("velocity", &values.velocity, &transitions.velocity, steps, rng)?;
        let rhythm = chain("rhythm", &values.rhythm, &transitions.rhythm, steps, rng)?;

        let mut summary = GenerationSummary { steps: 0, events: 0 };
        for ((pitch, velocity), rhythm) in pitch.zip(velocity).zip(rhythm) {
            let (pitch, velocity, rhythm) = (pitch?, velocity?, rhythm?);
            debug!(
                "step {}: pitch {pitch} velocity {velocity} rhythm {rhythm}",
                summary.steps
            );
            summary.events += emit_pair(sink, NoteValue::Number(pitch), velocity, rhythm)?;
            summary.steps += 1;
        }
        Ok(summary)
    }
}

/// Build a chain starting at the first state of `states`.
fn chain<R: RandomSource>(
    name: &'static str,
    states: &[State],
    transition: &Transition,
    steps: usize,
    rng: &mut R,
) -> Result<MarkovChain<MosaicRng>, MosaicError> {
    let start = *states
        .first()
        .ok_or(MosaicError::EmptyStateSpace(name))?;
    MarkovChain::new(
        start,
        steps,
        states.to_vec(),
        transition.clone(),
        MosaicRng::new(rng.next_u64()),
    )
}

fn emit_pair<S: EventSink + ?Sized>(
    sink: &mut S,
    note: NoteValue,
    velocity: i64,
    duration: i64,
) -> Result<usize, MosaicError> {
    let pair = NoteEvent::pair(note, velocity, duration);
    let count = pair.len();
    for event in pair {
        sink.emit(event)?;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PerParameter;
    use crate::events::NoteKind;
    use crate::grid::Values;

    fn algebraic_config(dimensions: (usize, usize), values: Values) -> AlgebraicConfig {
        AlgebraicConfig {
            dimensions: PerParameter {
                pitch: dimensions,
                velocity: (1, 1),
                rhythm: (1, 1),
            },
            values: PerParameter {
                pitch: values,
                velocity: Values::new(),
                rhythm: Values::new(),
            },
        }
    }

    fn markov_config() -> MarkovConfig {
        MarkovConfig {
            values: PerParameter {
                pitch: vec![60, 62, 64],
                velocity: vec![40, 90],
                rhythm: vec![120, 240],
            },
            transitions: PerParameter {
                pitch: vec![
                    vec![0.0, 1.0, 0.0],
                    vec![0.0, 0.0, 1.0],
                    vec![1.0, 0.0, 0.0],
                ],
                velocity: vec![vec![0.0, 1.0], vec![1.0, 0.0]],
                rhythm: vec![vec![1.0, 1.0], vec![1.0, 1.0]],
            },
        }
    }

    #[test]
    fn test_single_cell_emits_one_pair() {
        let values: Values = [(0, NoteValue::from("C4"))].into_iter().collect();
        let config = algebraic_config((1, 1), values);
        let mut sink: Vec<NoteEvent> = Vec::new();
        let summary =
            Generators::algebraic(1, &config, &mut MosaicRng::new(0), &mut sink).unwrap();

        assert_eq!(summary, GenerationSummary { steps: 1, events: 2 });
        assert_eq!(sink, NoteEvent::pair(NoteValue::from("C4"), 64, 200).to_vec());
    }

    #[test]
    fn test_every_grid_index_is_sounded_each_step() {
        let values: Values = (0..4).map(|i| (i, NoteValue::Number(60 + i as i64))).collect();
        let config = algebraic_config((2, 2), values);
        let mut sink: Vec<NoteEvent> = Vec::new();
        let summary =
            Generators::algebraic(5, &config, &mut MosaicRng::new(8), &mut sink).unwrap();

        assert_eq!(summary.events, 5 * 4 * 2);
        for step in sink.chunks(8) {
            let mut keys: Vec<NoteValue> = step
                .iter()
                .filter(|e| e.kind == NoteKind::On)
                .map(|e| e.note.clone())
                .collect();
            keys.sort_by_key(|n| n.to_string());
            assert_eq!(keys.len(), 4);
            keys.dedup();
            assert_eq!(keys.len(), 4);
        }
        for pair in sink.chunks(2) {
            assert_eq!(pair[0].kind, NoteKind::On);
            assert_eq!(pair[1].kind, NoteKind::Off);
            assert_eq!(pair[0].note, pair[1].note);
        }
    }

    #[test]
    fn test_missing_value_mapping_aborts() {
        let values: Values = [(0, NoteValue::Number(60))].into_iter().collect();
        let config = algebraic_config((2, 1), values);
        let mut sink: Vec<NoteEvent> = Vec::new();
        let err = Generators::algebraic(3, &config, &mut MosaicRng::new(1), &mut sink)
            .unwrap_err();
        assert!(matches!(err, MosaicError::MissingValueMapping(1)));
    }

    #[test]
    fn test_zero_steps_emits_nothing() {
        let values: Values = [(0, NoteValue::Number(60))].into_iter().collect();
        let mut sink: Vec<NoteEvent> = Vec::new();
        let summary = Generators::algebraic(
            0,
            &algebraic_config((1, 1), values),
            &mut MosaicRng::new(1),
            &mut sink,
        )
        .unwrap();
        assert_eq!(summary.steps, 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_overflowing_dimensions_abort_before_emitting() {
        let values: Values = [(0, NoteValue::Number(60))].into_iter().collect();
        let mut config = algebraic_config((1, 1), values);
        config.dimensions.rhythm = (usize::MAX, 2);
        let mut sink: Vec<NoteEvent> = Vec::new();
        let err = Generators::algebraic(2, &config, &mut MosaicRng::new(1), &mut sink)
            .unwrap_err();
        assert!(matches!(
            err,
            MosaicError::DimensionMismatch { height: 2, .. }
        ));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_markov_passes_states_through() {
        let mut sink: Vec<NoteEvent> = Vec::new();
        let summary =
            Generators::markov(4, &markov_config(), &mut MosaicRng::new(3), &mut sink).unwrap();

        assert_eq!(summary, GenerationSummary { steps: 4, events: 8 });
        let ons: Vec<&NoteEvent> = sink.iter().filter(|e| e.kind == NoteKind::On).collect();
        let pitches: Vec<NoteValue> = ons.iter().map(|e| e.note.clone()).collect();
        assert_eq!(pitches, [62, 64, 60, 62].map(NoteValue::Number).to_vec());
        let velocities: Vec<i64> = ons.iter().map(|e| e.velocity).collect();
        assert_eq!(velocities, vec![90, 40, 90, 40]);
        assert!(ons.iter().all(|e| e.duration == 120 || e.duration == 240));
    }

    #[test]
    fn test_markov_same_seed_same_events() {
        let mut a: Vec<NoteEvent> = Vec::new();
        let mut b: Vec<NoteEvent> = Vec::new();
        Generators::markov(20, &markov_config(), &mut MosaicRng::new(77), &mut a).unwrap();
        Generators::markov(20, &markov_config(), &mut MosaicRng::new(77), &mut b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_markov_empty_states() {
        let mut config = markov_config();
        config.values.rhythm.clear();
        let mut sink: Vec<NoteEvent> = Vec::new();
        let err =
            Generators::markov(2, &config, &mut MosaicRng::new(3), &mut sink).unwrap_err();
        assert!(matches!(err, MosaicError::EmptyStateSpace("rhythm")));
    }

    #[test]
    fn test_markov_bad_row_surfaces_mid_run() {
        let mut config = markov_config();
        config.transitions.pitch[2] = vec![0.0, 0.0, 0.0];
        let mut sink: Vec<NoteEvent> = Vec::new();
        let err =
            Generators::markov(5, &config, &mut MosaicRng::new(3), &mut sink).unwrap_err();
        assert!(matches!(
            err,
            MosaicError::InvalidDistribution { state: 64, .. }
        ));
        // Steps 60->62 and 62->64 were emitted before the dead row.
        assert_eq!(sink.len(), 4);
    }

    #[test]
    fn test_generate_dispatches_on_model() {
        let mut config = GeneratorConfig::new(Model::Markov(markov_config()));
        config.steps = 2;
        let mut sink: Vec<NoteEvent> = Vec::new();
        let summary = Generators::generate(&config, &mut MosaicRng::new(5), &mut sink).unwrap();
        assert_eq!(summary.steps, 2);

        let values: Values = (0..9).map(|i| (i, NoteValue::Number(48 + i as i64))).collect();
        let mut config = GeneratorConfig::new(Model::Algebraic(algebraic_config((3, 3), values)));
        config.steps = 2;
        let mut sink: Vec<NoteEvent> = Vec::new();
        let summary = Generators::generate(&config, &mut MosaicRng::new(5), &mut sink).unwrap();
        assert_eq!(summary.events, 2 * 9 * 2);
    }
}
