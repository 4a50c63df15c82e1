// First-order Markov chain over discrete parameter states.
//
// States are plain integers (a MIDI key, a velocity, a duration in ticks).
// Row i of the transition matrix holds relative weights for moving from
// `states[i]` to each entry of `states`. Rows need not sum to 1; the draw
// is proportional to the weights (see `RandomSource::weighted_index`).
//
// The chain remembers only its current state. It yields exactly
// `iterate_count` successors, or stops early after reporting a bad row.

use crate::error::MosaicError;
use log::trace;
use mosaic_prng::RandomSource;

pub type State = i64;

/// Square weight matrix, one row per state.
pub type Transition = Vec<Vec<f64>>;

pub struct MarkovChain<R> {
    current: State,
    remaining: usize,
    states: Vec<State>,
    transition: Transition,
    rng: R,
}

impl<R: RandomSource> MarkovChain<R> {
    /// Fails with `InvalidStartState` if `start` is not one of `states`.
    /// Row problems surface lazily, on the step that reads the row.
    pub fn new(
        start: State,
        iterate_count: usize,
        states: Vec<State>,
        transition: Transition,
        rng: R,
    ) -> Result<Self, MosaicError> {
        if !states.contains(&start) {
            return Err(MosaicError::InvalidStartState(start));
        }
        Ok(Self {
            current: start,
            remaining: iterate_count,
            states,
            transition,
            rng,
        })
    }

    pub fn current(&self) -> State {
        self.current
    }

    fn step(&mut self) -> Result<State, MosaicError> {
        let index = self
            .states
            .iter()
            .position(|&s| s == self.current)
            .ok_or(MosaicError::InvalidStartState(self.current))?;
        let row = self
            .transition
            .get(index)
            .filter(|row| row.len() == self.states.len());
        let pick = row.and_then(|row| self.rng.weighted_index(row));
        match pick {
            Some(next) => {
                trace!("markov {} -> {}", self.current, self.states[next]);
                self.current = self.states[next];
                Ok(self.current)
            }
            None => Err(MosaicError::InvalidDistribution {
                state: self.current,
                weights: self.transition.get(index).cloned().unwrap_or_default(),
            }),
        }
    }
}

impl<R: RandomSource> Iterator for MarkovChain<R> {
    type Item = Result<State, MosaicError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let result = self.step();
        if result.is_err() {
            self.remaining = 0;
        }
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}
