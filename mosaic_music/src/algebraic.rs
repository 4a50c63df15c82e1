// Algebraic sequence: an endless random walk over puzzle states.
//
// The walk starts at the identity grid and, on every pull, applies one
// operator picked uniformly from the registry. It owns its grid and its
// random source, so two sequences over the same dimensions never share
// state. There is no rewind; build a new sequence to start over.

use crate::grid::{Dimensions, Matrix, identity};
use crate::operators::Operations;
use log::trace;
use mosaic_prng::RandomSource;

pub struct AlgebraicSequence<R> {
    state: Matrix,
    operations: Operations,
    rng: R,
}

impl<R: RandomSource> AlgebraicSequence<R> {
    pub fn new(dimensions: Dimensions, operations: Operations, rng: R) -> Self {
        Self {
            state: identity(dimensions),
            operations,
            rng,
        }
    }

    /// The most recently yielded grid (the identity before the first pull).
    pub fn state(&self) -> &Matrix {
        &self.state
    }
}

impl<R: RandomSource> Iterator for AlgebraicSequence<R> {
    type Item = Matrix;

    /// Always `Some`. With an empty registry the grid never changes.
    fn next(&mut self) -> Option<Matrix> {
        let pick = self.rng.choose_index(self.operations.len());
        if let Some((symbol, op)) = pick.and_then(|i| self.operations.iter().nth(i)) {
            trace!("algebraic move '{symbol}'");
            self.state = op(&self.state);
        }
        Some(self.state.clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}
