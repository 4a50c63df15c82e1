// How far do random move sequences scramble a grid?
//
// Useful for picking grid sizes: a puzzle that returns to near-identity
// after a few moves produces repetitive melodies, one that scrambles fast
// sounds random.

use crate::compose::compose_symbols;
use crate::error::MosaicError;
use crate::grid::{Matrix, Vector, to_vector};
use crate::operators::Operations;
use mosaic_prng::RandomSource;

/// Fraction of row-major positions holding the same index in both grids.
/// Two empty grids are identical.
pub fn similarity(initial: &[Vector], later: &[Vector]) -> f64 {
    let before = to_vector(initial);
    let after = to_vector(later);
    if before.is_empty() {
        return 1.0;
    }
    let matching = before.iter().zip(&after).filter(|(a, b)| a == b).count();
    matching as f64 / before.len() as f64
}

/// A uniformly random string of registered move symbols.
pub fn random_sequence<R: RandomSource>(
    operations: &Operations,
    length: usize,
    rng: &mut R,
) -> String {
    (0..length)
        .filter_map(|_| {
            rng.choose_index(operations.len())
                .and_then(|i| operations.keys().nth(i).copied())
        })
        .collect()
}

/// Mean similarity to `initial` after applying `trials` random sequences of
/// `length` moves. `None` when `trials` is zero.
pub fn average_similarity<R: RandomSource>(
    initial: &Matrix,
    operations: &Operations,
    length: usize,
    trials: usize,
    rng: &mut R,
) -> Result<Option<f64>, MosaicError> {
    if trials == 0 {
        return Ok(None);
    }
    let mut total = 0.0;
    for _ in 0..trials {
        let sequence = random_sequence(operations, length, rng);
        let scramble = compose_symbols(operations, &sequence)?;
        let scrambled = scramble(initial.clone());
        total += similarity(initial, &scrambled);
    }
    Ok(Some(total / trials as f64))
}
