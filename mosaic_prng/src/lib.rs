// Seedable randomness for the Mosaic generators.
//
// Two pieces live here:
// - `RandomSource`: the trait every sampler in `mosaic_music` takes. The
//   algebraic generator uses it to pick an operator symbol, the Markov chain
//   uses it for weighted successor draws. Tests can plug in a scripted source
//   to force exact draws.
// - `MosaicRng`: xoshiro256++ (Blackman & Vigna, 2019) seeded through
//   SplitMix64. Hand-rolled so that a seed yields the same stream on every
//   platform and compiler.
//
// **Critical constraint: determinism.** Given the same seed, a generator run
// must emit the same note events. Keep floating-point arithmetic out of the
// word generator itself, and never read entropy from the environment here.

use serde::{Deserialize, Serialize};

/// A source of uniformly distributed 64-bit words, plus the derived sampling
/// helpers built on top of it.
///
/// Only `next_u64` is required. The provided methods define how every other
/// draw is derived from that stream, so two sources yielding the same words
/// make the same choices.
pub trait RandomSource {
    /// Next raw 64-bit word.
    fn next_u64(&mut self) -> u64;

    /// Uniform `f64` in [0, 1) from the upper 53 bits of a word.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `[low, high)`, with rejection sampling to avoid
    /// modulo bias.
    ///
    /// Panics if `low >= high`.
    fn range_u64(&mut self, low: u64, high: u64) -> u64 {
        assert!(low < high, "range_u64: low must be less than high");
        let span = high - low;
        if span.is_power_of_two() {
            return low + (self.next_u64() & (span - 1));
        }
        let threshold = span.wrapping_neg() % span;
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return low + (r % span);
            }
        }
    }

    /// Uniform `usize` in `[low, high)`. Panics if `low >= high`.
    fn range_usize(&mut self, low: usize, high: usize) -> usize {
        self.range_u64(low as u64, high as u64) as usize
    }

    /// Pick a uniformly random index into a collection of length `len`.
    /// Returns `None` for an empty collection.
    fn choose_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.range_usize(0, len))
        }
    }

    /// Cumulative-weight inversion sampling over relative weights.
    ///
    /// Draws `target` uniformly in `[0, total)` and returns the first bucket
    /// whose running sum exceeds it. Zero-weight buckets are never picked.
    /// Returns `None` when the weights cannot form a distribution: empty,
    /// all zero, or containing a negative or non-finite weight.
    fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return None;
        }
        let total: f64 = weights.iter().sum();
        if total <= 0.0 || !total.is_finite() {
            return None;
        }

        let target = self.next_f64() * total;
        let mut cumulative = 0.0;
        for (i, &weight) in weights.iter().enumerate() {
            cumulative += weight;
            if cumulative > target {
                return Some(i);
            }
        }
        // Rounding left `target` at or past the final sum.
        weights.iter().rposition(|&w| w > 0.0)
    }
}

/// Xoshiro256++ generator, the default `RandomSource`.
///
/// Each generator instance in the facade owns its own `MosaicRng`, seeded
/// from a word of the parent source, so parallel parameter streams never
/// share state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MosaicRng {
    s: [u64; 4],
}

impl MosaicRng {
    /// Seed a generator from a single `u64`, expanded with SplitMix64.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        Self {
            s: [
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
            ],
        }
    }
}

impl RandomSource for MosaicRng {
    fn next_u64(&mut self) -> u64 {
        let result = (self.s[0].wrapping_add(self.s[3]))
            .rotate_left(23)
            .wrapping_add(self.s[0]);

        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }
}

/// SplitMix64 step, used only to expand a seed into xoshiro state.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
