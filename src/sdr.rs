//! SDR validation and the deterministic random-SDR generator.
//!
//! An SDR ("sparse distributed representation") is carried across the
//! whole crate as a plain `&[u32]`: a strictly ascending, duplicate-free
//! list of "on" bit positions in `[0, n)`. There is no owned wrapper
//! type on the hot path — engines borrow the slice for the duration of
//! a `store`/`query` call and never retain it.

use crate::error::{MemoryError, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Checks that `sdr` is sorted, duplicate-free, and bounded by `n`.
///
/// This is a real runtime check, not a debug-only assertion: shape
/// errors must be reported before any mutation, in release builds too.
pub fn validate(sdr: &[u32], n: u32) -> Result<()> {
    for &value in sdr {
        if value >= n {
            return Err(MemoryError::IndexOutOfRange { index: value, n });
        }
    }
    validate_sorted_unique(sdr)
}

/// Checks that `sdr` is sorted and duplicate-free, without an upper
/// bound on its values.
///
/// The ID-slot engine has no natural universe size — its constructor
/// takes a memory budget and slot size, not an `N` (see §6's external
/// interface for that engine) — so it validates shape this way instead
/// of through [`validate`].
pub fn validate_sorted_unique(sdr: &[u32]) -> Result<()> {
    let mut prev: Option<u32> = None;
    for (position, &value) in sdr.iter().enumerate() {
        if let Some(p) = prev {
            if value == p {
                return Err(MemoryError::DuplicateIndex {
                    index: value,
                    position,
                });
            }
            if value < p {
                return Err(MemoryError::NotSorted { position, value });
            }
        }
        prev = Some(value);
    }
    Ok(())
}

/// Draws a single random SDR of `p` on-bits out of `n`, sorted ascending.
///
/// Equivalent to `original_source/sdrsdm.py`'s `randomSDR`: shuffle
/// `[0, n)` and keep the first `p` positions, sorted. `rand::seq::index::sample`
/// performs the equivalent partial Fisher-Yates without materializing the
/// full permutation.
pub fn random_sdr<R: rand::Rng + ?Sized>(rng: &mut R, n: u32, p: usize) -> Vec<u32> {
    let mut picked: Vec<u32> = rand::seq::index::sample(rng, n as usize, p)
        .into_iter()
        .map(|i| i as u32)
        .collect();
    picked.sort_unstable();
    picked
}

/// A seeded source of random SDRs, for reproducible tests and benchmarks.
///
/// Mirrors the `random_seed` tunable named in the external-interface
/// contract: the same seed always produces the same sequence of SDRs.
pub struct RandomSdrGenerator {
    rng: ChaCha8Rng,
    n: u32,
    p: usize,
}

impl RandomSdrGenerator {
    /// Creates a generator producing SDRs of `p` on-bits in `[0, n)`.
    pub fn new(n: u32, p: usize, seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            n,
            p,
        }
    }

    /// Draws the next random SDR.
    pub fn next_sdr(&mut self) -> Vec<u32> {
        random_sdr(&mut self.rng, self.n, self.p)
    }
}

impl Iterator for RandomSdrGenerator {
    type Item = Vec<u32>;

    fn next(&mut self) -> Option<Vec<u32>> {
        Some(self.next_sdr())
    }
}
