//! Dyadic memory: stores an association `x -> y` between two SDRs and
//! recovers `y` given `x`.
//!
//! The backing table has `n*(n-1)/2` rows (one per bit-pair address of
//! the `x` universe) and `n` columns (the `y` universe). `store`
//! increments every cell `(addr(x), j)` for `j` in `y`; `query` sums
//! the rows addressed by `x` and binarizes the result.

use crate::binarize::binarize;
use crate::error::{MemoryError, Result};
use crate::pairing::{num_pairs, pair_addresses};
use crate::sdr::validate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A dyadic (two-point) associative memory over SDRs of universe size `n`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct DyadicMemory {
    n: u32,
    p: usize,
    rows: usize,
    table: Vec<u8>,
}

impl DyadicMemory {
    /// Creates a new dyadic memory for SDRs of universe size `n` and
    /// target recall sparsity `p`.
    ///
    /// Fails with [`MemoryError::Config`] if `n < 2` or `p == 0` or
    /// `p > n`.
    pub fn new(n: u32, p: usize) -> Result<Self> {
        if n < 2 {
            return Err(MemoryError::Config {
                message: format!("n must be at least 2, got {n}"),
            });
        }
        if p == 0 || p as u32 > n {
            return Err(MemoryError::Config {
                message: format!("p must be in [1, {n}], got {p}"),
            });
        }
        let rows = num_pairs(n) as usize;
        Ok(Self {
            n,
            p,
            rows,
            table: vec![0u8; rows * n as usize],
        })
    }

    /// Universe size this memory was constructed with.
    pub fn n(&self) -> u32 {
        self.n
    }

    /// Target recall sparsity this memory was constructed with.
    pub fn p(&self) -> usize {
        self.p
    }

    /// Number of bytes occupied by the backing table.
    pub fn mem_size(&self) -> usize {
        self.table.len()
    }

    /// Stores the association `x -> y`.
    ///
    /// For every pair address `a` produced from `x`, and every `j` in
    /// `y`, increments `table[a][j]`, saturating at `u8::MAX`.
    pub fn store(&mut self, x: &[u32], y: &[u32]) -> Result<()> {
        validate(x, self.n)?;
        validate(y, self.n)?;
        let n = self.n as usize;
        for pair in pair_addresses(x) {
            let row = pair.addr as usize * n;
            for &j in y {
                let cell = &mut self.table[row + j as usize];
                *cell = cell.saturating_add(1);
            }
        }
        Ok(())
    }

    /// Recovers the `y` associated with `x`.
    ///
    /// Sums the rows addressed by `x`'s bit-pairs into an `n`-length
    /// accumulator, then binarizes to a length-`p` SDR (possibly
    /// shorter or longer; see [`crate::binarize`]).
    pub fn query(&self, x: &[u32]) -> Result<Vec<u32>> {
        validate(x, self.n)?;
        let n = self.n as usize;
        let mut sums = vec![0u32; n];
        for pair in pair_addresses(x) {
            let row = pair.addr as usize * n;
            let row_slice = &self.table[row..row + n];
            for (acc, &cell) in sums.iter_mut().zip(row_slice) {
                *acc += cell as u32;
            }
        }
        Ok(binarize(&sums, self.p))
    }

    /// Queries several SDRs at once.
    ///
    /// `query` is read-only, so this fans the batch out across a
    /// rayon thread pool; it is safe to call concurrently with other
    /// queries, but never while a `store` is in flight.
    #[cfg(feature = "parallel")]
    pub fn query_many(&self, xs: &[&[u32]]) -> Vec<Result<Vec<u32>>> {
        use rayon::prelude::*;
        xs.par_iter().map(|x| self.query(x)).collect()
    }
}
