//! Bit-pair value (correlator) map: accumulates a scalar per bit-pair
//! address of a single SDR and exposes `add`/`query`/`score`/`mean`.
//!
//! Where the dyadic and triadic engines use bit-pairs to index *another*
//! SDR's evidence, this engine correlates an SDR with itself: every
//! on-bit pair within the SDR gets the same scalar added to its cell,
//! so SDRs that recur frequently accumulate large, easily distinguished
//! values at their own bit-pair addresses.

use crate::error::{MemoryError, Result};
use crate::pairing::{num_pairs, pair_addresses};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A bit-pair value/correlator map.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct ValueMap {
    vmap: Vec<i32>,
    /// Running total of value added across all `add` calls — a
    /// value-weighted sum, not a write count (see module docs on
    /// `mean`'s resolved semantics).
    total: i64,
}

impl ValueMap {
    /// Creates a value map sized either from `sdr_size` (the canonical
    /// size, `sdr_size*(sdr_size-1)/2`), from `mem_size` (bytes, divided
    /// by 4 for the `i32` cells), or from whichever of the two yields
    /// the smaller table when both are given.
    ///
    /// At least one of `sdr_size` or `mem_size` must be `Some`.
    pub fn new(sdr_size: Option<u32>, mem_size: Option<usize>) -> Result<Self> {
        let m = match (sdr_size, mem_size) {
            (None, None) => {
                return Err(MemoryError::Config {
                    message: "at least one of sdr_size or mem_size must be specified".into(),
                })
            }
            (Some(n), None) => num_pairs(n) as usize,
            (None, Some(bytes)) => bytes / 4,
            (Some(n), Some(bytes)) => (num_pairs(n) as usize).min(bytes / 4),
        };
        if m == 0 {
            return Err(MemoryError::Config {
                message: "computed value-map size is 0".into(),
            });
        }
        Ok(Self {
            vmap: vec![0i32; m],
            total: 0,
        })
    }

    /// Number of cells in the backing vector.
    pub fn len(&self) -> usize {
        self.vmap.len()
    }

    /// Whether the backing vector has no cells (always false once
    /// constructed via [`ValueMap::new`]; present for API symmetry).
    pub fn is_empty(&self) -> bool {
        self.vmap.is_empty()
    }

    /// Bytes occupied by the backing vector.
    pub fn mem_size(&self) -> usize {
        self.vmap.len() * 4
    }

    /// Adds `value` to the cell of every bit-pair in `sdr`, saturating.
    ///
    /// Returns `(pairs_added, running_total)`: the number of bit pairs
    /// touched by this call, and the cumulative value-weighted total
    /// across every `add` call so far.
    pub fn add(&mut self, sdr: &[u32], value: i32) -> (usize, i64) {
        let m = self.vmap.len();
        let mut pairs_added = 0usize;
        for pair in pair_addresses(sdr) {
            let cell = &mut self.vmap[pair.addr as usize % m];
            *cell = cell.saturating_add(value);
            pairs_added += 1;
        }
        self.total += pairs_added as i64 * value as i64;
        (pairs_added, self.total)
    }

    /// Iterates over `((i, j), value)` for each bit pair in `sdr`,
    /// borrowing the backing vector read-only.
    pub fn query<'a>(&'a self, sdr: &'a [u32]) -> impl Iterator<Item = ((u32, u32), i32)> + 'a {
        let m = self.vmap.len();
        pair_addresses(sdr).map(move |pair| ((pair.i, pair.j), self.vmap[pair.addr as usize % m]))
    }

    /// Mean of the values at `sdr`'s bit-pair addresses.
    ///
    /// Accumulates in 64-bit before dividing. Fails with
    /// [`MemoryError::InsufficientBits`] when `sdr` has fewer than two
    /// on-bits (fewer than one bit pair).
    pub fn score(&self, sdr: &[u32]) -> Result<f64> {
        if sdr.len() < 2 {
            return Err(MemoryError::InsufficientBits { actual: sdr.len() });
        }
        let mut sum = 0i64;
        let mut count = 0i64;
        for (_, value) in self.query(sdr) {
            sum += value as i64;
            count += 1;
        }
        Ok(sum as f64 / count as f64)
    }

    /// The global mean value per cell: `running_total / m`.
    ///
    /// Used by callers as a baseline to detect unusually-scored SDRs
    /// (e.g. comparing `score(sdr)` against `mean()`).
    pub fn mean(&self) -> f64 {
        self.total as f64 / self.vmap.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_requires_at_least_one_size() {
        assert!(matches!(
            ValueMap::new(None, None),
            Err(MemoryError::Config { .. })
        ));
    }

    #[test]
    fn test_new_from_sdr_size() {
        let v = ValueMap::new(Some(200), None).unwrap();
        assert_eq!(v.len(), 200 * 199 / 2);
    }

    #[test]
    fn test_new_from_mem_size() {
        let v = ValueMap::new(None, Some(4000)).unwrap();
        assert_eq!(v.len(), 1000);
    }

    #[test]
    fn test_new_picks_smaller_of_both() {
        // sdr_size canonical = 200*199/2 = 19900, mem_size/4 = 100
        let v = ValueMap::new(Some(200), Some(400)).unwrap();
        assert_eq!(v.len(), 100);
    }

    /// S3: N=200, M=19900. Add a single SDR with value=5.
    #[test]
    fn test_s3_score_and_mean() {
        let mut v = ValueMap::new(Some(200), None).unwrap();
        let s = [0u32, 10, 20, 30, 40, 50, 60];
        let (pairs_added, running_total) = v.add(&s, 5);
        assert_eq!(pairs_added, 21); // 7 choose 2
        assert_eq!(running_total, 105); // 5 * 21

        assert_eq!(v.score(&s).unwrap(), 5.0);
        assert_eq!(v.mean(), 105.0 / 19900.0);
    }

    #[test]
    fn test_score_requires_two_bits() {
        let v = ValueMap::new(Some(50), None).unwrap();
        let err = v.score(&[3]).unwrap_err();
        assert_eq!(err, MemoryError::InsufficientBits { actual: 1 });
    }

    /// Property 5: add(sdr, a); add(sdr, b) observationally equals add(sdr, a+b).
    #[test]
    fn test_linearity_of_repeated_add() {
        let sdr = [1u32, 5, 9, 13];

        let mut split = ValueMap::new(Some(64), None).unwrap();
        split.add(&sdr, 3);
        split.add(&sdr, 4);

        let mut combined = ValueMap::new(Some(64), None).unwrap();
        combined.add(&sdr, 7);

        let split_values: Vec<i32> = split.query(&sdr).map(|(_, v)| v).collect();
        let combined_values: Vec<i32> = combined.query(&sdr).map(|(_, v)| v).collect();
        assert_eq!(split_values, combined_values);
        assert_eq!(split.mean(), combined.mean());
    }

    /// Property 6: add order across distinct SDRs commutes.
    #[test]
    fn test_commute_across_distinct_sdrs() {
        let s1 = [0u32, 4, 8];
        let s2 = [1u32, 5, 9, 13];

        let mut a = ValueMap::new(Some(64), None).unwrap();
        a.add(&s1, 2);
        a.add(&s2, -3);

        let mut b = ValueMap::new(Some(64), None).unwrap();
        b.add(&s2, -3);
        b.add(&s1, 2);

        assert_eq!(
            a.query(&s1).map(|(_, v)| v).collect::<Vec<_>>(),
            b.query(&s1).map(|(_, v)| v).collect::<Vec<_>>()
        );
        assert_eq!(
            a.query(&s2).map(|(_, v)| v).collect::<Vec<_>>(),
            b.query(&s2).map(|(_, v)| v).collect::<Vec<_>>()
        );
        assert_eq!(a.mean(), b.mean());
    }

    #[test]
    fn test_query_is_lazy_and_matches_pair_count() {
        let v = ValueMap::new(Some(64), None).unwrap();
        let sdr = [0u32, 1, 2, 3];
        let items: Vec<_> = v.query(&sdr).collect();
        assert_eq!(items.len(), 6); // 4 choose 2
    }
}
