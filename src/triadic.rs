//! Triadic memory: stores a triple `(x, y, z)` of SDRs and recovers any
//! one operand given the other two.
//!
//! The backing cube has `n^3` cells. `store` increments `cube[i,j,k]`
//! for every `(i,j,k)` in the Cartesian product `x * y * z` — the
//! per-element expansion that the design notes single out as the
//! canonical semantics, as opposed to the single-corner variants seen
//! in some of the source's experimental branches.

use crate::binarize::binarize;
use crate::error::{MemoryError, Result};
use crate::sdr::validate;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A triadic (three-point) associative memory over SDRs of universe size `n`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct TriadicMemory {
    n: u32,
    p: usize,
    allow_implicit_store: bool,
    cube: Vec<u8>,
}

impl TriadicMemory {
    /// Creates a new triadic memory for SDRs of universe size `n` and
    /// target recall sparsity `p`.
    ///
    /// The backing cube is `O(n^3)` bytes, so `n` should typically stay
    /// at or below 1000. Fails with [`MemoryError::Config`] if `n < 2`
    /// or `p == 0` or `p > n`.
    pub fn new(n: u32, p: usize) -> Result<Self> {
        Self::with_options(n, p, false)
    }

    /// Like [`TriadicMemory::new`], additionally choosing whether
    /// `query` with all three operands present is treated as an
    /// implicit `store` (see [`TriadicMemory::query_or_store`]) or
    /// rejected as an arity error.
    pub fn with_options(n: u32, p: usize, allow_implicit_store: bool) -> Result<Self> {
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
        let cells = (n as usize)
            .checked_pow(3)
            .ok_or_else(|| MemoryError::Config {
                message: format!("n={n} is too large: n^3 overflows usize"),
            })?;
        Ok(Self {
            n,
            p,
            allow_implicit_store,
            cube: vec![0u8; cells],
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

    /// Number of bytes occupied by the backing cube.
    pub fn mem_size(&self) -> usize {
        self.cube.len()
    }

    #[inline]
    fn index(&self, i: u32, j: u32, k: u32) -> usize {
        let n = self.n as usize;
        i as usize * n * n + j as usize * n + k as usize
    }

    /// Stores the triple `(x, y, z)`.
    ///
    /// For every `(i, j, k)` in `x * y * z`, increments `cube[i,j,k]`,
    /// saturating at `u8::MAX`.
    pub fn store(&mut self, x: &[u32], y: &[u32], z: &[u32]) -> Result<()> {
        validate(x, self.n)?;
        validate(y, self.n)?;
        validate(z, self.n)?;
        for &i in x {
            for &j in y {
                for &k in z {
                    let idx = self.index(i, j, k);
                    let cell = &mut self.cube[idx];
                    *cell = cell.saturating_add(1);
                }
            }
        }
        Ok(())
    }

    /// Recovers `z` given `x` and `y`.
    pub fn query_z(&self, x: &[u32], y: &[u32]) -> Result<Vec<u32>> {
        validate(x, self.n)?;
        validate(y, self.n)?;
        let n = self.n as usize;
        let mut sums = vec![0u32; n];
        for &i in x {
            for &j in y {
                let base = i as usize * n * n + j as usize * n;
                let row = &self.cube[base..base + n];
                for (acc, &cell) in sums.iter_mut().zip(row) {
                    *acc += cell as u32;
                }
            }
        }
        Ok(binarize(&sums, self.p))
    }

    /// Recovers `y` given `x` and `z`.
    pub fn query_y(&self, x: &[u32], z: &[u32]) -> Result<Vec<u32>> {
        validate(x, self.n)?;
        validate(z, self.n)?;
        let n = self.n as usize;
        let mut sums = vec![0u32; n];
        for &i in x {
            let i_base = i as usize * n * n;
            for &k in z {
                for j in 0..n {
                    sums[j] += self.cube[i_base + j * n + k as usize] as u32;
                }
            }
        }
        Ok(binarize(&sums, self.p))
    }

    /// Recovers `x` given `y` and `z`.
    pub fn query_x(&self, y: &[u32], z: &[u32]) -> Result<Vec<u32>> {
        validate(y, self.n)?;
        validate(z, self.n)?;
        let n = self.n as usize;
        let mut sums = vec![0u32; n];
        for &j in y {
            for &k in z {
                for i in 0..n {
                    sums[i] += self.cube[i * n * n + j as usize * n + k as usize] as u32;
                }
            }
        }
        Ok(binarize(&sums, self.p))
    }

    /// Queries for the single absent operand.
    ///
    /// Exactly one of `x`, `y`, `z` must be `None`; any other
    /// combination is a caller error ([`MemoryError::Arity`]).
    pub fn query(&self, x: Option<&[u32]>, y: Option<&[u32]>, z: Option<&[u32]>) -> Result<Vec<u32>> {
        match (x, y, z) {
            (None, Some(y), Some(z)) => self.query_x(y, z),
            (Some(x), None, Some(z)) => self.query_y(x, z),
            (Some(x), Some(y), None) => self.query_z(x, y),
            _ => {
                let absent = [x.is_none(), y.is_none(), z.is_none()]
                    .iter()
                    .filter(|b| **b)
                    .count();
                Err(MemoryError::Arity { absent })
            }
        }
    }

    /// Queries for the absent operand, or — if all three are present
    /// and this memory was constructed with `allow_implicit_store` —
    /// stores the triple instead and returns `Ok(None)`.
    ///
    /// This is the convenience described alongside the triadic query
    /// contract; it is opt-in because it needs `&mut self` even though
    /// ordinary queries do not.
    pub fn query_or_store(
        &mut self,
        x: Option<&[u32]>,
        y: Option<&[u32]>,
        z: Option<&[u32]>,
    ) -> Result<Option<Vec<u32>>> {
        match (x, y, z) {
            (Some(x), Some(y), Some(z)) if self.allow_implicit_store => {
                self.store(x, y, z)?;
                Ok(None)
            }
            _ => self.query(x, y, z).map(Some),
        }
    }

    /// Queries several triples at once, each with one absent operand.
    ///
    /// Read-only, so safe to run concurrently with other queries, but
    /// never while a `store` is in flight.
    #[cfg(feature = "parallel")]
    pub fn query_many(
        &self,
        queries: &[(Option<&[u32]>, Option<&[u32]>, Option<&[u32]>)],
    ) -> Vec<Result<Vec<u32>>> {
        use rayon::prelude::*;
        queries
            .par_iter()
            .map(|&(x, y, z)| self.query(x, y, z))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdr::RandomSdrGenerator;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_rejects_bad_tunables() {
        assert!(matches!(TriadicMemory::new(1, 1), Err(MemoryError::Config { .. })));
        assert!(matches!(TriadicMemory::new(10, 0), Err(MemoryError::Config { .. })));
        assert!(matches!(TriadicMemory::new(10, 11), Err(MemoryError::Config { .. })));
    }

    #[test]
    fn test_query_rejects_wrong_arity() {
        let mem = TriadicMemory::new(20, 3).unwrap();
        let x = [0u32, 1, 2];
        // all three present
        let err = mem.query(Some(&x), Some(&x), Some(&x));
        assert!(matches!(err, Err(MemoryError::Arity { absent: 0 })));
        // all three absent
        let err = mem.query(None, None, None);
        assert!(matches!(err, Err(MemoryError::Arity { absent: 3 })));
    }

    /// S2: N=1000 semantics verified at a cheaper N so it runs by default.
    #[test]
    fn test_s2_shaped_symmetric_recall_small_n() {
        let n = 120u32;
        let p = 10usize;
        let mut mem = TriadicMemory::new(n, p).unwrap();
        let x: Vec<u32> = (0..10).collect();
        let y: Vec<u32> = (20..30).collect();
        let z: Vec<u32> = (40..50).collect();
        mem.store(&x, &y, &z).unwrap();

        assert_eq!(mem.query(None, Some(&y), Some(&z)).unwrap(), x);
        assert_eq!(mem.query(Some(&x), None, Some(&z)).unwrap(), y);
        assert_eq!(mem.query(Some(&x), Some(&y), None).unwrap(), z);
    }

    /// S2 literal scale (N=1000) — allocates a ~1GB cube.
    #[test]
    #[ignore = "allocates a ~1GB cube at N=1000"]
    fn test_s2_literal_scale() {
        let mut mem = TriadicMemory::new(1000, 10).unwrap();
        let x: Vec<u32> = (0..10).collect();
        let y: Vec<u32> = (100..110).collect();
        let z: Vec<u32> = (200..210).collect();
        mem.store(&x, &y, &z).unwrap();

        assert_eq!(mem.query(None, Some(&y), Some(&z)).unwrap(), x);
        assert_eq!(mem.query(Some(&x), None, Some(&z)).unwrap(), y);
        assert_eq!(mem.query(Some(&x), Some(&y), None).unwrap(), z);
    }

    #[test]
    fn test_query_or_store_implicit_store_when_enabled() {
        let mut mem = TriadicMemory::with_options(50, 5, true).unwrap();
        let x: Vec<u32> = (0..5).collect();
        let y: Vec<u32> = (10..15).collect();
        let z: Vec<u32> = (20..25).collect();

        let result = mem.query_or_store(Some(&x), Some(&y), Some(&z)).unwrap();
        assert!(result.is_none());
        assert_eq!(mem.query(None, Some(&y), Some(&z)).unwrap(), x);
    }

    #[test]
    fn test_query_or_store_rejects_all_present_when_disabled() {
        let mut mem = TriadicMemory::new(50, 5).unwrap();
        let x: Vec<u32> = (0..5).collect();
        let err = mem.query_or_store(Some(&x), Some(&x), Some(&x));
        assert!(matches!(err, Err(MemoryError::Arity { absent: 0 })));
    }

    /// Property 3 at a moderate scale: overlap with the stored operand
    /// stays high across many random triples.
    #[test]
    fn test_property_symmetric_recall_overlap_at_moderate_scale() {
        let n = 150u32;
        let p = 8usize;
        let mut mem = TriadicMemory::new(n, p).unwrap();
        let mut gen = RandomSdrGenerator::new(n, p, 11);

        let triples: Vec<(Vec<u32>, Vec<u32>, Vec<u32>)> = (0..40)
            .map(|_| (gen.next_sdr(), gen.next_sdr(), gen.next_sdr()))
            .collect();
        for (x, y, z) in &triples {
            mem.store(x, y, z).unwrap();
        }

        let mut total_overlap_ok = 0usize;
        for (x, y, z) in &triples {
            let recalled_x = mem.query(None, Some(y), Some(z)).unwrap();
            let overlap = recalled_x.iter().filter(|v| x.contains(v)).count();
            if overlap as i64 >= p as i64 - 1 {
                total_overlap_ok += 1;
            }
        }
        let rate = total_overlap_ok as f64 / triples.len() as f64;
        assert!(rate >= 0.5, "overlap rate {rate} too low");
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_query_many_matches_sequential() {
        let n = 80u32;
        let p = 4usize;
        let mut mem = TriadicMemory::new(n, p).unwrap();
        let x: Vec<u32> = (0..4).collect();
        let y: Vec<u32> = (10..14).collect();
        let z: Vec<u32> = (20..24).collect();
        mem.store(&x, &y, &z).unwrap();

        let queries: Vec<(Option<&[u32]>, Option<&[u32]>, Option<&[u32]>)> = vec![
            (None, Some(&y), Some(&z)),
            (Some(&x), None, Some(&z)),
            (Some(&x), Some(&y), None),
        ];
        let batch = mem.query_many(&queries);
        assert_eq!(batch[0].as_ref().unwrap(), &x);
        assert_eq!(batch[1].as_ref().unwrap(), &y);
        assert_eq!(batch[2].as_ref().unwrap(), &z);
    }
}
