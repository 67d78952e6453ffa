//! Sparse distributed representation associative memories.
//!
//! An SDR ("sparse distributed representation") is a sorted, duplicate-free
//! list of "on" bit positions in `[0, n)`. This crate provides four
//! memory engines built on a shared bit-pair addressing scheme
//! ([`pairing`]):
//!
//! - [`dyadic`]: stores and recalls an association `x -> y` between two
//!   SDRs.
//! - [`triadic`]: stores and recalls triples `(x, y, z)` given any two
//!   of the three.
//! - [`value_map`]: correlates an SDR with itself, accumulating a
//!   scalar per bit-pair address.
//! - [`id_map`]: an ID-slot variant addressed the same way, but storing
//!   caller-assigned identifiers instead of accumulating counts.
//!
//! All four share [`sdr`]'s validation and random-SDR generation, and
//! the dyadic/triadic engines share [`binarize`]'s top-P selection rule
//! for turning an accumulator row back into an SDR.
//!
//! # Quick start
//!
//! ```
//! use sdr_memory::DyadicMemory;
//!
//! let mut mem = DyadicMemory::new(1000, 10)?;
//! let x: Vec<u32> = (0..10).collect();
//! let y: Vec<u32> = (10..20).collect();
//! mem.store(&x, &y)?;
//! assert_eq!(mem.query(&x)?, y);
//! # Ok::<(), sdr_memory::MemoryError>(())
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::similar_names)]

pub mod binarize;
pub mod dyadic;
pub mod error;
pub mod id_map;
pub mod pairing;
pub mod sdr;
pub mod triadic;
pub mod value_map;

pub use binarize::binarize;
pub use dyadic::DyadicMemory;
pub use error::{MemoryError, Result};
pub use id_map::IdSlotMemory;
pub use pairing::{addr, num_pairs, pair_addresses, pair_addresses_mod, PairAddr, PairAddresses};
pub use sdr::{random_sdr, validate, validate_sorted_unique, RandomSdrGenerator};
pub use triadic::TriadicMemory;
pub use value_map::ValueMap;

/// Version of this crate, as recorded in `Cargo.toml`.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_readme_example_round_trips() {
        let mut mem = DyadicMemory::new(1000, 10).unwrap();
        let x: Vec<u32> = (0..10).collect();
        let y: Vec<u32> = (10..20).collect();
        mem.store(&x, &y).unwrap();
        assert_eq!(mem.query(&x).unwrap(), y);
    }
}
