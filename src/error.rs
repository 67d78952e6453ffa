//! Error types for the SDR memory engines.
//!
//! This module defines all error types surfaced across the dyadic,
//! triadic, value-map, and ID-slot engines. Every variant corresponds
//! to one of the three caller-error kinds the design calls out: shape
//! errors (malformed SDRs), arity errors (wrong operand count), and
//! configuration errors (bad tunables at construction time). Counter
//! saturation, modulo collisions, and short `binarize` results are not
//! represented here — they are not errors, just returned values.

use thiserror::Error;

/// Primary error type for the SDR memory engines.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// An SDR index lies outside `[0, n)`.
    #[error("SDR index {index} out of range for universe size {n}")]
    IndexOutOfRange {
        /// The offending index.
        index: u32,
        /// The universe size the index was checked against.
        n: u32,
    },

    /// An SDR is not strictly ascending.
    #[error("SDR is not sorted: index {position} ({value}) is not greater than the previous element")]
    NotSorted {
        /// Position of the first out-of-order element.
        position: usize,
        /// The offending value.
        value: u32,
    },

    /// An SDR contains a repeated position.
    #[error("SDR contains duplicate index {index} at position {position}")]
    DuplicateIndex {
        /// The repeated value.
        index: u32,
        /// Position at which the duplicate was found.
        position: usize,
    },

    /// `score()` was called on an SDR with fewer than two on-bits.
    #[error("score() requires at least 2 on-bits, got {actual}")]
    InsufficientBits {
        /// Number of on-bits actually present.
        actual: usize,
    },

    /// A triadic query was given a number of absent operands other than one.
    #[error("triadic query requires exactly one absent operand, got {absent}")]
    Arity {
        /// Number of `None` operands passed to the query.
        absent: usize,
    },

    /// An engine was constructed with an invalid or inconsistent tunable.
    #[error("invalid configuration: {message}")]
    Config {
        /// Human-readable description of the inconsistency.
        message: String,
    },

    /// An ID-slot `store` was called with the reserved empty-sentinel ID.
    #[error("id 0 is reserved as the empty sentinel and cannot be stored")]
    ReservedId,
}

/// Result type alias for SDR memory operations.
pub type Result<T> = std::result::Result<T, MemoryError>;
