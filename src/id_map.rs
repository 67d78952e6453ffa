//! ID-slot memory: an alternative backing for bit-pair addressing in
//! which each slot holds identifier cells rather than accumulating
//! counts.
//!
//! Where the dyadic engine accumulates evidence for *another SDR*,
//! this engine accumulates evidence for *an external, caller-assigned
//! ID*. Storing `(sdr, id)` writes `id` into a hash-selected cell of
//! every slot addressed by `sdr`'s bit pairs; querying tallies which
//! IDs recur most often across the addressed slots — a heavy-hitters
//! sketch over bit-pair addresses. Unlike the dyadic/triadic engines,
//! this one has no declared universe size `N`: its constructor takes a
//! memory budget and slot size only, matching the external interface
//! in spec.md §6, so SDRs are validated for sortedness/uniqueness but
//! not against an upper bound.

use crate::error::{MemoryError, Result};
use crate::pairing::pair_addresses_mod;
use crate::sdr::validate_sorted_unique;
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An ID-keyed associative memory addressed by SDR bit-pairs.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct IdSlotMemory {
    slot_size: usize,
    num_slots: usize,
    slots: Vec<u32>,
}

impl IdSlotMemory {
    /// Creates an ID-slot memory with roughly `mem_bytes` bytes of
    /// backing storage and `slot_size` identifier cells per addressed
    /// slot.
    ///
    /// The number of slots is derived as `mem_bytes / (slot_size * 4)`
    /// (4 bytes per `u32` ID cell), matching the sizing convention of
    /// `original_source/sdr_id_mem.py`'s `SDR_MEM`.
    pub fn new(mem_bytes: usize, slot_size: usize) -> Result<Self> {
        if slot_size == 0 {
            return Err(MemoryError::Config {
                message: "slot_size must be nonzero".into(),
            });
        }
        let num_slots = mem_bytes / (slot_size * 4);
        if num_slots == 0 {
            return Err(MemoryError::Config {
                message: format!(
                    "mem_bytes={mem_bytes} too small for slot_size={slot_size}: yields 0 slots"
                ),
            });
        }
        Ok(Self {
            slot_size,
            num_slots,
            slots: vec![0u32; num_slots * slot_size],
        })
    }

    /// Number of addressable slots in this memory.
    pub fn num_slots(&self) -> usize {
        self.num_slots
    }

    /// Identifier cells per slot.
    pub fn slot_size(&self) -> usize {
        self.slot_size
    }

    /// Bytes occupied by the backing table.
    pub fn mem_size(&self) -> usize {
        self.slots.len() * 4
    }

    /// Recommended minimum SDR size to adequately spread across this
    /// memory's slot space (`sqrt(2 * num_slots)`, rounded up).
    pub fn min_sdr_size(&self) -> u32 {
        ((self.num_slots as f64 * 2.0).sqrt() + 1.0) as u32
    }

    /// Stores `id` under every slot addressed by `sdr`'s bit pairs.
    ///
    /// `id` must be nonzero: `0` is the reserved empty sentinel.
    /// Within each addressed slot, the cell written is chosen by
    /// `(id * addr) % slot_size`, spreading collisions pseudo-randomly
    /// across the slot.
    pub fn store(&mut self, sdr: &[u32], id: u32) -> Result<()> {
        if id == 0 {
            return Err(MemoryError::ReservedId);
        }
        validate_sorted_unique(sdr)?;
        let slot_size = self.slot_size;
        for addr in pair_addresses_mod(sdr, self.num_slots) {
            let pos = (id as u64 * addr as u64) as usize % slot_size;
            self.slots[addr * slot_size + pos] = id;
        }
        Ok(())
    }

    /// Collects IDs from every slot addressed by `sdr`, tallies
    /// occurrences, and returns those whose count exceeds `threshold`,
    /// ordered by descending count (ties broken by ascending ID for
    /// determinism). The reserved `0` sentinel is filtered out.
    pub fn query(&self, sdr: &[u32], threshold: usize) -> Result<Vec<(u32, u32)>> {
        validate_sorted_unique(sdr)?;
        let slot_size = self.slot_size;
        let mut tally: HashMap<u32, u32> = HashMap::new();
        for addr in pair_addresses_mod(sdr, self.num_slots) {
            let slot = &self.slots[addr * slot_size..addr * slot_size + slot_size];
            for &id in slot {
                if id == 0 {
                    continue;
                }
                *tally.entry(id).or_insert(0) += 1;
            }
        }
        let mut results: Vec<(u32, u32)> = tally
            .into_iter()
            .filter(|&(_, count)| count as usize > threshold)
            .map(|(id, count)| (count, id))
            .collect();
        results.sort_unstable_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        Ok(results)
    }
}
