//! Cross-domain pointer synchronizer.
//!
//! A Gray-coded pointer is registered twice in the destination clock domain before it is decoded. The copy is one to
//! two destination edges stale, which only ever makes full and empty conservative.

use static_assertions::const_assert_eq;

use crate::gray::to_binary;

/// Number of back-to-back synchronizer registers.
pub const SYNC_STAGES: usize = 2;

// Bring-up length is tied to the register depth.
const_assert_eq!(SYNC_STAGES, 2);

/// Chain of synchronizer registers clocked by the destination domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Synchronizer {
    stages: [u64; SYNC_STAGES],
}

impl Synchronizer {
    /// Creates a synchronizer with all registers at their reset value of zero.
    pub fn new() -> Self { Self::default() }

    /// One destination edge: samples `gray` into the first register and shifts the chain.
    pub fn step(&mut self, gray: u64) {
        self.stages.rotate_right(1);
        self.stages[0] = gray;
    }

    /// Gray value at the end of the chain.
    pub fn gray(&self) -> u64 { self.stages[SYNC_STAGES - 1] }

    /// Binary value at the end of the chain.
    pub fn binary(&self, width: u32) -> u64 { to_binary(self.gray(), width) }

    /// Clears all registers.
    pub fn reset(&mut self) { *self = Self::default(); }
}

/// Bring-up counter after one edge of the destination domain.
pub const fn bring_up_next(count: usize) -> usize {
    if count < SYNC_STAGES {
        count + 1
    } else {
        count
    }
}

/// Whether the end of the synchronizer still holds its reset value.
pub const fn bring_up_active(count: usize) -> bool { count < SYNC_STAGES }
