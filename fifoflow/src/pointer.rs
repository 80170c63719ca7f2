//! Pointer arithmetic.
//!
//! A pointer is an index inside a window `[start, end]` plus one wrap bit directly above the index bits. The wrap bit
//! toggles whenever the index jumps from `end` back to `start`, so equal indices with different wrap bits mean full
//! and equal pointers mean empty.
//!
//! Asynchronous queues center the window on `2^(index_bits - 1)`. Gray codes are reflected around that point, so the
//! jump from `end` to `start` with the wrap bit toggled changes exactly one Gray bit, just like an ordinary increment.

use crate::gray::{to_binary, to_gray};
use crate::utils::clog2;
use crate::ConfigError;
use crate::Mode;

/// Window of valid pointer indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerWindow {
    capacity: usize,
    index_bits: u32,
    start: u64,
}

impl PointerWindow {
    /// Window starting at zero, used by synchronous queues.
    pub fn linear(capacity: usize) -> Self { Self { capacity, index_bits: clog2(capacity) as u32, start: 0 } }

    /// Window centered in the index range, used by asynchronous queues.
    pub fn centered(capacity: usize) -> Result<Self, ConfigError> {
        let index_bits = clog2(capacity) as u32;
        let slack = (1usize << index_bits) - capacity;
        if capacity == 0 || slack % 2 != 0 {
            return Err(ConfigError::Window { mode: Mode::Asynchronous, capacity });
        }
        Ok(Self { capacity, index_bits, start: (slack / 2) as u64 })
    }

    /// Window for the given mode.
    pub fn for_mode(mode: Mode, capacity: usize) -> Result<Self, ConfigError> {
        match mode {
            Mode::Synchronous => Ok(Self::linear(capacity)),
            Mode::Asynchronous => Self::centered(capacity),
        }
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize { self.capacity }

    /// Bits of the index part.
    pub fn index_bits(&self) -> u32 { self.index_bits }

    /// Bits of the whole pointer, wrap bit included.
    pub fn width(&self) -> u32 { self.index_bits + 1 }

    /// First index; also the reset value of both pointers.
    pub fn start(&self) -> u64 { self.start }

    /// Last index.
    pub fn end(&self) -> u64 { self.start + self.capacity as u64 - 1 }

    fn wrap_bit(&self) -> u64 { 1 << self.index_bits }

    fn index_mask(&self) -> u64 { self.wrap_bit() - 1 }

    fn is_natural(&self) -> bool { self.capacity.is_power_of_two() }

    /// Index part of a pointer.
    pub fn index(&self, ptr: u64) -> u64 { ptr & self.index_mask() }

    /// Wrap bit of a pointer.
    pub fn wrap(&self, ptr: u64) -> bool { ptr & self.wrap_bit() != 0 }

    /// Storage address of a pointer.
    pub fn address(&self, ptr: u64) -> usize { self.index(ptr).saturating_sub(self.start) as usize }

    /// Pointer after one increment.
    pub fn advance(&self, ptr: u64) -> u64 {
        if self.is_natural() {
            return (ptr + 1) & (self.wrap_bit() | self.index_mask());
        }

        if self.index(ptr) == self.end() {
            ((ptr & self.wrap_bit()) ^ self.wrap_bit()) | self.start
        } else {
            ptr + 1
        }
    }

    /// Number of entries between a write and a read pointer, clamped to `[0, capacity]`.
    pub fn occupancy(&self, wptr: u64, rptr: u64) -> usize {
        let w = self.index(wptr) as i64;
        let r = self.index(rptr) as i64;
        let capacity = self.capacity as i64;
        let occupancy = if self.wrap(wptr) == self.wrap(rptr) { w - r } else { capacity + w - r };
        occupancy.clamp(0, capacity) as usize
    }

    /// Full: same index, opposite wrap bits.
    pub fn is_full(&self, wptr: u64, rptr: u64) -> bool {
        self.wrap(wptr) != self.wrap(rptr) && self.index(wptr) == self.index(rptr)
    }

    /// Empty: identical pointers.
    pub fn is_empty(&self, wptr: u64, rptr: u64) -> bool { wptr == rptr }

    /// Gray code of a pointer.
    pub fn to_gray(&self, ptr: u64) -> u64 { to_gray(ptr) }

    /// Pointer from its Gray code.
    pub fn from_gray(&self, gray: u64) -> u64 { to_binary(gray, self.width()) }
}
