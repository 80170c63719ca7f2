//! Storage unit primitive.
//!
//! The queue only relies on the unit's shape options, its capacity, and its two independent ports.

use std::fmt;

use crate::segment::UnitShape;

/// Fixed-capacity memory block with a write port and a registered read port.
pub trait StorageUnit: fmt::Debug {
    /// Native (width, depth) configurations, all of the same total capacity.
    const SHAPES: &'static [UnitShape];

    /// Creates a unit configured with the given shape.
    fn with_shape(shape: UnitShape) -> Self
    where Self: Sized;

    /// Configured shape.
    fn shape(&self) -> UnitShape;

    /// Stores the low `shape().width` bits of `data` at `addr` when `enable` is high.
    fn write(&mut self, addr: usize, data: u64, enable: bool);

    /// Loads `addr` into the output register when `enable` is high and returns the register.
    fn read(&mut self, addr: usize, enable: bool) -> u64;
}

/// 36 Kibit block RAM.
#[derive(Clone)]
pub struct BlockRam {
    shape: UnitShape,
    mem: Vec<u64>,
    output: u64,
}

impl BlockRam {
    /// Total capacity in bits.
    pub const BITS: usize = 36 * 1024;
}

impl fmt::Debug for BlockRam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockRam").field("shape", &self.shape).field("output", &self.output).finish()
    }
}

impl StorageUnit for BlockRam {
    const SHAPES: &'static [UnitShape] = &[UnitShape::new(36, 1024), UnitShape::new(18, 2048), UnitShape::new(9, 4096)];

    fn with_shape(shape: UnitShape) -> Self { Self { shape, mem: vec![0; shape.depth], output: 0 } }

    fn shape(&self) -> UnitShape { self.shape }

    fn write(&mut self, addr: usize, data: u64, enable: bool) {
        if !enable {
            return;
        }
        let mask = u64::MAX.checked_shr(u64::BITS - self.shape.width.min(u64::BITS)).unwrap_or(0);
        if let Some(entry) = self.mem.get_mut(addr) {
            *entry = data & mask;
        }
    }

    fn read(&mut self, addr: usize, enable: bool) -> u64 {
        if enable {
            self.output = self.mem.get(addr).copied().unwrap_or(0);
        }
        self.output
    }
}
