//! Backing store strategies.
//!
//! The strategy is selected once when the queue is built and never re-evaluated per access.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::segment::SegmentMap;
use crate::storage::{BlockRam, StorageUnit};
use crate::utils::{bit_slice, mask};
use crate::{ConfigError, Word};

/// Word-addressed memory behind the queue pointers.
pub trait BackingStore: fmt::Debug {
    /// Number of write-port words.
    fn depth(&self) -> usize;

    /// Stores `data` at write-port address `addr`.
    fn write(&mut self, addr: usize, data: Word);

    /// Loads read-port address `addr`.
    fn read(&mut self, addr: usize) -> Word;

    /// Segment map, for stores tiled from storage units.
    fn segment_map(&self) -> Option<&SegmentMap> { None }
}

/// Backing store choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackingStoreKind {
    /// One flat array, used when the queue fits a single storage unit.
    SingleGenericQueue,
    /// Arena of fixed-capacity storage units tiled by a [`SegmentMap`].
    SegmentedFixedUnits,
}

impl BackingStoreKind {
    /// Picks the strategy for a queue of `capacity` words of `width` bits.
    pub fn select(width: u32, capacity: usize) -> Self {
        let fits = BlockRam::SHAPES.iter().any(|shape| shape.width >= width && shape.depth >= capacity);
        if fits {
            Self::SingleGenericQueue
        } else {
            Self::SegmentedFixedUnits
        }
    }

    /// Builds the store.
    pub fn build(self, width: u32, capacity: usize) -> Result<Box<dyn BackingStore>, ConfigError> {
        Ok(match self {
            Self::SingleGenericQueue => Box::new(SingleGenericQueue::new(width, capacity)),
            Self::SegmentedFixedUnits => Box::new(SegmentedFixedUnits::<BlockRam>::new(SegmentMap::symmetric(
                width,
                capacity,
                BlockRam::SHAPES,
            )?)),
        })
    }
}

impl fmt::Display for BackingStoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleGenericQueue => write!(f, "single-generic-queue"),
            Self::SegmentedFixedUnits => write!(f, "segmented-fixed-units"),
        }
    }
}

/// Single array of words.
#[derive(Debug, Clone)]
pub struct SingleGenericQueue {
    width: u32,
    mem: Vec<Word>,
}

impl SingleGenericQueue {
    /// Creates a new store.
    pub fn new(width: u32, depth: usize) -> Self { Self { width, mem: vec![0; depth] } }
}

impl BackingStore for SingleGenericQueue {
    fn depth(&self) -> usize { self.mem.len() }

    fn write(&mut self, addr: usize, data: Word) {
        if let Some(entry) = self.mem.get_mut(addr) {
            *entry = data & mask(self.width);
        }
    }

    fn read(&mut self, addr: usize) -> Word { self.mem.get(addr).copied().unwrap_or(0) }
}

/// Arena of storage units indexed by a segment map.
#[derive(Debug)]
pub struct SegmentedFixedUnits<U: StorageUnit = BlockRam> {
    map: SegmentMap,
    units: Vec<U>,
}

impl<U: StorageUnit> SegmentedFixedUnits<U> {
    /// Allocates one unit per tile of the map.
    pub fn new(map: SegmentMap) -> Self {
        let units = (0..map.units()).map(|_| U::with_shape(map.shape())).collect();
        Self { map, units }
    }

    /// Segment map.
    pub fn map(&self) -> &SegmentMap { &self.map }

    /// Storage units.
    pub fn units(&self) -> &[U] { &self.units }
}

impl<U: StorageUnit> BackingStore for SegmentedFixedUnits<U> {
    fn depth(&self) -> usize { self.map.write_depth() }

    fn write(&mut self, addr: usize, data: Word) {
        for slice in self.map.write_slices(addr) {
            self.units[slice.unit].write(slice.addr, bit_slice(data, slice.offset, slice.width) as u64, true);
        }
    }

    fn read(&mut self, addr: usize) -> Word {
        self.map.read_slices(addr).into_iter().fold(0, |word, slice| {
            let lane = Word::from(self.units[slice.unit].read(slice.addr, true)) & mask(slice.width);
            word | (lane << slice.offset)
        })
    }

    fn segment_map(&self) -> Option<&SegmentMap> { Some(&self.map) }
}
