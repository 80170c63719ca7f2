//! Segment map: tiling of a logical queue array across fixed-capacity storage units.
//!
//! Units are arranged in depth groups. Inside a group there are `ratio` columns of the narrow port word, and each
//! column is split into `lanes` slices of the unit's native width:
//!
//! ```text
//! unit = depth_group * units_per_group + column * lanes + lane
//! ```
//!
//! The narrow port touches one column per access. The wide port touches all `ratio` columns of a row at once, column
//! 0 carrying the least significant bits. With equal port widths `ratio` is 1 and both ports address the same
//! units.

use itertools::iproduct;
use serde::{Deserialize, Serialize};

use crate::utils::div_ceil;
use crate::{ConfigError, MAX_WIDTH};

/// Widest native shape a unit port can carry.
pub const MAX_LANE_WIDTH: u32 = u64::BITS;

/// Native (width, depth) configuration of a storage unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitShape {
    /// Native data width in bits.
    pub width: u32,
    /// Native number of entries.
    pub depth: usize,
}

impl UnitShape {
    /// Creates a new shape.
    pub const fn new(width: u32, depth: usize) -> Self { Self { width, depth } }

    /// Total bit capacity.
    pub const fn bits(&self) -> usize { self.width as usize * self.depth }
}

/// Part of a port word stored in one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneSlice {
    /// Index into the unit arena.
    pub unit: usize,
    /// Address inside the unit.
    pub addr: usize,
    /// First bit of the slice inside the port word.
    pub offset: u32,
    /// Slice width; the unit holds it in its low bits.
    pub width: u32,
}

/// Immutable tiling plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentMap {
    write_width: u32,
    read_width: u32,
    depth: usize,
    shape: UnitShape,
    ratio: usize,
    lanes: usize,
    rows: usize,
    depth_groups: usize,
}

impl SegmentMap {
    /// Plans a queue of `depth` write words with possibly different port widths.
    pub fn new(write_width: u32, read_width: u32, depth: usize, shapes: &[UnitShape]) -> Result<Self, ConfigError> {
        for width in [write_width, read_width] {
            if width == 0 || width > MAX_WIDTH {
                return Err(ConfigError::Width { width, max: MAX_WIDTH });
            }
        }

        if let Some(shape) = shapes.iter().find(|shape| shape.width > MAX_LANE_WIDTH) {
            return Err(ConfigError::UnitWidth { width: shape.width, max: MAX_LANE_WIDTH });
        }

        let narrow = write_width.min(read_width);
        let wide = write_width.max(read_width);
        if wide % narrow != 0 {
            return Err(ConfigError::WidthRatio { write: write_width, read: read_width });
        }
        let ratio = (wide / narrow) as usize;

        // Rows are counted on the wide port.
        let rows = if write_width >= read_width {
            depth
        } else {
            if depth % ratio != 0 {
                return Err(ConfigError::DepthRatio { depth, ratio });
            }
            depth / ratio
        };

        let shape = Self::choose_shape(narrow, ratio, rows, shapes)?;
        let lanes = div_ceil(narrow as usize, shape.width as usize);
        let depth_groups = div_ceil(rows.max(1), shape.depth);

        Ok(Self { write_width, read_width, depth, shape, ratio, lanes, rows, depth_groups })
    }

    /// Plans a queue whose ports have the same width.
    pub fn symmetric(width: u32, depth: usize, shapes: &[UnitShape]) -> Result<Self, ConfigError> {
        Self::new(width, width, depth, shapes)
    }

    fn choose_shape(narrow: u32, ratio: usize, rows: usize, shapes: &[UnitShape]) -> Result<UnitShape, ConfigError> {
        let usable = || shapes.iter().copied().filter(|shape| shape.width > 0 && shape.depth > 0);

        if let Some(exact) = usable().find(|shape| shape.depth == rows) {
            return Ok(exact);
        }

        usable()
            .min_by_key(|shape| {
                let units = div_ceil(narrow as usize, shape.width as usize) * ratio * div_ceil(rows, shape.depth);
                (units, shape.depth)
            })
            .ok_or(ConfigError::NoShapes)
    }

    /// Chosen native shape.
    pub fn shape(&self) -> UnitShape { self.shape }

    /// Width ratio between the wide and the narrow port.
    pub fn ratio(&self) -> usize { self.ratio }

    /// Units per narrow column.
    pub fn lanes(&self) -> usize { self.lanes }

    /// Number of depth groups.
    pub fn depth_groups(&self) -> usize { self.depth_groups }

    /// Units in one depth group.
    pub fn units_per_group(&self) -> usize { self.ratio * self.lanes }

    /// Total number of units.
    pub fn units(&self) -> usize { self.depth_groups * self.units_per_group() }

    /// Write port width.
    pub fn write_width(&self) -> u32 { self.write_width }

    /// Read port width.
    pub fn read_width(&self) -> u32 { self.read_width }

    /// Number of write words.
    pub fn write_depth(&self) -> usize { self.depth }

    /// Number of read words.
    pub fn read_depth(&self) -> usize {
        if self.write_width >= self.read_width {
            self.depth * self.ratio
        } else {
            self.rows
        }
    }

    /// Slices touched by a write of logical index `index`.
    pub fn write_slices(&self, index: usize) -> Vec<LaneSlice> {
        if self.write_width > self.read_width {
            self.wide_slices(index)
        } else {
            self.narrow_slices(index)
        }
    }

    /// Slices touched by a read of logical index `index`.
    pub fn read_slices(&self, index: usize) -> Vec<LaneSlice> {
        if self.read_width > self.write_width {
            self.wide_slices(index)
        } else {
            self.narrow_slices(index)
        }
    }

    fn narrow(&self) -> u32 { self.write_width.min(self.read_width) }

    fn lane_width(&self, lane: usize) -> u32 {
        let start = lane as u32 * self.shape.width;
        self.shape.width.min(self.narrow() - start)
    }

    fn narrow_slices(&self, index: usize) -> Vec<LaneSlice> {
        let column = index % self.ratio;
        let row = index / self.ratio;
        let base = (row / self.shape.depth) * self.units_per_group() + column * self.lanes;
        let addr = row % self.shape.depth;

        (0..self.lanes)
            .map(|lane| LaneSlice {
                unit: base + lane,
                addr,
                offset: lane as u32 * self.shape.width,
                width: self.lane_width(lane),
            })
            .collect()
    }

    fn wide_slices(&self, row: usize) -> Vec<LaneSlice> {
        let base = (row / self.shape.depth) * self.units_per_group();
        let addr = row % self.shape.depth;
        let narrow = self.narrow();

        iproduct!(0..self.ratio, 0..self.lanes)
            .map(|(column, lane)| LaneSlice {
                unit: base + column * self.lanes + lane,
                addr,
                offset: column as u32 * narrow + lane as u32 * self.shape.width,
                width: self.lane_width(lane),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{BlockRam, StorageUnit};

    #[test]
    fn exact_depth_shape_wins() {
        let map = SegmentMap::symmetric(18, 2048, BlockRam::SHAPES).unwrap();
        assert_eq!(map.shape(), UnitShape::new(18, 2048));
        assert_eq!(map.units(), 1);
    }

    #[test]
    fn tiles_width_and_depth() {
        // 40 bits need two 36-bit lanes; 3000 rows need three 1024-deep groups.
        let map = SegmentMap::symmetric(40, 3000, &[UnitShape::new(36, 1024)]).unwrap();
        assert_eq!(map.lanes(), 2);
        assert_eq!(map.depth_groups(), 3);
        assert_eq!(map.units(), 6);

        let slices = map.write_slices(2100);
        assert_eq!(slices, vec![
            LaneSlice { unit: 4, addr: 52, offset: 0, width: 36 },
            LaneSlice { unit: 5, addr: 52, offset: 36, width: 4 },
        ]);
        assert_eq!(map.read_slices(2100), slices);
    }

    #[test]
    fn fewest_units_when_no_exact_depth() {
        // 9 bits x 3000: 9x4096 needs one unit, 36x1024 would need three.
        let map = SegmentMap::symmetric(9, 3000, BlockRam::SHAPES).unwrap();
        assert_eq!(map.shape(), UnitShape::new(9, 4096));
        assert_eq!(map.units(), 1);
    }

    #[test]
    fn wide_write_fans_out_over_ratio_units() {
        let map = SegmentMap::new(72, 36, 1024, &[UnitShape::new(36, 1024)]).unwrap();
        assert_eq!(map.ratio(), 2);
        assert_eq!(map.read_depth(), 2048);
        assert_eq!(map.units(), 2);

        assert_eq!(map.write_slices(5), vec![
            LaneSlice { unit: 0, addr: 5, offset: 0, width: 36 },
            LaneSlice { unit: 1, addr: 5, offset: 36, width: 36 },
        ]);
        // Narrow reads alternate between the two columns of a row.
        assert_eq!(map.read_slices(10), vec![LaneSlice { unit: 0, addr: 5, offset: 0, width: 36 }]);
        assert_eq!(map.read_slices(11), vec![LaneSlice { unit: 1, addr: 5, offset: 0, width: 36 }]);
    }

    #[test]
    fn wide_read_gathers_ratio_units() {
        let map = SegmentMap::new(9, 36, 4096, &[UnitShape::new(9, 1024)]).unwrap();
        assert_eq!(map.ratio(), 4);
        assert_eq!(map.read_depth(), 1024);
        assert_eq!(map.units(), 4);
        assert_eq!(map.write_slices(7), vec![LaneSlice { unit: 3, addr: 1, offset: 0, width: 9 }]);
        assert_eq!(map.read_slices(1).iter().map(|slice| slice.offset).collect::<Vec<_>>(), vec![0, 9, 18, 27]);
    }

    #[test]
    fn rejects_bad_ratios() {
        assert_eq!(
            SegmentMap::new(36, 24, 16, BlockRam::SHAPES),
            Err(ConfigError::WidthRatio { write: 36, read: 24 })
        );
        assert_eq!(SegmentMap::new(9, 36, 6, BlockRam::SHAPES), Err(ConfigError::DepthRatio { depth: 6, ratio: 4 }));
        assert_eq!(SegmentMap::symmetric(8, 8, &[]), Err(ConfigError::NoShapes));
    }

    #[test]
    fn rejects_shapes_wider_than_a_lane() {
        let shapes = [UnitShape::new(36, 1024), UnitShape::new(72, 512)];
        assert_eq!(SegmentMap::symmetric(128, 16, &shapes), Err(ConfigError::UnitWidth { width: 72, max: 64 }));
        assert!(SegmentMap::symmetric(128, 16, &[UnitShape::new(64, 512)]).is_ok());
    }
}
