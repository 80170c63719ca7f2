use thiserror::Error;

use crate::config::Mode;

/// Rejected queue configuration. Raised at construction only; a running queue reports failures through flags.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("capacity {capacity} is outside the supported range 1..={max}")]
    Capacity { capacity: usize, max: usize },

    #[error("element width {width} is outside the supported range 1..={max}")]
    Width { width: u32, max: u32 },

    #[error("{name} threshold {threshold} exceeds capacity {capacity}")]
    Threshold { name: &'static str, threshold: usize, capacity: usize },

    #[error("{mode:?} capacity {capacity}: odd depth cannot wrap with a single Gray-bit change")]
    Window { mode: Mode, capacity: usize },

    #[error("port widths {write} and {read} are not integer multiples of each other")]
    WidthRatio { write: u32, read: u32 },

    #[error("depth {depth} is not a multiple of the port width ratio {ratio}")]
    DepthRatio { depth: usize, ratio: usize },

    #[error("storage unit shape width {width} exceeds the {max}-bit lane")]
    UnitWidth { width: u32, max: u32 },

    #[error("storage unit offers no native shapes")]
    NoShapes,
}
