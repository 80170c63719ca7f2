//! Construction-time configuration.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backing::BackingStoreKind;
use crate::flags::WatermarkConfig;
use crate::pointer::PointerWindow;
use crate::{ConfigError, MAX_WIDTH};

/// Deepest supported queue.
pub const MAX_CAPACITY: usize = 32768;

/// Clocking of the two queue ports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Both ports share one clock.
    #[default]
    Synchronous,
    /// Producer and consumer run on independent clocks.
    Asynchronous,
}

/// Behavior of the read data output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Bypass {
    /// Output register updated by a read pulse.
    #[default]
    Registered,
    /// Head element visible on the output whenever the queue is not empty.
    FirstWordFallThrough,
}

/// Queue configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FifoConfig {
    /// Number of slots.
    pub capacity: usize,
    /// Bits per element.
    pub element_width: u32,
    /// Clocking.
    pub mode: Mode,
    /// Read output behavior.
    pub bypass: Bypass,
    /// Programmable thresholds.
    #[serde(flatten)]
    pub watermark: WatermarkConfig,
    /// Storage strategy; chosen from capacity and width when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backing_store: Option<BackingStoreKind>,
}

impl Default for FifoConfig {
    fn default() -> Self {
        Self {
            capacity: 1024,
            element_width: 36,
            mode: Mode::default(),
            bypass: Bypass::default(),
            watermark: WatermarkConfig::default(),
            backing_store: None,
        }
    }
}

impl FifoConfig {
    /// Synchronous registered queue of `capacity` elements of `element_width` bits.
    pub fn new(capacity: usize, element_width: u32) -> Self { Self { capacity, element_width, ..Self::default() } }

    /// Sets the clocking mode.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the read output behavior.
    pub fn bypass(mut self, bypass: Bypass) -> Self {
        self.bypass = bypass;
        self
    }

    /// Enables `prog_full` at the given occupancy.
    pub fn full_threshold(mut self, threshold: usize) -> Self {
        self.watermark.full_threshold = Some(threshold);
        self
    }

    /// Enables `prog_empty` at the given occupancy.
    pub fn empty_threshold(mut self, threshold: usize) -> Self {
        self.watermark.empty_threshold = Some(threshold);
        self
    }

    /// Forces a storage strategy.
    pub fn backing_store(mut self, kind: BackingStoreKind) -> Self {
        self.backing_store = Some(kind);
        self
    }

    /// Storage strategy after automatic selection.
    pub fn backing_store_kind(&self) -> BackingStoreKind {
        self.backing_store.unwrap_or_else(|| BackingStoreKind::select(self.element_width, self.capacity))
    }

    /// Checks ranges and returns the pointer window of the configuration.
    pub fn validate(&self) -> Result<PointerWindow, ConfigError> {
        if self.capacity == 0 || self.capacity > MAX_CAPACITY {
            return Err(ConfigError::Capacity { capacity: self.capacity, max: MAX_CAPACITY });
        }
        if self.element_width == 0 || self.element_width > MAX_WIDTH {
            return Err(ConfigError::Width { width: self.element_width, max: MAX_WIDTH });
        }

        let thresholds = [("full", self.watermark.full_threshold), ("empty", self.watermark.empty_threshold)];
        for (name, threshold) in thresholds {
            if let Some(threshold) = threshold.filter(|threshold| *threshold > self.capacity) {
                return Err(ConfigError::Threshold { name, threshold, capacity: self.capacity });
            }
        }

        let window = PointerWindow::for_mode(self.mode, self.capacity)?;
        debug!(
            capacity = self.capacity,
            width = self.element_width,
            mode = ?self.mode,
            bypass = ?self.bypass,
            full_threshold = ?self.watermark.full_threshold,
            empty_threshold = ?self.watermark.empty_threshold,
            window_start = window.start(),
            window_end = window.end(),
            "validated queue configuration"
        );
        Ok(window)
    }
}
