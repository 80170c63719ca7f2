//! Status flags and programmable watermarks.

use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

/// Programmable flag thresholds, both counted in occupied slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WatermarkConfig {
    /// `prog_full` is raised while occupancy is at least this value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_threshold: Option<usize>,
    /// `prog_empty` is raised while occupancy is at most this value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_threshold: Option<usize>,
}

/// Flags driven by the producer domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProducerFlags {
    /// No free slot.
    pub full: bool,
    /// At most one free slot.
    pub almost_full: bool,
    /// Occupancy reached the full threshold.
    pub prog_full: bool,
    /// The last producer edge attempted a write while full.
    pub overflow: bool,
}

/// Flags driven by the consumer domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerFlags {
    /// No readable slot.
    pub empty: bool,
    /// At most one readable slot.
    pub almost_empty: bool,
    /// Occupancy at or below the empty threshold.
    pub prog_empty: bool,
    /// The last consumer edge attempted a read while empty.
    pub underflow: bool,
}

/// Snapshot of all queue flags.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Status {
    pub empty: bool,
    pub full: bool,
    pub almost_empty: bool,
    pub almost_full: bool,
    pub prog_empty: bool,
    pub prog_full: bool,
    pub overflow: bool,
    pub underflow: bool,
}

impl Status {
    /// Combines the flags of both domains.
    pub fn new(producer: ProducerFlags, consumer: ConsumerFlags) -> Self {
        Self {
            empty: consumer.empty,
            full: producer.full,
            almost_empty: consumer.almost_empty,
            almost_full: producer.almost_full,
            prog_empty: consumer.prog_empty,
            prog_full: producer.prog_full,
            overflow: producer.overflow,
            underflow: consumer.underflow,
        }
    }

    /// Names of the raised flags.
    pub fn raised(&self) -> ArrayVec<&'static str, 8> {
        [
            (self.empty, "empty"),
            (self.full, "full"),
            (self.almost_empty, "almost_empty"),
            (self.almost_full, "almost_full"),
            (self.prog_empty, "prog_empty"),
            (self.prog_full, "prog_full"),
            (self.overflow, "overflow"),
            (self.underflow, "underflow"),
        ]
        .into_iter()
        .filter_map(|(raised, name)| raised.then_some(name))
        .collect()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let raised = self.raised();
        if raised.is_empty() {
            write!(f, "-")
        } else {
            write!(f, "{}", raised.join(","))
        }
    }
}

/// Derives flags from occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagEvaluator {
    capacity: usize,
    watermark: WatermarkConfig,
}

impl FlagEvaluator {
    /// Creates a new evaluator.
    pub fn new(capacity: usize, watermark: WatermarkConfig) -> Self { Self { capacity, watermark } }

    /// Producer-side flags. `full` comes from the pointer or counter comparison of the caller.
    pub fn producer(&self, occupancy: usize, full: bool, overflow: bool) -> ProducerFlags {
        ProducerFlags {
            full,
            almost_full: full || occupancy + 1 >= self.capacity,
            prog_full: self.watermark.full_threshold.map_or(false, |threshold| full || occupancy >= threshold),
            overflow,
        }
    }

    /// Consumer-side flags. `empty` comes from the pointer or counter comparison of the caller.
    pub fn consumer(&self, occupancy: usize, empty: bool, underflow: bool) -> ConsumerFlags {
        ConsumerFlags {
            empty,
            almost_empty: empty || occupancy <= 1,
            prog_empty: self.watermark.empty_threshold.map_or(false, |threshold| empty || occupancy <= threshold),
            underflow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluator() -> FlagEvaluator {
        FlagEvaluator::new(16, WatermarkConfig { full_threshold: Some(12), empty_threshold: Some(3) })
    }

    #[test]
    fn full_threshold_is_exact() {
        let evaluator = evaluator();
        assert!(!evaluator.producer(11, false, false).prog_full);
        assert!(evaluator.producer(12, false, false).prog_full);
        assert!(evaluator.producer(16, true, false).prog_full);
    }

    #[test]
    fn empty_threshold_is_exact() {
        let evaluator = evaluator();
        assert!(evaluator.consumer(3, false, false).prog_empty);
        assert!(!evaluator.consumer(4, false, false).prog_empty);
        assert!(evaluator.consumer(0, true, false).prog_empty);
    }

    #[test]
    fn one_slot_margins() {
        let evaluator = evaluator();
        assert!(!evaluator.producer(14, false, false).almost_full);
        assert!(evaluator.producer(15, false, false).almost_full);
        assert!(evaluator.consumer(1, false, false).almost_empty);
        assert!(!evaluator.consumer(2, false, false).almost_empty);
    }

    #[test]
    fn disabled_thresholds_stay_low() {
        let evaluator = FlagEvaluator::new(4, WatermarkConfig::default());
        assert!(!evaluator.producer(4, true, false).prog_full);
        assert!(!evaluator.consumer(0, true, false).prog_empty);
    }

    #[test]
    fn display_lists_raised_flags() {
        let status = Status { empty: true, almost_empty: true, underflow: true, ..Default::default() };
        assert_eq!(status.to_string(), "empty,almost_empty,underflow");
        assert_eq!(Status::default().to_string(), "-");
    }
}
