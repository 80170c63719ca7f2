//! FifoFlow: cycle-level model of a bounded hardware queue controller.
//!
//! The queue is a circular buffer addressed by a write pointer and a read pointer. Its storage is either a single
//! generic array or an arena of fixed-capacity storage units tiled by a [`SegmentMap`]. In asynchronous mode the
//! pointers live in two independently clocked domains and are exchanged as Gray codes through two-stage
//! synchronizers.
//!
//! Every mutating operation on [`Fifo`] is one rising clock edge: registers are updated, then flags are recomputed
//! from the registers.

// # Tries to deny all lints (`rustc -W help`).
#![deny(absolute_paths_not_starting_with_crate)]
#![deny(anonymous_parameters)]
#![deny(deprecated_in_future)]
#![deny(explicit_outlives_requirements)]
#![deny(keyword_idents)]
#![deny(macro_use_extern_crate)]
#![deny(missing_debug_implementations)]
#![deny(non_ascii_idents)]
#![deny(rust_2018_idioms)]
#![deny(trivial_numeric_casts)]
#![deny(unsafe_op_in_unsafe_fn)]
#![deny(unused_extern_crates)]
#![deny(unused_import_braces)]
//
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::missing_crate_level_docs)]
#![deny(rustdoc::invalid_codeblock_attributes)]
#![deny(rustdoc::invalid_html_tags)]
#![deny(rustdoc::invalid_rust_codeblocks)]
#![deny(rustdoc::bare_urls)]
#![deny(unreachable_pub)]
//
#![allow(clippy::new_without_default)]

pub mod backing;
pub mod config;
mod error;
pub mod fifo;
pub mod flags;
pub mod gray;
pub mod pointer;
pub mod segment;
pub mod storage;
pub mod sync;
pub mod testbench;
pub mod utils;

pub use backing::{BackingStore, BackingStoreKind, SegmentedFixedUnits, SingleGenericQueue};
pub use config::{Bypass, FifoConfig, Mode};
pub use error::ConfigError;
pub use fifo::{Cycle, Domain, Fifo};
pub use flags::{Status, WatermarkConfig};
pub use segment::{LaneSlice, SegmentMap, UnitShape};
pub use storage::{BlockRam, StorageUnit};
pub use testbench::{DualClock, Edge, Testbench, TestbenchReport};

/// Data word carried by the queue. Only the low `element_width` bits are significant.
pub type Word = u128;

/// Widest supported element.
pub const MAX_WIDTH: u32 = Word::BITS;
