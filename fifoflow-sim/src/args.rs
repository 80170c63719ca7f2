//! Command-line arguments.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use fifoflow::{BackingStoreKind, Bypass, FifoConfig, Mode};
use tracing::debug;

use crate::error::SimError;

/// Cycle-level simulator of a bounded hardware queue.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    #[clap(flatten)]
    pub queue: QueueArgs,

    #[clap(subcommand)]
    pub command: Command,
}

/// Queue configuration: a TOML file, overridden by inline options.
#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueArgs {
    /// TOML configuration file
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    /// Number of slots
    #[clap(long, global = true)]
    pub capacity: Option<usize>,

    /// Element width in bits
    #[clap(long, global = true)]
    pub width: Option<u32>,

    /// Independent producer and consumer clocks
    #[clap(long, global = true)]
    pub asynchronous: bool,

    /// First-word-fall-through read output
    #[clap(long, global = true)]
    pub fwft: bool,

    /// Occupancy at which prog_full rises
    #[clap(long, global = true)]
    pub full_threshold: Option<usize>,

    /// Occupancy at or below which prog_empty rises
    #[clap(long, global = true)]
    pub empty_threshold: Option<usize>,

    /// Storage strategy, chosen automatically when absent
    #[clap(long, global = true, value_enum)]
    pub backing_store: Option<StoreArg>,
}

/// Storage strategy on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreArg {
    /// One flat array
    Single,
    /// Tiled block RAM units
    Segmented,
}

impl From<StoreArg> for BackingStoreKind {
    fn from(arg: StoreArg) -> Self {
        match arg {
            StoreArg::Single => BackingStoreKind::SingleGenericQueue,
            StoreArg::Segmented => BackingStoreKind::SegmentedFixedUnits,
        }
    }
}

/// Simulator action.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the selected backing store and segment plan
    Plan,

    /// Push words through a two-clock testbench
    Run {
        /// Number of words to push
        #[clap(long, default_value_t = 1024)]
        words: usize,

        /// Producer clock period
        #[clap(long, default_value_t = 10)]
        producer_period: u64,

        /// Consumer clock period
        #[clap(long, default_value_t = 10)]
        consumer_period: u64,

        /// Write and read on every edge regardless of flags
        #[clap(long)]
        ignore_flags: bool,

        /// Print one line per clock edge
        #[clap(long)]
        trace: bool,
    },

    /// Print a TOML configuration template
    Template,
}

impl QueueArgs {
    /// Builds the queue configuration. The result is not validated yet.
    pub fn resolve(&self) -> Result<FifoConfig, SimError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => FifoConfig::default(),
        };

        if let Some(capacity) = self.capacity {
            config.capacity = capacity;
        }
        if let Some(width) = self.width {
            config.element_width = width;
        }
        if self.asynchronous {
            config.mode = Mode::Asynchronous;
        }
        if self.fwft {
            config.bypass = Bypass::FirstWordFallThrough;
        }
        if let Some(threshold) = self.full_threshold {
            config.watermark.full_threshold = Some(threshold);
        }
        if let Some(threshold) = self.empty_threshold {
            config.watermark.empty_threshold = Some(threshold);
        }
        if let Some(store) = self.backing_store {
            config.backing_store = Some(store.into());
        }
        Ok(config)
    }
}

/// Loads a configuration file.
pub fn load_config(path: &Path) -> Result<FifoConfig, SimError> {
    debug!(path = %path.display(), "loading configuration");
    let contents = fs::read_to_string(path).map_err(|source| SimError::Read { path: path.to_owned(), source })?;
    toml::from_str(&contents).map_err(|source| SimError::Parse { path: path.to_owned(), source })
}
