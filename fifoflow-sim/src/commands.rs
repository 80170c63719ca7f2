//! Subcommands.

use std::io::Write;

use fifoflow::{BlockRam, Domain, DualClock, Fifo, FifoConfig, StorageUnit, Testbench, TestbenchReport, Word};
use itertools::Itertools;
use serde::Serialize;
use tracing::info;

use crate::args::Command;
use crate::error::SimError;

/// Delivery summary of a `run`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RunSummary {
    pub pushed: usize,
    pub delivered: usize,
    pub lossless: bool,
    pub overflows: usize,
    pub underflows: usize,
    pub producer_edges: usize,
    pub consumer_edges: usize,
    pub elapsed: u64,
    pub peak_occupancy: usize,
}

impl From<&TestbenchReport> for RunSummary {
    fn from(report: &TestbenchReport) -> Self {
        Self {
            pushed: report.pushed.len(),
            delivered: report.delivered.len(),
            lossless: report.is_lossless(),
            overflows: report.overflows,
            underflows: report.underflows,
            producer_edges: report.producer_edges,
            consumer_edges: report.consumer_edges,
            elapsed: report.elapsed,
            peak_occupancy: report.peak_occupancy,
        }
    }
}

/// Runs `command` against `config`, writing to `out`.
pub fn execute<W: Write>(command: &Command, config: FifoConfig, out: &mut W) -> Result<(), SimError> {
    match command {
        Command::Plan => plan(&Fifo::new(config)?, out),
        Command::Run { words, producer_period, consumer_period, ignore_flags, trace } => {
            let mut testbench = Testbench::new(Fifo::new(config)?, DualClock::new(*producer_period, *consumer_period));
            if *ignore_flags {
                testbench = testbench.ignore_flags();
            }
            run(&mut testbench, *words, *trace, out)
        }
        Command::Template => template(&config, out),
    }
}

fn plan<W: Write>(fifo: &Fifo, out: &mut W) -> Result<(), SimError> {
    let config = fifo.config();
    let window = fifo.window();
    writeln!(out, "mode:          {:?}", config.mode)?;
    writeln!(out, "bypass:        {:?}", config.bypass)?;
    writeln!(out, "capacity:      {} x {} bits", config.capacity, config.element_width)?;
    writeln!(out, "window:        [{}, {}], pointer width {}", window.start(), window.end(), window.width())?;
    writeln!(out, "backing store: {}", fifo.backing_store_kind())?;

    if let Some(map) = fifo.segment_map() {
        let shapes = BlockRam::SHAPES.iter().map(|shape| format!("{}x{}", shape.width, shape.depth)).join(", ");
        writeln!(out, "unit shapes:   {shapes}")?;
        writeln!(out, "chosen shape:  {}x{}", map.shape().width, map.shape().depth)?;
        writeln!(
            out,
            "tiling:        {} lanes x {} depth groups = {} units",
            map.lanes(),
            map.depth_groups(),
            map.units()
        )?;
    }
    Ok(())
}

fn run<W: Write>(testbench: &mut Testbench, words: usize, trace: bool, out: &mut W) -> Result<(), SimError> {
    let mut failure = None;
    let report = testbench.run_with((0..words).map(|n| n as Word), |time, edge, fifo| {
        if !trace || failure.is_some() {
            return;
        }
        let domain = Domain::from(edge);
        let line = writeln!(out, "{time:>10} {domain:<8} {:>6} {}", fifo.occupancy(domain), fifo.status());
        failure = line.err();
    });
    if let Some(error) = failure {
        return Err(error.into());
    }

    let summary = RunSummary::from(&report);
    info!(lossless = summary.lossless, elapsed = summary.elapsed, "run finished");
    write!(out, "{}", toml::to_string(&summary)?)?;
    Ok(())
}

fn template<W: Write>(config: &FifoConfig, out: &mut W) -> Result<(), SimError> {
    writeln!(out, "# fifoflow queue configuration")?;
    writeln!(out, "# optional keys: full-threshold, empty-threshold, backing-store")?;
    write!(out, "{}", toml::to_string(config)?)?;
    Ok(())
}
