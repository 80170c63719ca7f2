//! FifoFlow simulator.

mod args;
mod commands;
mod error;

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::args::Args;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = args.queue.resolve()?;
    commands::execute(&args.command, config, &mut io::stdout().lock())?;
    Ok(())
}
