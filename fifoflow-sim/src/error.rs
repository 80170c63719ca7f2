use std::io;
use std::path::PathBuf;

use fifoflow::ConfigError;
use thiserror::Error;

/// Simulator failure.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("cannot read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid configuration file {}: {source}", path.display())]
    Parse { path: PathBuf, source: toml::de::Error },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot render TOML: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("cannot write output: {0}")]
    Output(#[from] io::Error),
}
