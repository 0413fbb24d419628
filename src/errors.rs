use cashview_config::ConfigError;
use cashview_core::CoreError;
use rustyline::error::ReadlineError;
use thiserror::Error;

use crate::cli::CommandError;

/// Failures that end a CLI session.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Line editor error: {0}")]
    Readline(#[from] ReadlineError),
    #[error("Invalid input: {0}")]
    Input(String),
}
