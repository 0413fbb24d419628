pub mod commands;
mod context;
pub mod format;
pub mod help;
pub mod output;
pub mod registry;
mod shell;
pub mod system_clock;
pub mod table;

pub use context::{CliMode, CommandError, CommandResult, LaunchOptions, ShellContext};
pub use shell::run_cli;
