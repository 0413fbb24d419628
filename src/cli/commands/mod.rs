pub mod config;
pub mod records;
pub mod reports;
pub mod system;

use crate::cli::registry::CommandEntry;
use crate::cli::CommandError;

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(system::definitions());
    commands.extend(config::definitions());
    commands.extend(reports::definitions());
    commands.extend(records::definitions());
    commands
}

/// Fails with the command's usage line unless `args` has between `min` and `max` entries.
pub(crate) fn expect_args(args: &[&str], min: usize, max: usize, usage: &str) -> Result<(), CommandError> {
    if args.len() < min || args.len() > max {
        return Err(CommandError::InvalidArguments(format!("usage: {usage}")));
    }
    Ok(())
}
