//! Shell state shared by every command handler, plus dispatch and error reporting.

use std::{env, io, path::PathBuf};

use cashview_config::{Config, ConfigError, ConfigManager, OutputFormat};
use cashview_core::{Clock, CoreError, ErrorKind};
use cashview_domain::UserId;
use cashview_storage_json::JsonStore;
use serde::Serialize;
use strsim::levenshtein;
use tracing::{debug, info};
use uuid::Uuid;

use super::{commands, output, registry::CommandRegistry, system_clock};
use crate::errors::CliError;

/// Overrides the data directory, e.g. `CASHVIEW_HOME=/tmp/cashview`.
pub const HOME_ENV: &str = "CASHVIEW_HOME";

const MAX_SUGGESTION_DISTANCE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
    /// One command taken from the process arguments.
    Argv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("exit requested")]
    ExitRequested,
}

/// Flags read from the command line before the shell starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchOptions {
    pub json: bool,
    pub user: Option<Uuid>,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub store: JsonStore,
    pub clock: Box<dyn Clock>,
    pub user: UserId,
    pub json_output: bool,
    pub running: bool,
    pub last_command: Option<String>,
}

impl ShellContext {
    pub fn new(mode: CliMode, options: LaunchOptions) -> Result<Self, CliError> {
        let base_dir = env::var_os(HOME_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(ConfigManager::default_base_dir);
        let clock = system_clock::clock_from_env()?;
        Self::with_base_dir(mode, options, base_dir, clock)
    }

    pub fn with_base_dir(
        mode: CliMode,
        options: LaunchOptions,
        base_dir: PathBuf,
        clock: Box<dyn Clock>,
    ) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(base_dir)?;
        let mut config = config_manager.load()?;
        output::set_color_enabled(config.ui_color_enabled);

        let user = match options.user.or(config.default_user) {
            Some(user) => user,
            None => {
                let user = Uuid::new_v4();
                config.default_user = Some(user);
                config_manager.save(&config)?;
                info!(%user, "assigned default user profile");
                user
            }
        };

        let store = JsonStore::open(config.resolve_data_file(config_manager.base_dir()))?;
        let json_output = options.json || config.output == OutputFormat::Json;
        debug!(?mode, %user, json_output, "shell context ready");

        Ok(Self {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            config_manager,
            config,
            store,
            clock,
            user,
            json_output,
            running: true,
            last_command: None,
        })
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.handler(command) else {
            self.suggest_command(raw);
            return Err(CommandError::UnknownCommand(raw.to_string()));
        };
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &input.to_ascii_lowercase()), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= MAX_SUGGESTION_DISTANCE {
                output::hint(format!("Did you mean `{name}`?"));
            }
        }
    }

    /// Prints a failed command. Unknown commands were already reported by dispatch.
    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested | CommandError::UnknownCommand(_) => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::Core(err) => {
                output::error(&err);
                if err.kind() == ErrorKind::Store {
                    output::hint("Check that the data directory is writable.");
                }
            }
            other => output::error(other.to_string()),
        }
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn today(&self) -> chrono::NaiveDate {
        self.clock.today()
    }

    pub fn currency(&self) -> &str {
        &self.config.currency
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    /// Prints `value` as JSON in JSON mode, otherwise hands it to `render`.
    pub(crate) fn emit<T: Serialize + ?Sized>(
        &self,
        value: &T,
        render: impl FnOnce(&T),
    ) -> CommandResult {
        if self.json_output {
            output::json(value)?;
        } else {
            render(value);
        }
        Ok(())
    }

    pub(crate) fn prompt(&self) -> String {
        "cashview> ".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashview_core::FixedClock;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn context(dir: &std::path::Path) -> ShellContext {
        let clock = Box::new(FixedClock::new(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()));
        ShellContext::with_base_dir(CliMode::Script, LaunchOptions::default(), dir.into(), clock)
            .unwrap()
    }

    #[test]
    fn first_launch_assigns_and_persists_default_user() {
        let dir = tempdir().unwrap();
        let first = context(dir.path());
        let second = context(dir.path());
        assert_eq!(first.user, second.user);
        assert_eq!(second.config.default_user, Some(first.user));
    }

    #[test]
    fn user_flag_overrides_default_user() {
        let dir = tempdir().unwrap();
        let stored = context(dir.path()).user;
        let other = Uuid::new_v4();
        let clock = Box::new(FixedClock::new(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()));
        let options = LaunchOptions {
            json: true,
            user: Some(other),
        };
        let ctx =
            ShellContext::with_base_dir(CliMode::Script, options, dir.path().into(), clock).unwrap();
        assert_eq!(ctx.user, other);
        assert_eq!(ctx.config.default_user, Some(stored));
        assert!(ctx.json_output);
    }

    #[test]
    fn unknown_command_is_an_error_and_exit_stops_the_loop() {
        let dir = tempdir().unwrap();
        let mut ctx = context(dir.path());
        assert!(matches!(
            ctx.dispatch("dashbord", "dashbord", &[]),
            Err(CommandError::UnknownCommand(_))
        ));
        assert_eq!(ctx.dispatch("exit", "exit", &[]).unwrap(), LoopControl::Exit);
    }
}
