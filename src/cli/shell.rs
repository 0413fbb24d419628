use std::{
    borrow::Cow,
    env, fmt,
    io::{self, BufRead, IsTerminal},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::{ValidationContext, ValidationResult, Validator},
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use shell_words::split;
use uuid::Uuid;

use crate::cli::context::{CliMode, CommandError, LaunchOptions, LoopControl, ShellContext};
use crate::cli::output;
use crate::errors::CliError;

/// Forces script mode even when stdin is a terminal.
pub const SCRIPT_ENV: &str = "CASHVIEW_CLI_SCRIPT";

/// Runs one command from the process arguments, or a shell over stdin when none are given.
pub fn run_cli() -> Result<(), CliError> {
    let args: Vec<String> = env::args().skip(1).collect();
    let (options, command) = parse_launch_args(&args)?;

    let mode = if !command.is_empty() {
        CliMode::Argv
    } else if env::var_os(SCRIPT_ENV).is_some() || !io::stdin().is_terminal() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode, options)?;

    match mode {
        CliMode::Argv => run_argv(&mut context, &command),
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

/// Splits leading `--json` / `--user <uuid>` flags from the command words.
pub(crate) fn parse_launch_args(args: &[String]) -> Result<(LaunchOptions, Vec<String>), CliError> {
    let mut options = LaunchOptions::default();
    let mut idx = 0;
    while idx < args.len() {
        match args[idx].as_str() {
            "--json" => options.json = true,
            "--user" => {
                let raw = args
                    .get(idx + 1)
                    .ok_or_else(|| CliError::Input("--user needs a profile id".into()))?;
                let user = Uuid::parse_str(raw)
                    .map_err(|_| CliError::Input(format!("`{raw}` is not a valid profile id")))?;
                options.user = Some(user);
                idx += 1;
            }
            _ => break,
        }
        idx += 1;
    }
    Ok((options, args[idx..].to_vec()))
}

fn run_argv(context: &mut ShellContext, command: &[String]) -> Result<(), CliError> {
    let raw = &command[0];
    let args: Vec<&str> = command.iter().skip(1).map(String::as_str).collect();
    context.last_command = Some(command.join(" "));
    match context.dispatch(&raw.to_lowercase(), raw, &args) {
        Ok(_) => Ok(()),
        Err(err) => Err(err.into()),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(context.command_names())));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);
    output::info("cashview shell. Type `help` for commands, `exit` to leave.");

    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();
                match handle_line(context, trimmed) {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Exit) => break,
                    Err(err) => context.report_error(err),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !context.running {
            break;
        }
        let line = line?;
        match handle_line(context, &line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err),
        }
    }
    Ok(())
}

pub(crate) fn handle_line(
    context: &mut ShellContext,
    line: &str,
) -> Result<LoopControl, CommandError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(LoopControl::Continue);
    }
    let tokens = match parse_command_line(trimmed) {
        Ok(tokens) => tokens,
        Err(err) => {
            output::warning(&err);
            return Ok(LoopControl::Continue);
        }
    };
    let Some(raw) = tokens.first() else {
        return Ok(LoopControl::Continue);
    };
    let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
    context.last_command = Some(trimmed.to_string());

    match context.dispatch(&raw.to_lowercase(), raw, &args) {
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(LoopControl::Exit)
        }
        other => other,
    }
}

struct CommandHelper {
    commands: Vec<String>,
}

impl CommandHelper {
    fn new(names: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = names.into_iter().map(str::to_string).collect();
        commands.sort();
        commands.dedup();
        Self { commands }
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        // Only the first word completes.
        if prefix.trim_start().contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        let start = prefix.len() - prefix.trim_start().len();
        let needle = prefix[start..].to_ascii_lowercase();
        let candidates = self
            .commands
            .iter()
            .filter(|name| name.starts_with(&needle))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect();
        Ok((start, candidates))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {
    fn validate(&self, _ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(ValidationResult::Valid(None))
    }
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashview_core::FixedClock;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn launch_flags_precede_the_command() {
        let user = Uuid::new_v4().to_string();
        let (options, command) =
            parse_launch_args(&strings(&["--json", "--user", &user, "cash-flow", "3"])).unwrap();
        assert!(options.json);
        assert_eq!(options.user.map(|id| id.to_string()), Some(user));
        assert_eq!(command, strings(&["cash-flow", "3"]));

        let (options, command) = parse_launch_args(&strings(&["dashboard", "--json"])).unwrap();
        assert!(!options.json);
        assert_eq!(command, strings(&["dashboard", "--json"]));
    }

    #[test]
    fn bad_user_flag_is_rejected() {
        assert!(parse_launch_args(&strings(&["--user"])).is_err());
        assert!(parse_launch_args(&strings(&["--user", "nobody"])).is_err());
    }

    #[test]
    fn quoted_words_stay_together() {
        let tokens = parse_command_line(r#"add-expense 12.50 Food "team lunch""#).unwrap();
        assert_eq!(tokens, strings(&["add-expense", "12.50", "Food", "team lunch"]));
        assert!(parse_command_line(r#"add-expense "unterminated"#).is_err());
    }

    #[test]
    fn script_lines_record_and_report() {
        let dir = tempdir().unwrap();
        let clock = Box::new(FixedClock::new(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()));
        let mut context = ShellContext::with_base_dir(
            CliMode::Script,
            LaunchOptions::default(),
            dir.path().into(),
            clock,
        )
        .unwrap();

        for line in [
            "# comments and blank lines are skipped",
            "",
            "add-budget Food 100",
            "add-expense 150 food \"weekly groceries\"",
        ] {
            assert_eq!(handle_line(&mut context, line).unwrap(), LoopControl::Continue);
        }
        assert!(matches!(
            handle_line(&mut context, "add-expense -5 Food"),
            Err(CommandError::Core(_))
        ));
        assert_eq!(handle_line(&mut context, "quit").unwrap(), LoopControl::Exit);
        assert!(!context.running);

        let records = context.store.snapshot().unwrap();
        assert_eq!(records.budgets.len(), 1);
        assert_eq!(records.transactions.len(), 1);
        assert_eq!(records.transactions[0].category, "Food");
        assert_eq!(
            records.transactions[0].description.as_deref(),
            Some("weekly groceries")
        );
    }
}
