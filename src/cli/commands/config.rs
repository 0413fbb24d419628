use cashview_config::{Config, OutputFormat};
use serde::Serialize;
use tracing::info;

use crate::cli::commands::expect_args;
use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};

const USAGE: &str = "config [show | get <key> | set <key> <value>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change CLI preferences",
        USAGE,
        cmd_config,
    )]
}

#[derive(Serialize)]
struct ConfigValue<'a> {
    key: &'a str,
    value: String,
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(action) = args.first() else {
        return show(context);
    };
    match action.to_lowercase().as_str() {
        "show" => show(context),
        "get" => {
            expect_args(args, 2, 2, USAGE)?;
            let value = ConfigValue {
                key: args[1],
                value: context.config.get_value(args[1])?,
            };
            context.emit(&value, |entry| output::info(format!("{} = {}", entry.key, entry.value)))
        }
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(format!("usage: {USAGE}")));
            }
            set(context, args[1], &args[2..].join(" "))
        }
        other => Err(CommandError::InvalidArguments(format!(
            "unknown config action `{other}`; usage: {USAGE}"
        ))),
    }
}

fn show(context: &ShellContext) -> CommandResult {
    context.emit(&context.config, |config| {
        output::section("Configuration");
        output::info(config_table(config).render());
        output::hint(format!(
            "Stored in {}",
            context.config_manager.config_path().display()
        ));
    })
}

fn config_table(config: &Config) -> Table {
    let mut table = Table::new(vec![TableColumn::left("Key"), TableColumn::left("Value")]);
    for key in Config::KEYS {
        let value = config.get_value(key).unwrap_or_default();
        table.push_row(vec![key.to_string(), value]);
    }
    table
}

fn set(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    let mut updated = context.config.clone();
    updated.set_value(key, value)?;
    context.config = updated;
    context.persist_config()?;
    info!(key, "updated configuration");

    match key {
        "ui_color_enabled" => output::set_color_enabled(context.config.ui_color_enabled),
        "output" => context.json_output = context.config.output == OutputFormat::Json,
        "default_user" | "data_file" => {
            output::hint("The new value takes effect the next time cashview starts.")
        }
        _ => {}
    }

    let value = ConfigValue {
        key,
        value: context.config.get_value(key)?,
    };
    context.emit(&value, |entry| output::success(format!("{} = {}", entry.key, entry.value)))
}
