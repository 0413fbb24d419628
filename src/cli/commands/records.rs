//! Commands that create, change, remove or list stored records.

use cashview_core::{BudgetStore, NewBudget, NewTransaction, RecordService};
use cashview_domain::{
    Budget, BudgetPatch, BudgetPeriod, DateWindow, Transaction, TransactionKind, TransactionPatch,
};
use uuid::Uuid;

use crate::cli::commands::expect_args;
use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::format;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};

const RECURRING_FLAG: &str = "--recurring";
const CLEAR_VALUE: &str = "none";

const ADD_EXPENSE_USAGE: &str =
    "add-expense <amount> <category> [YYYY-MM-DD] [description] [--recurring]";
const ADD_INCOME_USAGE: &str =
    "add-income <amount> <category> [YYYY-MM-DD] [description] [--recurring]";
const ADD_BUDGET_USAGE: &str = "add-budget <category> <limit> [period] [start] [end]";
const UPDATE_BUDGET_USAGE: &str = "update-budget <id> <category|limit|period|start|end> <value>";
const UPDATE_TRANSACTION_USAGE: &str =
    "update-transaction <id> <amount|category|date|recurring|description> <value>";
const TRANSACTIONS_USAGE: &str = "transactions <income|expense> <start> <end>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("add-expense", "Record an expense", ADD_EXPENSE_USAGE, cmd_add_expense),
        CommandEntry::new("add-income", "Record an income", ADD_INCOME_USAGE, cmd_add_income),
        CommandEntry::new(
            "add-budget",
            "Create a spending limit for an expense category",
            ADD_BUDGET_USAGE,
            cmd_add_budget,
        ),
        CommandEntry::new(
            "update-budget",
            "Change one field of a budget",
            UPDATE_BUDGET_USAGE,
            cmd_update_budget,
        ),
        CommandEntry::new(
            "update-transaction",
            "Change one field of a transaction",
            UPDATE_TRANSACTION_USAGE,
            cmd_update_transaction,
        ),
        CommandEntry::new(
            "remove-budget",
            "Delete a budget",
            "remove-budget <id>",
            cmd_remove_budget,
        ),
        CommandEntry::new(
            "remove-transaction",
            "Delete a transaction",
            "remove-transaction <id>",
            cmd_remove_transaction,
        ),
        CommandEntry::new("list-budgets", "List your budgets", "list-budgets", cmd_list_budgets),
        CommandEntry::new(
            "transactions",
            "List income or expense records between two dates",
            TRANSACTIONS_USAGE,
            cmd_transactions,
        ),
    ]
}

fn cmd_add_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    add_transaction(context, TransactionKind::Expense, args, ADD_EXPENSE_USAGE)
}

fn cmd_add_income(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    add_transaction(context, TransactionKind::Income, args, ADD_INCOME_USAGE)
}

fn add_transaction(
    context: &mut ShellContext,
    kind: TransactionKind,
    args: &[&str],
    usage: &str,
) -> CommandResult {
    let recurring = args.iter().any(|arg| arg.eq_ignore_ascii_case(RECURRING_FLAG));
    let args: Vec<&str> = args
        .iter()
        .copied()
        .filter(|arg| !arg.eq_ignore_ascii_case(RECURRING_FLAG))
        .collect();
    if args.len() < 2 {
        return Err(CommandError::InvalidArguments(format!("usage: {usage}")));
    }

    let mut input = NewTransaction::new(kind, format::parse_amount(args[0])?, args[1]);
    input.recurring = recurring;
    let mut rest = &args[2..];
    if let Some(first) = rest.first() {
        if format::looks_like_date(first) {
            input = input.on(format::parse_date(first)?);
            rest = &rest[1..];
        }
    }
    if !rest.is_empty() {
        input.description = Some(rest.join(" "));
    }

    let txn = RecordService::add_transaction(&context.store, &*context.clock, context.user, input)?;
    let currency = context.currency();
    context.emit(&txn, |txn| {
        output::success(format!(
            "Recorded {} of {} in {} on {} ({})",
            txn.kind,
            format::money(txn.amount, currency),
            txn.category,
            txn.date,
            txn.id
        ))
    })
}

fn cmd_add_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 2, 5, ADD_BUDGET_USAGE)?;
    let period = match args.get(2) {
        Some(raw) => parse_period(raw)?,
        None => BudgetPeriod::default(),
    };
    let mut input = NewBudget::new(args[0], format::parse_amount(args[1])?, period);
    if let Some(start) = args.get(3) {
        input = input.starting(format::parse_date(start)?);
    }
    if let Some(end) = args.get(4) {
        input.end_date = Some(format::parse_date(end)?);
    }

    let budget = RecordService::add_budget(&context.store, &*context.clock, context.user, input)?;
    let currency = context.currency();
    context.emit(&budget, |budget| {
        output::success(format!(
            "Created {} budget for {} at {} ({})",
            budget.period,
            budget.category,
            format::money(budget.limit, currency),
            budget.id
        ))
    })
}

fn cmd_update_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 3, 3, UPDATE_BUDGET_USAGE)?;
    let id = parse_id(args[0])?;
    let value = args[2];
    let mut patch = BudgetPatch::default();
    match args[1].to_lowercase().as_str() {
        "category" => patch.category = Some(value.to_string()),
        "limit" => patch.limit = Some(format::parse_amount(value)?),
        "period" => patch.period = Some(parse_period(value)?),
        "start" => patch.start_date = Some(format::parse_date(value)?),
        "end" if value.eq_ignore_ascii_case(CLEAR_VALUE) => patch.end_date = Some(None),
        "end" => patch.end_date = Some(Some(format::parse_date(value)?)),
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown budget field `{other}`; usage: {UPDATE_BUDGET_USAGE}"
            )))
        }
    }

    let budget = RecordService::update_budget(&context.store, context.user, id, patch)?;
    context.emit(&budget, |budget| {
        output::success(format!("Updated budget {} ({})", budget.category, budget.id))
    })
}

fn cmd_update_transaction(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 3, 3, UPDATE_TRANSACTION_USAGE)?;
    let id = parse_id(args[0])?;
    let value = args[2];
    let mut patch = TransactionPatch::default();
    match args[1].to_lowercase().as_str() {
        "amount" => patch.amount = Some(format::parse_amount(value)?),
        "category" => patch.category = Some(value.to_string()),
        "date" => patch.date = Some(format::parse_date(value)?),
        "recurring" => patch.recurring = Some(parse_flag(value)?),
        "description" if value.eq_ignore_ascii_case(CLEAR_VALUE) => patch.description = Some(None),
        "description" => patch.description = Some(Some(value.to_string())),
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown transaction field `{other}`; usage: {UPDATE_TRANSACTION_USAGE}"
            )))
        }
    }

    let txn = RecordService::update_transaction(&context.store, context.user, id, patch)?;
    context.emit(&txn, |txn| {
        output::success(format!("Updated {} {} ({})", txn.kind, txn.category, txn.id))
    })
}

fn cmd_remove_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 1, 1, "remove-budget <id>")?;
    let removed = RecordService::remove_budget(&context.store, context.user, parse_id(args[0])?)?;
    context.emit(&removed, |budget| {
        output::success(format!("Removed budget {} ({})", budget.category, budget.id))
    })
}

fn cmd_remove_transaction(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 1, 1, "remove-transaction <id>")?;
    let removed =
        RecordService::remove_transaction(&context.store, context.user, parse_id(args[0])?)?;
    context.emit(&removed, |txn| {
        output::success(format!("Removed {} {} ({})", txn.kind, txn.category, txn.id))
    })
}

fn cmd_list_budgets(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 0, 0, "list-budgets")?;
    let budgets = context.store.find_budgets(context.user)?;
    let currency = context.currency();
    context.emit(&budgets, |budgets| render_budgets(budgets, currency))
}

fn render_budgets(budgets: &[Budget], currency: &str) {
    output::section("Budgets");
    if budgets.is_empty() {
        output::info("No budgets yet.");
        return;
    }
    let mut table = Table::new(vec![
        TableColumn::left("Id"),
        TableColumn::left("Category"),
        TableColumn::right("Limit"),
        TableColumn::left("Period"),
        TableColumn::left("Start"),
        TableColumn::left("End"),
    ]);
    for budget in budgets {
        table.push_row(vec![
            budget.id.to_string(),
            budget.category.clone(),
            format::money(budget.limit, currency),
            budget.period.to_string(),
            budget.start_date.to_string(),
            budget
                .end_date
                .map(|date| date.to_string())
                .unwrap_or_else(|| "-".into()),
        ]);
    }
    output::info(table.render());
}

fn cmd_transactions(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 3, 3, TRANSACTIONS_USAGE)?;
    let kind = format::parse_kind(Some(args[0]))?;
    let window = DateWindow::new(format::parse_date(args[1])?, format::parse_date(args[2])?)
        .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
    let found = RecordService::transactions_between(&context.store, context.user, kind, window)?;
    let currency = context.currency();
    context.emit(&found, |found| render_transactions(found, currency))
}

fn render_transactions(transactions: &[Transaction], currency: &str) {
    output::section(format!("{} records", transactions.len()));
    let mut table = Table::new(vec![
        TableColumn::left("Id"),
        TableColumn::left("Date"),
        TableColumn::left("Category"),
        TableColumn::right("Amount"),
        TableColumn::left("Description"),
    ]);
    for txn in transactions {
        let mut description = txn.description.clone().unwrap_or_default();
        if txn.recurring {
            description = format!("{description} (recurring)").trim_start().to_string();
        }
        table.push_row(vec![
            txn.id.to_string(),
            txn.date.to_string(),
            txn.category.clone(),
            format::money(txn.amount, currency),
            description,
        ]);
    }
    output::info(table.render());
}

fn parse_id(raw: &str) -> Result<Uuid, CommandError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a valid id")))
}

fn parse_period(raw: &str) -> Result<BudgetPeriod, CommandError> {
    BudgetPeriod::parse(raw).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "unknown period `{raw}` (daily, weekly, monthly, quarterly, yearly)"
        ))
    })
}

fn parse_flag(raw: &str) -> Result<bool, CommandError> {
    match raw.to_ascii_lowercase().as_str() {
        "yes" | "true" | "on" => Ok(true),
        "no" | "false" | "off" => Ok(false),
        _ => Err(CommandError::InvalidArguments(format!(
            "`{raw}` is not yes/no"
        ))),
    }
}
