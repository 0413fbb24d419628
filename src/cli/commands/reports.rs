//! Read-only report commands. Each prints a table, or JSON in JSON mode.

use cashview_core::{
    parse_months, BudgetService, CashFlowService, SavingsService, SummaryService,
};
use cashview_domain::{
    BudgetStatusReport, CategoryBreakdown, CashFlowSeries, DashboardSummary, SavingsAnalysis,
};
use tracing::debug;

use crate::cli::commands::expect_args;
use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::format;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "budget-status",
            "Spending against each budget over its own period",
            "budget-status",
            cmd_budget_status,
        ),
        CommandEntry::new(
            "dashboard",
            "Current month income, expenses, savings and top categories",
            "dashboard",
            cmd_dashboard,
        ),
        CommandEntry::new(
            "cash-flow",
            "Monthly income, expenses and net for recent months",
            "cash-flow [months]",
            cmd_cash_flow,
        ),
        CommandEntry::new(
            "savings",
            "Monthly savings, savings rate and running total",
            "savings [months]",
            cmd_savings,
        ),
        CommandEntry::new(
            "budget-performance",
            "Month-to-date budget usage, most consumed first",
            "budget-performance",
            cmd_budget_performance,
        ),
        CommandEntry::new(
            "breakdown",
            "Totals per category with their share of the whole",
            "breakdown [income|expense] [YYYY-MM]",
            cmd_breakdown,
        ),
        CommandEntry::new(
            "yearly",
            "Totals per calendar year",
            "yearly [income|expense]",
            cmd_yearly,
        ),
        CommandEntry::new(
            "month",
            "Income, expenses and net for one month",
            "month <year> <month>",
            cmd_month,
        ),
    ]
}

fn cmd_budget_status(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 0, 0, "budget-status")?;
    let report = BudgetService::status(&context.store, &context.store, context.user)?;
    let currency = context.currency();
    context.emit(&report, |report| render_budget_status(report, currency))
}

fn render_budget_status(report: &BudgetStatusReport, currency: &str) {
    output::section("Budget status");
    if !report.has_budgets() {
        output::info("No budgets yet.");
        output::hint("Create one with `add-budget <category> <limit> [period]`.");
        return;
    }
    let mut table = Table::new(vec![
        TableColumn::left("Category"),
        TableColumn::left("Period"),
        TableColumn::left("Window"),
        TableColumn::right("Limit"),
        TableColumn::right("Spent"),
        TableColumn::right("Remaining"),
        TableColumn::left("Status"),
    ]);
    for entry in report.entries() {
        table.push_row(vec![
            entry.category.clone(),
            entry.period.to_string(),
            entry.window.to_string(),
            format::money(entry.limit, currency),
            format::money(entry.total_spent, currency),
            format::money(entry.remaining, currency),
            format::health(entry.status),
        ]);
    }
    output::info(table.render());
}

fn cmd_dashboard(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 0, 0, "dashboard")?;
    let summary = SummaryService::dashboard(
        &context.store,
        &context.store,
        context.user,
        context.today(),
    )?;
    let currency = context.currency();
    context.emit(&summary, |summary| render_dashboard(summary, currency))
}

fn render_dashboard(summary: &DashboardSummary, currency: &str) {
    output::section(format!("Dashboard {}", summary.month));
    if summary.is_new_user() {
        output::info("Nothing recorded yet.");
        output::hint("Start with `add-income <amount> <category>` or `add-budget`.");
        return;
    }
    output::info(format!("  Income   : {}", format::money(summary.total_income, currency)));
    output::info(format!("  Expenses : {}", format::money(summary.total_expenses, currency)));
    output::info(format!("  Savings  : {}", format::money(summary.savings, currency)));
    output::info(format!("  Budgets  : {}", summary.budget_count));

    if summary.top_expense_categories.is_empty() {
        return;
    }
    let mut table = Table::new(vec![
        TableColumn::left("Top expenses"),
        TableColumn::right("Count"),
        TableColumn::right("Total"),
    ]);
    for entry in &summary.top_expense_categories {
        table.push_row(vec![
            entry.category.clone(),
            entry.count.to_string(),
            format::money(entry.total, currency),
        ]);
    }
    output::info(table.render());
}

fn cmd_cash_flow(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 0, 1, "cash-flow [months]")?;
    let months = parse_months(args.first().copied(), context.config.cash_flow_months)?;
    let series = CashFlowService::series(&context.store, context.user, context.today(), months)?;
    let currency = context.currency();
    context.emit(&series, |series| render_cash_flow(series, currency))
}

fn render_cash_flow(series: &CashFlowSeries, currency: &str) {
    output::section(format!("Cash flow, last {} months", series.months));
    if series.entries.is_empty() {
        output::info("No months requested.");
        return;
    }
    let mut table = Table::new(vec![
        TableColumn::left("Month"),
        TableColumn::right("Income"),
        TableColumn::right("Expenses"),
        TableColumn::right("Net"),
    ]);
    for entry in &series.entries {
        table.push_row(vec![
            entry.period.to_string(),
            format::money(entry.income, currency),
            format::money(entry.expenses, currency),
            format::money(entry.net, currency),
        ]);
    }
    output::info(table.render());
}

fn cmd_savings(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 0, 1, "savings [months]")?;
    let months = parse_months(args.first().copied(), context.config.savings_months)?;
    let analysis = SavingsService::analysis(&context.store, context.user, context.today(), months)?;
    let currency = context.currency();
    context.emit(&analysis, |analysis| render_savings(analysis, currency))
}

fn render_savings(analysis: &SavingsAnalysis, currency: &str) {
    output::section("Savings");
    if !analysis.buckets.is_empty() {
        let mut table = Table::new(vec![
            TableColumn::left("Month"),
            TableColumn::right("Income"),
            TableColumn::right("Expenses"),
            TableColumn::right("Saved"),
            TableColumn::right("Rate"),
            TableColumn::right("Cumulative"),
        ]);
        for bucket in &analysis.buckets {
            table.push_row(vec![
                bucket.period.to_string(),
                format::money(bucket.income, currency),
                format::money(bucket.expenses, currency),
                format::money(bucket.monthly_savings, currency),
                format::percent(bucket.savings_rate),
                format::money(bucket.cumulative_savings, currency),
            ]);
        }
        output::info(table.render());
    }
    let summary = &analysis.summary;
    output::info(format!("  Total income   : {}", format::money(summary.total_income, currency)));
    output::info(format!("  Total expenses : {}", format::money(summary.total_expenses, currency)));
    output::info(format!("  Total saved    : {}", format::money(summary.total_saved, currency)));
    output::info(format!("  Savings rate   : {}", format::percent(summary.overall_savings_rate)));
}

fn cmd_budget_performance(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 0, 0, "budget-performance")?;
    let rows = BudgetService::performance(
        &context.store,
        &context.store,
        context.user,
        context.today(),
    )?;
    let currency = context.currency();
    context.emit(&rows, |rows| {
        output::section("Budget performance");
        if rows.is_empty() {
            output::info("No budgets yet.");
            return;
        }
        let mut table = Table::new(vec![
            TableColumn::left("Category"),
            TableColumn::right("Limit"),
            TableColumn::right("Spent"),
            TableColumn::right("Remaining"),
            TableColumn::right("Used"),
            TableColumn::left("Status"),
            TableColumn::right("Days left"),
            TableColumn::right("Per day"),
        ]);
        for row in rows {
            table.push_row(vec![
                row.category.clone(),
                format::money(row.limit, currency),
                format::money(row.spent, currency),
                format::money(row.remaining, currency),
                format::percent(row.percent_used),
                format::performance(row.status),
                row.days_left.to_string(),
                format::money(row.daily_budget_remaining, currency),
            ]);
        }
        output::info(table.render());
    })
}

fn cmd_breakdown(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 0, 2, "breakdown [income|expense] [YYYY-MM]")?;
    let kind = format::parse_kind(args.first().copied())?;
    let window = match args.get(1) {
        Some(raw) => Some(format::parse_month(raw)?.window()),
        None => None,
    };
    debug!(%kind, ?window, "category breakdown requested");
    let breakdown = SummaryService::category_breakdown(&context.store, context.user, kind, window)?;
    let currency = context.currency();
    context.emit(&breakdown, |breakdown| render_breakdown(breakdown, currency))
}

fn render_breakdown(breakdown: &CategoryBreakdown, currency: &str) {
    match breakdown.window {
        Some(window) => output::section(format!("{} by category, {window}", breakdown.kind)),
        None => output::section(format!("{} by category, all time", breakdown.kind)),
    }
    if breakdown.categories.is_empty() {
        output::info("Nothing recorded.");
        return;
    }
    let mut table = Table::new(vec![
        TableColumn::left("Category"),
        TableColumn::right("Count"),
        TableColumn::right("Total"),
        TableColumn::right("Share"),
    ]);
    for share in &breakdown.categories {
        table.push_row(vec![
            share.category.clone(),
            share.count.to_string(),
            format::money(share.total, currency),
            format::percent(share.percentage),
        ]);
    }
    output::info(table.render());
    output::info(format!("  Total: {}", format::money(breakdown.total, currency)));
}

fn cmd_yearly(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 0, 1, "yearly [income|expense]")?;
    let kind = format::parse_kind(args.first().copied())?;
    let years = SummaryService::yearly_totals(&context.store, context.user, kind)?;
    let currency = context.currency();
    context.emit(&years, |years| {
        output::section(format!("{kind} per year"));
        if years.is_empty() {
            output::info("Nothing recorded.");
            return;
        }
        let mut table = Table::new(vec![
            TableColumn::left("Year"),
            TableColumn::right("Count"),
            TableColumn::right("Total"),
        ]);
        for year in years {
            table.push_row(vec![
                year.year.to_string(),
                year.count.to_string(),
                format::money(year.total, currency),
            ]);
        }
        output::info(table.render());
    })
}

fn cmd_month(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 2, 2, "month <year> <month>")?;
    let year = args[0]
        .parse::<i32>()
        .map_err(|_| CommandError::InvalidArguments(format!("`{}` is not a year", args[0])))?;
    let month = args[1]
        .parse::<u32>()
        .map_err(|_| CommandError::InvalidArguments(format!("`{}` is not a month", args[1])))?;
    let totals = SummaryService::month_totals(&context.store, context.user, year, month)?;
    let currency = context.currency();
    context.emit(&totals, |totals| {
        output::section(format!("Month {}", totals.month));
        output::info(format!("  Income   : {}", format::money(totals.income, currency)));
        output::info(format!("  Expenses : {}", format::money(totals.expenses, currency)));
        output::info(format!("  Net      : {}", format::money(totals.net, currency)));
    })
}
