//! Cell formatting and argument parsing shared by the command handlers.

use std::str::FromStr;

use cashview_domain::{BudgetHealth, MonthKey, PerformanceStatus, TransactionKind};
use chrono::NaiveDate;
use colored::Colorize;
use rust_decimal::Decimal;

use crate::cli::CommandError;

pub fn money(amount: Decimal, currency: &str) -> String {
    format!("{:.2} {currency}", amount)
}

pub fn percent(value: Decimal) -> String {
    format!("{:.2}%", value)
}

pub fn health(status: BudgetHealth) -> String {
    let label = status.label();
    match status {
        BudgetHealth::OverBudget => label.bright_red().to_string(),
        BudgetHealth::AtBudget => label.bright_yellow().to_string(),
        BudgetHealth::UnderBudget => label.bright_green().to_string(),
    }
}

pub fn performance(status: PerformanceStatus) -> String {
    let label = status.label();
    match status {
        PerformanceStatus::Exceeded => label.bright_red().to_string(),
        PerformanceStatus::Warning => label.bright_yellow().to_string(),
        PerformanceStatus::Caution => label.yellow().to_string(),
        PerformanceStatus::Good => label.bright_green().to_string(),
    }
}

pub fn parse_amount(raw: &str) -> Result<Decimal, CommandError> {
    Decimal::from_str(raw.trim())
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a valid amount")))
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("`{raw}` is not a date (expected YYYY-MM-DD)"))
    })
}

pub fn looks_like_date(raw: &str) -> bool {
    parse_date(raw).is_ok()
}

pub fn parse_month(raw: &str) -> Result<MonthKey, CommandError> {
    raw.parse::<MonthKey>()
        .map_err(|err| CommandError::InvalidArguments(err.to_string()))
}

/// Reads an optional `income|expense` argument, defaulting to expenses.
pub fn parse_kind(raw: Option<&str>) -> Result<TransactionKind, CommandError> {
    match raw {
        None => Ok(TransactionKind::Expense),
        Some(value) => value
            .parse::<TransactionKind>()
            .map_err(CommandError::InvalidArguments),
    }
}
