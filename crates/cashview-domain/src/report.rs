//! Report values. Computed on demand, never persisted.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{BudgetPeriod, DateWindow, MonthKey, TransactionKind};

/// Spend against a budget's own resolved window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BudgetHealth {
    #[serde(rename = "Over Budget")]
    OverBudget,
    #[serde(rename = "At Budget")]
    AtBudget,
    #[serde(rename = "Under Budget")]
    UnderBudget,
}

impl BudgetHealth {
    /// Exact comparison; amounts are decimals so equality carries no rounding noise.
    pub fn classify(spent: Decimal, limit: Decimal) -> Self {
        if spent > limit {
            BudgetHealth::OverBudget
        } else if spent == limit {
            BudgetHealth::AtBudget
        } else {
            BudgetHealth::UnderBudget
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BudgetHealth::OverBudget => "Over Budget",
            BudgetHealth::AtBudget => "At Budget",
            BudgetHealth::UnderBudget => "Under Budget",
        }
    }
}

impl fmt::Display for BudgetHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetStatusEntry {
    pub budget_id: Uuid,
    pub category: String,
    pub period: BudgetPeriod,
    pub limit: Decimal,
    pub window: DateWindow,
    pub total_spent: Decimal,
    pub remaining: Decimal,
    pub status: BudgetHealth,
}

/// Budget Status outcome. `NoBudgets` is distinct from a list of statuses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "budgets", rename_all = "snake_case")]
pub enum BudgetStatusReport {
    NoBudgets,
    Budgets(Vec<BudgetStatusEntry>),
}

impl BudgetStatusReport {
    pub fn entries(&self) -> &[BudgetStatusEntry] {
        match self {
            BudgetStatusReport::NoBudgets => &[],
            BudgetStatusReport::Budgets(entries) => entries,
        }
    }

    pub fn has_budgets(&self) -> bool {
        matches!(self, BudgetStatusReport::Budgets(_))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardSummary {
    pub month: MonthKey,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub savings: Decimal,
    pub top_expense_categories: Vec<CategoryTotal>,
    pub budget_count: usize,
}

impl DashboardSummary {
    /// Nothing recorded yet: no income, no expenses and no budgets.
    ///
    /// Computed for the consumer; the summary itself does not change shape for new users.
    pub fn is_new_user(&self) -> bool {
        self.total_income.is_zero() && self.total_expenses.is_zero() && self.budget_count == 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CashFlowEntry {
    pub period: MonthKey,
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CashFlowSeries {
    pub months: u32,
    pub entries: Vec<CashFlowEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavingsBucket {
    pub period: MonthKey,
    pub income: Decimal,
    pub expenses: Decimal,
    pub monthly_savings: Decimal,
    pub savings_rate: Decimal,
    pub cumulative_savings: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavingsSummary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub total_saved: Decimal,
    pub overall_savings_rate: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavingsAnalysis {
    pub buckets: Vec<SavingsBucket>,
    pub summary: SavingsSummary,
}

/// Month-to-date usage tier for a budget.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PerformanceStatus {
    Exceeded,
    Warning,
    Caution,
    Good,
}

impl PerformanceStatus {
    /// Thresholds are closed at the lower edge: 90 is Warning, 100 is still Warning.
    pub fn classify(percent_used: Decimal) -> Self {
        if percent_used > Decimal::ONE_HUNDRED {
            PerformanceStatus::Exceeded
        } else if percent_used >= Decimal::from(90) {
            PerformanceStatus::Warning
        } else if percent_used >= Decimal::from(75) {
            PerformanceStatus::Caution
        } else {
            PerformanceStatus::Good
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PerformanceStatus::Exceeded => "Exceeded",
            PerformanceStatus::Warning => "Warning",
            PerformanceStatus::Caution => "Caution",
            PerformanceStatus::Good => "Good",
        }
    }
}

impl fmt::Display for PerformanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetPerformance {
    pub budget_id: Uuid,
    pub category: String,
    pub limit: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub percent_used: Decimal,
    pub status: PerformanceStatus,
    pub days_left: i64,
    pub daily_budget_remaining: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub total: Decimal,
    pub count: usize,
    pub percentage: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryBreakdown {
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<DateWindow>,
    pub total: Decimal,
    pub categories: Vec<CategoryShare>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearTotal {
    pub year: i32,
    pub total: Decimal,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthTotals {
    pub month: MonthKey,
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
}
