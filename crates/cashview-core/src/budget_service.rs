use cashview_domain::{
    BudgetHealth, BudgetPerformance, BudgetStatusEntry, BudgetStatusReport, MonthKey,
    PerformanceStatus, TransactionKind, UserId,
};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    aggregation_service::AggregationService,
    period::PeriodResolver,
    ratio::{exact_percentage, round2, safe_div},
    store::{BudgetStore, TransactionStore},
    CoreResult,
};

pub struct BudgetService;

impl BudgetService {
    /// Spend per budget over each budget's own resolved window.
    ///
    /// Each budget is summed with a separate read; concurrent writes may land between them.
    pub fn status(
        transactions: &dyn TransactionStore,
        budgets: &dyn BudgetStore,
        user: UserId,
    ) -> CoreResult<BudgetStatusReport> {
        let budgets = budgets.find_budgets(user)?;
        if budgets.is_empty() {
            debug!(%user, "no budgets for status report");
            return Ok(BudgetStatusReport::NoBudgets);
        }

        let mut entries = Vec::with_capacity(budgets.len());
        for budget in budgets {
            let window = PeriodResolver::for_budget(&budget);
            let total_spent = AggregationService::sum_in_range(
                transactions,
                user,
                TransactionKind::Expense,
                Some(&budget.category),
                Some(window),
            )?;
            entries.push(BudgetStatusEntry {
                budget_id: budget.id,
                status: BudgetHealth::classify(total_spent, budget.limit),
                remaining: budget.limit - total_spent,
                category: budget.category,
                period: budget.period,
                limit: budget.limit,
                window,
                total_spent,
            });
        }
        Ok(BudgetStatusReport::Budgets(entries))
    }

    /// Month-to-date usage per budget, most consumed first.
    ///
    /// Every budget is measured against the calendar month containing `today`,
    /// whatever its period. The tier comes from the unrounded ratio; only the
    /// reported `percent_used` is rounded to 2 dp. A zero limit reports 0% used
    /// and is Exceeded as soon as anything is spent.
    pub fn performance(
        transactions: &dyn TransactionStore,
        budgets: &dyn BudgetStore,
        user: UserId,
        today: NaiveDate,
    ) -> CoreResult<Vec<BudgetPerformance>> {
        let month = MonthKey::of(today);
        let window = month.window();
        let days_left = i64::from(month.days()) - i64::from(today.day());

        let mut rows = Vec::new();
        for budget in budgets.find_budgets(user)? {
            let spent = AggregationService::sum_in_range(
                transactions,
                user,
                TransactionKind::Expense,
                Some(&budget.category),
                Some(window),
            )?;
            let remaining = budget.limit - spent;
            let (exact, status) = if budget.limit.is_zero() {
                let status = if spent > Decimal::ZERO {
                    PerformanceStatus::Exceeded
                } else {
                    PerformanceStatus::Good
                };
                (Decimal::ZERO, status)
            } else {
                let exact = exact_percentage(spent, budget.limit);
                (exact, PerformanceStatus::classify(exact))
            };
            let daily_budget_remaining = if days_left > 0 {
                round2(safe_div(remaining, Decimal::from(days_left)))
            } else {
                Decimal::ZERO
            };
            rows.push((
                exact,
                BudgetPerformance {
                    budget_id: budget.id,
                    category: budget.category,
                    limit: budget.limit,
                    spent,
                    remaining,
                    percent_used: round2(exact),
                    status,
                    days_left,
                    daily_budget_remaining,
                },
            ));
        }
        rows.sort_by(|a, b| b.0.cmp(&a.0));
        let rows: Vec<BudgetPerformance> = rows.into_iter().map(|(_, row)| row).collect();
        debug!(%user, %month, budgets = rows.len(), "computed budget performance");
        Ok(rows)
    }
}
