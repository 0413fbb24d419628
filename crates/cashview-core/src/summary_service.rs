use cashview_domain::{
    CategoryBreakdown, CategoryShare, DashboardSummary, DateWindow, MonthKey, MonthTotals,
    TransactionKind, UserId, YearTotal,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    aggregation_service::AggregationService,
    ratio::percentage,
    store::{BudgetStore, TransactionStore},
    CoreResult,
};

/// Number of expense categories listed on the dashboard.
pub const TOP_CATEGORY_LIMIT: usize = 5;

pub struct SummaryService;

impl SummaryService {
    /// Current-month overview. A user with no records gets an all-zero summary.
    pub fn dashboard(
        transactions: &dyn TransactionStore,
        budgets: &dyn BudgetStore,
        user: UserId,
        today: NaiveDate,
    ) -> CoreResult<DashboardSummary> {
        let month = MonthKey::of(today);
        let totals = Self::totals_for(transactions, user, month)?;
        let mut top_expense_categories = AggregationService::group_by_category(
            transactions,
            user,
            TransactionKind::Expense,
            Some(month.window()),
        )?;
        top_expense_categories.truncate(TOP_CATEGORY_LIMIT);
        let budget_count = budgets.find_budgets(user)?.len();

        debug!(%user, %month, income = %totals.income, expenses = %totals.expenses, "built dashboard");
        Ok(DashboardSummary {
            month,
            total_income: totals.income,
            total_expenses: totals.expenses,
            savings: totals.net,
            top_expense_categories,
            budget_count,
        })
    }

    /// Income, expenses and net for one explicit calendar month.
    pub fn month_totals(
        transactions: &dyn TransactionStore,
        user: UserId,
        year: i32,
        month: u32,
    ) -> CoreResult<MonthTotals> {
        let month = MonthKey::new(year, month)?;
        Self::totals_for(transactions, user, month)
    }

    /// Per-category totals with each category's share of the overall total.
    pub fn category_breakdown(
        transactions: &dyn TransactionStore,
        user: UserId,
        kind: TransactionKind,
        window: Option<DateWindow>,
    ) -> CoreResult<CategoryBreakdown> {
        let totals = AggregationService::group_by_category(transactions, user, kind, window)?;
        let total: Decimal = totals.iter().map(|entry| entry.total).sum();
        let categories = totals
            .into_iter()
            .map(|entry| CategoryShare {
                percentage: percentage(entry.total, total),
                category: entry.category,
                total: entry.total,
                count: entry.count,
            })
            .collect();
        Ok(CategoryBreakdown {
            kind,
            window,
            total,
            categories,
        })
    }

    pub fn yearly_totals(
        transactions: &dyn TransactionStore,
        user: UserId,
        kind: TransactionKind,
    ) -> CoreResult<Vec<YearTotal>> {
        AggregationService::group_by_year(transactions, user, kind)
    }

    fn totals_for(
        transactions: &dyn TransactionStore,
        user: UserId,
        month: MonthKey,
    ) -> CoreResult<MonthTotals> {
        let window = Some(month.window());
        let income =
            AggregationService::sum_in_range(transactions, user, TransactionKind::Income, None, window)?;
        let expenses =
            AggregationService::sum_in_range(transactions, user, TransactionKind::Expense, None, window)?;
        Ok(MonthTotals {
            month,
            income,
            expenses,
            net: income - expenses,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{store::RecordStore, ErrorKind, MemoryStore};
    use cashview_domain::{Budget, BudgetPeriod, Transaction};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn dashboard_for_new_user_is_all_zero() {
        let store = MemoryStore::new();
        let summary =
            SummaryService::dashboard(&store, &store, Uuid::new_v4(), date(2024, 5, 5)).unwrap();
        assert!(summary.is_new_user());
        assert_eq!(summary.savings, Decimal::ZERO);
        assert!(summary.top_expense_categories.is_empty());
    }

    #[test]
    fn dashboard_limits_to_current_month_and_top_five() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        let today = date(2024, 5, 15);
        let spends = [
            ("Food", dec!(60)),
            ("Transportation", dec!(50)),
            ("Entertainment", dec!(40)),
            ("Utilities", dec!(30)),
            ("Healthcare", dec!(20)),
            ("Other", dec!(10)),
        ];
        for (category, amount) in spends {
            store
                .insert_transaction(Transaction::expense(user, amount, category, date(2024, 5, 1)))
                .unwrap();
        }
        store
            .insert_transaction(Transaction::expense(user, dec!(999), "Other", date(2024, 4, 30)))
            .unwrap();
        store
            .insert_transaction(Transaction::income(user, dec!(100), "Salary", date(2024, 5, 31)))
            .unwrap();
        store
            .insert_budget(Budget::new(user, "Food", dec!(50), BudgetPeriod::Monthly, today))
            .unwrap();

        let summary = SummaryService::dashboard(&store, &store, user, today).unwrap();
        assert_eq!(summary.total_income, dec!(100));
        assert_eq!(summary.total_expenses, dec!(210));
        assert_eq!(summary.savings, dec!(-110));
        assert_eq!(summary.top_expense_categories.len(), TOP_CATEGORY_LIMIT);
        assert_eq!(summary.top_expense_categories[0].category, "Food");
        assert!(summary
            .top_expense_categories
            .iter()
            .all(|entry| entry.category != "Other"));
        assert_eq!(summary.budget_count, 1);
        assert!(!summary.is_new_user());
    }

    #[test]
    fn month_totals_validate_month() {
        let store = MemoryStore::new();
        let err = SummaryService::month_totals(&store, Uuid::new_v4(), 2024, 13).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        let ok = SummaryService::month_totals(&store, Uuid::new_v4(), 2024, 12).unwrap();
        assert_eq!(ok.net, Decimal::ZERO);
    }

    #[test]
    fn breakdown_shares_sum_of_parts() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        for (category, amount) in [("Salary", dec!(300)), ("Gift", dec!(100))] {
            store
                .insert_transaction(Transaction::income(user, amount, category, date(2024, 1, 1)))
                .unwrap();
        }
        let breakdown =
            SummaryService::category_breakdown(&store, user, TransactionKind::Income, None).unwrap();
        assert_eq!(breakdown.total, dec!(400));
        assert_eq!(breakdown.categories[0].percentage, dec!(75));
        assert_eq!(breakdown.categories[1].percentage, dec!(25));

        let empty =
            SummaryService::category_breakdown(&store, user, TransactionKind::Expense, None).unwrap();
        assert_eq!(empty.total, Decimal::ZERO);
        assert!(empty.categories.is_empty());
    }
}
