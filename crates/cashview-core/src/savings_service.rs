use cashview_domain::{SavingsAnalysis, SavingsBucket, SavingsSummary, TransactionKind, UserId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    aggregation_service::AggregationService, buckets::TimeBucketer, ratio::percentage,
    store::TransactionStore, CoreResult,
};

pub const DEFAULT_SAVINGS_MONTHS: u32 = 12;

pub struct SavingsService;

impl SavingsService {
    /// Monthly savings trend over the trailing `months` with a running total.
    ///
    /// Rates are `savings / income × 100` rounded to 2 dp and are zero when income is zero.
    pub fn analysis(
        transactions: &dyn TransactionStore,
        user: UserId,
        today: NaiveDate,
        months: u32,
    ) -> CoreResult<SavingsAnalysis> {
        let buckets = TimeBucketer::trailing_months(today, months);
        let (income, expenses) = match TimeBucketer::span(&buckets) {
            Some(window) => (
                AggregationService::group_by_month(
                    transactions,
                    user,
                    TransactionKind::Income,
                    Some(window),
                )?,
                AggregationService::group_by_month(
                    transactions,
                    user,
                    TransactionKind::Expense,
                    Some(window),
                )?,
            ),
            None => Default::default(),
        };

        let mut cumulative = Decimal::ZERO;
        let mut total_income = Decimal::ZERO;
        let mut total_expenses = Decimal::ZERO;
        let mut rows = Vec::with_capacity(buckets.len());
        for period in buckets {
            let income = income.get(&period).copied().unwrap_or(Decimal::ZERO);
            let expenses = expenses.get(&period).copied().unwrap_or(Decimal::ZERO);
            let monthly_savings = income - expenses;
            cumulative += monthly_savings;
            total_income += income;
            total_expenses += expenses;
            rows.push(SavingsBucket {
                period,
                income,
                expenses,
                monthly_savings,
                savings_rate: percentage(monthly_savings, income),
                cumulative_savings: cumulative,
            });
        }

        let total_saved = total_income - total_expenses;
        let summary = SavingsSummary {
            total_income,
            total_expenses,
            total_saved,
            overall_savings_rate: percentage(total_saved, total_income),
        };
        debug!(%user, months, %total_saved, "built savings analysis");
        Ok(SavingsAnalysis {
            buckets: rows,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{store::RecordStore, MemoryStore};
    use cashview_domain::Transaction;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn spending_without_income_has_zero_rate() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        store
            .insert_transaction(Transaction::expense(user, dec!(40), "Food", date(2024, 2, 3)))
            .unwrap();

        let analysis = SavingsService::analysis(&store, user, date(2024, 2, 20), 2).unwrap();
        assert_eq!(analysis.buckets.len(), 2);
        let feb = &analysis.buckets[1];
        assert_eq!(feb.monthly_savings, dec!(-40));
        assert_eq!(feb.savings_rate, Decimal::ZERO);
        assert_eq!(feb.cumulative_savings, dec!(-40));
        assert_eq!(analysis.summary.overall_savings_rate, Decimal::ZERO);
    }

    #[test]
    fn zero_months_has_empty_buckets_and_zero_summary() {
        let store = MemoryStore::new();
        let analysis = SavingsService::analysis(&store, Uuid::new_v4(), date(2024, 2, 20), 0).unwrap();
        assert!(analysis.buckets.is_empty());
        assert_eq!(analysis.summary.total_saved, Decimal::ZERO);
    }
}
