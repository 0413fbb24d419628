use cashview_domain::{CashFlowEntry, CashFlowSeries, TransactionKind, UserId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    aggregation_service::AggregationService, buckets::TimeBucketer, store::TransactionStore,
    CoreResult,
};

pub const DEFAULT_CASH_FLOW_MONTHS: u32 = 6;

pub struct CashFlowService;

impl CashFlowService {
    /// Income, expenses and net for each of the trailing `months`, oldest first.
    /// Months without records are zero-filled.
    pub fn series(
        transactions: &dyn TransactionStore,
        user: UserId,
        today: NaiveDate,
        months: u32,
    ) -> CoreResult<CashFlowSeries> {
        let buckets = TimeBucketer::trailing_months(today, months);
        let Some(window) = TimeBucketer::span(&buckets) else {
            return Ok(CashFlowSeries {
                months,
                entries: Vec::new(),
            });
        };

        let income =
            AggregationService::group_by_month(transactions, user, TransactionKind::Income, Some(window))?;
        let expenses =
            AggregationService::group_by_month(transactions, user, TransactionKind::Expense, Some(window))?;

        let entries = buckets
            .into_iter()
            .map(|period| {
                let income = income.get(&period).copied().unwrap_or(Decimal::ZERO);
                let expenses = expenses.get(&period).copied().unwrap_or(Decimal::ZERO);
                CashFlowEntry {
                    period,
                    income,
                    expenses,
                    net: income - expenses,
                }
            })
            .collect::<Vec<_>>();
        debug!(%user, %window, buckets = entries.len(), "built cash flow series");
        Ok(CashFlowSeries { months, entries })
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
    fn zero_months_is_empty() {
        let store = MemoryStore::new();
        let series = CashFlowService::series(&store, Uuid::new_v4(), date(2024, 6, 1), 0).unwrap();
        assert!(series.entries.is_empty());
    }

    #[test]
    fn gaps_are_zero_filled_and_out_of_range_ignored() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        store
            .insert_transaction(Transaction::income(user, dec!(1000), "Salary", date(2024, 4, 30)))
            .unwrap();
        store
            .insert_transaction(Transaction::expense(user, dec!(250), "Food", date(2024, 6, 1)))
            .unwrap();
        store
            .insert_transaction(Transaction::expense(user, dec!(75), "Food", date(2024, 3, 31)))
            .unwrap();

        let series = CashFlowService::series(&store, user, date(2024, 6, 10), 3).unwrap();
        let rows: Vec<_> = series
            .entries
            .iter()
            .map(|entry| (entry.period.label(), entry.income, entry.expenses, entry.net))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("2024-04".to_string(), dec!(1000), Decimal::ZERO, dec!(1000)),
                ("2024-05".to_string(), Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
                ("2024-06".to_string(), Decimal::ZERO, dec!(250), dec!(-250)),
            ]
        );
    }
}
