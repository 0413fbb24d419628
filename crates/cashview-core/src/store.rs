//! Collaborator interfaces the report builders read from.

use std::collections::HashMap;

use cashview_domain::{
    Budget, MonthKey, Transaction, TransactionFilter, TransactionKind, UserId,
};
use chrono::Datelike;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::CoreResult;

/// Dimension a transaction aggregate is grouped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Category,
    Month,
    Year,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupValue {
    Category(String),
    Month(MonthKey),
    Year(i32),
}

impl GroupValue {
    fn of(txn: &Transaction, key: GroupKey) -> Self {
        match key {
            GroupKey::Category => GroupValue::Category(txn.category.clone()),
            GroupKey::Month => GroupValue::Month(MonthKey::of(txn.date)),
            GroupKey::Year => GroupValue::Year(txn.date.year()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupTotal {
    pub key: GroupValue,
    pub total: Decimal,
    pub count: usize,
}

/// Folds transactions into one total per group, in first-seen order.
pub fn group_transactions(transactions: &[Transaction], key: GroupKey) -> Vec<GroupTotal> {
    let mut index: HashMap<GroupValue, usize> = HashMap::new();
    let mut groups: Vec<GroupTotal> = Vec::new();
    for txn in transactions {
        let value = GroupValue::of(txn, key);
        match index.get(&value) {
            Some(&slot) => {
                groups[slot].total += txn.amount;
                groups[slot].count += 1;
            }
            None => {
                index.insert(value.clone(), groups.len());
                groups.push(GroupTotal {
                    key: value,
                    total: txn.amount,
                    count: 1,
                });
            }
        }
    }
    groups
}

/// Read access to income and expense records.
pub trait TransactionStore: Send + Sync {
    /// Transactions of `kind` owned by `user` that satisfy `filter`, in store order.
    fn find_transactions(
        &self,
        user: UserId,
        kind: TransactionKind,
        filter: &TransactionFilter,
    ) -> CoreResult<Vec<Transaction>>;

    /// Grouped totals. Backends with native grouping may override the fold.
    fn aggregate(
        &self,
        user: UserId,
        kind: TransactionKind,
        key: GroupKey,
        filter: &TransactionFilter,
    ) -> CoreResult<Vec<GroupTotal>> {
        let transactions = self.find_transactions(user, kind, filter)?;
        Ok(group_transactions(&transactions, key))
    }
}

/// Read access to budget definitions.
pub trait BudgetStore: Send + Sync {
    fn find_budgets(&self, user: UserId) -> CoreResult<Vec<Budget>>;
}

/// Write access used by the record service. Lookups by id are unscoped;
/// ownership checks happen in the service.
pub trait RecordStore: TransactionStore + BudgetStore {
    fn insert_transaction(&self, transaction: Transaction) -> CoreResult<()>;
    fn transaction(&self, id: Uuid) -> CoreResult<Option<Transaction>>;
    /// Fails with `TransactionNotFound` when no record shares the id.
    fn replace_transaction(&self, transaction: Transaction) -> CoreResult<()>;
    fn delete_transaction(&self, id: Uuid) -> CoreResult<Option<Transaction>>;

    fn insert_budget(&self, budget: Budget) -> CoreResult<()>;
    fn budget(&self, id: Uuid) -> CoreResult<Option<Budget>>;
    /// Fails with `BudgetNotFound` when no record shares the id.
    fn replace_budget(&self, budget: Budget) -> CoreResult<()>;
    fn delete_budget(&self, id: Uuid) -> CoreResult<Option<Budget>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn grouping_keeps_first_seen_order_and_counts() {
        let user = Uuid::new_v4();
        let txns = vec![
            Transaction::expense(user, dec!(5), "Utilities", date(2023, 12, 30)),
            Transaction::expense(user, dec!(10), "Food", date(2024, 1, 2)),
            Transaction::expense(user, dec!(7.5), "Utilities", date(2024, 1, 3)),
        ];

        let by_category = group_transactions(&txns, GroupKey::Category);
        assert_eq!(by_category.len(), 2);
        assert_eq!(by_category[0].key, GroupValue::Category("Utilities".into()));
        assert_eq!(by_category[0].total, dec!(12.5));
        assert_eq!(by_category[0].count, 2);

        let by_year = group_transactions(&txns, GroupKey::Year);
        assert_eq!(by_year[0].key, GroupValue::Year(2023));
        assert_eq!(by_year[1].total, dec!(17.5));

        let by_month = group_transactions(&txns, GroupKey::Month);
        assert_eq!(
            by_month[1].key,
            GroupValue::Month(MonthKey::new(2024, 1).unwrap())
        );
    }
}
