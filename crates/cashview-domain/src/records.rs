//! In-memory record collections and the filters used to query them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Budget, DateWindow, Transaction, TransactionKind, UserId};

/// Narrows a transaction query. The default filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub category: Option<String>,
    pub window: Option<DateWindow>,
}

impl TransactionFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn within(mut self, window: DateWindow) -> Self {
        self.window = Some(window);
        self
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |category| txn.category == category);
        let window_ok = self
            .window
            .map_or(true, |window| window.contains(txn.date));
        category_ok && window_ok
    }
}

/// Every stored record, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub budgets: Vec<Budget>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transactions_matching<'a>(
        &'a self,
        user: UserId,
        kind: TransactionKind,
        filter: &'a TransactionFilter,
    ) -> impl Iterator<Item = &'a Transaction> + 'a {
        self.transactions
            .iter()
            .filter(move |txn| txn.user_id == user && txn.kind == kind && filter.matches(txn))
    }

    pub fn budgets_for(&self, user: UserId) -> impl Iterator<Item = &Budget> + '_ {
        self.budgets
            .iter()
            .filter(move |budget| budget.user_id == user)
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    pub fn budget(&self, id: Uuid) -> Option<&Budget> {
        self.budgets.iter().find(|budget| budget.id == id)
    }

    pub fn push_transaction(&mut self, txn: Transaction) -> Uuid {
        let id = txn.id;
        self.transactions.push(txn);
        id
    }

    pub fn push_budget(&mut self, budget: Budget) -> Uuid {
        let id = budget.id;
        self.budgets.push(budget);
        id
    }

    /// Replaces the transaction sharing `txn.id`. Returns `false` when none exists.
    pub fn replace_transaction(&mut self, txn: Transaction) -> bool {
        match self.transactions.iter_mut().find(|slot| slot.id == txn.id) {
            Some(slot) => {
                *slot = txn;
                true
            }
            None => false,
        }
    }

    pub fn replace_budget(&mut self, budget: Budget) -> bool {
        match self.budgets.iter_mut().find(|slot| slot.id == budget.id) {
            Some(slot) => {
                *slot = budget;
                true
            }
            None => false,
        }
    }

    pub fn remove_transaction(&mut self, id: Uuid) -> Option<Transaction> {
        let index = self.transactions.iter().position(|txn| txn.id == id)?;
        Some(self.transactions.remove(index))
    }

    pub fn remove_budget(&mut self, id: Uuid) -> Option<Budget> {
        let index = self.budgets.iter().position(|budget| budget.id == id)?;
        Some(self.budgets.remove(index))
    }
}
