use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use cashview_domain::{Budget, RecordSet, Transaction, TransactionFilter, TransactionKind, UserId};
use uuid::Uuid;

use crate::{
    store::{BudgetStore, RecordStore, TransactionStore},
    CoreError, CoreResult,
};

/// Process-local store. The lock is taken once per call, never across a report.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<RecordSet>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: RecordSet) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Copy of every stored record.
    pub fn snapshot(&self) -> CoreResult<RecordSet> {
        Ok(self.read()?.clone())
    }

    /// Swaps the whole record set in one write.
    pub fn replace_all(&self, records: RecordSet) -> CoreResult<()> {
        *self.write()? = records;
        Ok(())
    }

    fn read(&self) -> CoreResult<RwLockReadGuard<'_, RecordSet>> {
        self.records
            .read()
            .map_err(|_| CoreError::Storage("record lock poisoned".into()))
    }

    fn write(&self) -> CoreResult<RwLockWriteGuard<'_, RecordSet>> {
        self.records
            .write()
            .map_err(|_| CoreError::Storage("record lock poisoned".into()))
    }
}

impl TransactionStore for MemoryStore {
    fn find_transactions(
        &self,
        user: UserId,
        kind: TransactionKind,
        filter: &TransactionFilter,
    ) -> CoreResult<Vec<Transaction>> {
        let records = self.read()?;
        Ok(records
            .transactions_matching(user, kind, filter)
            .cloned()
            .collect())
    }
}

impl BudgetStore for MemoryStore {
    fn find_budgets(&self, user: UserId) -> CoreResult<Vec<Budget>> {
        let records = self.read()?;
        Ok(records.budgets_for(user).cloned().collect())
    }
}

impl RecordStore for MemoryStore {
    fn insert_transaction(&self, transaction: Transaction) -> CoreResult<()> {
        self.write()?.push_transaction(transaction);
        Ok(())
    }

    fn transaction(&self, id: Uuid) -> CoreResult<Option<Transaction>> {
        Ok(self.read()?.transaction(id).cloned())
    }

    fn replace_transaction(&self, transaction: Transaction) -> CoreResult<()> {
        let id = transaction.id;
        if self.write()?.replace_transaction(transaction) {
            Ok(())
        } else {
            Err(CoreError::TransactionNotFound(id))
        }
    }

    fn delete_transaction(&self, id: Uuid) -> CoreResult<Option<Transaction>> {
        Ok(self.write()?.remove_transaction(id))
    }

    fn insert_budget(&self, budget: Budget) -> CoreResult<()> {
        self.write()?.push_budget(budget);
        Ok(())
    }

    fn budget(&self, id: Uuid) -> CoreResult<Option<Budget>> {
        Ok(self.read()?.budget(id).cloned())
    }

    fn replace_budget(&self, budget: Budget) -> CoreResult<()> {
        let id = budget.id;
        if self.write()?.replace_budget(budget) {
            Ok(())
        } else {
            Err(CoreError::BudgetNotFound(id))
        }
    }

    fn delete_budget(&self, id: Uuid) -> CoreResult<Option<Budget>> {
        Ok(self.write()?.remove_budget(id))
    }
}
