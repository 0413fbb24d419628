use std::{
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

use cashview_config::persist;
use cashview_core::{
    BudgetStore, CoreError, CoreResult, GroupKey, GroupTotal, MemoryStore, RecordStore,
    TransactionStore,
};
use cashview_domain::{Budget, RecordSet, Transaction, TransactionFilter, TransactionKind, UserId};
use tracing::{debug, info};
use uuid::Uuid;

/// Record store persisted to a single JSON document.
///
/// Reads are served from memory. Every write rewrites the whole file atomically
/// before returning. A failed save surfaces as an error and leaves the
/// in-memory records as they were.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    records: MemoryStore,
    writer: Mutex<()>,
}

impl JsonStore {
    /// Loads `path`, or starts empty when the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> CoreResult<Self> {
        let path = path.into();
        let records = if path.exists() {
            load_records_from_path(&path)?
        } else {
            debug!(path = %path.display(), "data file missing, starting empty");
            RecordSet::new()
        };
        info!(
            path = %path.display(),
            transactions = records.transactions.len(),
            budgets = records.budgets.len(),
            "opened data file"
        );
        Ok(Self {
            path,
            records: MemoryStore::from_records(records),
            writer: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn snapshot(&self) -> CoreResult<RecordSet> {
        self.records.snapshot()
    }

    /// Applies `change` to a staged copy, saves it, and only then publishes it.
    fn write_through<T>(&self, change: impl FnOnce(&MemoryStore) -> CoreResult<T>) -> CoreResult<T> {
        let _guard = self.lock_writer()?;
        let staged = MemoryStore::from_records(self.records.snapshot()?);
        let outcome = change(&staged)?;
        let next = staged.snapshot()?;
        save_records_to_path(&next, &self.path)?;
        self.records.replace_all(next)?;
        Ok(outcome)
    }

    fn lock_writer(&self) -> CoreResult<MutexGuard<'_, ()>> {
        self.writer
            .lock()
            .map_err(|_| CoreError::Storage("writer lock poisoned".into()))
    }
}

impl TransactionStore for JsonStore {
    fn find_transactions(
        &self,
        user: UserId,
        kind: TransactionKind,
        filter: &TransactionFilter,
    ) -> CoreResult<Vec<Transaction>> {
        self.records.find_transactions(user, kind, filter)
    }

    fn aggregate(
        &self,
        user: UserId,
        kind: TransactionKind,
        key: GroupKey,
        filter: &TransactionFilter,
    ) -> CoreResult<Vec<GroupTotal>> {
        self.records.aggregate(user, kind, key, filter)
    }
}

impl BudgetStore for JsonStore {
    fn find_budgets(&self, user: UserId) -> CoreResult<Vec<Budget>> {
        self.records.find_budgets(user)
    }
}

impl RecordStore for JsonStore {
    fn insert_transaction(&self, transaction: Transaction) -> CoreResult<()> {
        self.write_through(|records| records.insert_transaction(transaction))
    }

    fn transaction(&self, id: Uuid) -> CoreResult<Option<Transaction>> {
        self.records.transaction(id)
    }

    fn replace_transaction(&self, transaction: Transaction) -> CoreResult<()> {
        self.write_through(|records| records.replace_transaction(transaction))
    }

    fn delete_transaction(&self, id: Uuid) -> CoreResult<Option<Transaction>> {
        self.write_through(|records| records.delete_transaction(id))
    }

    fn insert_budget(&self, budget: Budget) -> CoreResult<()> {
        self.write_through(|records| records.insert_budget(budget))
    }

    fn budget(&self, id: Uuid) -> CoreResult<Option<Budget>> {
        self.records.budget(id)
    }

    fn replace_budget(&self, budget: Budget) -> CoreResult<()> {
        self.write_through(|records| records.replace_budget(budget))
    }

    fn delete_budget(&self, id: Uuid) -> CoreResult<Option<Budget>> {
        self.write_through(|records| records.delete_budget(id))
    }
}

/// Saves a record set to an arbitrary path on disk.
pub fn save_records_to_path(records: &RecordSet, path: &Path) -> CoreResult<()> {
    let json =
        serde_json::to_vec_pretty(records).map_err(|err| CoreError::Serde(err.to_string()))?;
    persist::write_atomic(path, &json)?;
    debug!(path = %path.display(), "saved data file");
    Ok(())
}

/// Loads a record set from the provided filesystem path.
pub fn load_records_from_path(path: &Path) -> CoreResult<RecordSet> {
    let data = persist::read_if_exists(path)?.unwrap_or_default();
    if data.trim().is_empty() {
        return Ok(RecordSet::new());
    }
    serde_json::from_str(&data).map_err(|err| {
        CoreError::Serde(format!("{}: {}", path.display(), err))
    })
}
