use std::fs;

use cashview_core::{
    BudgetService, BudgetStore, CoreError, FixedClock, NewBudget, NewTransaction, RecordService,
    RecordStore,
};
use cashview_domain::{BudgetHealth, BudgetPeriod, TransactionKind};
use cashview_storage_json::{load_records_from_path, JsonStore};
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use tempfile::tempdir;
use uuid::Uuid;

fn clock() -> FixedClock {
    FixedClock::new(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
}

#[test]
fn missing_file_opens_empty_and_is_created_on_first_write() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("records.json");
    let store = JsonStore::open(&path).expect("open store");
    assert!(!path.exists());
    assert!(store.find_budgets(Uuid::new_v4()).expect("budgets").is_empty());

    let user = Uuid::new_v4();
    RecordService::add_budget(
        &store,
        &clock(),
        user,
        NewBudget::new("Food", dec!(200), BudgetPeriod::Monthly),
    )
    .expect("add budget");
    assert!(path.exists());
    let parent = path.parent().expect("parent dir");
    assert_eq!(fs::read_dir(parent).expect("read dir").count(), 1);
}

#[test]
fn writes_survive_reopen() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("records.json");
    let user = Uuid::new_v4();
    {
        let store = JsonStore::open(&path).expect("open store");
        RecordService::add_budget(
            &store,
            &clock(),
            user,
            NewBudget::new("Food", dec!(100), BudgetPeriod::Monthly),
        )
        .expect("add budget");
        RecordService::add_transaction(
            &store,
            &clock(),
            user,
            NewTransaction::new(TransactionKind::Expense, dec!(100), "Food"),
        )
        .expect("add expense");
    }

    let reopened = JsonStore::open(&path).expect("reopen store");
    let report = BudgetService::status(&reopened, &reopened, user).expect("status");
    assert_eq!(report.entries().len(), 1);
    assert_eq!(report.entries()[0].status, BudgetHealth::AtBudget);

    let on_disk = load_records_from_path(&path).expect("load");
    assert_eq!(on_disk.transactions.len(), 1);
    assert_eq!(on_disk.transactions[0].amount, dec!(100));
}

#[test]
fn removals_are_persisted() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("records.json");
    let user = Uuid::new_v4();
    let store = JsonStore::open(&path).expect("open store");
    let txn = RecordService::add_transaction(
        &store,
        &clock(),
        user,
        NewTransaction::new(TransactionKind::Income, dec!(50), "Gift"),
    )
    .expect("add income");
    RecordService::remove_transaction(&store, user, txn.id).expect("remove");

    let reopened = JsonStore::open(&path).expect("reopen");
    assert!(reopened.transaction(txn.id).expect("lookup").is_none());
}

#[test]
fn failed_save_keeps_memory_unchanged() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("records.json");
    let user = Uuid::new_v4();
    let store = JsonStore::open(&path).expect("open store");
    fs::create_dir(&path).expect("block data file");

    let err = RecordService::add_transaction(
        &store,
        &clock(),
        user,
        NewTransaction::new(TransactionKind::Expense, dec!(25), "Food"),
    )
    .unwrap_err();
    assert!(matches!(err, CoreError::Io(_)));
    assert!(store.snapshot().expect("snapshot").transactions.is_empty());

    fs::remove_dir(&path).expect("unblock data file");
    RecordService::add_transaction(
        &store,
        &clock(),
        user,
        NewTransaction::new(TransactionKind::Expense, dec!(30), "Food"),
    )
    .expect("add expense");
    let on_disk = load_records_from_path(&path).expect("load");
    assert_eq!(on_disk.transactions.len(), 1);
    assert_eq!(on_disk.transactions[0].amount, dec!(30));
}

#[test]
fn corrupt_file_is_a_serde_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("records.json");
    fs::write(&path, "{ not json").expect("write");
    let err = JsonStore::open(&path).unwrap_err();
    assert!(matches!(err, CoreError::Serde(_)));
}

#[test]
fn unknown_budget_period_loads_as_monthly() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("records.json");
    let user = Uuid::new_v4();
    let json = format!(
        r#"{{
  "budgets": [{{
    "id": "{}",
    "user_id": "{}",
    "category": "Food",
    "limit": "80",
    "period": "fortnightly",
    "start_date": "2024-06-03",
    "created_at": "2024-06-03T00:00:00Z"
  }}]
}}"#,
        Uuid::new_v4(),
        user
    );
    fs::write(&path, json).expect("write");

    let store = JsonStore::open(&path).expect("open");
    let budgets = store.find_budgets(user).expect("budgets");
    assert_eq!(budgets[0].period, BudgetPeriod::Monthly);
    assert!(store.snapshot().expect("snapshot").transactions.is_empty());
}
