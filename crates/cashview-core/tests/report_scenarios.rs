use cashview_core::{
    parse_months, BudgetService, BudgetStore, CashFlowService, ErrorKind, MemoryStore,
    PeriodResolver, RecordStore, SummaryService, TimeBucketer,
};
use cashview_domain::{
    calendar::last_of_month, Budget, BudgetPeriod, BudgetStatusReport, RecordSet, Transaction,
    TransactionKind,
};
use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn monthly_windows_always_cover_whole_months() {
    let mut day = date(2023, 1, 1);
    while day <= date(2024, 12, 31) {
        let window = PeriodResolver::resolve(BudgetPeriod::Monthly, day, None);
        assert_eq!(window.start.day(), 1, "start for {day}");
        assert_eq!(window.end, last_of_month(window.end), "end for {day}");
        day += Duration::days(13);
    }
}

#[test]
fn weekly_and_daily_windows_span_nominal_offsets() {
    let start = date(2024, 2, 26);
    let weekly = PeriodResolver::resolve(BudgetPeriod::Weekly, start, None);
    assert_eq!(weekly.span_days(), 7);
    let daily = PeriodResolver::resolve(BudgetPeriod::Daily, start, None);
    assert_eq!(daily.span_days(), 1);
}

#[test]
fn cash_flow_buckets_are_exact_and_chronological() {
    let store = MemoryStore::new();
    let user = Uuid::new_v4();
    for months in [1_u32, 6, 12, 25] {
        let series = CashFlowService::series(&store, user, date(2024, 1, 31), months).unwrap();
        assert_eq!(series.entries.len(), months as usize);
        assert!(series
            .entries
            .windows(2)
            .all(|pair| pair[0].period < pair[1].period));
        assert!(series
            .entries
            .iter()
            .all(|entry| entry.net == Decimal::ZERO));
    }
    assert_eq!(
        TimeBucketer::trailing_months(date(2024, 1, 31), 2)
            .last()
            .map(|key| key.label()),
        Some("2024-01".to_string())
    );
}

#[test]
fn reports_never_leak_other_users_records() {
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let today = date(2024, 9, 9);
    let mut records = RecordSet::new();
    records.push_transaction(Transaction::expense(bob, dec!(70), "Food", today));
    records.push_transaction(Transaction::income(bob, dec!(700), "Salary", today));
    records.push_budget(Budget::new(bob, "Food", dec!(50), BudgetPeriod::Monthly, today));
    let store = MemoryStore::from_records(records);

    let status = BudgetService::status(&store, &store, alice).unwrap();
    assert_eq!(status, BudgetStatusReport::NoBudgets);
    let dashboard = SummaryService::dashboard(&store, &store, alice, today).unwrap();
    assert!(dashboard.is_new_user());
    assert!(BudgetService::performance(&store, &store, alice, today)
        .unwrap()
        .is_empty());
    assert_eq!(store.find_budgets(bob).unwrap().len(), 1);
}

#[test]
fn category_match_is_by_exact_name() {
    let user = Uuid::new_v4();
    let today = date(2024, 9, 9);
    let store = MemoryStore::new();
    store
        .insert_budget(Budget::new(user, "Food", dec!(10), BudgetPeriod::Monthly, today))
        .unwrap();
    store
        .insert_transaction(Transaction::expense(user, dec!(99), "food", today))
        .unwrap();

    let status = BudgetService::status(&store, &store, user).unwrap();
    assert_eq!(status.entries()[0].total_spent, Decimal::ZERO);
}

#[test]
fn invalid_months_are_validation_errors() {
    let err = parse_months(Some("twelve"), 12).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    let err = SummaryService::month_totals(&MemoryStore::new(), Uuid::new_v4(), 2024, 0)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(
        SummaryService::yearly_totals(&MemoryStore::new(), Uuid::new_v4(), TransactionKind::Income)
            .unwrap(),
        Vec::new()
    );
}
