//! Validated writes for transactions and budgets.

use cashview_domain::{
    Budget, BudgetPatch, BudgetPeriod, DateWindow, Transaction, TransactionFilter,
    TransactionKind, TransactionPatch, UserId,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    store::{RecordStore, TransactionStore},
    time::Clock,
    CoreError, CoreResult,
};

pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Input for a new income or expense record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub category: String,
    /// Defaults to the clock's current date.
    pub date: Option<NaiveDate>,
    pub recurring: bool,
    pub description: Option<String>,
}

impl NewTransaction {
    pub fn new(kind: TransactionKind, amount: Decimal, category: impl Into<String>) -> Self {
        Self {
            kind,
            amount,
            category: category.into(),
            date: None,
            recurring: false,
            description: None,
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }
}

/// Input for a new budget.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    pub category: String,
    pub limit: Decimal,
    pub period: BudgetPeriod,
    /// Defaults to the clock's current date.
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl NewBudget {
    pub fn new(category: impl Into<String>, limit: Decimal, period: BudgetPeriod) -> Self {
        Self {
            category: category.into(),
            limit,
            period,
            start_date: None,
            end_date: None,
        }
    }

    pub fn starting(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }
}

pub struct RecordService;

impl RecordService {
    pub fn add_transaction<S: RecordStore + ?Sized>(
        store: &S,
        clock: &dyn Clock,
        user: UserId,
        input: NewTransaction,
    ) -> CoreResult<Transaction> {
        validate_amount(input.amount)?;
        let category = canonical_category(input.kind, &input.category)?;
        let description = validate_description(input.description)?;
        let date = input.date.unwrap_or_else(|| clock.today());

        let mut txn = Transaction::new(user, input.kind, input.amount, category, date)
            .with_recurring(input.recurring);
        txn.description = description;
        txn.created_at = clock.now();
        store.insert_transaction(txn.clone())?;
        info!(%user, id = %txn.id, kind = %txn.kind, amount = %txn.amount, "recorded transaction");
        Ok(txn)
    }

    pub fn update_transaction<S: RecordStore + ?Sized>(
        store: &S,
        user: UserId,
        id: Uuid,
        patch: TransactionPatch,
    ) -> CoreResult<Transaction> {
        let mut txn = Self::owned_transaction(store, user, id)?;
        let mut patch = patch;
        if let Some(amount) = patch.amount {
            validate_amount(amount)?;
        }
        if let Some(category) = patch.category.take() {
            patch.category = Some(canonical_category(txn.kind, &category)?.to_string());
        }
        if let Some(description) = patch.description.take() {
            patch.description = Some(validate_description(description)?);
        }
        txn.apply(&patch);
        store.replace_transaction(txn.clone())?;
        info!(%user, %id, "updated transaction");
        Ok(txn)
    }

    pub fn remove_transaction<S: RecordStore + ?Sized>(
        store: &S,
        user: UserId,
        id: Uuid,
    ) -> CoreResult<Transaction> {
        Self::owned_transaction(store, user, id)?;
        let removed = store
            .delete_transaction(id)?
            .ok_or(CoreError::TransactionNotFound(id))?;
        info!(%user, %id, "removed transaction");
        Ok(removed)
    }

    /// Transactions of `kind` dated within `window`. An empty match is an error here.
    pub fn transactions_between(
        store: &dyn TransactionStore,
        user: UserId,
        kind: TransactionKind,
        window: DateWindow,
    ) -> CoreResult<Vec<Transaction>> {
        let found = store.find_transactions(user, kind, &TransactionFilter::all().within(window))?;
        if found.is_empty() {
            return Err(CoreError::NoRecords(format!("no {kind} records between {window}")));
        }
        Ok(found)
    }

    pub fn add_budget<S: RecordStore + ?Sized>(
        store: &S,
        clock: &dyn Clock,
        user: UserId,
        input: NewBudget,
    ) -> CoreResult<Budget> {
        validate_amount(input.limit)?;
        let category = canonical_category(TransactionKind::Expense, &input.category)?;
        let start_date = input.start_date.unwrap_or_else(|| clock.today());
        validate_dates(start_date, input.end_date)?;
        ensure_unique_category(store, user, category, None)?;

        let mut budget = Budget::new(user, category, input.limit, input.period, start_date);
        budget.end_date = input.end_date;
        budget.created_at = clock.now();
        store.insert_budget(budget.clone())?;
        info!(%user, id = %budget.id, category, limit = %budget.limit, "created budget");
        Ok(budget)
    }

    pub fn budget<S: RecordStore + ?Sized>(store: &S, user: UserId, id: Uuid) -> CoreResult<Budget> {
        store
            .budget(id)?
            .filter(|budget| budget.user_id == user)
            .ok_or(CoreError::BudgetNotFound(id))
    }

    pub fn update_budget<S: RecordStore + ?Sized>(
        store: &S,
        user: UserId,
        id: Uuid,
        patch: BudgetPatch,
    ) -> CoreResult<Budget> {
        let mut budget = Self::budget(store, user, id)?;
        let mut patch = patch;
        if let Some(limit) = patch.limit {
            validate_amount(limit)?;
        }
        if let Some(category) = patch.category.take() {
            let category = canonical_category(TransactionKind::Expense, &category)?;
            ensure_unique_category(store, user, category, Some(id))?;
            patch.category = Some(category.to_string());
        }
        budget.apply(&patch);
        validate_dates(budget.start_date, budget.end_date)?;
        store.replace_budget(budget.clone())?;
        info!(%user, %id, "updated budget");
        Ok(budget)
    }

    pub fn remove_budget<S: RecordStore + ?Sized>(
        store: &S,
        user: UserId,
        id: Uuid,
    ) -> CoreResult<Budget> {
        Self::budget(store, user, id)?;
        let removed = store.delete_budget(id)?.ok_or(CoreError::BudgetNotFound(id))?;
        info!(%user, %id, "removed budget");
        Ok(removed)
    }

    fn owned_transaction<S: RecordStore + ?Sized>(
        store: &S,
        user: UserId,
        id: Uuid,
    ) -> CoreResult<Transaction> {
        store
            .transaction(id)?
            .filter(|txn| txn.user_id == user)
            .ok_or(CoreError::TransactionNotFound(id))
    }
}

fn validate_amount(amount: Decimal) -> CoreResult<()> {
    if amount < Decimal::ZERO {
        warn!(%amount, "rejected negative amount");
        return Err(CoreError::Validation(format!(
            "amount must not be negative, got {amount}"
        )));
    }
    Ok(())
}

fn canonical_category(kind: TransactionKind, raw: &str) -> CoreResult<&'static str> {
    kind.canonical_category(raw).ok_or_else(|| {
        warn!(%kind, category = raw, "rejected unknown category");
        CoreError::Validation(format!(
            "unknown {kind} category `{}`; expected one of: {}",
            raw.trim(),
            kind.categories().join(", ")
        ))
    })
}

fn validate_description(description: Option<String>) -> CoreResult<Option<String>> {
    let description = description
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());
    if let Some(text) = description.as_deref() {
        let len = text.chars().count();
        if len > MAX_DESCRIPTION_LEN {
            return Err(CoreError::Validation(format!(
                "description is {len} characters; the limit is {MAX_DESCRIPTION_LEN}"
            )));
        }
    }
    Ok(description)
}

fn validate_dates(start: NaiveDate, end: Option<NaiveDate>) -> CoreResult<()> {
    if let Some(end) = end {
        DateWindow::new(start, end)?;
    }
    Ok(())
}

fn ensure_unique_category<S: RecordStore + ?Sized>(
    store: &S,
    user: UserId,
    category: &str,
    except: Option<Uuid>,
) -> CoreResult<()> {
    let taken = store
        .find_budgets(user)?
        .iter()
        .any(|budget| budget.category == category && Some(budget.id) != except);
    if taken {
        warn!(%user, category, "rejected duplicate budget");
        return Err(CoreError::DuplicateBudget(category.to_string()));
    }
    Ok(())
}
