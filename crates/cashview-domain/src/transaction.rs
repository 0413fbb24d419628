//! Income and expense records.

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::UserId;

pub const EXPENSE_CATEGORIES: [&str; 6] = [
    "Food",
    "Transportation",
    "Entertainment",
    "Utilities",
    "Healthcare",
    "Other",
];

pub const INCOME_CATEGORIES: [&str; 7] = [
    "Salary",
    "Freelance",
    "Investments",
    "Business",
    "Rental",
    "Gift",
    "Other",
];

/// Distinguishes the two transaction collections. Both share one shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn categories(self) -> &'static [&'static str] {
        match self {
            TransactionKind::Income => &INCOME_CATEGORIES,
            TransactionKind::Expense => &EXPENSE_CATEGORIES,
        }
    }

    /// Returns the canonical spelling of `raw` when it names a known category.
    pub fn canonical_category(self, raw: &str) -> Option<&'static str> {
        let needle = raw.trim();
        self.categories()
            .iter()
            .copied()
            .find(|name| name.eq_ignore_ascii_case(needle))
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        };
        f.write_str(label)
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" | "incomes" => Ok(TransactionKind::Income),
            "expense" | "expenses" => Ok(TransactionKind::Expense),
            other => Err(format!("unknown transaction kind `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: UserId,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        user_id: UserId,
        kind: TransactionKind,
        amount: Decimal,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            amount,
            category: category.into(),
            date,
            recurring: false,
            description: None,
            created_at: Utc::now(),
        }
    }

    pub fn income(
        user_id: UserId,
        amount: Decimal,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self::new(user_id, TransactionKind::Income, amount, category, date)
    }

    pub fn expense(
        user_id: UserId,
        amount: Decimal,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self::new(user_id, TransactionKind::Expense, amount, category, date)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_recurring(mut self, recurring: bool) -> Self {
        self.recurring = recurring;
        self
    }

    /// Applies every field present in `patch`.
    pub fn apply(&mut self, patch: &TransactionPatch) {
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(category) = patch.category.as_ref() {
            self.category = category.clone();
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(recurring) = patch.recurring {
            self.recurring = recurring;
        }
        if let Some(description) = patch.description.as_ref() {
            self.description = description.clone();
        }
    }
}

/// Partial update for a stored transaction. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

impl TransactionPatch {
    pub fn has_effect(&self) -> bool {
        self.amount.is_some()
            || self.category.is_some()
            || self.date.is_some()
            || self.recurring.is_some()
            || self.description.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn category_sets_are_closed_per_kind() {
        assert_eq!(TransactionKind::Expense.categories().len(), 6);
        assert_eq!(TransactionKind::Income.categories().len(), 7);
        assert_eq!(
            TransactionKind::Expense.canonical_category(" food "),
            Some("Food")
        );
        assert_eq!(TransactionKind::Expense.canonical_category("Salary"), None);
        assert_eq!(
            TransactionKind::Income.canonical_category("salary"),
            Some("Salary")
        );
    }

    #[test]
    fn kind_parses_singular_and_plural_labels() {
        assert_eq!(
            "Expenses".parse::<TransactionKind>(),
            Ok(TransactionKind::Expense)
        );
        assert_eq!(
            "income".parse::<TransactionKind>(),
            Ok(TransactionKind::Income)
        );
        assert!("transfer".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn patch_applies_only_present_fields() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let mut txn = Transaction::expense(Uuid::new_v4(), dec!(12.50), "Food", date)
            .with_description("lunch");
        let patch = TransactionPatch {
            amount: Some(dec!(14)),
            description: Some(None),
            ..TransactionPatch::default()
        };
        assert!(patch.has_effect());
        txn.apply(&patch);
        assert_eq!(txn.amount, dec!(14));
        assert_eq!(txn.category, "Food");
        assert_eq!(txn.date, date);
        assert!(txn.description.is_none());
        assert!(!TransactionPatch::default().has_effect());
    }

    #[test]
    fn recurring_flag_defaults_to_false_when_absent() {
        let json = r#"{
            "id": "6f1c1d6e-8a53-4c57-9f5a-2a4b8c1e7d10",
            "user_id": "0b6a2f2e-4d7e-4c1c-a3f4-8f1f5d7b9a21",
            "kind": "income",
            "amount": "1000.00",
            "category": "Salary",
            "date": "2024-01-31",
            "created_at": "2024-01-31T09:00:00Z"
        }"#;
        let txn: Transaction = serde_json::from_str(json).unwrap();
        assert!(!txn.recurring);
        assert_eq!(txn.kind, TransactionKind::Income);
        assert_eq!(txn.amount, dec!(1000));
    }
}
