//! Spending limits per category and their budgeting cadence.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{de::Deserializer, Deserialize, Serialize};
use uuid::Uuid;

use crate::{calendar::shift_month, UserId};

/// Enumerates canonical budgeting cadences.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl BudgetPeriod {
    pub const ALL: [BudgetPeriod; 5] = [
        BudgetPeriod::Daily,
        BudgetPeriod::Weekly,
        BudgetPeriod::Monthly,
        BudgetPeriod::Quarterly,
        BudgetPeriod::Yearly,
    ];

    /// Strict parse; `None` for anything that is not a known period name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Some(BudgetPeriod::Daily),
            "weekly" => Some(BudgetPeriod::Weekly),
            "monthly" => Some(BudgetPeriod::Monthly),
            "quarterly" => Some(BudgetPeriod::Quarterly),
            "yearly" => Some(BudgetPeriod::Yearly),
            _ => None,
        }
    }

    /// Lenient parse used for stored data: unknown or unset values fall back to monthly.
    pub fn from_value(value: Option<String>) -> Self {
        value
            .as_deref()
            .and_then(BudgetPeriod::parse)
            .unwrap_or_default()
    }

    /// Returns `from` moved forward by one nominal period.
    pub fn advance(self, from: NaiveDate) -> NaiveDate {
        match self {
            BudgetPeriod::Daily => from + Duration::days(1),
            BudgetPeriod::Weekly => from + Duration::weeks(1),
            BudgetPeriod::Monthly => shift_month(from, 1),
            BudgetPeriod::Quarterly => shift_month(from, 3),
            BudgetPeriod::Yearly => shift_month(from, 12),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BudgetPeriod::Daily => "daily",
            BudgetPeriod::Weekly => "weekly",
            BudgetPeriod::Monthly => "monthly",
            BudgetPeriod::Quarterly => "quarterly",
            BudgetPeriod::Yearly => "yearly",
        }
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl<'de> Deserialize<'de> for BudgetPeriod {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(BudgetPeriod::from_value(value))
    }
}

/// A spending guardrail for one expense category of one user.
///
/// The category is matched against transactions by name only; there is no
/// foreign key between budgets and transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub user_id: UserId,
    pub category: String,
    pub limit: Decimal,
    #[serde(default)]
    pub period: BudgetPeriod,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Budget {
    pub fn new(
        user_id: UserId,
        category: impl Into<String>,
        limit: Decimal,
        period: BudgetPeriod,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            category: category.into(),
            limit,
            period,
            start_date,
            end_date: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn apply(&mut self, patch: &BudgetPatch) {
        if let Some(category) = patch.category.as_ref() {
            self.category = category.clone();
        }
        if let Some(limit) = patch.limit {
            self.limit = limit;
        }
        if let Some(period) = patch.period {
            self.period = period;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = end_date;
        }
    }
}

/// Partial update for a stored budget. `end_date: Some(None)` clears the end date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<BudgetPeriod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Option<NaiveDate>>,
}

impl BudgetPatch {
    pub fn has_effect(&self) -> bool {
        self.category.is_some()
            || self.limit.is_some()
            || self.period.is_some()
            || self.start_date.is_some()
            || self.end_date.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn period_offsets_match_nominal_lengths() {
        let start = date(2024, 1, 31);
        assert_eq!(BudgetPeriod::Daily.advance(start), date(2024, 2, 1));
        assert_eq!(BudgetPeriod::Weekly.advance(start), date(2024, 2, 7));
        assert_eq!(BudgetPeriod::Monthly.advance(start), date(2024, 2, 29));
        assert_eq!(BudgetPeriod::Quarterly.advance(start), date(2024, 4, 30));
        assert_eq!(BudgetPeriod::Yearly.advance(start), date(2025, 1, 31));
    }

    #[test]
    fn unknown_or_missing_period_deserializes_as_monthly() {
        let parsed: BudgetPeriod = serde_json::from_str("\"fortnightly\"").unwrap();
        assert_eq!(parsed, BudgetPeriod::Monthly);
        let parsed: BudgetPeriod = serde_json::from_str("null").unwrap();
        assert_eq!(parsed, BudgetPeriod::Monthly);
        let parsed: BudgetPeriod = serde_json::from_str("\"Quarterly\"").unwrap();
        assert_eq!(parsed, BudgetPeriod::Quarterly);
    }

    #[test]
    fn period_serializes_lowercase() {
        let json = serde_json::to_string(&BudgetPeriod::Yearly).unwrap();
        assert_eq!(json, "\"yearly\"");
    }

    #[test]
    fn patch_can_clear_end_date() {
        let mut budget = Budget::new(
            Uuid::new_v4(),
            "Food",
            dec!(300),
            BudgetPeriod::Weekly,
            date(2024, 1, 1),
        )
        .with_end_date(date(2024, 6, 30));
        let patch = BudgetPatch {
            limit: Some(dec!(350)),
            end_date: Some(None),
            ..BudgetPatch::default()
        };
        budget.apply(&patch);
        assert_eq!(budget.limit, dec!(350));
        assert!(budget.end_date.is_none());
        assert_eq!(budget.period, BudgetPeriod::Weekly);
    }
}
