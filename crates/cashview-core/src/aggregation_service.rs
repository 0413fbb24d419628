use std::collections::BTreeMap;

use cashview_domain::{
    CategoryTotal, DateWindow, MonthKey, TransactionFilter, TransactionKind, UserId, YearTotal,
};
use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    store::{GroupKey, GroupValue, TransactionStore},
    CoreResult,
};

pub struct AggregationService;

impl AggregationService {
    /// Sum of matching amounts; zero when nothing matches.
    pub fn sum_in_range(
        store: &dyn TransactionStore,
        user: UserId,
        kind: TransactionKind,
        category: Option<&str>,
        window: Option<DateWindow>,
    ) -> CoreResult<Decimal> {
        let filter = TransactionFilter {
            category: category.map(str::to_string),
            window,
        };
        let total: Decimal = store
            .find_transactions(user, kind, &filter)?
            .iter()
            .map(|txn| txn.amount)
            .sum();
        debug!(%user, %kind, ?category, ?window, %total, "summed transactions");
        Ok(total)
    }

    /// Totals per category, largest first. Equal totals keep store order.
    pub fn group_by_category(
        store: &dyn TransactionStore,
        user: UserId,
        kind: TransactionKind,
        window: Option<DateWindow>,
    ) -> CoreResult<Vec<CategoryTotal>> {
        let filter = Self::window_filter(window);
        let mut totals: Vec<CategoryTotal> = store
            .aggregate(user, kind, GroupKey::Category, &filter)?
            .into_iter()
            .filter_map(|group| match group.key {
                GroupValue::Category(category) => Some(CategoryTotal {
                    category,
                    total: group.total,
                    count: group.count,
                }),
                _ => None,
            })
            .collect();
        totals.sort_by(|a, b| b.total.cmp(&a.total));
        Ok(totals)
    }

    pub fn group_by_month(
        store: &dyn TransactionStore,
        user: UserId,
        kind: TransactionKind,
        window: Option<DateWindow>,
    ) -> CoreResult<BTreeMap<MonthKey, Decimal>> {
        let filter = Self::window_filter(window);
        let mut totals = BTreeMap::new();
        for group in store.aggregate(user, kind, GroupKey::Month, &filter)? {
            if let GroupValue::Month(month) = group.key {
                *totals.entry(month).or_insert(Decimal::ZERO) += group.total;
            }
        }
        Ok(totals)
    }

    /// Totals per calendar year, oldest first.
    pub fn group_by_year(
        store: &dyn TransactionStore,
        user: UserId,
        kind: TransactionKind,
    ) -> CoreResult<Vec<YearTotal>> {
        let mut years: BTreeMap<i32, YearTotal> = BTreeMap::new();
        for group in store.aggregate(user, kind, GroupKey::Year, &TransactionFilter::all())? {
            if let GroupValue::Year(year) = group.key {
                let entry = years.entry(year).or_insert(YearTotal {
                    year,
                    total: Decimal::ZERO,
                    count: 0,
                });
                entry.total += group.total;
                entry.count += group.count;
            }
        }
        Ok(years.into_values().collect())
    }

    fn window_filter(window: Option<DateWindow>) -> TransactionFilter {
        TransactionFilter {
            category: None,
            window,
        }
    }
}
