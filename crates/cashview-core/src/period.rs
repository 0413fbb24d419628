use cashview_domain::{
    calendar::{first_of_month, last_of_month},
    Budget, BudgetPeriod, DateWindow,
};
use chrono::NaiveDate;

/// Derives the closed window a budget is evaluated over.
pub struct PeriodResolver;

impl PeriodResolver {
    /// Total over its inputs. An explicit end before the start collapses onto the start.
    ///
    /// Monthly windows snap outward to whole months: the start moves to day 1 and
    /// the end (explicit, or start + 1 month) moves to the last day of its month.
    pub fn resolve(period: BudgetPeriod, start: NaiveDate, end: Option<NaiveDate>) -> DateWindow {
        let start = match period {
            BudgetPeriod::Monthly => first_of_month(start),
            _ => start,
        };
        let end = end.unwrap_or_else(|| period.advance(start)).max(start);
        let end = match period {
            BudgetPeriod::Monthly => last_of_month(end),
            _ => end,
        };
        DateWindow { start, end }
    }

    pub fn for_budget(budget: &Budget) -> DateWindow {
        Self::resolve(budget.period, budget.start_date, budget.end_date)
    }
}
