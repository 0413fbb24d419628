use cashview_domain::{DateWindow, MonthKey};
use chrono::NaiveDate;

/// Calendar-month buckets for trailing windows.
pub struct TimeBucketer;

impl TimeBucketer {
    /// `months` buckets, oldest first, the last one containing `reference`.
    pub fn trailing_months(reference: NaiveDate, months: u32) -> Vec<MonthKey> {
        let current = MonthKey::of(reference);
        let months = i32::try_from(months).unwrap_or(i32::MAX);
        (0..months)
            .rev()
            .map(|offset| current.shift(-offset))
            .collect()
    }

    /// From the first day of the oldest bucket to the last day of the newest.
    pub fn span(buckets: &[MonthKey]) -> Option<DateWindow> {
        let oldest = buckets.first()?;
        let newest = buckets.last()?;
        Some(DateWindow {
            start: oldest.first_day(),
            end: newest.last_day(),
        })
    }
}
