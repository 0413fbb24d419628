use std::env;

use cashview_core::{Clock, FixedClock};
use chrono::{DateTime, NaiveDate, Utc};

use crate::errors::CliError;

/// Pins the CLI's notion of "today", e.g. `CASHVIEW_TODAY=2024-03-15`.
pub const TODAY_ENV: &str = "CASHVIEW_TODAY";

/// Wall-clock time in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub fn clock_from_env() -> Result<Box<dyn Clock>, CliError> {
    clock_from_value(env::var(TODAY_ENV).ok().as_deref())
}

/// A fixed clock for a `YYYY-MM-DD` value, the system clock when unset or blank.
pub fn clock_from_value(value: Option<&str>) -> Result<Box<dyn Clock>, CliError> {
    match value.map(str::trim).filter(|raw| !raw.is_empty()) {
        None => Ok(Box::new(SystemClock)),
        Some(raw) => {
            let today = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                CliError::Input(format!("{TODAY_ENV} must be YYYY-MM-DD, got `{raw}`"))
            })?;
            Ok(Box::new(FixedClock::new(today)))
        }
    }
}
