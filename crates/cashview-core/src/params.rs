use tracing::warn;

use crate::{CoreError, CoreResult};

/// Upper bound for trailing report windows (ten years).
pub const MAX_TRAILING_MONTHS: u32 = 120;

/// Parses a trailing-months argument, falling back to `default` when absent.
pub fn parse_months(raw: Option<&str>, default: u32) -> CoreResult<u32> {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(default.min(MAX_TRAILING_MONTHS));
    };
    let months = raw.parse::<u32>().map_err(|_| {
        warn!(value = raw, "rejected months parameter");
        CoreError::Validation(format!("months must be a non-negative integer, got `{raw}`"))
    })?;
    if months > MAX_TRAILING_MONTHS {
        warn!(months, "months parameter above limit");
        return Err(CoreError::Validation(format!(
            "months must be at most {MAX_TRAILING_MONTHS}, got {months}"
        )));
    }
    Ok(months)
}
