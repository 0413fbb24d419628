#![doc(test(attr(deny(warnings))))]

//! cashview reports a user's financial position (budget health, monthly
//! summaries, cash flow and savings trends) from recorded income, expenses
//! and budgets. The CLI in [`cli`] drives the services in `cashview-core`.

pub mod cli;
pub mod errors;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("cashview tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
