//! Guarded decimal ratios. Every division in the report builders goes through here.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to cents, half away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `numerator / denominator`, or zero when the denominator is zero or the quotient overflows.
pub fn safe_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

/// Unrounded `part / whole × 100`; zero when `whole` is zero.
pub fn exact_percentage(part: Decimal, whole: Decimal) -> Decimal {
    safe_div(part, whole)
        .checked_mul(Decimal::ONE_HUNDRED)
        .unwrap_or(Decimal::ZERO)
}

/// `part / whole × 100` rounded to 2 dp; zero when `whole` is zero.
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    round2(exact_percentage(part, whole))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn zero_denominator_is_zero() {
        assert_eq!(percentage(dec!(50), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(safe_div(dec!(-3), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn percentages_round_half_away_from_zero() {
        assert_eq!(percentage(dec!(1), dec!(3)), dec!(33.33));
        assert_eq!(percentage(dec!(2), dec!(3)), dec!(66.67));
        assert_eq!(percentage(dec!(-200), dec!(800)), dec!(-25));
        assert_eq!(round2(dec!(0.125)), dec!(0.13));
        assert_eq!(round2(dec!(-0.125)), dec!(-0.13));
    }

    #[test]
    fn exact_percentage_keeps_every_digit() {
        assert!(exact_percentage(dec!(300.01), dec!(300)) > dec!(100));
        assert!(exact_percentage(dec!(899.99), dec!(1000)) < dec!(90));
        assert_eq!(percentage(dec!(899.99), dec!(1000)), dec!(90));
    }
}
