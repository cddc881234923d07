//! Decimal helpers shared by the tax and reconciliation rules.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Low Dutch VAT rate (9%).
pub const LOW_VAT_RATE: Decimal = dec!(0.09);

/// High Dutch VAT rate (21%).
pub const HIGH_VAT_RATE: Decimal = dec!(0.21);

/// Largest magnitude accepted for any amount. Sums of a realistic number of
/// such values stay far inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// Round to 2 decimal places using half-up (commercial rounding).
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Sum optional amounts, treating `None` as zero.
pub fn sum_present<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Option<Decimal>>,
{
    values.into_iter().flatten().sum()
}

/// Render an optional amount for diagnostics.
pub fn show(value: Option<Decimal>) -> String {
    value.map_or_else(|| "not specified".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_up() {
        assert_eq!(round2(dec!(1.005)), dec!(1.01));
        assert_eq!(round2(dec!(1.004)), dec!(1.00));
        assert_eq!(round2(dec!(-1.005)), dec!(-1.01));
        assert_eq!(round2(dec!(89.55) * dec!(0.09)), dec!(8.06));
    }

    #[test]
    fn sums_present_values() {
        assert_eq!(sum_present([Some(dec!(1.5)), None, Some(dec!(2))]), dec!(3.5));
        assert_eq!(sum_present(Vec::<Option<Decimal>>::new()), Decimal::ZERO);
    }

    #[test]
    fn shows_missing() {
        assert_eq!(show(None), "not specified");
        assert_eq!(show(Some(dec!(1.50))), "1.50");
    }
}
