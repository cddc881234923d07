use rust_decimal::Decimal;

use crate::core::round2;

/// A (base, tax) pair at one VAT rate, either member possibly missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaxPair {
    pub base: Option<Decimal>,
    pub tax: Option<Decimal>,
}

impl TaxPair {
    pub fn new(base: Option<Decimal>, tax: Option<Decimal>) -> Self {
        Self { base, tax }
    }
}

/// Base and tax disagree with the rate on both sides beyond tolerance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateMismatch {
    pub rate: Decimal,
    pub base: Decimal,
    pub tax: Decimal,
    /// `round2(base × rate)`.
    pub expected_tax: Decimal,
    /// `round2(tax / rate)`.
    pub expected_base: Decimal,
    /// Relative difference on the tax side (1 when the tax is zero).
    pub tax_diff: Decimal,
    /// Relative difference on the base side (1 when the base is zero).
    pub base_diff: Decimal,
}

impl RateMismatch {
    /// Warning text appended to the supplier rationale.
    pub fn warning(&self, tier: &str) -> String {
        format!(
            "WARNING: Possible error on invoice. {tier}_tax ({}) and {tier}_tax_base ({}) are \
             inconsistent with the {}% rate. Expected tax: {} or expected base: {}. \
             Please verify these values in the invoice.",
            self.tax,
            self.base,
            (self.rate * Decimal::ONE_HUNDRED).normalize(),
            self.expected_tax,
            self.expected_base,
        )
    }
}

/// What [`resolve_pair`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairOutcome {
    /// Both members absent, the rate is not positive, or the arithmetic
    /// overflows.
    Untouched,
    /// Both present and within tolerance.
    Consistent,
    /// Both present and out of tolerance on both sides; values are kept.
    Mismatch(RateMismatch),
    /// Base inferred from the tax.
    BaseInferred,
    /// Tax inferred from the base.
    TaxInferred,
}

/// Cross-check a base/tax pair against `rate`, or infer the missing member.
///
/// All rounding is half-up to 2 decimals. A mismatch is reported only when
/// the relative difference exceeds `tolerance` on the tax side *and* on the
/// base side.
///
/// ```
/// use factuur::tax::{PairOutcome, TaxPair, resolve_pair};
/// use rust_decimal_macros::dec;
///
/// let (pair, outcome) = resolve_pair(TaxPair::new(Some(dec!(100)), None), dec!(0.21), dec!(0.01));
/// assert_eq!(pair.tax, Some(dec!(21.00)));
/// assert_eq!(outcome, PairOutcome::TaxInferred);
/// ```
pub fn resolve_pair(pair: TaxPair, rate: Decimal, tolerance: Decimal) -> (TaxPair, PairOutcome) {
    if rate <= Decimal::ZERO {
        return (pair, PairOutcome::Untouched);
    }

    match (pair.base, pair.tax) {
        (None, None) => (pair, PairOutcome::Untouched),
        (None, Some(tax)) => match tax.checked_div(rate) {
            Some(base) => (
                TaxPair::new(Some(round2(base)), Some(tax)),
                PairOutcome::BaseInferred,
            ),
            None => (pair, PairOutcome::Untouched),
        },
        (Some(base), None) => match base.checked_mul(rate) {
            Some(tax) => (
                TaxPair::new(Some(base), Some(round2(tax))),
                PairOutcome::TaxInferred,
            ),
            None => (pair, PairOutcome::Untouched),
        },
        (Some(base), Some(tax)) => {
            let Some(expected_tax) = base.checked_mul(rate).map(round2) else {
                return (pair, PairOutcome::Untouched);
            };
            if tax.is_zero() && expected_tax.is_zero() {
                return (pair, PairOutcome::Consistent);
            }
            let Some(expected_base) = tax.checked_div(rate).map(round2) else {
                return (pair, PairOutcome::Untouched);
            };
            let tax_diff = relative_diff(tax, expected_tax);
            let base_diff = relative_diff(base, expected_base);

            if tax_diff > tolerance && base_diff > tolerance {
                let mismatch = RateMismatch {
                    rate,
                    base,
                    tax,
                    expected_tax,
                    expected_base,
                    tax_diff,
                    base_diff,
                };
                (pair, PairOutcome::Mismatch(mismatch))
            } else {
                (pair, PairOutcome::Consistent)
            }
        }
    }
}

// |actual - expected| / |actual|, or 100% when actual is zero.
fn relative_diff(actual: Decimal, expected: Decimal) -> Decimal {
    if actual.is_zero() {
        Decimal::ONE
    } else {
        ((actual - expected) / actual).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const LOW: Decimal = dec!(0.09);
    const HIGH: Decimal = dec!(0.21);
    const TOL: Decimal = dec!(0.01);

    #[test]
    fn both_absent() {
        let (pair, outcome) = resolve_pair(TaxPair::default(), LOW, TOL);
        assert_eq!(pair, TaxPair::default());
        assert_eq!(outcome, PairOutcome::Untouched);
    }

    #[test]
    fn infers_base() {
        let (pair, outcome) = resolve_pair(TaxPair::new(None, Some(dec!(8.05))), LOW, TOL);
        assert_eq!(pair.base, Some(dec!(89.44)));
        assert_eq!(outcome, PairOutcome::BaseInferred);
    }

    #[test]
    fn infers_tax() {
        let (pair, outcome) = resolve_pair(TaxPair::new(Some(dec!(89.55)), None), LOW, TOL);
        assert_eq!(pair.tax, Some(dec!(8.06)));
        assert_eq!(outcome, PairOutcome::TaxInferred);
    }

    #[test]
    fn rounding_noise_is_consistent() {
        let pair = TaxPair::new(Some(dec!(89.55)), Some(dec!(8.05)));
        let (_, outcome) = resolve_pair(pair, LOW, TOL);
        assert_eq!(outcome, PairOutcome::Consistent);
    }

    #[test]
    fn both_zero_consistent() {
        let (_, outcome) = resolve_pair(TaxPair::new(Some(dec!(0)), Some(dec!(0))), HIGH, TOL);
        assert_eq!(outcome, PairOutcome::Consistent);
    }

    #[test]
    fn one_side_within_tolerance_is_consistent() {
        // Base side is 4% off after rounding, tax side matches exactly.
        let pair = TaxPair::new(Some(dec!(0.50)), Some(dec!(0.11)));
        let (_, outcome) = resolve_pair(pair, HIGH, TOL);
        assert_eq!(outcome, PairOutcome::Consistent);
    }

    #[test]
    fn both_sides_off_is_mismatch() {
        let (pair, outcome) = resolve_pair(TaxPair::new(Some(dec!(100)), Some(dec!(9))), HIGH, TOL);
        assert_eq!(pair, TaxPair::new(Some(dec!(100)), Some(dec!(9))));
        let PairOutcome::Mismatch(m) = outcome else {
            panic!("expected mismatch");
        };
        assert_eq!(m.expected_tax, dec!(21.00));
        assert_eq!(m.expected_base, dec!(42.86));
        assert!(m.warning("high").contains("inconsistent with the 21% rate"));
    }

    #[test]
    fn zero_tax_with_base_is_mismatch() {
        let (_, outcome) = resolve_pair(TaxPair::new(Some(dec!(50)), Some(dec!(0))), LOW, TOL);
        let PairOutcome::Mismatch(m) = outcome else {
            panic!("expected mismatch");
        };
        assert_eq!(m.tax_diff, Decimal::ONE);
        assert_eq!(m.base_diff, Decimal::ONE);
    }

    #[test]
    fn zero_rate_untouched() {
        let pair = TaxPair::new(Some(dec!(10)), None);
        assert_eq!(resolve_pair(pair, Decimal::ZERO, TOL), (pair, PairOutcome::Untouched));
    }
}
