//! Currency arithmetic for order totals.
//!
//! Totals are computed with [`rust_decimal::Decimal`] so typical currency
//! magnitudes never accumulate binary floating-point drift.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits carried by order prices.
pub const PRICE_SCALE: u32 = 2;

/// Sum the given prices and round to two decimal places.
///
/// The rounding rule is round-half-away-from-zero, so `9.995` totals
/// `10.00`. An empty sequence yields zero.
///
/// # Examples
/// ```
/// use rust_decimal::Decimal;
/// use bistro_backend::domain::pricing::order_total;
///
/// let total = order_total([Decimal::new(1000, 2), Decimal::new(450, 2)]);
/// assert_eq!(total, Decimal::new(1450, 2));
/// ```
pub fn order_total<I>(prices: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    prices
        .into_iter()
        .fold(Decimal::ZERO, |total, price| total + price)
        .round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).expect("valid decimal literal")
    }

    #[rstest]
    fn empty_input_totals_zero() {
        assert_eq!(order_total([]), Decimal::ZERO);
    }

    #[rstest]
    #[case(&["10.00", "4.50"], "14.50")]
    #[case(&["9.995"], "10.00")]
    #[case(&["0.01", "0.02"], "0.03")]
    fn totals_round_half_away_from_zero(#[case] prices: &[&str], #[case] expected: &str) {
        let total = order_total(prices.iter().map(|p| dec(p)));
        assert_eq!(total, dec(expected));
    }

    #[rstest]
    fn repeated_cents_do_not_drift() {
        // 0.10 thirty times is exactly 3.00 in decimal arithmetic.
        let total = order_total(std::iter::repeat_n(dec("0.10"), 30));
        assert_eq!(total, dec("3.00"));
    }
}
