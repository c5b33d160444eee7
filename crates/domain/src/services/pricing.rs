//! Unit and booking pricing.

use rust_decimal::{Decimal, RoundingStrategy};

/// Markup applied on top of a unit's base price, in percent.
pub const DEFAULT_MARKUP_PERCENT: Decimal = Decimal::from_parts(15, 0, 0, false, 0);

/// `base × (1 + markup / 100)`, rounded half-up to cents.
pub fn total_price(base_price: Decimal, markup_percent: Decimal) -> Decimal {
    let factor = Decimal::ONE + markup_percent / Decimal::ONE_HUNDRED;
    (base_price * factor).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_default_markup_is_fifteen_percent() {
        assert_eq!(DEFAULT_MARKUP_PERCENT, dec("15"));
        assert_eq!(total_price(dec("100.00"), DEFAULT_MARKUP_PERCENT), dec("115.00"));
    }

    #[test]
    fn test_rounds_half_up_to_cents() {
        // 0.10 * 1.15 = 0.115
        assert_eq!(total_price(dec("0.10"), DEFAULT_MARKUP_PERCENT), dec("0.12"));
        // 99.99 * 1.15 = 114.9885
        assert_eq!(total_price(dec("99.99"), DEFAULT_MARKUP_PERCENT), dec("114.99"));
    }

    #[test]
    fn test_zero_markup_and_zero_price() {
        assert_eq!(total_price(dec("250.50"), Decimal::ZERO), dec("250.50"));
        assert_eq!(total_price(Decimal::ZERO, DEFAULT_MARKUP_PERCENT), Decimal::ZERO);
    }

    #[test]
    fn test_custom_markup() {
        assert_eq!(total_price(dec("80"), dec("12.5")), dec("90.00"));
    }
}
