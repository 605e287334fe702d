//! Value Objects for the storefront

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a monetary amount to two decimal places, half away from zero.
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `percentage` percent of `amount`, unrounded.
pub fn percent_of(amount: Decimal, percentage: Decimal) -> Decimal {
    amount * percentage / Decimal::ONE_HUNDRED
}

/// Display formatting only; no conversion between currencies happens anywhere.
pub fn format_currency(amount: Decimal, currency: &str) -> String {
    format!("{} {:.2}", currency, round2(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(Decimal::new(43_405, 3)), Decimal::new(4341, 2));
        assert_eq!(round2(Decimal::new(-1_005, 3)), Decimal::new(-101, 2));
        assert_eq!(round2(Decimal::new(4824, 1)), Decimal::new(4824, 1));
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(Decimal::from(434), Decimal::from(15)), Decimal::new(651, 1));
        assert_eq!(percent_of(Decimal::from(434), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Decimal::new(4824, 1), "CZK"), "CZK 482.40");
        assert_eq!(format_currency(Decimal::ZERO, "CZK"), "CZK 0.00");
    }
}
