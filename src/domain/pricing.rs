//! Cart pricing calculations.

use rust_decimal::Decimal;

use crate::domain::aggregates::{CartItem, CartSummary};
use crate::domain::value_objects::{percent_of, round2};

/// Flat delivery charge, in the cart's currency.
pub const DELIVERY_COST: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// VAT rate applied to the subtotal.
pub const VAT_RATE_PERCENTAGE: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// Recognised coupon codes and the discount percentage each grants.
const COUPONS: &[(&str, u32)] = &[("DISCOUNT15", 15)];

/// Looks up the discount percentage for a coupon code. Codes are case-sensitive.
pub fn coupon_discount(code: &str) -> Option<Decimal> {
    COUPONS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, percentage)| Decimal::from(*percentage))
}

/// Prices a list of line items.
///
/// VAT and the discount are taken from the rounded subtotal and are not
/// rounded themselves; only the grand total is.
pub fn compute_summary(items: &[CartItem], discount_percentage: Decimal) -> CartSummary {
    let subtotal = round2(items.iter().map(|i| i.price * Decimal::from(i.quantity)).sum());
    let vat = percent_of(subtotal, VAT_RATE_PERCENTAGE);
    let discount_amount = percent_of(subtotal, discount_percentage);
    let grand_total = round2(subtotal + DELIVERY_COST + vat - discount_amount);

    CartSummary {
        subtotal,
        delivery_cost: DELIVERY_COST,
        vat,
        vat_rate_percentage: VAT_RATE_PERCENTAGE,
        discount_amount,
        discount_percentage,
        grand_total,
    }
}

/// Summary of a cart whose last item was removed or that was reset after checkout.
///
/// Monetary fields are zero, the configured rates are kept and any discount is dropped.
pub fn reset_summary() -> CartSummary {
    CartSummary {
        delivery_cost: DELIVERY_COST,
        vat_rate_percentage: VAT_RATE_PERCENTAGE,
        ..CartSummary::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(item_id: i64, price: i64, quantity: u32) -> CartItem {
        CartItem {
            item_id,
            name: format!("Pizza {item_id}"),
            image_url: String::new(),
            description: String::new(),
            price: Decimal::from(price),
            quantity,
            row_total: Decimal::from(price) * Decimal::from(quantity),
            max_order_quantity: 10,
            currency: "CZK".into(),
        }
    }

    #[test]
    fn test_two_pizza_summary() {
        let summary = compute_summary(&[item(1, 274, 1), item(2, 160, 1)], Decimal::ZERO);
        assert_eq!(summary.subtotal, Decimal::from(434));
        assert_eq!(summary.vat, Decimal::new(434, 1));
        assert_eq!(summary.delivery_cost, Decimal::from(5));
        assert_eq!(summary.discount_amount, Decimal::ZERO);
        assert_eq!(summary.grand_total, Decimal::new(4824, 1));
    }

    #[test]
    fn test_discounted_summary() {
        let summary = compute_summary(&[item(1, 274, 1), item(2, 160, 1)], Decimal::from(15));
        assert_eq!(summary.discount_percentage, Decimal::from(15));
        assert_eq!(summary.discount_amount, Decimal::new(651, 1));
        assert_eq!(summary.grand_total, Decimal::new(4173, 1));
    }

    #[test]
    fn test_grand_total_invariant_holds_for_fractional_prices() {
        let mut items = vec![item(1, 0, 3), item(2, 0, 2), item(3, 0, 7)];
        items[0].price = Decimal::new(1999, 2);
        items[1].price = Decimal::new(333, 2);
        items[2].price = Decimal::new(1, 2);

        for percentage in [0, 5, 15, 33] {
            let s = compute_summary(&items, Decimal::from(percentage));
            let expected_subtotal =
                round2(items.iter().map(|i| i.price * Decimal::from(i.quantity)).sum());
            assert_eq!(s.subtotal, expected_subtotal);
            assert_eq!(s.grand_total, round2(s.subtotal + s.delivery_cost + s.vat - s.discount_amount));
        }
    }

    #[test]
    fn test_empty_items_still_charge_delivery() {
        let summary = compute_summary(&[], Decimal::ZERO);
        assert_eq!(summary.subtotal, Decimal::ZERO);
        assert_eq!(summary.grand_total, DELIVERY_COST);
    }

    #[test]
    fn test_reset_summary_keeps_rates() {
        let summary = reset_summary();
        assert_eq!(summary.subtotal, Decimal::ZERO);
        assert_eq!(summary.grand_total, Decimal::ZERO);
        assert_eq!(summary.discount_percentage, Decimal::ZERO);
        assert_eq!(summary.delivery_cost, DELIVERY_COST);
        assert_eq!(summary.vat_rate_percentage, VAT_RATE_PERCENTAGE);
    }

    #[test]
    fn test_coupon_lookup() {
        assert_eq!(coupon_discount("DISCOUNT15"), Some(Decimal::from(15)));
        assert_eq!(coupon_discount("discount15"), None);
        assert_eq!(coupon_discount("BADCODE"), None);
    }
}
