//! # Order Calculator
//!
//! Computes line total, discount and net total for one validated order.
//!
//! ## Discount Rule
//! ```text
//! line_total = quantity × unit_price
//!
//! line_total >  500.00  ──►  discount = line_total × 10%
//! line_total <= 500.00  ──►  discount = 0
//!
//! net_total  = line_total − discount
//! ```
//!
//! No rounding happens here; amounts keep full precision until display.

use crate::money::Money;
use crate::types::{CalculatedOrder, Order};
use crate::{DISCOUNT_RATE, DISCOUNT_THRESHOLD};

/// Applies the totals and volume discount to an order.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use tally_core::calculator::calculate;
/// use tally_core::{Money, Order};
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let order = Order::new("1", "Test", "Test", 1, Money::from_major(600), date).unwrap();
///
/// let calculated = calculate(order);
/// assert_eq!(calculated.discount_amount(), Money::from_major(60));
/// assert_eq!(calculated.net_total(), Money::from_major(540));
/// ```
pub fn calculate(order: Order) -> CalculatedOrder {
    let line_total = order.unit_price().multiply_quantity(order.quantity());
    let discount = discount_for(line_total);

    CalculatedOrder::new(order, line_total, discount)
}

/// Discount owed on a line total (strictly above the threshold).
pub fn discount_for(line_total: Money) -> Money {
    if line_total.amount() > DISCOUNT_THRESHOLD {
        line_total.percentage(DISCOUNT_RATE)
    } else {
        Money::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn order(quantity: u64, unit_price: &str) -> Order {
        Order::new(
            "1",
            "Test",
            "Test",
            quantity,
            unit_price.parse().unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
        .unwrap()
    }

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    #[test]
    fn test_no_discount() {
        let calculated = calculate(order(2, "100.0"));
        assert_eq!(calculated.line_total(), money("200"));
        assert_eq!(calculated.discount_amount(), Money::zero());
        assert_eq!(calculated.net_total(), money("200"));
    }

    #[test]
    fn test_with_discount() {
        let calculated = calculate(order(1, "600.0"));
        assert_eq!(calculated.line_total(), money("600"));
        assert_eq!(calculated.discount_amount(), money("60"));
        assert_eq!(calculated.net_total(), money("540"));
    }

    #[test]
    fn test_threshold_is_strict() {
        let at_threshold = calculate(order(5, "100"));
        assert_eq!(at_threshold.line_total(), money("500"));
        assert!(at_threshold.discount_amount().is_zero());

        let just_over = calculate(order(1, "500.01"));
        assert_eq!(just_over.discount_amount(), money("50.001"));
        assert_eq!(just_over.net_total(), money("450.009"));
    }

    #[test]
    fn test_net_is_line_minus_discount() {
        for (qty, price) in [(0, "1000"), (3, "333.33"), (7, "0.99"), (2, "999.99")] {
            let c = calculate(order(qty, price));
            assert_eq!(c.net_total(), c.line_total() - c.discount_amount());
        }
    }

    #[test]
    fn test_calculation_keeps_order() {
        let calculated = calculate(order(2, "999.99"));
        assert_eq!(calculated.order().quantity(), 2);
        assert_eq!(calculated.line_total(), money("1999.98"));
        assert_eq!(calculated.discount_amount(), money("199.998"));
    }
}
