//! Money calculation helpers
//!
//! All monetary values are `rust_decimal::Decimal` end to end; sums are
//! exact and rounding to 2 decimal places happens only at the output
//! boundary.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::db::models::OrderItem;
use crate::utils::AppError;

/// Rounding for monetary output values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed price per ticket type
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Maximum allowed quantity per order line
pub const MAX_QUANTITY: i64 = 9999;

/// Round a monetary value for display/storage at the output boundary
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Validate a ticket-type price
pub fn validate_price(price: Decimal, field: &str) -> Result<(), AppError> {
    if price.is_sign_negative() {
        return Err(AppError::validation(format!(
            "{field} must be non-negative, got {price}"
        )));
    }
    if price > MAX_PRICE {
        return Err(AppError::validation(format!(
            "{field} exceeds maximum allowed ({MAX_PRICE}), got {price}"
        )));
    }
    Ok(())
}

/// Validate an order line quantity
pub fn validate_quantity(quantity: i64) -> Result<(), AppError> {
    if quantity <= 0 {
        return Err(AppError::validation(format!(
            "quantity must be positive, got {quantity}"
        )));
    }
    if quantity > MAX_QUANTITY {
        return Err(AppError::validation(format!(
            "quantity exceeds maximum allowed ({MAX_QUANTITY}), got {quantity}"
        )));
    }
    Ok(())
}

/// Line total: unit_price * quantity, exact
pub fn line_total(unit_price: Decimal, quantity: i64) -> Decimal {
    unit_price * Decimal::from(quantity)
}

/// Order total: sum of line totals, exact.
///
/// This is the only way `total_amount` is ever produced; client-supplied
/// totals are never trusted.
pub fn order_total(items: &[OrderItem]) -> Decimal {
    items.iter().map(|i| i.line_total).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::AttendeeInfo;
    use surrealdb::RecordId;

    fn item(unit_price: &str, quantity: i64) -> OrderItem {
        let price: Decimal = unit_price.parse().expect("test price");
        OrderItem {
            event: RecordId::from_table_key("event", 1),
            event_id: 1,
            event_title: "Test Event".to_string(),
            ticket_type_id: 1,
            ticket_type_name: "General".to_string(),
            category_name: "Standard".to_string(),
            quantity,
            unit_price: price,
            line_total: line_total(price, quantity),
            attendee: AttendeeInfo {
                name: "Alex".to_string(),
                email: "alex@example.com".to_string(),
                phone: None,
            },
        }
    }

    #[test]
    fn test_line_total_exact() {
        assert_eq!(line_total("10.99".parse().unwrap(), 3).to_string(), "32.97");
    }

    #[test]
    fn test_order_total_is_sum_of_lines() {
        let items = vec![item("100.00", 2), item("49.95", 1), item("0.01", 100)];
        let total = order_total(&items);
        assert_eq!(total.to_string(), "250.95");
    }

    #[test]
    fn test_penny_accumulation_has_no_drift() {
        // 1000 * 0.01 must be exactly 10, not 9.999999...
        let items: Vec<OrderItem> = (0..1000).map(|_| item("0.01", 1)).collect();
        assert_eq!(order_total(&items), Decimal::new(10, 0));
    }

    #[test]
    fn test_round_money_half_up() {
        assert_eq!(round_money(Decimal::new(5, 3)).to_string(), "0.01"); // 0.005
        assert_eq!(round_money(Decimal::new(4, 3)).to_string(), "0.00"); // 0.004
    }

    #[test]
    fn test_validate_price_bounds() {
        assert!(validate_price("0".parse().unwrap(), "price").is_ok());
        assert!(validate_price("99.99".parse().unwrap(), "price").is_ok());
        assert!(validate_price("-1".parse().unwrap(), "price").is_err());
        assert!(validate_price("1000001".parse().unwrap(), "price").is_err());
    }

    #[test]
    fn test_validate_quantity_bounds() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-2).is_err());
        assert!(validate_quantity(MAX_QUANTITY + 1).is_err());
    }
}
