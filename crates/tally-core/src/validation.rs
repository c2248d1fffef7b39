//! # Validation Module
//!
//! Field rules shared by the line parser and the `Order` constructor.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: LineParser                                                   │
//! │  ├── Field count                                                       │
//! │  └── Format checks (integer, decimal, YYYY-MM-DD)                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Order::new (THIS MODULE)                                     │
//! │  ├── quantity >= 0, unit_price >= 0                                    │
//! │  └── quantity × unit_price representable as a decimal                   │
//! │                                                                         │
//! │  An Order value that exists has passed both layers.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Exact layout of an order date: `YYYY-MM-DD`.
const DATE_PATTERN_LEN: usize = 10;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a parsed quantity and narrows it to an unsigned count.
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_quantity;
///
/// assert_eq!(validate_quantity(3).unwrap(), 3);
/// assert_eq!(validate_quantity(0).unwrap(), 0);
/// assert!(validate_quantity(-1).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<u64> {
    u64::try_from(qty).map_err(|_| ValidationError::Negative {
        field: "quantity".to_string(),
    })
}

/// Validates a unit price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "unit_price".to_string(),
        });
    }

    Ok(())
}

/// Computes `quantity × unit_price`.
///
/// Fails only when the product leaves the decimal range (about 7.9 × 10^28).
pub fn validate_line_total(quantity: u64, unit_price: Money) -> ValidationResult<Money> {
    unit_price
        .amount()
        .checked_mul(Decimal::from(quantity))
        .map(Money::from_decimal)
        .ok_or_else(|| ValidationError::TooLarge {
            field: "line_total".to_string(),
        })
}

// =============================================================================
// Date Validators
// =============================================================================

/// Parses an order date that must match `YYYY-MM-DD` exactly.
///
/// ## Rules
/// - 4-digit year, 2-digit month, 2-digit day, `-` separators
/// - Must be a real calendar date (no `2024-02-30`)
/// - No alternate separators, no 2-digit years, no unpadded parts
///
/// ## Example
/// ```rust
/// use tally_core::validation::validate_order_date;
///
/// assert!(validate_order_date("2024-03-15").is_ok());
/// assert!(validate_order_date("2024/03/15").is_err());
/// assert!(validate_order_date("24-03-15").is_err());
/// assert!(validate_order_date("2024-3-5").is_err());
/// ```
pub fn validate_order_date(raw: &str) -> ValidationResult<NaiveDate> {
    let bytes = raw.as_bytes();

    let layout_ok = bytes.len() == DATE_PATTERN_LEN
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });

    if !layout_ok {
        return Err(ValidationError::InvalidFormat {
            field: "order_date".to_string(),
            reason: "expected YYYY-MM-DD".to_string(),
        });
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| ValidationError::InvalidFormat {
        field: "order_date".to_string(),
        reason: e.to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_quantity() {
        assert_eq!(validate_quantity(1).unwrap(), 1);
        assert_eq!(validate_quantity(0).unwrap(), 0);
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(i64::MIN).is_err());
    }

    #[test]
    fn test_validate_unit_price() {
        assert!(validate_unit_price(Money::zero()).is_ok());
        assert!(validate_unit_price("10.99".parse().unwrap()).is_ok());
        assert!(validate_unit_price("-0.01".parse().unwrap()).is_err());
    }

    #[test]
    fn test_validate_line_total() {
        let price: Money = "999.99".parse().unwrap();
        assert_eq!(
            validate_line_total(2, price).unwrap(),
            "1999.98".parse::<Money>().unwrap()
        );

        let big: Money = "2000000000".parse().unwrap();
        assert_eq!(
            validate_line_total(1_000_000, big).unwrap(),
            Money::from_major(2_000_000_000_000_000)
        );

        let huge: Money = "10000000000".parse().unwrap();
        assert!(validate_line_total(u64::MAX, huge).is_err());
    }

    #[test]
    fn test_validate_order_date() {
        assert_eq!(
            validate_order_date("2024-03-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
        assert!(validate_order_date("2024-02-29").is_ok());

        assert!(validate_order_date("2023-02-29").is_err());
        assert!(validate_order_date("2024-13-01").is_err());
        assert!(validate_order_date("2024.03.15").is_err());
        assert!(validate_order_date("15-03-2024").is_err());
        assert!(validate_order_date("2024-03-15T00:00").is_err());
        assert!(validate_order_date("").is_err());
    }
}
