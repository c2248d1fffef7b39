//! # Line Parser
//!
//! Turns one raw order line into a validated [`Order`] or a [`ParseError`].
//!
//! ## Line Format
//! ```text
//! order_id | customer_name | product_name | quantity | unit_price | order_date
//! ORD001   | John Smith    | Laptop       | 2        | 999.99     | 2024-03-15
//! ```
//!
//! ## Check Order (first failure wins)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. split on '|'      ── != 6 fields ──► FieldCount                     │
//! │  2. quantity (i64)    ── not integer ──► QuantityFormat                 │
//! │                       ── below zero  ──► QuantityRange                  │
//! │  3. unit_price (dec)  ── not decimal ──► PriceFormat                    │
//! │                       ── below zero  ──► PriceRange                     │
//! │  4. order_date        ── not YYYY-MM-DD / not a real date ──► DateFormat│
//! │  5. Order::new        ── line total out of range ──► AmountOverflow     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{ParseError, ParseResult, ValidationError};
use crate::money::Money;
use crate::types::Order;
use crate::validation::{validate_order_date, validate_quantity};
use crate::EXPECTED_FIELD_COUNT;

/// Field separator of the order format.
pub const FIELD_SEPARATOR: char = '|';

/// Parses a single order line.
///
/// The line is trimmed before anything else; the trimmed text is what every
/// error message quotes.
///
/// ## Example
/// ```rust
/// use tally_core::parser::parse_line;
///
/// let order = parse_line("ORD001|John Smith|Laptop|2|999.99|2024-03-15").unwrap();
/// assert_eq!(order.customer_name(), "John Smith");
/// assert_eq!(order.quantity(), 2);
///
/// let err = parse_line("ORD001|John Smith|Laptop|2|999.99").unwrap_err();
/// assert!(err.to_string().contains("Expected 6 fields"));
/// ```
pub fn parse_line(line: &str) -> ParseResult<Order> {
    let line = line.trim();
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();

    let [order_id, customer_name, product_name, quantity_raw, price_raw, date_raw] =
        fields.as_slice()
    else {
        return Err(ParseError::FieldCount {
            expected: EXPECTED_FIELD_COUNT,
            actual: fields.len(),
            line: line.to_string(),
        });
    };

    let quantity = parse_quantity(quantity_raw.trim(), line)?;
    let unit_price = parse_unit_price(price_raw.trim(), line)?;

    let date_raw = date_raw.trim();
    let order_date = validate_order_date(date_raw).map_err(|_| ParseError::DateFormat {
        value: date_raw.to_string(),
        line: line.to_string(),
    })?;

    Order::new(
        order_id,
        customer_name,
        product_name,
        quantity,
        unit_price,
        order_date,
    )
    .map_err(|err| match err {
        ValidationError::Negative { .. } => ParseError::PriceRange {
            value: price_raw.trim().to_string(),
            line: line.to_string(),
        },
        _ => ParseError::AmountOverflow {
            quantity,
            unit_price: price_raw.trim().to_string(),
            line: line.to_string(),
        },
    })
}

fn parse_quantity(raw: &str, line: &str) -> ParseResult<u64> {
    let value: i64 = raw.parse().map_err(|_| ParseError::QuantityFormat {
        value: raw.to_string(),
        line: line.to_string(),
    })?;

    validate_quantity(value).map_err(|_| ParseError::QuantityRange {
        value,
        line: line.to_string(),
    })
}

fn parse_unit_price(raw: &str, line: &str) -> ParseResult<Money> {
    let price: Money = raw.parse().map_err(|_| ParseError::PriceFormat {
        value: raw.to_string(),
        line: line.to_string(),
    })?;

    if price.is_negative() {
        return Err(ParseError::PriceRange {
            value: raw.to_string(),
            line: line.to_string(),
        });
    }

    Ok(price)
}

// =============================================================================
// Unit Tests
// =============================================================================
