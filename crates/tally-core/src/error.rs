//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── ParseError       - One rejected input line (never fatal)          │
//! │  └── ValidationError  - Value-object invariant violations              │
//! │                                                                         │
//! │  tally-db errors (separate crate)                                      │
//! │  └── DbError          - Storage operation failures                     │
//! │                                                                         │
//! │  tally-api errors (in app)                                             │
//! │  └── ApiError         - What HTTP clients see                          │
//! │                                                                         │
//! │  A ParseError never leaves the core as an error: its Display text      │
//! │  becomes one line of the error log.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Parse Error
// =============================================================================

/// Why a single order line was rejected.
///
/// Every variant carries the trimmed source line so the error log alone is
/// enough to find the offending record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The line did not split into exactly six `|`-separated fields.
    #[error("Invalid format: Expected {expected} fields, got {actual}. Line: {line}")]
    FieldCount {
        expected: usize,
        actual: usize,
        line: String,
    },

    /// Quantity is not an integer.
    #[error("Invalid quantity format: {value}. Line: {line}")]
    QuantityFormat { value: String, line: String },

    /// Quantity parsed but is below zero.
    #[error("Invalid quantity: {value}. Must be non-negative. Line: {line}")]
    QuantityRange { value: i64, line: String },

    /// Unit price is not a decimal number.
    #[error("Invalid unit price format: {value}. Line: {line}")]
    PriceFormat { value: String, line: String },

    /// Unit price parsed but is below zero.
    #[error("Invalid unit price: {value}. Must be non-negative. Line: {line}")]
    PriceRange { value: String, line: String },

    /// Order date is not a real `YYYY-MM-DD` date.
    #[error("Invalid date format: {value}. Expected YYYY-MM-DD. Line: {line}")]
    DateFormat { value: String, line: String },

    /// The line total, or the report totals once it is added, would leave
    /// the decimal range.
    #[error("Invalid order amount: {quantity} x {unit_price} is too large to total. Line: {line}")]
    AmountOverflow {
        quantity: u64,
        unit_price: String,
        line: String,
    },
}

impl ParseError {
    /// The trimmed line this error refers to.
    pub fn line(&self) -> &str {
        match self {
            ParseError::FieldCount { line, .. }
            | ParseError::QuantityFormat { line, .. }
            | ParseError::QuantityRange { line, .. }
            | ParseError::PriceFormat { line, .. }
            | ParseError::PriceRange { line, .. }
            | ParseError::DateFormat { line, .. }
            | ParseError::AmountOverflow { line, .. } => line,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Value-object invariant violations.
///
/// Raised by validated constructors such as `Order::new`. The parser checks
/// formats itself and converts these into the matching [`ParseError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Value must not be below zero.
    #[error("{field} must be non-negative")]
    Negative { field: String },

    /// Value cannot be represented.
    #[error("{field} is too large to represent")]
    TooLarge { field: String },

    /// Invalid format (e.g. a date that is not `YYYY-MM-DD`).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for line parsing.
pub type ParseResult<T> = Result<T, ParseError>;

// =============================================================================
// Unit Tests
// =============================================================================
