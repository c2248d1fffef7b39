//! # tally-core: Pure Business Logic for Tally
//!
//! This crate is the **heart** of Tally. It turns the text of a pipe-delimited
//! order file into a per-customer summary report and an error log, as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 tally-api (HTTP, axum)                          │   │
//! │  │    upload ──► process ──► store artifacts ──► history           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ process(content)                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  parser   │─►│ calculator │─►│  report   │─►│   table   │  │   │
//! │  │   │ LineParser│  │  discount  │  │ aggregate │  │   grid    │  │   │
//! │  │   └───────────┘  └────────────┘  └───────────┘  └───────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │            tally-db (SQLite: submissions + artifacts)           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`parser`] - One line → `Order` or `ParseError`
//! - [`calculator`] - Line total, discount, net total
//! - [`report`] - Grouping by customer and table rendering
//! - [`pipeline`] - `process(content)`, the single entry point
//! - [`money`] - Decimal money with display rounding
//! - [`types`] - Domain and submission value types
//! - [`validation`] - Field rules behind the validated constructors
//! - [`table`] - Grid text table renderer
//! - [`error`] - Parse and validation errors
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same content in, same two strings out
//! 2. **No I/O**: storage and HTTP live in tally-db and tally-api
//! 3. **Decimal Money**: exact arithmetic, rounding only on display
//! 4. **Line-local Errors**: a bad line is logged, never fatal
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::process;
//!
//! let content = "ORD001|C1|P1|1|600.00|2024-01-01\n\
//!                ORD002|C2|P2|1|100.00|2024-01-01\n\
//!                Invalid|Line";
//!
//! let (report, errors) = process(content);
//! assert!(report.contains("GRAND TOTAL"));
//! assert!(report.contains("$640.00"));
//! assert!(errors.contains("Invalid|Line"));
//! ```

use rust_decimal::Decimal;

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calculator;
pub mod error;
pub mod money;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod table;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{ParseError, ValidationError};
pub use money::Money;
pub use pipeline::{outcome, process, run, PipelineRun};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of `|`-separated fields in an order line.
pub const EXPECTED_FIELD_COUNT: usize = 6;

/// Line totals strictly above this amount earn the volume discount.
pub const DISCOUNT_THRESHOLD: Decimal = Decimal::from_parts(500, 0, 0, false, 0);

/// Volume discount rate (10%).
pub const DISCOUNT_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Report text returned for a file with no non-blank lines.
pub const EMPTY_FILE_REPORT: &str = "No data processed.";

/// Error text returned for a file with no non-blank lines.
pub const EMPTY_FILE_ERROR: &str = "File is empty.";
