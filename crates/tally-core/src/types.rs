//! # Domain Types
//!
//! Core domain types used throughout Tally.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Order       │──►│ CalculatedOrder │──►│ CustomerSummary │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  order_id       │   │  order          │   │  customer_name  │       │
//! │  │  customer_name  │   │  line_total     │   │  order_count    │       │
//! │  │  quantity       │   │  discount       │   │  total_items    │       │
//! │  │  unit_price     │   │  net_total      │   │  gross / net    │       │
//! │  └─────────────────┘   └─────────────────┘   └────────┬────────┘       │
//! │                                                       │                 │
//! │                                              ┌────────▼────────┐       │
//! │                                              │ProcessingResult │       │
//! │                                              │  summaries +    │       │
//! │                                              │  grand totals   │       │
//! │                                              └─────────────────┘       │
//! │                                                                         │
//! │  Storage-facing (shared with tally-db and tally-api):                  │
//! │  SubmissionEntry ──► SubmissionFile ──► ArtifactKind                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pipeline values are immutable once built: fields are private and only the
//! parser, calculator and aggregator construct them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{validate_line_total, validate_unit_price, ValidationResult};

// =============================================================================
// Order
// =============================================================================

/// One validated order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Order {
    order_id: String,
    customer_name: String,
    product_name: String,
    quantity: u64,
    #[ts(as = "String")]
    unit_price: Money,
    #[ts(as = "String")]
    order_date: NaiveDate,
}

impl Order {
    /// Creates an order, enforcing the value invariants.
    ///
    /// ## Rules
    /// - `unit_price` must be non-negative
    /// - `quantity × unit_price` must fit the decimal range
    /// - text fields are trimmed; their content is not otherwise checked
    pub fn new(
        order_id: &str,
        customer_name: &str,
        product_name: &str,
        quantity: u64,
        unit_price: Money,
        order_date: NaiveDate,
    ) -> ValidationResult<Self> {
        validate_unit_price(unit_price)?;
        validate_line_total(quantity, unit_price)?;

        Ok(Order {
            order_id: order_id.trim().to_string(),
            customer_name: customer_name.trim().to_string(),
            product_name: product_name.trim().to_string(),
            quantity,
            unit_price,
            order_date,
        })
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn order_date(&self) -> NaiveDate {
        self.order_date
    }
}

// =============================================================================
// Calculated Order
// =============================================================================

/// An order with its totals and discount applied.
///
/// Only [`crate::calculator::calculate`] builds these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct CalculatedOrder {
    order: Order,
    #[ts(as = "String")]
    line_total: Money,
    #[ts(as = "String")]
    discount_amount: Money,
    #[ts(as = "String")]
    net_total: Money,
}

impl CalculatedOrder {
    pub(crate) fn new(order: Order, line_total: Money, discount_amount: Money) -> Self {
        CalculatedOrder {
            order,
            line_total,
            discount_amount,
            net_total: line_total - discount_amount,
        }
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    /// quantity × unit price, before discount.
    pub fn line_total(&self) -> Money {
        self.line_total
    }

    pub fn discount_amount(&self) -> Money {
        self.discount_amount
    }

    /// line total minus discount.
    pub fn net_total(&self) -> Money {
        self.net_total
    }
}

// =============================================================================
// Customer Summary
// =============================================================================

/// Aggregated counts and totals for one customer within one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct CustomerSummary {
    customer_name: String,
    order_count: u64,
    /// Sum of quantities. Each quantity fits `i64`, so `u128` cannot wrap.
    total_items: u128,
    #[ts(as = "String")]
    gross_total: Money,
    #[ts(as = "String")]
    total_discount: Money,
    #[ts(as = "String")]
    net_total: Money,
}

impl CustomerSummary {
    pub(crate) fn new(customer_name: &str) -> Self {
        CustomerSummary {
            customer_name: customer_name.to_string(),
            order_count: 0,
            total_items: 0,
            gross_total: Money::zero(),
            total_discount: Money::zero(),
            net_total: Money::zero(),
        }
    }

    /// Folds one order into the running totals.
    pub(crate) fn record(&mut self, order: &CalculatedOrder) {
        self.order_count += 1;
        self.total_items += u128::from(order.order().quantity());
        self.gross_total += order.line_total();
        self.total_discount += order.discount_amount();
        self.net_total += order.net_total();
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn order_count(&self) -> u64 {
        self.order_count
    }

    pub fn total_items(&self) -> u128 {
        self.total_items
    }

    pub fn gross_total(&self) -> Money {
        self.gross_total
    }

    pub fn total_discount(&self) -> Money {
        self.total_discount
    }

    pub fn net_total(&self) -> Money {
        self.net_total
    }
}

// =============================================================================
// Processing Result
// =============================================================================

/// Per-customer summaries (first-appearance order) plus grand totals.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, TS)]
#[ts(export)]
pub struct ProcessingResult {
    summary_report: Vec<CustomerSummary>,
    #[ts(as = "String")]
    grand_total_gross: Money,
    #[ts(as = "String")]
    grand_total_discount: Money,
    #[ts(as = "String")]
    grand_total_net: Money,
}

impl ProcessingResult {
    pub(crate) fn new(
        summary_report: Vec<CustomerSummary>,
        grand_total_gross: Money,
        grand_total_discount: Money,
        grand_total_net: Money,
    ) -> Self {
        ProcessingResult {
            summary_report,
            grand_total_gross,
            grand_total_discount,
            grand_total_net,
        }
    }

    pub fn summary_report(&self) -> &[CustomerSummary] {
        &self.summary_report
    }

    pub fn grand_total_gross(&self) -> Money {
        self.grand_total_gross
    }

    pub fn grand_total_discount(&self) -> Money {
        self.grand_total_discount
    }

    pub fn grand_total_net(&self) -> Money {
        self.grand_total_net
    }

    /// Number of valid orders folded into this result.
    pub fn order_count(&self) -> u64 {
        self.summary_report.iter().map(|s| s.order_count).sum()
    }
}

// =============================================================================
// Artifact Kind
// =============================================================================

/// The three texts stored per uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// The file exactly as uploaded.
    Upload,
    /// The rendered summary report.
    Output,
    /// The newline-joined error log.
    Error,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Upload => "upload",
            ArtifactKind::Output => "output",
            ArtifactKind::Error => "error",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upload" => Ok(ArtifactKind::Upload),
            "output" => Ok(ArtifactKind::Output),
            "error" => Ok(ArtifactKind::Error),
            other => Err(ValidationError::InvalidFormat {
                field: "artifact kind".to_string(),
                reason: format!("unknown kind '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Submission
// =============================================================================

/// One processed file within a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmissionFile {
    /// File id (UUID v4); also the artifact key.
    pub id: String,
    /// Name the file was uploaded under.
    pub filename: String,
    /// Stored name of the report artifact.
    pub output_file: String,
    /// Stored name of the error-log artifact.
    pub error_file: String,
}

impl SubmissionFile {
    /// Builds the entry with the standard artifact names.
    pub fn new(id: impl Into<String>, filename: impl Into<String>) -> Self {
        let id = id.into();
        SubmissionFile {
            output_file: format!("{}_output.txt", id),
            error_file: format!("{}_error.txt", id),
            filename: filename.into(),
            id,
        }
    }

    /// Stored name of the artifact of the given kind.
    pub fn artifact_name(&self, kind: ArtifactKind) -> String {
        match kind {
            ArtifactKind::Upload => format!("{}_{}", self.id, self.filename),
            ArtifactKind::Output => self.output_file.clone(),
            ArtifactKind::Error => self.error_file.clone(),
        }
    }
}

/// A single upload request and the files it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmissionEntry {
    pub id: String,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
    pub files: Vec<SubmissionFile>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_order_new_trims_text_fields() {
        let order = Order::new(" ORD001 ", " John Smith ", " Laptop", 2, Money::from_major(5), date())
            .unwrap();
        assert_eq!(order.order_id(), "ORD001");
        assert_eq!(order.customer_name(), "John Smith");
        assert_eq!(order.product_name(), "Laptop");
    }

    #[test]
    fn test_order_new_rejects_negative_price() {
        let price: Money = "-1".parse().unwrap();
        let err = Order::new("1", "C", "P", 1, price, date()).unwrap_err();
        assert!(matches!(err, ValidationError::Negative { .. }));
    }

    #[test]
    fn test_summary_record_accumulates() {
        let order = Order::new("1", "C1", "P", 3, Money::from_major(10), date()).unwrap();
        let calculated = CalculatedOrder::new(order, Money::from_major(30), Money::zero());

        let mut summary = CustomerSummary::new("C1");
        summary.record(&calculated);
        summary.record(&calculated);

        assert_eq!(summary.order_count(), 2);
        assert_eq!(summary.total_items(), 6);
        assert_eq!(summary.gross_total(), Money::from_major(60));
        assert_eq!(summary.net_total(), Money::from_major(60));
    }

    #[test]
    fn test_summary_items_exceed_u64() {
        let quantity = i64::MAX as u64;
        let order = Order::new("1", "C1", "Freebie", quantity, Money::zero(), date()).unwrap();
        let calculated = CalculatedOrder::new(order, Money::zero(), Money::zero());

        let mut summary = CustomerSummary::new("C1");
        for _ in 0..3 {
            summary.record(&calculated);
        }

        assert_eq!(summary.total_items(), 27_670_116_110_564_327_421);
        assert!(summary.gross_total().is_zero());
    }

    #[test]
    fn test_artifact_kind_round_trip_names() {
        assert_eq!("output".parse::<ArtifactKind>().unwrap(), ArtifactKind::Output);
        assert_eq!(ArtifactKind::Error.to_string(), "error");
        assert!("report".parse::<ArtifactKind>().is_err());
    }

    #[test]
    fn test_submission_file_names() {
        let file = SubmissionFile::new("abc", "orders.txt");
        assert_eq!(file.output_file, "abc_output.txt");
        assert_eq!(file.error_file, "abc_error.txt");
        assert_eq!(file.artifact_name(ArtifactKind::Upload), "abc_orders.txt");
    }

    #[test]
    fn test_submission_entry_json_shape() {
        let entry = SubmissionEntry {
            id: "s1".to_string(),
            timestamp: DateTime::parse_from_rfc3339("2024-01-01T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            files: vec![SubmissionFile::new("f1", "a.txt")],
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["files"][0]["output_file"], "f1_output.txt");
        assert_eq!(json["timestamp"], "2024-01-01T10:00:00Z");
    }
}
