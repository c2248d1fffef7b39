//! # Report Aggregator
//!
//! Groups calculated orders by customer and renders the summary table.
//!
//! ## Aggregation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  orders (input order)          summaries (first-appearance order)       │
//! │                                                                         │
//! │  #1  C1  600.00      ──►       [0] C1  orders 2  gross 700.00           │
//! │  #2  C2  100.00      ──►       [1] C2  orders 1  gross 100.00           │
//! │  #3  C1  100.00      ──┘                                                │
//! │                                                                         │
//! │  index: HashMap<name, position>   rows: Vec<CustomerSummary>            │
//! │  The Vec fixes the row order; the map only finds the slot.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The report is NOT sorted: the first order seen for a customer decides
//! where that customer's row appears.

use std::collections::HashMap;

use crate::money::Money;
use crate::table::GridTable;
use crate::types::{CalculatedOrder, CustomerSummary, ProcessingResult};

/// Column headers of the summary table.
pub const REPORT_HEADERS: [&str; 6] = [
    "Customer Name",
    "Orders",
    "Items",
    "Gross Total",
    "Discount",
    "Net Total",
];

/// Label of the final totals row.
pub const GRAND_TOTAL_LABEL: &str = "GRAND TOTAL";

/// Folds calculated orders into per-customer summaries and grand totals.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use tally_core::{calculator::calculate, report::aggregate, Money, Order};
///
/// let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let orders = vec![
///     calculate(Order::new("1", "C1", "P1", 1, Money::from_major(100), date).unwrap()),
///     calculate(Order::new("2", "C2", "P2", 1, Money::from_major(20), date).unwrap()),
///     calculate(Order::new("3", "C1", "P3", 1, Money::from_major(600), date).unwrap()),
/// ];
///
/// let result = aggregate(&orders);
/// assert_eq!(result.summary_report()[0].customer_name(), "C1");
/// assert_eq!(result.summary_report()[0].order_count(), 2);
/// assert_eq!(result.grand_total_net(), Money::from_major(660));
/// ```
pub fn aggregate(orders: &[CalculatedOrder]) -> ProcessingResult {
    let mut summaries: Vec<CustomerSummary> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    let mut gross = Money::zero();
    let mut discount = Money::zero();
    let mut net = Money::zero();

    for order in orders {
        let name = order.order().customer_name();
        let slot = *index.entry(name).or_insert_with(|| {
            summaries.push(CustomerSummary::new(name));
            summaries.len() - 1
        });
        summaries[slot].record(order);

        gross += order.line_total();
        discount += order.discount_amount();
        net += order.net_total();
    }

    ProcessingResult::new(summaries, gross, discount, net)
}

/// Renders the summary as a grid table, ending with the `GRAND TOTAL` row.
pub fn render(result: &ProcessingResult) -> String {
    let mut table = GridTable::new(REPORT_HEADERS);

    for summary in result.summary_report() {
        table.push_row([
            summary.customer_name().to_string(),
            summary.order_count().to_string(),
            summary.total_items().to_string(),
            summary.gross_total().to_string(),
            summary.total_discount().to_string(),
            summary.net_total().to_string(),
        ]);
    }

    table.push_row([
        GRAND_TOTAL_LABEL.to_string(),
        String::new(),
        String::new(),
        result.grand_total_gross().to_string(),
        result.grand_total_discount().to_string(),
        result.grand_total_net().to_string(),
    ]);

    table.render()
}

// =============================================================================
// Unit Tests
// =============================================================================
