//! # Processing Pipeline
//!
//! The single entry point collaborators call with a file's full content.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  content ──► lines ──► trim ──► skip blank                              │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │                             parse_line ──── Err ──► error log           │
//! │                                   │ Ok                                  │
//! │                                   ▼                                     │
//! │                              calculate                                  │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │                              aggregate ──► render ──► report text       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A bad line never stops the run. The only whole-file outcome is the
//! empty-file sentinel, which is a normal result, not an error.
//!
//! A valid line whose total would push the running gross total out of the
//! decimal range is logged as `AmountOverflow` and left out of the report.
//! Discount, net and per-customer sums never exceed the gross total, so this
//! one check keeps every sum representable.

use crate::calculator::calculate;
use crate::error::ParseError;
use crate::parser::parse_line;
use crate::report::{aggregate, render};
use crate::money::Money;
use crate::types::{CalculatedOrder, ProcessingResult};
use crate::{EMPTY_FILE_ERROR, EMPTY_FILE_REPORT};

/// Everything one pass over a file produced, before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRun {
    /// Aggregated summaries of the valid lines.
    pub result: ProcessingResult,
    /// Rejected lines, in file order.
    pub errors: Vec<ParseError>,
    /// Non-blank lines seen.
    pub lines_read: usize,
}

impl PipelineRun {
    /// The error log: one entry per rejected line, `\n`-joined.
    pub fn error_log(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The rendered summary table.
    pub fn report(&self) -> String {
        render(&self.result)
    }
}

/// Parses, calculates and aggregates every non-blank line.
///
/// Returns `None` when the content holds no non-blank line at all.
pub fn run(content: &str) -> Option<PipelineRun> {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        return None;
    }

    let mut orders: Vec<CalculatedOrder> = Vec::with_capacity(lines.len());
    let mut errors = Vec::new();
    let mut gross = Money::zero();

    for line in &lines {
        let calculated = match parse_line(line) {
            Ok(order) => calculate(order),
            Err(err) => {
                errors.push(err);
                continue;
            }
        };

        match gross.checked_add(calculated.line_total()) {
            Some(next) => {
                gross = next;
                orders.push(calculated);
            }
            None => errors.push(ParseError::AmountOverflow {
                quantity: calculated.order().quantity(),
                unit_price: calculated.order().unit_price().amount().to_string(),
                line: line.to_string(),
            }),
        }
    }

    Some(PipelineRun {
        result: aggregate(&orders),
        errors,
        lines_read: lines.len(),
    })
}

/// Processes a whole file and returns `(report_text, error_text)`.
///
/// ## Outcomes
/// - no non-blank lines → `("No data processed.", "File is empty.")`
/// - otherwise → the rendered table (always, even with zero valid orders)
///   and the newline-joined error log (empty when every line was valid)
///
/// ## Example
/// ```rust
/// use tally_core::process;
///
/// let content = "ORD001|C1|P1|1|600.00|2024-01-01\nInvalid|Line";
/// let (report, errors) = process(content);
///
/// assert!(report.contains("$540.00"));
/// assert!(errors.contains("Expected 6 fields"));
///
/// assert_eq!(process("  \n"), ("No data processed.".to_string(), "File is empty.".to_string()));
/// ```
pub fn process(content: &str) -> (String, String) {
    outcome(run(content).as_ref())
}

/// The `(report_text, error_text)` pair for a finished [`run`], with the
/// empty-file sentinel standing in for `None`.
pub fn outcome(run: Option<&PipelineRun>) -> (String, String) {
    match run {
        Some(run) => (run.report(), run.error_log()),
        None => (EMPTY_FILE_REPORT.to_string(), EMPTY_FILE_ERROR.to_string()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    const SAMPLE: &str = "ORD001|C1|P1|1|600.00|2024-01-01
ORD002|C2|P2|1|100.00|2024-01-01
Invalid|Line";

    #[test]
    fn test_process_sample_file() {
        let (output, error) = process(SAMPLE);

        assert!(output.contains("C1"));
        assert!(output.contains("C2"));
        assert!(output.contains("GRAND TOTAL"));
        assert!(output.contains('+'));
        assert!(output.contains('|'));
        assert!(error.contains("Invalid format"));
        assert!(error.contains("Expected 6 fields"));
        assert!(error.contains("Invalid|Line"));
        assert_eq!(error.lines().count(), 1);
    }

    #[test]
    fn test_run_sample_totals() {
        let run = run(SAMPLE).unwrap();
        let summaries = run.result.summary_report();

        assert_eq!(summaries[0].customer_name(), "C1");
        assert_eq!(summaries[0].gross_total(), money("600"));
        assert_eq!(summaries[0].total_discount(), money("60"));
        assert_eq!(summaries[0].net_total(), money("540"));

        assert_eq!(summaries[1].customer_name(), "C2");
        assert_eq!(summaries[1].gross_total(), money("100"));
        assert!(summaries[1].total_discount().is_zero());
        assert_eq!(summaries[1].net_total(), money("100"));

        assert_eq!(run.result.grand_total_gross(), money("700"));
        assert_eq!(run.result.grand_total_discount(), money("60"));
        assert_eq!(run.result.grand_total_net(), money("640"));
        assert_eq!(run.lines_read, 3);
        assert_eq!(run.errors.len(), 1);
    }

    #[test]
    fn test_empty_content_sentinel() {
        let expected = ("No data processed.".to_string(), "File is empty.".to_string());
        assert_eq!(process(""), expected);
        assert_eq!(process("   \n\t\n  "), expected);
        assert!(run("\r\n\r\n").is_none());
    }

    #[test]
    fn test_only_valid_lines_have_empty_error_log() {
        let content = "A|C1|P|1|1.00|2024-01-01\r\nB|C2|P|2|2.00|2024-01-02\n";
        let (report, errors) = process(content);
        assert!(errors.is_empty());
        assert!(report.contains("C2"));
    }

    #[test]
    fn test_only_malformed_lines() {
        let content = "bad\nA|C1|P|x|1|2024-01-01\nA|C1|P|1|1|01/01/2024";
        let run = run(content).unwrap();

        assert!(run.result.summary_report().is_empty());
        assert!(run.result.grand_total_gross().is_zero());
        assert_eq!(run.error_log().lines().count(), 3);

        let report = run.report();
        assert!(report.contains("GRAND TOTAL"));
        assert_eq!(report.matches("$0.00").count(), 3);
    }

    #[test]
    fn test_blank_lines_are_not_errors() {
        let content = "\n\nA|C1|P|1|1.00|2024-01-01\n   \n\nB|C1|P|1|1.00|2024-01-01\n\n";
        let run = run(content).unwrap();
        assert!(run.errors.is_empty());
        assert_eq!(run.lines_read, 2);
        assert_eq!(run.result.summary_report()[0].order_count(), 2);
    }

    #[test]
    fn test_errors_keep_file_order() {
        let content = "one\nA|C1|P|1|1.00|2024-01-01\ntwo|x";
        let (_, errors) = process(content);
        let lines: Vec<&str> = errors.lines().collect();
        assert!(lines[0].ends_with("Line: one"));
        assert!(lines[1].ends_with("Line: two|x"));
    }

    #[test]
    fn test_large_line_total_is_accepted() {
        let (report, errors) = process("O1|Big|P|1000000|2000000000|2024-01-01");
        assert!(errors.is_empty(), "{}", errors);
        assert!(report.contains("Big"));
        assert!(report.contains("$2,000,000,000,000,000.00"));
        assert!(report.contains("$1,800,000,000,000,000.00"));
    }

    #[test]
    fn test_gross_overflow_rejects_only_the_overflowing_line() {
        let content = "A|C1|P|1|50000000000000000000000000000|2024-01-01
B|C2|P|1|50000000000000000000000000000|2024-01-01
C|C3|P|2|10.00|2024-01-01";
        let run = run(content).unwrap();

        assert_eq!(run.errors.len(), 1);
        assert!(matches!(run.errors[0], ParseError::AmountOverflow { .. }));
        assert!(run.errors[0].line().starts_with("B|C2"));

        let names: Vec<&str> = run
            .result
            .summary_report()
            .iter()
            .map(|s| s.customer_name())
            .collect();
        assert_eq!(names, vec!["C1", "C3"]);
        assert_eq!(
            run.result.grand_total_gross(),
            money("50000000000000000000000000020")
        );
    }

    #[test]
    fn test_item_count_beyond_u64() {
        let line = format!("A|C1|Freebie|{}|0|2024-01-01", i64::MAX);
        let content = [line.as_str(); 3].join("\n");
        let (report, errors) = process(&content);

        assert!(errors.is_empty());
        assert!(report.contains("27670116110564327421"));
    }

    #[test]
    fn test_outcome_of_missing_run_is_sentinel() {
        assert_eq!(
            outcome(None),
            (EMPTY_FILE_REPORT.to_string(), EMPTY_FILE_ERROR.to_string())
        );
        let run = run("A|C1|P|1|1.00|2024-01-01").unwrap();
        assert_eq!(outcome(Some(&run)), (run.report(), run.error_log()));
    }
}
