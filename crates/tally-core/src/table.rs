//! # Grid Table Renderer
//!
//! Renders rows of text cells as a bordered grid with right-aligned cells.
//!
//! ## Layout
//! ```text
//! +-----------------+----------+
//! |   Customer Name |   Orders |   ← header
//! +=================+==========+   ← header rule
//! |              C1 |        1 |
//! +-----------------+----------+   ← rule after every row
//! ```
//!
//! Column width is the wider of the widest cell and the header plus two.
//! Every cell gets one space of padding on each side. Widths count chars,
//! so non-ASCII customer names stay aligned.

/// Padding added to header widths when sizing a column.
const HEADER_MIN_PADDING: usize = 2;

/// A table under construction.
#[derive(Debug, Clone, Default)]
pub struct GridTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl GridTable {
    /// Creates a table with the given column headers.
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        GridTable {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row; missing trailing cells render blank, extra cells are dropped.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells.into_iter().map(Into::into).collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    /// Renders the table. Lines are joined with `\n`, no trailing newline.
    pub fn render(&self) -> String {
        let widths = self.column_widths();

        let mut lines = Vec::with_capacity(self.rows.len() * 2 + 3);
        lines.push(rule(&widths, '-'));
        lines.push(row_line(&self.headers, &widths));
        lines.push(rule(&widths, '='));

        for row in &self.rows {
            lines.push(row_line(row, &widths));
            lines.push(rule(&widths, '-'));
        }

        // Header-only table still needs a closing border under the '=' rule.
        if self.rows.is_empty() {
            lines.pop();
            lines.push(rule(&widths, '-'));
        }

        lines.join("\n")
    }

    fn column_widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                let widest_cell = self
                    .rows
                    .iter()
                    .map(|row| text_width(&row[col]))
                    .max()
                    .unwrap_or(0);
                widest_cell.max(text_width(header) + HEADER_MIN_PADDING)
            })
            .collect()
    }
}

fn text_width(s: &str) -> usize {
    s.chars().count()
}

fn rule(widths: &[usize], fill: char) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.extend(std::iter::repeat(fill).take(width + 2));
        line.push('+');
    }
    line
}

fn row_line(cells: &[String], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.iter().zip(widths) {
        line.push_str(&format!(" {:>width$} |", cell, width = width));
    }
    line
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_grid() {
        let mut table = GridTable::new(["Name", "N"]);
        table.push_row(["Alice", "1"]);
        table.push_row(["Bo", "12"]);

        let expected = "\
+--------+-----+
|   Name |   N |
+========+=====+
|  Alice |   1 |
+--------+-----+
|     Bo |  12 |
+--------+-----+";
        assert_eq!(table.render(), expected);
    }

    #[test]
    fn test_wide_cell_sets_width() {
        let mut table = GridTable::new(["N"]);
        table.push_row(["123456"]);

        let rendered = table.render();
        assert!(rendered.contains("| 123456 |"));
        assert!(rendered.contains("|      N |"));
    }

    #[test]
    fn test_header_only() {
        let table = GridTable::new(["A", "B"]);
        let expected = "\
+-----+-----+
|   A |   B |
+-----+-----+";
        assert_eq!(table.render(), expected);
    }

    #[test]
    fn test_short_row_is_padded() {
        let mut table = GridTable::new(["A", "B"]);
        table.push_row(["x"]);
        assert!(table.render().contains("|   x |     |"));
    }

    #[test]
    fn test_unicode_width_counts_chars() {
        let mut table = GridTable::new(["Name"]);
        table.push_row(["Zoë Müller"]);
        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0].chars().count(), lines[3].chars().count());
    }
}
