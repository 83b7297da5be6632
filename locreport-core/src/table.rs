//! Presentation-ready table structures.
//!
//! The renderer produces `ReportTable`s: headers plus ordered
//! (label, value) rows, with no layout applied. `Display` provides a
//! plain-text layout for console use; callers that want a different
//! presentation iterate the rows themselves.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A two-column table: fixed headers and ordered (label, value) rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTable {
    pub headers: [String; 2],
    pub rows: Vec<(String, String)>,
}

impl ReportTable {
    pub fn new(rows: Vec<(String, String)>) -> Self {
        Self {
            headers: ["Field".to_string(), "Value".to_string()],
            rows,
        }
    }
}

impl fmt::Display for ReportTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label_width = self
            .rows
            .iter()
            .map(|(label, _)| label.chars().count())
            .chain([self.headers[0].chars().count()])
            .max()
            .unwrap_or(0);

        writeln!(f, "{:<label_width$}  {}", self.headers[0], self.headers[1])?;
        writeln!(f, "{}", "-".repeat(label_width + 2 + self.headers[1].chars().count()))?;
        for (label, value) in &self.rows {
            writeln!(f, "{label:<label_width$}  {value}")?;
        }
        Ok(())
    }
}

/// The three tables of one rendered location report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedReport {
    pub country: ReportTable,
    pub capital: ReportTable,
    pub weather: ReportTable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_fixed() {
        let table = ReportTable::new(vec![]);
        assert_eq!(table.headers, ["Field", "Value"]);
    }

    #[test]
    fn display_pads_labels_to_widest() {
        let table = ReportTable::new(vec![
            ("Country".into(), "Sweden".into()),
            ("Population".into(), "10,551,707 people".into()),
        ]);

        let text = table.to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Field       Value");
        assert_eq!(lines[2], "Country     Sweden");
        assert_eq!(lines[3], "Population  10,551,707 people");
    }
}
