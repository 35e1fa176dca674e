//! Plain-text rendering of rule findings as pipe tables.

use crate::coercion::Numeric;

/// Rendered in place of an undefined value.
pub const UNDEFINED_CELL: &str = "NaN";

/// A finding row with a fixed, ordered column contract.
pub trait Tabular {
    /// Output column names, in contract order.
    const COLUMNS: &'static [&'static str];

    /// Cell text for each of [`Self::COLUMNS`], in the same order.
    fn cells(&self) -> Vec<String>;
}

pub fn numeric_cell(value: Numeric) -> String {
    value.map_or_else(|| UNDEFINED_CELL.to_string(), |v| v.to_string())
}

pub fn text_cell(value: Option<&str>) -> String {
    value.unwrap_or(UNDEFINED_CELL).to_string()
}

/// Render findings as a markdown pipe table, without an index column.
///
/// An empty slice still renders the header so callers can tell "no
/// findings" from "rule not run".
pub fn to_markdown<T: Tabular>(rows: &[T]) -> String {
    let body: Vec<Vec<String>> = rows.iter().map(T::cells).collect();

    let widths: Vec<usize> = T::COLUMNS
        .iter()
        .enumerate()
        .map(|(i, header)| {
            body.iter()
                .filter_map(|cells| cells.get(i))
                .map(String::len)
                .chain(std::iter::once(header.len()))
                .max()
                .unwrap_or(header.len())
                .max(3)
        })
        .collect();

    let mut out = String::new();
    push_line(&mut out, T::COLUMNS.iter().map(|c| c.to_string()), &widths);
    push_line(&mut out, widths.iter().map(|w| "-".repeat(*w)), &widths);
    for cells in body {
        push_line(&mut out, cells.into_iter(), &widths);
    }
    out
}

fn push_line(out: &mut String, cells: impl Iterator<Item = String>, widths: &[usize]) {
    out.push('|');
    for (cell, width) in cells.zip(widths) {
        out.push_str(&format!(" {cell:<width$} |"));
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair {
        name: &'static str,
        value: Numeric,
    }

    impl Tabular for Pair {
        const COLUMNS: &'static [&'static str] = &["name", "value"];

        fn cells(&self) -> Vec<String> {
            vec![self.name.to_string(), numeric_cell(self.value)]
        }
    }

    #[test]
    fn renders_header_separator_and_rows() {
        let rows = [
            Pair { name: "F001", value: Some(5000.0) },
            Pair { name: "F004", value: None },
        ];
        let md = to_markdown(&rows);
        let lines: Vec<&str> = md.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "| name | value |");
        assert_eq!(lines[1], "| ---- | ----- |");
        assert_eq!(lines[2], "| F001 | 5000  |");
        assert_eq!(lines[3], "| F004 | NaN   |");
    }

    #[test]
    fn empty_findings_still_render_header() {
        let md = to_markdown::<Pair>(&[]);
        assert_eq!(md.lines().count(), 2);
    }

    #[test]
    fn numeric_cells_keep_fractions() {
        assert_eq!(numeric_cell(Some(2.5)), "2.5");
        assert_eq!(numeric_cell(None), "NaN");
    }
}
