//! Numeric coercion and undefined-aware comparisons.
//!
//! Raw cells are turned into [`Numeric`] values before any arithmetic. A value
//! with no numeric reading becomes `None` instead of an error, and every
//! comparison involving `None` is false.

use serde_json::Value;

use crate::table::Table;

/// A number, or undefined when the source cell had no numeric reading.
pub type Numeric = Option<f64>;

/// Numeric reading of a single raw cell.
///
/// - numbers map to themselves
/// - strings are trimmed and parsed as floats (`"12"`, `"4.5"`, `"1e3"`)
/// - booleans map to `1.0` / `0.0`
/// - `null`, absent cells, arrays, objects and NaN are undefined
pub fn to_numeric(value: Option<&Value>) -> Numeric {
    let number = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }?;
    (!number.is_nan()).then_some(number)
}

/// Coerce one column of `table`, one entry per row.
pub fn coerce_column(table: &Table, column: &str) -> Vec<Numeric> {
    table.column(column).map(to_numeric).collect()
}

/// `lhs > rhs`, false when either side is undefined.
pub fn exceeds(lhs: Numeric, rhs: Numeric) -> bool {
    matches!((lhs, rhs), (Some(l), Some(r)) if l > r)
}

/// Product of all factors, undefined if any factor is undefined or the
/// result is NaN (`inf * 0`).
pub fn product(factors: &[Numeric]) -> Numeric {
    let value = factors.iter().try_fold(1.0, |acc, f| f.map(|v| acc * v))?;
    (!value.is_nan()).then_some(value)
}

/// Text equality where undefined never equals anything, itself included.
pub fn same_text(lhs: Option<&str>, rhs: Option<&str>) -> bool {
    matches!((lhs, rhs), (Some(l), Some(r)) if l == r)
}
