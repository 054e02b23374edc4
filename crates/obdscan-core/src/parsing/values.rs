/// Coerce one CSV cell to a number.
///
/// Handles formats like:
/// - "850" -> Some(850.0)
/// - " 92.5 " -> Some(92.5)
/// - "1e3" -> Some(1000.0)
/// - "", "N/A", "--" -> None
/// - "NaN", "inf" -> None (never reaches a classifier)
pub fn coerce_number(cell: &str) -> Option<f64> {
    let s = cell.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Numeric series of a column, with non-numeric cells dropped.
pub fn numeric_series<'a>(cells: impl IntoIterator<Item = &'a str>) -> Vec<f64> {
    cells.into_iter().filter_map(coerce_number).collect()
}

/// Per-row numeric values, keeping row alignment for cross-column filtering.
pub fn numeric_cells<'a>(cells: impl IntoIterator<Item = &'a str>) -> Vec<Option<f64>> {
    cells.into_iter().map(coerce_number).collect()
}
